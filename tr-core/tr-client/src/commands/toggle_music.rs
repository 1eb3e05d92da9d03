//! Pause or resume SID playback

use crate::command::CommandContext;
use crate::error::TeensyError;
use tr_model::TeensyToken;

pub fn toggle_music(ctx: &mut CommandContext<'_>) -> Result<(), TeensyError> {
    let drain_wait = ctx.config().failure_drain_wait;
    ctx.send_token(TeensyToken::PauseMusic)?;
    ctx.expect_ack("pause music token sent", drain_wait)
}
