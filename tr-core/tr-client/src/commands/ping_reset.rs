//! Fire-and-forget ping and reset

use crate::command::CommandContext;
use crate::error::TeensyError;
use tr_model::TeensyToken;

fn send_unacknowledged(ctx: &mut CommandContext<'_>, token: TeensyToken) -> Result<(), TeensyError> {
    if !ctx.is_open() {
        log::warn!("You must first connect in order to send {token}");
        return Ok(());
    }
    ctx.send_token(token)?;
    log::info!("Sent {token}");
    Ok(())
}

/// Send the ping token; the firmware answers with a text banner, not an ack
pub fn send_ping(ctx: &mut CommandContext<'_>) -> Result<(), TeensyError> {
    send_unacknowledged(ctx, TeensyToken::Ping)
}

/// Send the reset token
pub fn send_reset(ctx: &mut CommandContext<'_>) -> Result<(), TeensyError> {
    send_unacknowledged(ctx, TeensyToken::Reset)
}
