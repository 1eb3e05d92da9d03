//! One module per firmware command
//!
//! Every function runs a single exchange on an already leased
//! [`CommandContext`](crate::command::CommandContext). None of them retry.

pub mod copy;
pub mod delete;
pub mod get_directory;
pub mod launch;
pub mod ping_reset;
pub mod save;
pub mod toggle_music;

pub use copy::copy_file;
pub use delete::delete_file;
pub use get_directory::get_directory;
pub use launch::launch_file;
pub use ping_reset::{send_ping, send_reset};
pub use save::{CHUNK_SIZE, save_file};
pub use toggle_music::toggle_music;
