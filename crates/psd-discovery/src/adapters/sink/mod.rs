//! Target output adapters.

mod channel;
#[cfg(feature = "file-sd")]
mod file_sd;

pub use channel::ChannelTargetSink;
#[cfg(feature = "file-sd")]
pub use file_sd::{FileSdSink, DEFAULT_SD_NAME};
