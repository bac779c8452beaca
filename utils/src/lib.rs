//! Shared utilities for the tokenized ballot toolkit.

pub mod format;
pub mod logging;
pub mod time;

pub use format::format_ether;
pub use logging::{init_logging, LogFormat};
pub use time::format_duration;
