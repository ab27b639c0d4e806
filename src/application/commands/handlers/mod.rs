//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod archive_handlers;

pub use archive_handlers::*;
