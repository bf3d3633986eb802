/// jarvis library
///
/// Core functionality for a text/voice assistant: classify a command,
/// run it against host capabilities or remote knowledge services, and
/// remember answers that are safe to replay.

pub mod config;
pub mod console;
pub mod core;
pub mod error;
pub mod knowledge;
pub mod store;
pub mod system;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use config::Config;
pub use console::Console;
pub use core::{Capabilities, ConversationHistory, Dispatcher};
pub use error::{JarvisError, Result};
