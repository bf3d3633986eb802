/// Stores for jarvis
///
/// The response memory and the app registry. Both are plain JSON files,
/// loaded once at startup and handed to the dispatcher.

pub mod apps;
pub mod memory;

pub use apps::AppRegistry;
pub use memory::MemoryStore;
