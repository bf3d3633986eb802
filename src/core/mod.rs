/// Core functionality modules
///
/// Contains the command pipeline: intent classification, the dispatcher
/// that runs each intent, localized phrasing and the conversation history.

pub mod dispatcher;
pub mod history;
pub mod intents;
pub mod locale;

pub use dispatcher::{Capabilities, Dispatcher};
pub use history::{ConversationHistory, Message, Role};
pub use intents::{classify, Intent, Site};
