/// Host-side capabilities
///
/// Desktop automation, speech, jokes, the clock and language detection.
/// Each sits behind a trait so the dispatcher can run against stubs.

pub mod clock;
pub mod desktop;
pub mod jokes;
pub mod language;
pub mod speech;

pub use clock::{Clock, SystemClock};
pub use desktop::{Desktop, Step, SystemDesktop};
pub use jokes::{BuiltinJokes, JokeSource};
pub use language::{Language, LanguageDetector, ScriptDetector};
pub use speech::{Speaker, SystemSpeaker};
