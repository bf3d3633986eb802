/// Language detection
///
/// Best-effort guess at the language of an utterance. Only used to pick
/// between English and Hindi phrasing for time and date answers.

use crate::error::JarvisError;
use std::str::FromStr;

/// Supported reply languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Hindi,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = JarvisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "hi" | "hindi" => Ok(Language::Hindi),
            other => Err(JarvisError::Config(format!("unsupported language '{}'", other))),
        }
    }
}

pub trait LanguageDetector: Send + Sync {
    /// `None` means detection failed; callers fall back to a default.
    fn detect(&self, text: &str) -> Option<Language>;
}

// Romanized Hindi that speech-to-text hands back for Hinglish speakers
const HINDI_MARKERS: &[&str] = &[
    "hai", "kya", "samay", "tarikh", "aaj", "kitne", "baje", "batao",
];

/// Detector based on script and a handful of marker words
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptDetector;

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str) -> Option<Language> {
        // Devanagari block
        if text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c)) {
            return Some(Language::Hindi);
        }

        if !text.chars().any(char::is_alphabetic) {
            return None;
        }

        let lower = text.to_lowercase();
        let is_hinglish = lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| HINDI_MARKERS.contains(&word));

        if is_hinglish {
            Some(Language::Hindi)
        } else {
            Some(Language::English)
        }
    }
}
