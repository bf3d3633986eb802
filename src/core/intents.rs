/// Intent classification
///
/// An ordered list of (pattern, intent) rules over normalized text,
/// compiled once on first use.
/// Rules are checked top to bottom and the first match wins; collisions
/// between keywords are settled only by position, so the order of `RULES`
/// is part of the contract and is pinned by a test.

use regex::Regex;
use std::sync::LazyLock;

/// Keywords that send a command to the knowledge chain
pub const KNOWLEDGE_KEYWORDS: &[&str] = &["calculate", "what is", "who is", "winner", "result"];

// Answers that depend on when you ask; never memorized
const DYNAMIC_KEYWORDS: &[&str] = &[
    "joke",
    "tell me a joke",
    "make me laugh",
    "time",
    "clock",
    "samay",
    "news",
    "date",
    "today's date",
    "what is the date",
    "tarikh",
];

// Responses containing any of these are never memorized
const FAILURE_MARKERS: &[&str] = &["sorry", "failed", "not found", "error launching"];

const MEDIA_FILLER_WORDS: &[&str] = &[
    "play",
    "music",
    "song",
    "on youtube",
    "please",
    "can you",
    "could you",
    "youtube",
];

/// Sites reachable with a one-word shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    YouTube,
    Google,
    Facebook,
    Gmail,
}

impl Site {
    pub fn url(&self) -> &'static str {
        match self {
            Site::YouTube => "https://youtube.com",
            Site::Google => "https://google.com",
            Site::Facebook => "https://facebook.com",
            Site::Gmail => "https://gmail.com",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Site::YouTube => "YouTube",
            Site::Google => "Google",
            Site::Facebook => "Facebook",
            Site::Gmail => "Gmail",
        }
    }
}

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Screenshot,
    Joke,
    VolumeUp,
    VolumeDown,
    BrightnessUp,
    BrightnessDown,
    OpenDownloads,
    Time,
    News,
    Site(Site),
    Date,
    PlayMedia,
    LaunchApp,
    GenerateImage,
    Knowledge,
    Compose,
    /// Nothing else matched
    Chat,
}

impl Intent {
    /// Whether a response to this intent may be stored in memory
    ///
    /// Intents with side effects always run again so that a replayed
    /// "open chrome" actually opens chrome.
    pub fn is_memoizable(&self) -> bool {
        matches!(self, Intent::Knowledge | Intent::Compose | Intent::Chat)
    }
}

/// One classification rule
pub struct IntentRule {
    pub intent: Intent,
    pattern: Regex,
    unless: Option<Regex>,
}

impl IntentRule {
    fn new(intent: Intent, pattern: Regex) -> Self {
        Self {
            intent,
            pattern,
            unless: None,
        }
    }

    /// Never match text that also matches `pattern`
    fn unless(mut self, pattern: Regex) -> Self {
        self.unless = Some(pattern);
        self
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
            && !self.unless.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// Every rule, in priority order
pub static RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        IntentRule::new(Intent::Screenshot, substrings(&["screenshot"])),
        IntentRule::new(Intent::Joke, words(&["joke"])),
        IntentRule::new(Intent::VolumeUp, substrings(&["increase volume", "volume up"])),
        IntentRule::new(Intent::VolumeDown, substrings(&["decrease volume", "volume down"])),
        IntentRule::new(Intent::BrightnessUp, words(&["increase brightness", "brightness up"])),
        IntentRule::new(Intent::BrightnessDown, words(&["decrease brightness", "brightness down"])),
        IntentRule::new(Intent::OpenDownloads, substrings(&["open downloads"])),
        IntentRule::new(Intent::Time, words(&["time", "clock", "samay"])),
        IntentRule::new(Intent::News, words(&["news"])),
        // "play ... on youtube" belongs to PlayMedia further down
        IntentRule::new(Intent::Site(Site::YouTube), words(&["youtube"])).unless(words(&["play"])),
        IntentRule::new(Intent::Site(Site::Google), words(&["google"])),
        IntentRule::new(Intent::Site(Site::Facebook), words(&["facebook"])),
        IntentRule::new(Intent::Site(Site::Gmail), words(&["gmail"])),
        IntentRule::new(Intent::Date, words(&["date", "tarikh"])),
        IntentRule::new(Intent::PlayMedia, both("play", "youtube")),
        IntentRule::new(Intent::LaunchApp, APP_VERBS.clone()),
        IntentRule::new(Intent::GenerateImage, both("generate", "image")),
        IntentRule::new(Intent::Knowledge, KNOWLEDGE.clone()),
        IntentRule::new(Intent::Compose, words(&["write", "compose", "draft", "letter"])),
    ]
});

static KNOWLEDGE: LazyLock<Regex> = LazyLock::new(|| words(KNOWLEDGE_KEYWORDS));

static DYNAMIC: LazyLock<Regex> = LazyLock::new(|| words(DYNAMIC_KEYWORDS));

static APP_VERBS: LazyLock<Regex> = LazyLock::new(|| words(&["open", "launch"]));

static MEDIA_FILLER: LazyLock<Regex> = LazyLock::new(|| words(MEDIA_FILLER_WORDS));

static IMAGE_WORDS: LazyLock<Regex> =
    LazyLock::new(|| words(&["generate", "image", "images", "jarvis"]));

/// Whole-word (or whole-phrase) alternation, longest first so
/// "on youtube" wins over "youtube" when stripping
pub fn words(list: &[&str]) -> Regex {
    let mut sorted: Vec<&str> = list.to_vec();
    sorted.sort_by_key(|w| std::cmp::Reverse(w.len()));
    compile(&format!(r"\b(?:{})\b", alternation(&sorted)))
}

/// Plain substring alternation
fn substrings(list: &[&str]) -> Regex {
    compile(&format!("(?:{})", alternation(list)))
}

/// Both substrings, in either order
fn both(a: &str, b: &str) -> Regex {
    let (a, b) = (regex::escape(a), regex::escape(b));
    compile(&format!("(?s){a}.*{b}|{b}.*{a}"))
}

fn alternation(list: &[&str]) -> String {
    list.iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

// Patterns are built from escaped literals, so they always compile
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Lower-case and trim
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// First matching intent for normalized text, `Chat` if none match
pub fn classify(text: &str) -> Intent {
    RULES
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Chat)
}

/// Commands whose answer changes over time
pub fn is_dynamic(text: &str) -> bool {
    DYNAMIC.is_match(text)
}

/// Apologies and error reports
pub fn has_failure_marker(response: &str) -> bool {
    let lower = response.to_lowercase();
    FAILURE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Remove every match of `pattern` and squeeze the leftover whitespace
pub fn strip(text: &str, pattern: &Regex) -> String {
    pattern
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// What to play, from "play <x> on youtube"
pub fn media_query(text: &str) -> String {
    strip(text, &MEDIA_FILLER)
}

/// App name, from "open <x>" / "launch <x>"
pub fn app_name(text: &str) -> String {
    strip(text, &APP_VERBS)
}

/// Image prompt, from "generate an image of <x>"
pub fn image_prompt(text: &str) -> String {
    strip(text, &IMAGE_WORDS)
}

/// Query with the knowledge keywords taken out
pub fn knowledge_residual(text: &str) -> String {
    strip(text, &KNOWLEDGE)
}

pub fn is_identity_question(text: &str) -> bool {
    text.contains("who made you") || text.contains("who created you")
}
