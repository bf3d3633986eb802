/// Command dispatcher
///
/// Turns one utterance into one response:
/// normalize → memory → classify → handle → maybe remember.
/// Exactly one command is processed at a time per session, so the
/// dispatcher takes `&mut self` and holds no locks.

use crate::core::history::ConversationHistory;
use crate::core::intents::{self, Intent};
use crate::core::locale;
use crate::error::{JarvisError, Result};
use crate::knowledge::KnowledgeChain;
use crate::store::{AppRegistry, MemoryStore};
use crate::system::{
    BuiltinJokes, Clock, Desktop, JokeSource, Language, LanguageDetector, ScriptDetector, Step,
    SystemClock, SystemDesktop,
};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

const NEWS_URL: &str = "https://news.google.com";

const IDENTITY_ANSWER: &str = "I was created by my boss Sachin.";

const COMPOSE_UNSUPPORTED: &str = "Sorry, I can't compose letters yet.";

const EMPTY_COMMAND: &str = "Sorry, I didn't catch that.";

/// Host capabilities the intent handlers use
#[derive(Clone)]
pub struct Capabilities {
    pub desktop: Arc<dyn Desktop>,
    pub jokes: Arc<dyn JokeSource>,
    pub clock: Arc<dyn Clock>,
    pub language: Arc<dyn LanguageDetector>,
}

impl Capabilities {
    /// The real thing: host desktop tools, built-in jokes, local clock
    pub fn system(image_command: Vec<String>) -> Self {
        Self {
            desktop: Arc::new(SystemDesktop::new(image_command)),
            jokes: Arc::new(BuiltinJokes),
            clock: Arc::new(SystemClock),
            language: Arc::new(ScriptDetector),
        }
    }
}

/// Classifies commands and produces responses
pub struct Dispatcher {
    memory: MemoryStore,
    apps: AppRegistry,
    knowledge: KnowledgeChain,
    caps: Capabilities,
    default_language: Language,
    screenshot_dir: PathBuf,
    downloads_dir: PathBuf,
}

impl Dispatcher {
    pub fn new(
        memory: MemoryStore,
        apps: AppRegistry,
        knowledge: KnowledgeChain,
        caps: Capabilities,
    ) -> Self {
        let screenshot_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let downloads_dir = dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .unwrap_or_else(|| PathBuf::from("Downloads"));

        Self {
            memory,
            apps,
            knowledge,
            caps,
            default_language: Language::English,
            screenshot_dir,
            downloads_dir,
        }
    }

    /// Language used when detection fails
    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    /// Where screenshots are written
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Process one command
    ///
    /// A remembered command returns its stored response before anything
    /// else runs, side effects included.
    pub async fn process(&mut self, raw: &str, history: &mut ConversationHistory) -> String {
        let normalized = intents::normalize(raw);
        if normalized.is_empty() {
            return EMPTY_COMMAND.to_string();
        }

        if let Some(remembered) = self.memory.get(&normalized) {
            debug!("Memory hit for '{}'", normalized);
            return remembered.to_string();
        }

        let language = self
            .caps
            .language
            .detect(raw)
            .unwrap_or(self.default_language);

        let intent = intents::classify(&normalized);
        debug!("'{}' classified as {:?} ({})", normalized, intent, language);

        let response = self
            .handle(intent, raw.trim(), &normalized, language, history)
            .await;

        if Self::should_remember(intent, &normalized, &response) {
            self.memory.put(normalized, response.clone());
        }

        response
    }

    fn should_remember(intent: Intent, normalized: &str, response: &str) -> bool {
        intent.is_memoizable()
            && !intents::is_dynamic(normalized)
            && !intents::has_failure_marker(response)
            && !response.trim().is_empty()
    }

    async fn handle(
        &self,
        intent: Intent,
        original: &str,
        normalized: &str,
        language: Language,
        history: &mut ConversationHistory,
    ) -> String {
        match intent {
            Intent::Screenshot => {
                let dest = self.screenshot_dir.join("screenshot.png");
                match self.on_desktop(move |desktop| desktop.screenshot(&dest)).await {
                    Ok(()) => "Screenshot taken and saved.".to_string(),
                    Err(e) => {
                        warn!("Screenshot failed: {}", e);
                        "Sorry, I couldn't take a screenshot.".to_string()
                    }
                }
            }
            Intent::Joke => self.caps.jokes.joke(),
            Intent::VolumeUp => self.volume(Step::Up).await,
            Intent::VolumeDown => self.volume(Step::Down).await,
            Intent::BrightnessUp => self.brightness(Step::Up).await,
            Intent::BrightnessDown => self.brightness(Step::Down).await,
            Intent::OpenDownloads => {
                let folder = self.downloads_dir.to_string_lossy().into_owned();
                self.open(folder, "Opening Downloads folder.").await
            }
            Intent::Time => locale::format_time(self.caps.clock.now(), language),
            Intent::News => self.open(NEWS_URL.to_string(), "Opening news.").await,
            Intent::Site(site) => {
                self.open(site.url().to_string(), &format!("Opening {}.", site.name()))
                    .await
            }
            Intent::Date => locale::format_date(self.caps.clock.now(), language),
            Intent::PlayMedia => {
                let song = intents::media_query(normalized);
                let query = song.clone();
                match self.on_desktop(move |desktop| desktop.play_media(&query)).await {
                    Ok(()) => format!("Playing {} on YouTube.", song),
                    Err(e) => {
                        warn!("Playback failed: {}", e);
                        format!("Sorry, I couldn't play {} on YouTube.", song)
                    }
                }
            }
            Intent::LaunchApp => {
                // Launching only spawns, it never waits on the app
                let app = intents::app_name(normalized);
                self.apps.launch(&app, self.caps.desktop.as_ref())
            }
            Intent::GenerateImage => {
                let prompt = intents::image_prompt(normalized);
                let input = prompt.clone();
                match self.on_desktop(move |desktop| desktop.generate_image(&input)).await {
                    Ok(()) => format!("Generating image for '{}'", prompt),
                    Err(e) => format!("Image generation failed: {}", e),
                }
            }
            Intent::Knowledge => {
                if intents::is_identity_question(normalized) {
                    IDENTITY_ANSWER.to_string()
                } else {
                    self.knowledge.resolve(original, normalized, history).await
                }
            }
            Intent::Compose => COMPOSE_UNSUPPORTED.to_string(),
            Intent::Chat => {
                self.knowledge
                    .responder()
                    .respond(original, normalized, history)
                    .await
            }
        }
    }

    /// Run a desktop action on the blocking pool
    ///
    /// Desktop tools wait for external programs, the image generator
    /// sometimes for minutes.
    async fn on_desktop<F>(&self, action: F) -> Result<()>
    where
        F: FnOnce(&dyn Desktop) -> Result<()> + Send + 'static,
    {
        let desktop = Arc::clone(&self.caps.desktop);
        tokio::task::spawn_blocking(move || action(desktop.as_ref()))
            .await
            .map_err(|e| JarvisError::Capability(format!("desktop task failed: {}", e)))?
    }

    async fn volume(&self, step: Step) -> String {
        match self.on_desktop(move |desktop| desktop.change_volume(step)).await {
            Ok(()) if step == Step::Up => "Volume increased.".to_string(),
            Ok(()) => "Volume decreased.".to_string(),
            Err(e) => {
                warn!("Volume change failed: {}", e);
                "Sorry, couldn't adjust volume.".to_string()
            }
        }
    }

    async fn brightness(&self, step: Step) -> String {
        match self.on_desktop(move |desktop| desktop.change_brightness(step)).await {
            Ok(()) if step == Step::Up => "Brightness increased.".to_string(),
            Ok(()) => "Brightness decreased.".to_string(),
            Err(e) => {
                warn!("Brightness change failed: {}", e);
                "Sorry, couldn't adjust brightness.".to_string()
            }
        }
    }

    async fn open(&self, target: String, done: &str) -> String {
        let opening = target.clone();
        match self.on_desktop(move |desktop| desktop.open(&opening)).await {
            Ok(()) => done.to_string(),
            Err(e) => {
                warn!("Could not open {}: {}", target, e);
                format!("Sorry, I couldn't open {}.", target)
            }
        }
    }
}
