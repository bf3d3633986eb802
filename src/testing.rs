// Stub capabilities shared by the unit tests.

use crate::core::history::Message;
use crate::core::{Capabilities, Dispatcher};
use crate::error::{JarvisError, Result};
use crate::knowledge::{
    ChatModel, ChatResponder, Encyclopedia, KnowledgeChain, KnowledgeEngine, Lookup, ModelChoice,
    WebSearch,
};
use crate::store::{AppRegistry, MemoryStore};
use crate::system::{Clock, Desktop, JokeSource, Language, LanguageDetector, Speaker, Step};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Answers every web/engine/encyclopedia call with the same `Lookup`
pub struct Scripted {
    reply: Lookup,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl Scripted {
    pub fn new(reply: Lookup) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    fn answer(&self, input: &str) -> Lookup {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.to_string());
        self.reply.clone()
    }
}

#[async_trait]
impl WebSearch for Scripted {
    async fn snippet(&self, query: &str) -> Lookup {
        self.answer(query)
    }
}

#[async_trait]
impl KnowledgeEngine for Scripted {
    async fn query(&self, input: &str) -> Lookup {
        self.answer(input)
    }
}

#[async_trait]
impl Encyclopedia for Scripted {
    async fn summary(&self, topic: &str, _sentences: usize) -> Lookup {
        self.answer(topic)
    }
}

/// Chat model that records what it was sent
pub struct StubChat {
    reply: Lookup,
    seen: Mutex<Vec<(Vec<Message>, String)>>,
}

impl StubChat {
    pub fn new(reply: Lookup) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last_model(&self) -> String {
        self.seen
            .lock()
            .unwrap()
            .last()
            .map(|(_, model)| model.clone())
            .unwrap_or_default()
    }

    pub fn last_messages(&self) -> Vec<Message> {
        self.seen
            .lock()
            .unwrap()
            .last()
            .map(|(messages, _)| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for StubChat {
    async fn chat(&self, messages: &[Message], model: &str) -> Lookup {
        self.seen
            .lock()
            .unwrap()
            .push((messages.to_vec(), model.to_string()));
        self.reply.clone()
    }
}

/// Desktop that records actions instead of performing them
#[derive(Default)]
pub struct StubDesktop {
    fail: bool,
    actions: Mutex<Vec<String>>,
    launched: Mutex<Vec<PathBuf>>,
}

impl StubDesktop {
    /// Every action reports failure
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    pub fn launched(&self) -> Vec<PathBuf> {
        self.launched.lock().unwrap().clone()
    }

    fn record(&self, action: String) -> Result<()> {
        self.actions.lock().unwrap().push(action);
        if self.fail {
            Err(JarvisError::Capability("stub failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Desktop for StubDesktop {
    fn screenshot(&self, dest: &Path) -> Result<()> {
        self.record(format!("screenshot {}", dest.display()))
    }

    fn change_volume(&self, step: Step) -> Result<()> {
        self.record(format!("volume {:?}", step))
    }

    fn change_brightness(&self, step: Step) -> Result<()> {
        self.record(format!("brightness {:?}", step))
    }

    fn open(&self, target: &str) -> Result<()> {
        self.record(format!("open {}", target))
    }

    fn launch(&self, program: &Path) -> Result<()> {
        self.launched.lock().unwrap().push(program.to_path_buf());
        self.record(format!("launch {}", program.display()))
    }

    fn generate_image(&self, prompt: &str) -> Result<()> {
        self.record(format!("image {}", prompt))
    }
}

/// Counts how often a joke was requested
#[derive(Default)]
pub struct CountingJokes {
    calls: AtomicUsize,
}

impl CountingJokes {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl JokeSource for CountingJokes {
    fn joke(&self) -> String {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        format!("Joke number {}.", n)
    }
}

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Always reports the same language, or a failure when `None`
pub struct FixedLanguage(pub Option<Language>);

impl LanguageDetector for FixedLanguage {
    fn detect(&self, _text: &str) -> Option<Language> {
        self.0
    }
}

/// Collects everything it is asked to say
#[derive(Default)]
pub struct RecordingSpeaker {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Dispatcher on stubs whose chat model always answers `chat_reply`
pub fn stub_dispatcher(chat_reply: &str) -> Dispatcher {
    let noon = NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let caps = Capabilities {
        desktop: Arc::new(StubDesktop::default()),
        jokes: Arc::new(CountingJokes::default()),
        clock: Arc::new(FixedClock(noon)),
        language: Arc::new(FixedLanguage(Some(Language::English))),
    };
    let knowledge = KnowledgeChain::new(
        Scripted::new(Lookup::Empty),
        Scripted::new(Lookup::Empty),
        Scripted::new(Lookup::Empty),
        ChatResponder::new(
            StubChat::new(Lookup::Found(chat_reply.to_string())),
            ModelChoice::default(),
        ),
    );

    Dispatcher::new(MemoryStore::in_memory(), AppRegistry::default(), knowledge, caps)
}
