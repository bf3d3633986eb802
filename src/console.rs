/// Interactive console
///
/// Reads one command per line, hands it to the dispatcher and prints the
/// response. Optionally speaks every line it prints. The conversation
/// history lives here for the length of the session.

use crate::core::intents::normalize;
use crate::core::{ConversationHistory, Dispatcher};
use crate::error::Result;
use crate::system::Speaker;
use log::{debug, warn};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const GREETING: &str = "Hello, I am Jarvis. How can I assist you?";

pub const FAREWELL: &str = "Goodbye! Have a nice day.";

const EXIT_WORDS: &[&str] = &["exit", "goodbye", "good bye", "bye bye", "quit"];

const PROMPT: &str = "you: ";

// The whole line must be an exit phrase, give or take some politeness
static EXIT_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    let phrases = EXIT_WORDS
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"^(?:(?:ok|okay|alright|jarvis|please)[\s,]+)*(?:{})(?:[\s,]+(?:jarvis|now|please|then))*[.!]*$",
        phrases
    ))
    .unwrap()
});

/// Whether the user wants to end the session
pub fn is_exit_command(text: &str) -> bool {
    EXIT_COMMAND.is_match(&normalize(text))
}

pub struct Console {
    dispatcher: Dispatcher,
    history: ConversationHistory,
    speaker: Option<Arc<dyn Speaker>>,
}

impl Console {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            history: ConversationHistory::new(),
            speaker: None,
        }
    }

    /// Speak every response as well as printing it
    pub fn with_speaker(mut self, speaker: Arc<dyn Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Run on the process's stdin and stdout until an exit word or EOF
    pub async fn run_stdio(&mut self) -> Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(stdin, stdout).await
    }

    /// Run the read-process-respond loop
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.reply(&mut output, GREETING).await?;

        let mut lines = input.lines();
        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                debug!("Input closed, ending session");
                output.write_all(b"\n").await?;
                break;
            };

            let command = line.trim();
            if command.is_empty() {
                continue;
            }

            if is_exit_command(command) {
                self.reply(&mut output, FAREWELL).await?;
                break;
            }

            let response = self.dispatcher.process(command, &mut self.history).await;
            self.reply(&mut output, &response).await?;
        }

        output.flush().await?;
        Ok(())
    }

    async fn reply<W>(&self, output: &mut W, text: &str) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        output
            .write_all(format!("jarvis: {}\n", text).as_bytes())
            .await?;
        output.flush().await?;
        self.speak(text).await;
        Ok(())
    }

    // Synthesizers block until they finish talking
    async fn speak(&self, text: &str) {
        let Some(speaker) = self.speaker.clone() else {
            return;
        };

        let text = text.to_string();
        match tokio::task::spawn_blocking(move || speaker.speak(&text)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Speech failed: {}", e),
            Err(e) => warn!("Speech task panicked: {}", e),
        }
    }
}
