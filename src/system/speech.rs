/// Text-to-speech
///
/// Speaks responses through the platform's synthesizer: `say` on macOS,
/// `espeak` elsewhere.

use crate::error::{JarvisError, Result};
use std::process::Command;

pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> Result<()>;
}

/// Speaker that shells out to the system synthesizer
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpeaker;

impl SystemSpeaker {
    fn program() -> &'static str {
        if cfg!(target_os = "macos") {
            "say"
        } else {
            "espeak"
        }
    }
}

impl Speaker for SystemSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(JarvisError::Speech("cannot speak empty text".to_string()));
        }

        let output = Command::new(Self::program()).arg(text).output()?;
        if !output.status.success() {
            return Err(JarvisError::Speech(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speak_rejects_empty_text() {
        let result = SystemSpeaker.speak("   ");
        assert!(matches!(result, Err(JarvisError::Speech(_))));
    }
}
