/// Runtime configuration
///
/// Everything comes from environment variables (a `.env` file is loaded
/// first by the binary). Unset or blank variables fall back to defaults;
/// malformed ones are configuration errors.

use crate::error::{JarvisError, Result};
use crate::knowledge::ModelChoice;
use crate::system::Language;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_IMAGE_COMMAND: &str = "python modules/ai_image_generator/generate.py";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the stores
    pub home: PathBuf,
    pub memory_file: PathBuf,
    pub apps_file: PathBuf,
    /// Credential for the knowledge engine
    pub wolfram_app_id: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub models: ModelChoice,
    /// Per-request timeout for remote capabilities
    pub timeout: Duration,
    /// Used when language detection fails
    pub language: Language,
    pub speak: bool,
    /// Image generator program and fixed args; the prompt goes last
    pub image_command: Vec<String>,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let home = match get("JARVIS_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .map(|home| home.join(".jarvis"))
                .ok_or_else(|| {
                    JarvisError::Config("could not determine home directory".to_string())
                })?,
        };

        let memory_file = get("JARVIS_MEMORY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("memory.json"));
        let apps_file = get("JARVIS_APPS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("apps.json"));

        let defaults = ModelChoice::default();
        let models = ModelChoice {
            general: get("JARVIS_CHAT_MODEL").unwrap_or(defaults.general),
            code: get("JARVIS_CODE_MODEL").unwrap_or(defaults.code),
        };

        let timeout = match get("JARVIS_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    JarvisError::Config(format!("JARVIS_TIMEOUT_SECS must be a number, got '{}'", raw))
                })?;
                if secs == 0 {
                    return Err(JarvisError::Config(
                        "JARVIS_TIMEOUT_SECS must be at least 1".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let language = match get("JARVIS_LANGUAGE") {
            Some(raw) => raw.parse()?,
            None => Language::English,
        };

        let speak = match get("JARVIS_SPEAK") {
            Some(raw) => parse_flag(&raw)?,
            None => false,
        };

        let image_command = get("JARVIS_IMAGE_COMMAND")
            .unwrap_or_else(|| DEFAULT_IMAGE_COMMAND.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Ok(Self {
            home,
            memory_file,
            apps_file,
            wolfram_app_id: get("WOLFRAM_APP_ID"),
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            models,
            timeout,
            language,
            speak,
            image_command,
        })
    }

    /// The knowledge engine credential, which the assistant cannot start without
    pub fn require_knowledge_credential(&self) -> Result<&str> {
        self.wolfram_app_id.as_deref().ok_or_else(|| {
            JarvisError::Config(
                "WOLFRAM_APP_ID is not set. Add it to your environment or .env file.".to_string(),
            )
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(JarvisError::Config(format!(
            "expected a true/false value, got '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("JARVIS_HOME", "/tmp/jarvis-home")]).unwrap();

        assert_eq!(config.home, PathBuf::from("/tmp/jarvis-home"));
        assert_eq!(config.memory_file, PathBuf::from("/tmp/jarvis-home/memory.json"));
        assert_eq!(config.apps_file, PathBuf::from("/tmp/jarvis-home/apps.json"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.language, Language::English);
        assert!(!config.speak);
        assert_eq!(config.models.general, "meta-llama/llama-4-maverick");
        assert_eq!(config.models.code, "deepseek/deepseek-chat-v3-0324");
        assert_eq!(
            config.image_command,
            vec!["python", "modules/ai_image_generator/generate.py"]
        );
        assert!(config.wolfram_app_id.is_none());
        assert!(config.openrouter_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("JARVIS_HOME", "/tmp/jarvis-home"),
            ("JARVIS_MEMORY_FILE", "/data/mem.json"),
            ("WOLFRAM_APP_ID", "ABC-123"),
            ("OPENROUTER_API_KEY", "sk-or-test"),
            ("JARVIS_CHAT_MODEL", "some/model"),
            ("JARVIS_TIMEOUT_SECS", "12"),
            ("JARVIS_LANGUAGE", "hi"),
            ("JARVIS_SPEAK", "yes"),
        ])
        .unwrap();

        assert_eq!(config.memory_file, PathBuf::from("/data/mem.json"));
        assert_eq!(config.apps_file, PathBuf::from("/tmp/jarvis-home/apps.json"));
        assert_eq!(config.require_knowledge_credential().unwrap(), "ABC-123");
        assert_eq!(config.openrouter_api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(config.models.general, "some/model");
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.language, Language::Hindi);
        assert!(config.speak);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config(&[("JARVIS_HOME", "/tmp/j"), ("WOLFRAM_APP_ID", "   ")]).unwrap();
        assert!(config.wolfram_app_id.is_none());
    }

    #[test]
    fn test_missing_credential_is_an_error() {
        let config = config(&[("JARVIS_HOME", "/tmp/j")]).unwrap();
        let err = config.require_knowledge_credential().unwrap_err();
        assert!(matches!(err, JarvisError::Config(_)));
        assert!(err.to_string().contains("WOLFRAM_APP_ID"));
    }

    #[test]
    fn test_malformed_values() {
        assert!(config(&[("JARVIS_HOME", "/tmp/j"), ("JARVIS_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("JARVIS_HOME", "/tmp/j"), ("JARVIS_TIMEOUT_SECS", "0")]).is_err());
        assert!(config(&[("JARVIS_HOME", "/tmp/j"), ("JARVIS_LANGUAGE", "fr")]).is_err());
        assert!(config(&[("JARVIS_HOME", "/tmp/j"), ("JARVIS_SPEAK", "maybe")]).is_err());
    }
}
