/// App registry
///
/// Friendly application names mapped to launchable paths, loaded once from
/// a JSON object like `{"chrome": "/usr/bin/google-chrome"}`.

use crate::error::{JarvisError, Result};
use crate::system::Desktop;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only name → path table
#[derive(Debug, Default, Clone)]
pub struct AppRegistry {
    apps: BTreeMap<String, PathBuf>,
}

impl AppRegistry {
    /// Load the registry from disk
    ///
    /// A missing or broken file gives an empty registry. Names are
    /// lower-cased on the way in.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::read_file(path) {
            Ok(registry) => {
                info!("Loaded {} apps.", registry.len());
                registry
            }
            Err(e) => {
                warn!("Failed to load apps from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(JarvisError::Config(format!(
                "{} file not found",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let raw: BTreeMap<String, PathBuf> = serde_json::from_str(&contents)?;
        Ok(Self::from_entries(raw))
    }

    /// Build a registry from in-memory entries
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<PathBuf>,
    {
        let apps = entries
            .into_iter()
            .map(|(name, path)| (name.as_ref().trim().to_lowercase(), path.into()))
            .collect();
        Self { apps }
    }

    /// Registered path for a name, if any
    pub fn resolve(&self, name: &str) -> Option<&Path> {
        self.apps
            .get(&name.trim().to_lowercase())
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// All entries in name order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.apps.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Closest registered name by skim fuzzy score
    pub fn closest(&self, name: &str) -> Option<&str> {
        let matcher = SkimMatcherV2::default();
        let needle = name.trim().to_lowercase();

        self.apps
            .keys()
            .filter_map(|candidate| {
                matcher
                    .fuzzy_match(candidate, &needle)
                    .map(|score| (score, candidate.as_str()))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, candidate)| candidate)
    }

    /// Launch an app by name and describe what happened
    ///
    /// Always returns a sentence for the user; never fails.
    pub fn launch(&self, name: &str, desktop: &dyn Desktop) -> String {
        let name = name.trim();

        match self.resolve(name) {
            Some(path) if path.exists() => match desktop.launch(path) {
                Ok(()) => format!("Launching {}.", name),
                Err(e) => format!("Error launching {}: {}", name, e),
            },
            _ => {
                let mut message = format!("App '{}' not found or path is invalid.", name);
                if self.resolve(name).is_none() {
                    if let Some(best) = self.closest(name) {
                        message.push_str(&format!(" Did you mean '{}'?", best));
                    }
                }
                message
            }
        }
    }
}
