//! Localized message lookup
//!
//! Messages are a flat key → text map. A `Messages` store can be layered
//! over a parent: lookups that miss the overlay fall through to the parent,
//! and lookups that miss everywhere return the key itself.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{PackSelError, Result};

/// Message keys used by the selection panel
pub mod keys {
    pub const REQUIRED: &str = "TreePacksPanel.required";
    pub const DEPENDENT: &str = "TreePacksPanel.dependent";
    pub const DONE: &str = "TreePacksPanel.done";
    pub const CONFIRM: &str = "TreePacksPanel.confirm";
    pub const NOT_A_NUMBER: &str = "TreePacksPanel.no.number";
    pub const PROMPT: &str = "TreePacksPanel.prompt";
    pub const INVALID: &str = "TreePacksPanel.invalid";
    pub const REQUIRED_SPACE: &str = "TreePacksPanel.space.required";
    pub const NONE_SELECTED: &str = "TreePacksPanel.none.selected";
    pub const CONFIRM_EMPTY: &str = "TreePacksPanel.none.confirm";
    pub const CONTINUE_QUIT_REDISPLAY: &str = "ConsolePrompt.continueQuitRedisplay";
}

const DEFAULTS: &[(&str, &str)] = &[
    (keys::REQUIRED, "Required"),
    (keys::DEPENDENT, "Dependent"),
    (keys::DONE, "Done!"),
    (keys::CONFIRM, "Enter the number of a pack to select or deselect it."),
    (keys::NOT_A_NUMBER, "Please enter a number."),
    (keys::PROMPT, "Enter 0 or leave blank to finish."),
    (keys::INVALID, "Invalid selection."),
    (keys::REQUIRED_SPACE, "Total space required:"),
    (keys::NONE_SELECTED, "You have not selected any packs!"),
    (keys::CONFIRM_EMPTY, "Are you sure you want to continue?"),
    (
        keys::CONTINUE_QUIT_REDISPLAY,
        "Press 1 to continue, 2 to quit, 3 to redisplay",
    ),
];

/// Key → text lookup service
pub trait MessageLookup {
    /// Text for `key`, or `None` when no layer defines it
    fn lookup(&self, key: &str) -> Option<&str>;

    /// Text for `key`, falling back to the key itself
    fn get(&self, key: &str) -> String {
        self.lookup(key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Messages {
    entries: HashMap<String, String>,
    parent: Option<Box<Messages>>,
}

impl Messages {
    /// Built-in English messages
    pub fn defaults() -> Self {
        Self {
            entries: DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            parent: None,
        }
    }

    pub fn from_map(entries: HashMap<String, String>) -> Self {
        Self {
            entries,
            parent: None,
        }
    }

    /// Layer this store over `parent`
    pub fn over(mut self, parent: Messages) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Load a JSON object of `key: text` pairs layered over `self`
    pub fn new_messages<P: AsRef<Path>>(&self, path: P) -> Result<Messages> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PackSelError::resource_lookup(format!("cannot read {:?}: {}", path, e))
        })?;
        let entries: HashMap<String, String> = serde_json::from_str(&content).map_err(|e| {
            PackSelError::resource_lookup(format!("cannot parse {:?}: {}", path, e))
        })?;
        debug!("Loaded {} messages from {:?}", entries.len(), path);
        Ok(Messages::from_map(entries).over(self.clone()))
    }

    /// Like [`Messages::new_messages`], but a missing or broken resource
    /// falls back to `self` with a warning.
    pub fn new_messages_or_self<P: AsRef<Path>>(&self, path: P) -> Messages {
        match self.new_messages(path) {
            Ok(messages) => messages,
            Err(e) => {
                warn!("{}; using default messages", e);
                self.clone()
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }
}

impl MessageLookup for Messages {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .or_else(|| self.parent.as_deref().and_then(|p| p.lookup(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_cover_panel_keys() {
        let messages = Messages::defaults();
        for (key, _) in DEFAULTS {
            assert!(messages.lookup(key).is_some(), "missing default for {}", key);
        }
        assert_eq!(messages.get(keys::REQUIRED), "Required");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let messages = Messages::defaults();
        assert_eq!(messages.lookup("no.such.key"), None);
        assert_eq!(messages.get("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_overlay_falls_through_to_parent() {
        let mut overlay = HashMap::new();
        overlay.insert(keys::REQUIRED.to_string(), "Obligatoire".to_string());
        let messages = Messages::from_map(overlay).over(Messages::defaults());

        assert_eq!(messages.get(keys::REQUIRED), "Obligatoire");
        assert_eq!(messages.get(keys::DEPENDENT), "Dependent");
    }

    #[test]
    fn test_new_messages_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"docs": "Documentation", "TreePacksPanel.invalid": "Nope"}}"#).unwrap();

        let messages = Messages::defaults().new_messages(file.path()).unwrap();
        assert_eq!(messages.get("docs"), "Documentation");
        assert_eq!(messages.get(keys::INVALID), "Nope");
        assert_eq!(messages.get(keys::DONE), "Done!");
    }

    #[test]
    fn test_missing_resource_is_lookup_failure() {
        let result = Messages::defaults().new_messages("/nonexistent/packsLang.json");
        assert!(matches!(result, Err(PackSelError::ResourceLookup(_))));
    }

    #[test]
    fn test_broken_resource_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let messages = Messages::defaults().new_messages_or_self(file.path());
        assert_eq!(messages.get(keys::INVALID), "Invalid selection.");
    }
}
