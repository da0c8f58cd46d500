//! Core data types for the pack selector
//!
//! `PackSpec` is the on-disk shape of a catalog entry; `Pack` is the
//! validated, immutable entry a session works with.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Catalog entry as declared in installer metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSpec {
    pub id: String,
    /// Display name, may contain `${var}` tokens. Falls back to `id`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Installed footprint in bytes
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub required: bool,
    /// Checked when the session starts
    #[serde(default)]
    pub preselected: bool,
    /// Takes part in selection but is never shown in the menu
    #[serde(default)]
    pub hidden: bool,
    /// Condition name that must be satisfied for the pack to exist at all
    #[serde(default)]
    pub condition: Option<String>,
    /// Ids of packs this pack needs
    #[serde(default)]
    pub depends: Vec<String>,
}

impl PackSpec {
    /// Minimal optional pack, mostly useful for tests and builders
    pub fn new(id: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            size,
            required: false,
            preselected: false,
            hidden: false,
            condition: None,
            depends: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn preselected(mut self) -> Self {
        self.preselected = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends.push(id.into());
        self
    }
}

/// Immutable pack as seen by a selection session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pack {
    pub id: String,
    pub display_name: String,
    pub description: Option<String>,
    pub size_bytes: u64,
    pub required: bool,
    pub preselected: bool,
    pub visible: bool,
    /// Ids of packs this pack needs, declaration order, deduplicated
    pub dependencies: Vec<String>,
}

impl Pack {
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// Classification of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Information,
    Warning,
}

/// Status label shown next to a menu row.
///
/// Precedence is `Required > Dependent > None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum RowStatus {
    Required,
    Dependent,
    #[default]
    None,
}

impl RowStatus {
    pub fn of(pack: &Pack) -> Self {
        if pack.required {
            Self::Required
        } else if pack.has_dependencies() {
            Self::Dependent
        } else {
            Self::None
        }
    }

    /// Message key for the label, `None` when no label is shown
    pub const fn message_key(self) -> Option<&'static str> {
        match self {
            Self::Required => Some(crate::messages::keys::REQUIRED),
            Self::Dependent => Some(crate::messages::keys::DEPENDENT),
            Self::None => None,
        }
    }
}

/// Answer to the end-of-panel confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum EndAction {
    Continue,
    Quit,
    Redisplay,
}

impl EndAction {
    /// Map the console menu answer (1 = continue, 2 = quit, 3 = redisplay)
    pub fn from_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::Continue),
            2 => Some(Self::Quit),
            3 => Some(Self::Redisplay),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn pack(required: bool, deps: &[&str]) -> Pack {
        Pack {
            id: "p".into(),
            display_name: "P".into(),
            description: None,
            size_bytes: 1,
            required,
            preselected: false,
            visible: true,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_row_status_precedence() {
        assert_eq!(RowStatus::of(&pack(true, &["a"])), RowStatus::Required);
        assert_eq!(RowStatus::of(&pack(false, &["a"])), RowStatus::Dependent);
        assert_eq!(RowStatus::of(&pack(false, &[])), RowStatus::None);
    }

    #[test]
    fn test_row_status_message_keys() {
        assert!(RowStatus::Required.message_key().is_some());
        assert!(RowStatus::Dependent.message_key().is_some());
        assert!(RowStatus::None.message_key().is_none());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Information.to_string(), "INFORMATION");
    }

    #[test]
    fn test_end_action_from_choice() {
        assert_eq!(EndAction::from_choice(1), Some(EndAction::Continue));
        assert_eq!(EndAction::from_choice(2), Some(EndAction::Quit));
        assert_eq!(EndAction::from_choice(3), Some(EndAction::Redisplay));
        assert_eq!(EndAction::from_choice(0), None);
        assert_eq!(EndAction::from_choice(4), None);
    }

    #[test]
    fn test_end_action_roundtrip() {
        for action in EndAction::iter() {
            let parsed: EndAction = action.to_string().parse().expect("Should parse");
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn test_pack_spec_serde_defaults() {
        let spec: PackSpec = serde_json::from_str(r#"{"id": "core", "size": 10}"#).unwrap();
        assert_eq!(spec, PackSpec::new("core", 10));
    }
}
