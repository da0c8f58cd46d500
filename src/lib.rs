//! packsel library
//!
//! Pack catalog, dependency-aware selection model, and the console panel
//! that lets an operator pick which optional packs to install.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod messages;
pub mod model;
pub mod substitute;
pub mod types;
pub mod units;

// Re-export main types for convenience
pub use catalog::PackCatalog;
pub use config::CatalogFile;
pub use console::{Console, Prompt, StdConsole};
pub use controller::{Command, SelectionSession, SessionOutcome, parse_command};
pub use error::{PackSelError, Result};
pub use messages::{MessageLookup, Messages};
pub use model::{RejectReason, SelectionModel, ToggleOutcome};
pub use substitute::{NoSubstitution, Substitute, VariableSubstitutor};
pub use types::{EndAction, Pack, PackSpec, RowStatus, Severity};
pub use units::{ByteFormatter, ByteUnits};
