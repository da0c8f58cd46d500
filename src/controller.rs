//! Interactive Selection Controller
//!
//! Drives one pack-selection session over a [`Console`]. The loop is an
//! explicit state machine; rendering is a pure function of the model and
//! only the `Toggling` state mutates it.
//!
//! # State Flow
//!
//! ```text
//! Rendering ──► AwaitingInput ──► Toggling ──► Rendering
//!                  │   ▲              │
//!                  │   └── Rejecting ◄┘ (pack not selectable)
//!                  │   ▲
//!                  │   └── Rejecting    (not a number / not in menu)
//!                  ▼
//!               Exiting  (0, blank line, or end of input)
//! ```
//!
//! After `Exiting` the panel reports the final selection and asks the
//! prompt whether to continue, quit, or run the menu again.

use tracing::{debug, info, warn};

use crate::console::{Console, Prompt};
use crate::error::{PackSelError, Result};
use crate::messages::{MessageLookup, keys};
use crate::model::SelectionModel;
use crate::substitute::{NoSubstitution, Substitute};
use crate::types::{EndAction, Pack, RowStatus, Severity};
use crate::units::{ByteFormatter, ByteUnits};

/// One parsed line of menu input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `0` or a blank line
    Exit,
    /// Zero-based row of a visible pack
    Row(usize),
    NotANumber,
    /// A number outside `0..=visible`
    OutOfMenu(i64),
}

/// Translate a 1-based menu answer into a [`Command`].
pub fn parse_command(line: &str, visible: usize) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Exit;
    }
    match trimmed.parse::<i64>() {
        Err(_) => Command::NotANumber,
        Ok(0) => Command::Exit,
        Ok(n) if n >= 1 && (n as u64) <= visible as u64 => Command::Row((n - 1) as usize),
        Ok(n) => Command::OutOfMenu(n),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Rendering,
    AwaitingInput,
    Toggling(usize),
    /// Warn with the given message key, then wait for input again
    Rejecting(&'static str),
    Exiting,
}

/// What the caller gets back when the panel finishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Result of the end-of-panel confirmation
    pub proceed: bool,
    /// Packs to install, catalog order
    pub selected: Vec<Pack>,
    pub total_size: u64,
}

pub struct SelectionSession<'a> {
    model: &'a mut SelectionModel,
    messages: &'a dyn MessageLookup,
    substitutor: &'a dyn Substitute,
    formatter: &'a dyn ByteFormatter,
}

impl<'a> SelectionSession<'a> {
    pub fn new(model: &'a mut SelectionModel, messages: &'a dyn MessageLookup) -> Self {
        Self {
            model,
            messages,
            substitutor: &NoSubstitution,
            formatter: &ByteUnits,
        }
    }

    pub fn with_substitutor(mut self, substitutor: &'a dyn Substitute) -> Self {
        self.substitutor = substitutor;
        self
    }

    pub fn with_formatter(mut self, formatter: &'a dyn ByteFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn model(&self) -> &SelectionModel {
        &*self.model
    }

    /// Run the panel until the operator continues or quits.
    pub fn run<T: Console + Prompt>(&mut self, io: &mut T) -> Result<SessionOutcome> {
        loop {
            self.select_loop(io)?;
            io.message(Severity::Information, &self.messages.get(keys::DONE));

            let selected = self.model.finalize_selection();
            if selected.is_empty() {
                io.message(Severity::Warning, &self.messages.get(keys::NONE_SELECTED));
                io.message(Severity::Warning, &self.messages.get(keys::CONFIRM_EMPTY));
            }

            let proceed = match io.confirm_end(self.messages)? {
                EndAction::Continue => true,
                EndAction::Quit => false,
                EndAction::Redisplay => {
                    debug!("Redisplaying pack selection");
                    continue;
                }
            };

            let total_size = self.model.total_selected_size();
            info!(
                "Pack selection finished: {} packs, {} bytes, proceed={}",
                selected.len(),
                total_size,
                proceed
            );
            return Ok(SessionOutcome {
                proceed,
                selected,
                total_size,
            });
        }
    }

    fn select_loop<T: Console + Prompt>(&mut self, io: &mut T) -> Result<()> {
        let mut state = LoopState::Rendering;
        loop {
            state = match state {
                LoopState::Rendering => {
                    for line in self.render_menu()? {
                        io.println(&line)?;
                    }
                    LoopState::AwaitingInput
                }
                LoopState::AwaitingInput => match io.read_line()? {
                    None => {
                        debug!("End of input, leaving pack menu");
                        LoopState::Exiting
                    }
                    Some(line) => match parse_command(&line, self.model.visible_count()) {
                        Command::Exit => LoopState::Exiting,
                        Command::Row(row) => LoopState::Toggling(row),
                        Command::NotANumber => LoopState::Rejecting(keys::NOT_A_NUMBER),
                        Command::OutOfMenu(_) => LoopState::Rejecting(keys::INVALID),
                    },
                },
                LoopState::Toggling(row) => self.toggle(row),
                LoopState::Rejecting(key) => {
                    io.message(Severity::Warning, &self.messages.get(key));
                    LoopState::AwaitingInput
                }
                LoopState::Exiting => return Ok(()),
            };
        }
    }

    fn toggle(&mut self, row: usize) -> LoopState {
        match self.model.is_selectable(row) {
            Ok(false) => LoopState::Rejecting(keys::INVALID),
            Ok(true) => {
                if let Err(e) = self.model.toggle(row) {
                    warn!("Toggle of row {} failed: {}", row, e);
                }
                LoopState::Rendering
            }
            Err(e) => {
                warn!("Selectable check for row {} failed: {}", row, e);
                LoopState::Rendering
            }
        }
    }

    /// Full menu block: one line per visible pack, the size summary, and
    /// the two prompt lines.
    pub fn render_menu(&self) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(self.model.visible_count() + 3);
        for row in 0..self.model.visible_count() {
            lines.push(self.render_row(row)?);
        }
        lines.push(format!(
            "{} {}",
            self.messages.get(keys::REQUIRED_SPACE),
            self.formatter.format_bytes(self.model.total_selected_size())
        ));
        lines.push(self.messages.get(keys::CONFIRM));
        lines.push(self.messages.get(keys::PROMPT));
        Ok(lines)
    }

    pub fn render_row(&self, row: usize) -> Result<String> {
        let pack = self
            .model
            .visible_packs()
            .get(row)
            .copied()
            .ok_or(PackSelError::OutOfRange {
                row,
                len: self.model.visible_count(),
            })?;
        let mark = if self.model.is_checked(row)? { "x" } else { " " };
        let label = RowStatus::of(pack)
            .message_key()
            .map(|key| self.messages.get(key))
            .unwrap_or_default();

        Ok(format!(
            "{:<4} [{}] {:<15} [{}] ({:<4})",
            row + 1,
            mark,
            label,
            self.pack_name(pack),
            self.formatter.format_bytes(pack.size_bytes)
        ))
    }

    /// Localized name if the messages define one for the pack id, else the
    /// declared name; variables substituted either way.
    fn pack_name(&self, pack: &Pack) -> String {
        let raw = self
            .messages
            .lookup(&pack.id)
            .unwrap_or(pack.display_name.as_str());
        self.substitutor.substitute(raw)
    }
}
