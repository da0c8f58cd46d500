//! Selection Model
//!
//! Owns the mutable checked state of every pack in a [`PackCatalog`] and is
//! the only place that state changes. Every public mutation leaves the model
//! satisfying these invariants, or leaves it untouched:
//!
//! - Required packs are always checked.
//! - A checked pack has all of its transitive dependencies checked.
//! - Unchecking a pack unchecks everything that transitively depends on it;
//!   if one of those dependents is required the whole toggle is rejected.
//!
//! Rows address visible packs only: row `i` is the `i`-th visible pack in
//! catalog order. Hidden packs still carry state and count toward the size.

use std::fmt;

use tracing::{debug, info};

use crate::catalog::PackCatalog;
use crate::error::{PackSelError, Result};
use crate::types::{Pack, RowStatus};

/// Why a toggle was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The pack itself is required
    Required { pack: String },
    /// Unchecking the pack would orphan a required dependent
    RequiredDependent { pack: String, dependent: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { pack } => write!(f, "pack '{}' is required", pack),
            Self::RequiredDependent { pack, dependent } => write!(
                f,
                "pack '{}' is needed by required pack '{}'",
                pack, dependent
            ),
        }
    }
}

/// Result of a toggle that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Pack is now checked; `cascaded` lists dependencies checked along with it
    Checked { cascaded: Vec<String> },
    /// Pack is now unchecked; `cascaded` lists dependents unchecked along with it
    Unchecked { cascaded: Vec<String> },
    /// Nothing changed
    Rejected(RejectReason),
}

impl ToggleOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Turn a rejection into a `RejectedToggle` error
    pub fn into_result(self) -> Result<Self> {
        match self {
            Self::Rejected(reason) => Err(PackSelError::rejected(reason.to_string())),
            other => Ok(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionModel {
    catalog: PackCatalog,
    checked: Vec<bool>,
}

impl SelectionModel {
    /// Start a session: required and preselected packs are checked, then
    /// their dependencies are pulled in.
    pub fn new(catalog: PackCatalog) -> Self {
        let mut checked: Vec<bool> = catalog
            .packs()
            .iter()
            .map(|p| p.required || p.preselected)
            .collect();

        for index in 0..catalog.len() {
            if checked[index] {
                for dep in catalog.dependency_closure(index) {
                    checked[dep] = true;
                }
            }
        }

        Self { catalog, checked }
    }

    pub fn catalog(&self) -> &PackCatalog {
        &self.catalog
    }

    /// Visible packs in catalog order; position is the menu row
    pub fn visible_packs(&self) -> Vec<&Pack> {
        self.catalog
            .visible_indices()
            .iter()
            .map(|&i| self.catalog.pack(i))
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.catalog.visible_indices().len()
    }

    pub fn is_checked(&self, row: usize) -> Result<bool> {
        let index = self.index_for_row(row)?;
        Ok(self.checked[index])
    }

    /// False iff the pack at `row` is required. Pure query.
    pub fn is_selectable(&self, row: usize) -> Result<bool> {
        let index = self.index_for_row(row)?;
        Ok(!self.catalog.pack(index).required)
    }

    pub fn status(&self, row: usize) -> Result<RowStatus> {
        let index = self.index_for_row(row)?;
        Ok(RowStatus::of(self.catalog.pack(index)))
    }

    /// Checked state by pack id, hidden packs included
    pub fn is_pack_checked(&self, id: &str) -> Option<bool> {
        self.catalog.index_of(id).map(|i| self.checked[i])
    }

    /// Flip the pack at `row` and cascade.
    pub fn toggle(&mut self, row: usize) -> Result<ToggleOutcome> {
        let index = self.index_for_row(row)?;
        let outcome = if self.checked[index] {
            self.uncheck(index)
        } else {
            self.check(index)
        };
        self.log_outcome(index, &outcome);
        Ok(outcome)
    }

    /// Check a pack by id (visible or hidden) along with its dependencies.
    /// Already-checked packs are left as they are.
    pub fn select_by_id(&mut self, id: &str) -> Result<ToggleOutcome> {
        let index = self
            .catalog
            .index_of(id)
            .ok_or_else(|| PackSelError::UnknownPack(id.to_string()))?;
        let outcome = self.check(index);
        self.log_outcome(index, &outcome);
        Ok(outcome)
    }

    /// Uncheck a pack by id along with its dependents.
    pub fn deselect_by_id(&mut self, id: &str) -> Result<ToggleOutcome> {
        let index = self
            .catalog
            .index_of(id)
            .ok_or_else(|| PackSelError::UnknownPack(id.to_string()))?;
        let outcome = if self.checked[index] {
            self.uncheck(index)
        } else {
            ToggleOutcome::Unchecked {
                cascaded: Vec::new(),
            }
        };
        self.log_outcome(index, &outcome);
        Ok(outcome)
    }

    /// Sum of `size_bytes` over every checked pack
    pub fn total_selected_size(&self) -> u64 {
        self.catalog
            .packs()
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(pack, _)| pack.size_bytes)
            .sum()
    }

    /// Checked packs in catalog order. Does not mutate.
    pub fn finalize_selection(&self) -> Vec<Pack> {
        self.catalog
            .packs()
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(pack, _)| pack.clone())
            .collect()
    }

    fn index_for_row(&self, row: usize) -> Result<usize> {
        let visible = self.catalog.visible_indices();
        visible
            .get(row)
            .copied()
            .ok_or(PackSelError::OutOfRange {
                row,
                len: visible.len(),
            })
    }

    fn check(&mut self, index: usize) -> ToggleOutcome {
        self.checked[index] = true;
        let mut cascaded = Vec::new();
        for dep in self.catalog.dependency_closure(index) {
            if !self.checked[dep] {
                self.checked[dep] = true;
                cascaded.push(self.catalog.pack(dep).id.clone());
            }
        }
        ToggleOutcome::Checked { cascaded }
    }

    fn uncheck(&mut self, index: usize) -> ToggleOutcome {
        let pack = self.catalog.pack(index);
        if pack.required {
            return ToggleOutcome::Rejected(RejectReason::Required {
                pack: pack.id.clone(),
            });
        }

        // Validate the whole cascade before touching any state.
        let dependents = self.catalog.dependent_closure(index);
        if let Some(&blocker) = dependents
            .iter()
            .find(|&&d| self.catalog.pack(d).required)
        {
            return ToggleOutcome::Rejected(RejectReason::RequiredDependent {
                pack: pack.id.clone(),
                dependent: self.catalog.pack(blocker).id.clone(),
            });
        }

        self.checked[index] = false;
        let mut cascaded = Vec::new();
        for dependent in dependents {
            if self.checked[dependent] {
                self.checked[dependent] = false;
                cascaded.push(self.catalog.pack(dependent).id.clone());
            }
        }
        ToggleOutcome::Unchecked { cascaded }
    }

    fn log_outcome(&self, index: usize, outcome: &ToggleOutcome) {
        let id = &self.catalog.pack(index).id;
        match outcome {
            ToggleOutcome::Checked { cascaded } => {
                debug!("Checked '{}' (cascaded: {:?})", id, cascaded)
            }
            ToggleOutcome::Unchecked { cascaded } => {
                debug!("Unchecked '{}' (cascaded: {:?})", id, cascaded)
            }
            ToggleOutcome::Rejected(reason) => info!("Toggle of '{}' rejected: {}", id, reason),
        }
    }
}
