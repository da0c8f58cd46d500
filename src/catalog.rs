//! Pack Catalog
//!
//! Immutable view of the installable packs for one session. Built once from
//! the declared `PackSpec` list; dependency and dependent edges are turned
//! into index adjacency lists up front so cascades only walk the affected
//! subgraph.
//!
//! # Construction Rules
//!
//! | Situation                                   | Result |
//! |---------------------------------------------|--------|
//! | Empty or duplicate id                       | `Catalog` error |
//! | Pack depends on itself                      | `Catalog` error |
//! | Dependency on an id never declared          | `Catalog` error |
//! | Sum of pack sizes exceeds `u64::MAX`        | `Catalog` error |
//! | Pack condition not satisfied                | Pack excluded |
//! | Dependency on an excluded pack              | Edge dropped, warning logged |
//! | `hidden` pack                               | Kept, not visible |

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::error::{PackSelError, Result};
use crate::types::{Pack, PackSpec};

#[derive(Debug, Clone)]
pub struct PackCatalog {
    packs: Vec<Pack>,
    index: HashMap<String, usize>,
    dependencies: Vec<Vec<usize>>,
    dependents: Vec<Vec<usize>>,
    visible: Vec<usize>,
}

impl PackCatalog {
    /// Build a catalog with every condition treated as satisfied.
    pub fn new(specs: &[PackSpec]) -> Result<Self> {
        let all: HashSet<String> = specs.iter().filter_map(|s| s.condition.clone()).collect();
        Self::build(specs, &all)
    }

    /// Build a catalog, keeping only packs whose condition is in `conditions`.
    pub fn build(specs: &[PackSpec], conditions: &HashSet<String>) -> Result<Self> {
        let mut declared: HashSet<&str> = HashSet::with_capacity(specs.len());
        for spec in specs {
            if spec.id.trim().is_empty() {
                return Err(PackSelError::catalog("pack id must not be empty"));
            }
            if !declared.insert(spec.id.as_str()) {
                return Err(PackSelError::catalog(format!(
                    "duplicate pack id '{}'",
                    spec.id
                )));
            }
        }

        for spec in specs {
            for dep in &spec.depends {
                if dep == &spec.id {
                    return Err(PackSelError::catalog(format!(
                        "pack '{}' depends on itself",
                        spec.id
                    )));
                }
                if !declared.contains(dep.as_str()) {
                    return Err(PackSelError::catalog(format!(
                        "pack '{}' depends on unknown pack '{}'",
                        spec.id, dep
                    )));
                }
            }
        }

        let active: Vec<&PackSpec> = specs
            .iter()
            .filter(|spec| match &spec.condition {
                Some(condition) if !conditions.contains(condition) => {
                    debug!("Excluding pack '{}': condition '{}' not met", spec.id, condition);
                    false
                }
                _ => true,
            })
            .collect();

        // Bounds every selection total, so summing checked sizes cannot overflow.
        active.iter().try_fold(0u64, |total, spec| {
            total.checked_add(spec.size).ok_or_else(|| {
                PackSelError::catalog(format!(
                    "total pack size overflows at pack '{}'",
                    spec.id
                ))
            })
        })?;

        let index: HashMap<String, usize> = active
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.id.clone(), i))
            .collect();

        let mut packs = Vec::with_capacity(active.len());
        let mut dependencies = Vec::with_capacity(active.len());
        for spec in &active {
            let mut ids = Vec::new();
            let mut edges = Vec::new();
            for dep in &spec.depends {
                match index.get(dep) {
                    Some(&target) if !edges.contains(&target) => {
                        edges.push(target);
                        ids.push(dep.clone());
                    }
                    Some(_) => {}
                    None => warn!(
                        "Dropping dependency '{}' -> '{}': target pack is not available",
                        spec.id, dep
                    ),
                }
            }
            packs.push(Pack {
                id: spec.id.clone(),
                display_name: spec.name.clone().unwrap_or_else(|| spec.id.clone()),
                description: spec.description.clone(),
                size_bytes: spec.size,
                required: spec.required,
                preselected: spec.preselected,
                visible: !spec.hidden,
                dependencies: ids,
            });
            dependencies.push(edges);
        }

        let mut dependents = vec![Vec::new(); packs.len()];
        for (source, edges) in dependencies.iter().enumerate() {
            for &target in edges {
                dependents[target].push(source);
            }
        }

        let visible = packs
            .iter()
            .enumerate()
            .filter(|(_, p)| p.visible)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        debug!(
            "Catalog built: {} packs ({} visible, {} excluded)",
            packs.len(),
            visible.len(),
            specs.len() - packs.len()
        );

        Ok(Self {
            packs,
            index,
            dependencies,
            dependents,
            visible,
        })
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// All packs in declaration order, hidden ones included
    pub fn packs(&self) -> &[Pack] {
        &self.packs
    }

    pub fn pack(&self, index: usize) -> &Pack {
        &self.packs[index]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Catalog indices of visible packs; position in this slice is the menu row
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn dependencies_of(&self, index: usize) -> &[usize] {
        &self.dependencies[index]
    }

    pub fn dependents_of(&self, index: usize) -> &[usize] {
        &self.dependents[index]
    }

    /// Every pack reachable from `start` along dependency edges, `start` excluded.
    pub fn dependency_closure(&self, start: usize) -> Vec<usize> {
        walk(start, &self.dependencies)
    }

    /// Every pack that transitively depends on `start`, `start` excluded.
    pub fn dependent_closure(&self, start: usize) -> Vec<usize> {
        walk(start, &self.dependents)
    }
}

/// Breadth-first walk over an adjacency list. Cycles are fine.
fn walk(start: usize, edges: &[Vec<usize>]) -> Vec<usize> {
    let mut seen = vec![false; edges.len()];
    seen[start] = true;
    let mut queue = VecDeque::from([start]);
    let mut out = Vec::new();

    while let Some(current) = queue.pop_front() {
        for &next in &edges[current] {
            if !seen[next] {
                seen[next] = true;
                out.push(next);
                queue.push_back(next);
            }
        }
    }

    out
}
