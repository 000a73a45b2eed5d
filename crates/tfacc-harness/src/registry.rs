// crates/tfacc-harness/src/registry.rs
// ============================================================================
// Module: Sweeper Registry
// Description: Explicit registry and runner for resource sweepers.
// Purpose: Order sweepers by dependency and run them across regions.
// Dependencies: crate::{api, audit, sweep, sweepers}
// ============================================================================

//! ## Overview
//! Sweepers are registered on an explicit [`SweeperRegistry`] value handed to
//! the test runner, never through load-time globals. The registry plans an
//! execution order (dependencies first, each sweeper once) and runs the plan
//! in every requested region, collecting one outcome per sweeper and region.
//!
//! Invariants:
//! - Sweeper names are unique within a registry.
//! - A failing sweeper is recorded and the run continues.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::api::RegionClients;
use crate::audit::SweepAuditSink;
use crate::sweep::SweepContext;
use crate::sweep::SweepError;
use crate::sweep::SweepReport;
use crate::sweep::SweepSettings;
use crate::sweep::Sweeper;
use crate::sweepers::BudgetsSweeper;
use crate::sweepers::MskClusterSweeper;

// ============================================================================
// SECTION: Run Results
// ============================================================================

/// Result of one sweeper in one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Sweeper name.
    pub sweeper: String,
    /// Region swept.
    pub region: String,
    /// Sweeper result.
    pub result: Result<SweepReport, SweepError>,
}

impl SweepOutcome {
    /// Returns true when the sweeper errored or recorded resource failures.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.result.as_ref().map_or(true, SweepReport::has_failures)
    }
}

/// Outcomes of a full sweep run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SweepRunReport {
    /// Outcomes in execution order.
    pub outcomes: Vec<SweepOutcome>,
}

impl SweepRunReport {
    /// Returns true when any outcome failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(SweepOutcome::is_failure)
    }

    /// Iterates over failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &SweepOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Sweeper registry keyed by sweeper name.
#[derive(Default)]
pub struct SweeperRegistry {
    /// Registered sweepers.
    sweepers: BTreeMap<String, Box<dyn Sweeper>>,
}

impl SweeperRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in budget and cluster sweepers.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] when registration fails.
    pub fn with_builtin_sweepers() -> Result<Self, SweepError> {
        let mut registry = Self::new();
        registry.register(BudgetsSweeper)?;
        registry.register(MskClusterSweeper)?;
        Ok(registry)
    }

    /// Registers a sweeper under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::DuplicateSweeper`] when the name is taken.
    pub fn register(&mut self, sweeper: impl Sweeper + 'static) -> Result<(), SweepError> {
        let name = sweeper.name().to_string();
        if self.sweepers.contains_key(&name) {
            return Err(SweepError::DuplicateSweeper(name));
        }
        self.sweepers.insert(name, Box::new(sweeper));
        Ok(())
    }

    /// Returns registered sweeper names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sweepers.keys().map(String::as_str)
    }

    /// Returns the dependencies declared by a sweeper.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> Option<Vec<String>> {
        self.sweepers.get(name).map(|sweeper| sweeper.dependencies())
    }

    /// Plans the execution order for the filtered sweepers.
    ///
    /// A filter entry selects every sweeper whose name contains it,
    /// ignoring case. Without a filter all sweepers are selected. Selected
    /// sweepers are preceded by their dependencies; each appears once.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] when the filter matches nothing, a dependency
    /// is unknown, or dependencies form a cycle.
    pub fn plan(&self, filter: Option<&[String]>) -> Result<Vec<&str>, SweepError> {
        let selected: Vec<&str> = match filter {
            None => self.names().collect(),
            Some(patterns) => {
                let patterns: Vec<String> =
                    patterns.iter().map(|pattern| pattern.to_lowercase()).collect();
                let selected: Vec<&str> = self
                    .names()
                    .filter(|name| {
                        let name = name.to_lowercase();
                        patterns.iter().any(|pattern| name.contains(pattern.as_str()))
                    })
                    .collect();
                if selected.is_empty() {
                    return Err(SweepError::NoMatchingSweepers(patterns.join(",")));
                }
                selected
            }
        };
        let mut order = Vec::new();
        let mut visiting = BTreeSet::new();
        let mut done = BTreeSet::new();
        for name in selected {
            self.visit(name, &mut visiting, &mut done, &mut order)?;
        }
        Ok(order)
    }

    /// Depth-first visit placing dependencies ahead of `name`.
    fn visit<'a>(
        &'a self,
        name: &'a str,
        visiting: &mut BTreeSet<&'a str>,
        done: &mut BTreeSet<&'a str>,
        order: &mut Vec<&'a str>,
    ) -> Result<(), SweepError> {
        if done.contains(name) {
            return Ok(());
        }
        if !visiting.insert(name) {
            return Err(SweepError::DependencyCycle(name.to_string()));
        }
        let dependencies = self.dependencies_of(name).unwrap_or_default();
        for dependency in dependencies {
            let Some((dependency_name, _)) = self.sweepers.get_key_value(dependency.as_str())
            else {
                return Err(SweepError::UnknownDependency {
                    sweeper: name.to_string(),
                    dependency,
                });
            };
            self.visit(dependency_name, visiting, done, order)?;
        }
        visiting.remove(name);
        done.insert(name);
        order.push(name);
        Ok(())
    }

    /// Runs the planned sweepers in every region.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] only when planning fails; sweeper failures are
    /// reported in the returned [`SweepRunReport`].
    pub fn run(
        &self,
        regions: &[String],
        filter: Option<&[String]>,
        clients: &dyn RegionClients,
        settings: &SweepSettings,
        audit: &dyn SweepAuditSink,
    ) -> Result<SweepRunReport, SweepError> {
        let order = self.plan(filter)?;
        let mut report = SweepRunReport::default();
        for region in regions {
            let ctx = SweepContext {
                region,
                clients,
                settings,
                audit,
            };
            for name in &order {
                let Some(sweeper) = self.sweepers.get(*name) else {
                    continue;
                };
                report.outcomes.push(SweepOutcome {
                    sweeper: (*name).to_string(),
                    region: region.clone(),
                    result: sweeper.sweep(&ctx),
                });
            }
        }
        Ok(report)
    }
}
