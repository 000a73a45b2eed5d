// crates/tfacc-harness/src/skip.rs
// ============================================================================
// Module: Skip Policy
// Description: Classification of API errors that end a sweep without failing.
// Purpose: Let sweeps and pre-checks pass in regions lacking a service.
// Dependencies: serde, crate::api
// ============================================================================

//! ## Overview
//! Some regions or partitions do not offer every service. Listing calls there
//! fail with recognizable codes; a [`SkipPolicy`] marks those errors as
//! skippable so the sweep (or pre-check) is reported as skipped rather than
//! failed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::api::ApiError;
use crate::api::KafkaApi;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Built-in `(code, message fragment)` pairs for unavailable services.
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("RequestError", "send request failed"),
    ("UnsupportedOperation", ""),
    ("UnsupportedOperationException", ""),
    ("UnknownOperationException", ""),
    ("InvalidAction", "is not valid"),
    ("InvalidAction", "Unavailable Operation"),
    ("InvalidInputException", "Unknown operation"),
    ("InvalidParameterValueException", "Access Denied to API Version"),
];

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Error pattern that marks an API error as skippable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkipRule {
    /// Exact error code.
    pub code: String,
    /// Substring required in the message; `None` matches any message.
    #[serde(default)]
    pub message_fragment: Option<String>,
}

impl SkipRule {
    /// Creates a rule matching every message for `code`.
    #[must_use]
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message_fragment: None,
        }
    }

    /// Creates a rule requiring `fragment` in the message.
    #[must_use]
    pub fn code_with_fragment(code: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message_fragment: Some(fragment.into()),
        }
    }

    /// Returns true when the error matches the rule.
    #[must_use]
    pub fn matches(&self, error: &ApiError) -> bool {
        error.matches(&self.code, self.message_fragment.as_deref().unwrap_or_default())
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Ordered set of skip rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPolicy {
    /// Rules checked in order.
    rules: Vec<SkipRule>,
}

impl SkipPolicy {
    /// Creates a policy from explicit rules.
    #[must_use]
    pub const fn new(rules: Vec<SkipRule>) -> Self {
        Self {
            rules,
        }
    }

    /// Returns a policy that never skips.
    #[must_use]
    pub const fn never() -> Self {
        Self::new(Vec::new())
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: SkipRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Returns true when any rule matches the error.
    #[must_use]
    pub fn is_skippable(&self, error: &ApiError) -> bool {
        self.rules.iter().any(|rule| rule.matches(error))
    }

    /// Returns the configured rules.
    #[must_use]
    pub fn rules(&self) -> &[SkipRule] {
        &self.rules
    }
}

impl Default for SkipPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(code, fragment)| {
                    if fragment.is_empty() {
                        SkipRule::code(*code)
                    } else {
                        SkipRule::code_with_fragment(*code, *fragment)
                    }
                })
                .collect(),
        )
    }
}

// ============================================================================
// SECTION: Pre-Checks
// ============================================================================

/// Result of checking a service before running acceptance tests against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreCheckOutcome {
    /// The service answered; tests may run.
    Available,
    /// The service is unavailable here; tests should be skipped.
    Skip(String),
}

/// Classifies the result of a cheap availability call.
///
/// # Errors
///
/// Returns the call's [`ApiError`] when it is not skippable.
pub fn classify_precheck<T>(
    policy: &SkipPolicy,
    outcome: Result<T, ApiError>,
) -> Result<PreCheckOutcome, ApiError> {
    match outcome {
        Ok(_) => Ok(PreCheckOutcome::Available),
        Err(err) if policy.is_skippable(&err) => {
            Ok(PreCheckOutcome::Skip(format!("skipping acceptance testing: {err}")))
        }
        Err(err) => Err(err),
    }
}

/// Checks the streaming cluster API by listing clusters.
///
/// # Errors
///
/// Returns [`ApiError`] when the listing fails with a non-skippable error.
pub fn precheck_kafka(api: &dyn KafkaApi, policy: &SkipPolicy) -> Result<PreCheckOutcome, ApiError> {
    classify_precheck(policy, api.list_clusters())
}
