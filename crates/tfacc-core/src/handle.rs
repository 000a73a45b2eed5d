// crates/tfacc-core/src/handle.rs
// ============================================================================
// Module: Resource Handle Codec
// Description: Composite identifier encoding for persisted resource handles.
// Purpose: Join an account identifier and a resource name into one opaque token.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A resource handle is the single string persisted in state for resources
//! addressed by two API fields, such as a budget (account id plus budget
//! name). The handle is `account_id:resource_name`.
//!
//! Invariants:
//! - The account identifier never contains [`HANDLE_SEPARATOR`].
//! - The resource name may contain [`HANDLE_SEPARATOR`]; decoding splits on the
//!   first occurrence so the name survives a round trip intact.
//! - Both components are non-empty in every encoded handle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator joining the account identifier and the resource name.
pub const HANDLE_SEPARATOR: char = ':';

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors produced while encoding or decoding resource handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    /// A required component is empty or cannot be encoded.
    #[error("invalid handle argument {field}: {reason}")]
    InvalidArgument {
        /// Component name (`account_id` or `resource_name`).
        field: &'static str,
        /// Reason the component was rejected.
        reason: &'static str,
    },
    /// The handle does not have the `account_id:resource_name` shape.
    #[error("malformed resource handle ({handle}): expected account_id{HANDLE_SEPARATOR}resource_name")]
    MalformedHandle {
        /// Offending handle text.
        handle: String,
    },
}

// ============================================================================
// SECTION: Composite Identifier
// ============================================================================

/// Account-scoped resource identifier carried by a handle.
///
/// # Invariants
/// - Values obtained from [`CompositeIdentifier::new`] or [`decode_handle`]
///   always have non-empty components and a separator-free account id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeIdentifier {
    /// Owning account identifier.
    account_id: String,
    /// Resource name within the account.
    resource_name: String,
}

impl CompositeIdentifier {
    /// Creates a validated composite identifier.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidArgument`] when either component is empty
    /// or the account id contains [`HANDLE_SEPARATOR`].
    pub fn new(
        account_id: impl Into<String>,
        resource_name: impl Into<String>,
    ) -> Result<Self, HandleError> {
        let account_id = account_id.into();
        let resource_name = resource_name.into();
        if account_id.is_empty() {
            return Err(HandleError::InvalidArgument {
                field: "account_id",
                reason: "must not be empty",
            });
        }
        if account_id.contains(HANDLE_SEPARATOR) {
            return Err(HandleError::InvalidArgument {
                field: "account_id",
                reason: "must not contain the handle separator",
            });
        }
        if resource_name.is_empty() {
            return Err(HandleError::InvalidArgument {
                field: "resource_name",
                reason: "must not be empty",
            });
        }
        Ok(Self {
            account_id,
            resource_name,
        })
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Returns the resource name.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Returns the encoded handle string.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{}{HANDLE_SEPARATOR}{}", self.account_id, self.resource_name)
    }

    /// Consumes the identifier and returns `(account_id, resource_name)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.account_id, self.resource_name)
    }
}

impl fmt::Display for CompositeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{HANDLE_SEPARATOR}{}", self.account_id, self.resource_name)
    }
}

impl FromStr for CompositeIdentifier {
    type Err = HandleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        decode_handle(value)
    }
}

impl Serialize for CompositeIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CompositeIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        decode_handle(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Encodes an account id and resource name into a resource handle.
///
/// # Errors
///
/// Returns [`HandleError::InvalidArgument`] when either component is empty or
/// the account id contains [`HANDLE_SEPARATOR`].
pub fn encode_handle(account_id: &str, resource_name: &str) -> Result<String, HandleError> {
    CompositeIdentifier::new(account_id, resource_name).map(|id| id.encode())
}

/// Decodes a resource handle, splitting on the first separator occurrence.
///
/// # Errors
///
/// Returns [`HandleError::MalformedHandle`] when the separator is missing or
/// either component is empty.
pub fn decode_handle(handle: &str) -> Result<CompositeIdentifier, HandleError> {
    let malformed = || HandleError::MalformedHandle {
        handle: handle.to_string(),
    };
    let (account_id, resource_name) = handle.split_once(HANDLE_SEPARATOR).ok_or_else(malformed)?;
    if account_id.is_empty() || resource_name.is_empty() {
        return Err(malformed());
    }
    Ok(CompositeIdentifier {
        account_id: account_id.to_string(),
        resource_name: resource_name.to_string(),
    })
}
