// crates/tfacc-core/src/endpoints.rs
// ============================================================================
// Module: Endpoint Lists
// Description: Canonical ordering and validation for comma-joined endpoints.
// Purpose: Give broker and connect-string listings a deterministic form.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Clustered services describe their connection points as a comma-joined list
//! of `host:port` tokens. This module sorts such lists into canonical order,
//! checks whether a list is already canonical, and validates broker listings
//! against a listener port.
//!
//! Invariants:
//! - Sorting treats tokens opaquely and compares them byte-wise.
//! - Sorting never fails; empty tokens sort as empty strings.
//! - [`sort_endpoints`] is idempotent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Token delimiter for endpoint lists.
pub const ENDPOINT_DELIMITER: char = ',';

/// Minimum number of endpoints in a broker listing.
pub const MIN_BROKER_ENDPOINTS: usize = 3;

// ============================================================================
// SECTION: Normalizer
// ============================================================================

/// Sorts a comma-joined endpoint list into canonical order.
///
/// `""` yields `""` and a single token is returned unchanged.
#[must_use]
pub fn sort_endpoints(raw: &str) -> String {
    let mut tokens: Vec<&str> = raw.split(ENDPOINT_DELIMITER).collect();
    tokens.sort_unstable();
    tokens.join(",")
}

/// Returns true when the comma-joined list is already in canonical order.
#[must_use]
pub fn is_sorted_csv(value: &str) -> bool {
    let mut tokens = value.split(ENDPOINT_DELIMITER);
    let Some(mut previous) = tokens.next() else {
        return true;
    };
    for token in tokens {
        if token < previous {
            return false;
        }
        previous = token;
    }
    true
}

// ============================================================================
// SECTION: Endpoint List
// ============================================================================

/// Ordered sequence of endpoint tokens parsed from a comma-joined string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EndpointList {
    /// Endpoint tokens in their current order.
    tokens: Vec<String>,
}

impl EndpointList {
    /// Parses a comma-joined endpoint list. `""` yields an empty list.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        Self {
            tokens: raw.split(ENDPOINT_DELIMITER).map(str::to_string).collect(),
        }
    }

    /// Returns a copy of the list in canonical order.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.sort_unstable();
        Self {
            tokens,
        }
    }

    /// Returns true when the tokens are in non-decreasing order.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.tokens.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Returns the number of endpoint tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true when the list holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates over the endpoint tokens.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl fmt::Display for EndpointList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(","))
    }
}

// ============================================================================
// SECTION: Broker Validation
// ============================================================================

/// Cluster listener exposing a broker or coordination endpoint list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrokerListener {
    /// Unencrypted client listener.
    Plaintext,
    /// TLS client listener.
    Tls,
    /// SASL/SCRAM authenticated listener.
    SaslScram,
    /// ZooKeeper connect string.
    Zookeeper,
}

impl BrokerListener {
    /// Every listener, in port order.
    pub const ALL: [Self; 4] = [Self::Zookeeper, Self::Plaintext, Self::Tls, Self::SaslScram];

    /// Returns the port served by the listener.
    #[must_use]
    pub const fn port(self) -> u16 {
        match self {
            Self::Plaintext => 9092,
            Self::Tls => 9094,
            Self::SaslScram => 9096,
            Self::Zookeeper => 2181,
        }
    }

    /// Returns a stable label for the listener.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::Tls => "tls",
            Self::SaslScram => "sasl_scram",
            Self::Zookeeper => "zookeeper",
        }
    }

    /// Resolves a listener from its label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|listener| listener.as_str() == label)
    }
}

/// Broker listing validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// Fewer endpoints than a cluster listing must carry.
    #[error("expected at least {minimum} endpoints, found {found}")]
    TooFewEndpoints {
        /// Endpoints present in the listing.
        found: usize,
        /// Required minimum.
        minimum: usize,
    },
    /// Endpoint has no `:port` suffix.
    #[error("endpoint {endpoint} has no port")]
    MissingPort {
        /// Offending endpoint token.
        endpoint: String,
    },
    /// Endpoint host is not a dotted name.
    #[error("endpoint {endpoint} has an invalid host")]
    InvalidHost {
        /// Offending endpoint token.
        endpoint: String,
    },
    /// Endpoint port is not a decimal port number.
    #[error("endpoint {endpoint} has an invalid port")]
    InvalidPort {
        /// Offending endpoint token.
        endpoint: String,
    },
    /// Endpoint port differs from the listener port.
    #[error("endpoint {endpoint} does not use port {expected}")]
    UnexpectedPort {
        /// Offending endpoint token.
        endpoint: String,
        /// Listener port.
        expected: u16,
    },
}

/// Validates a broker listing: at least [`MIN_BROKER_ENDPOINTS`] dotted
/// `host:port` endpoints, all on `port`.
///
/// # Errors
///
/// Returns the first [`EndpointError`] encountered, checking the endpoint
/// count before individual endpoints.
pub fn validate_broker_list(value: &str, port: u16) -> Result<(), EndpointError> {
    let endpoints = EndpointList::parse(value);
    if endpoints.len() < MIN_BROKER_ENDPOINTS {
        return Err(EndpointError::TooFewEndpoints {
            found: endpoints.len(),
            minimum: MIN_BROKER_ENDPOINTS,
        });
    }
    for endpoint in endpoints.iter() {
        validate_endpoint(endpoint, port)?;
    }
    Ok(())
}

/// Validates one `host:port` endpoint against the listener port.
fn validate_endpoint(endpoint: &str, port: u16) -> Result<(), EndpointError> {
    let Some((host, raw_port)) = endpoint.rsplit_once(':') else {
        return Err(EndpointError::MissingPort {
            endpoint: endpoint.to_string(),
        });
    };
    if !is_dotted_host(host) {
        return Err(EndpointError::InvalidHost {
            endpoint: endpoint.to_string(),
        });
    }
    if raw_port.is_empty() || !raw_port.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(EndpointError::InvalidPort {
            endpoint: endpoint.to_string(),
        });
    }
    match raw_port.parse::<u16>() {
        Ok(found) if found == port => Ok(()),
        Ok(_) => Err(EndpointError::UnexpectedPort {
            endpoint: endpoint.to_string(),
            expected: port,
        }),
        Err(_) => Err(EndpointError::InvalidPort {
            endpoint: endpoint.to_string(),
        }),
    }
}

/// Returns true for hosts made of two or more dot-separated labels, where
/// every label is `[-A-Za-z0-9_]+` and the last label has no `-`.
fn is_dotted_host(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    let Some((last, leading)) = labels.split_last() else {
        return false;
    };
    if leading.is_empty() {
        return false;
    }
    let word = |byte: u8| byte.is_ascii_alphanumeric() || byte == b'_';
    leading.iter().all(|label| !label.is_empty() && label.bytes().all(|b| word(b) || b == b'-'))
        && !last.is_empty()
        && last.bytes().all(word)
}
