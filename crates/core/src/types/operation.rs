//! Deferred `productSet` operation state.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::ProductGid;

/// Status of a `ProductSetOperation`.
///
/// Only `Complete` is terminal. Values this crate does not know about are
/// kept verbatim and treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationStatus {
    Created,
    Active,
    Complete,
    Other(String),
}

impl OperationStatus {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::Active => "ACTIVE",
            Self::Complete => "COMPLETE",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OperationStatus {
    fn from(s: &str) -> Self {
        match s {
            "CREATED" => Self::Created,
            "ACTIVE" => Self::Active,
            "COMPLETE" => Self::Complete,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for OperationStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OperationStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// A user error reported on a product set operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationUserError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl fmt::Display for OperationUserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.as_ref().map_or_else(String::new, |f| f.join("."));
        match &self.code {
            Some(code) => write!(f, "{field}: {} ({code})", self.message),
            None => write!(f, "{field}: {}", self.message),
        }
    }
}

/// One observation of an operation, as returned by a status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolledOperation {
    pub status: OperationStatus,
    /// Present only once the operation completed and created a product.
    pub product_id: Option<ProductGid>,
    pub user_errors: Vec<OperationUserError>,
}

impl PolledOperation {
    /// Join the user errors into one line for logging.
    #[must_use]
    pub fn error_summary(&self) -> String {
        self.user_errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_unknown() {
        let status: OperationStatus = serde_json::from_str("\"QUEUED\"").expect("decode");
        assert_eq!(status, OperationStatus::Other("QUEUED".to_string()));
        assert!(!status.is_terminal());
        assert_eq!(serde_json::to_string(&status).expect("encode"), "\"QUEUED\"");
    }

    #[test]
    fn test_only_complete_is_terminal() {
        assert!(OperationStatus::Complete.is_terminal());
        assert!(!OperationStatus::Created.is_terminal());
        assert!(!OperationStatus::Active.is_terminal());
    }

    #[test]
    fn test_error_summary() {
        let polled = PolledOperation {
            status: OperationStatus::Complete,
            product_id: None,
            user_errors: vec![
                OperationUserError {
                    code: Some("INVALID".to_string()),
                    field: Some(vec!["input".to_string(), "variants".to_string()]),
                    message: "Too many variants".to_string(),
                },
                OperationUserError {
                    code: None,
                    field: None,
                    message: "Title can't be blank".to_string(),
                },
            ],
        };
        assert_eq!(
            polled.error_summary(),
            "input.variants: Too many variants (INVALID); : Title can't be blank"
        );
    }
}
