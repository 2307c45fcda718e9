//! Subject value object

use super::error::ValidationError;
use serde::{Deserialize, Serialize};

/// The entity a round is about (Value Object), e.g. a ticker symbol.
///
/// Opaque to the consensus core: it is only forwarded to analysts and
/// recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject {
    id: String,
}

impl Subject {
    /// Create a new subject, trimming surrounding whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySubject);
        }
        Ok(Self {
            id: trimmed.to_string(),
        })
    }

    /// Get the subject identifier
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl std::str::FromStr for Subject {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::new(s)
    }
}

impl TryFrom<String> for Subject {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Subject::new(value)
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        subject.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_creation() {
        let s = Subject::new("7203.T").unwrap();
        assert_eq!(s.as_str(), "7203.T");
        assert_eq!(s.to_string(), "7203.T");
    }

    #[test]
    fn test_subject_is_trimmed() {
        let s: Subject = "  AAPL ".parse().unwrap();
        assert_eq!(s.as_str(), "AAPL");
    }

    #[test]
    fn test_empty_subject_rejected() {
        assert_eq!(Subject::new(""), Err(ValidationError::EmptySubject));
        assert_eq!(Subject::new("   "), Err(ValidationError::EmptySubject));
    }

    #[test]
    fn test_subject_serde_validates() {
        let s: Subject = serde_json::from_str("\"MSFT\"").unwrap();
        assert_eq!(s.as_str(), "MSFT");
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"MSFT\"");
        assert!(serde_json::from_str::<Subject>("\"\"").is_err());
    }
}
