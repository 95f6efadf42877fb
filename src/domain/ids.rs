//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through the export
//! pipeline, so task ids, country codes and frequencies can't be mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task identifier newtype wrapper
///
/// Opaque handle returned by the snapshot endpoint. It is never generated
/// locally; the only validation is that it is not blank.
///
/// # Examples
///
/// ```
/// use hdx_exporter::domain::ids::TaskId;
/// use std::str::FromStr;
///
/// let task_id = TaskId::from_str("3f0c9a64-6a1e-4d38-b0c1-6a5f0c1c2a11").unwrap();
/// assert_eq!(task_id.as_str(), "3f0c9a64-6a1e-4d38-b0c1-6a5f0c1c2a11");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new TaskId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Task ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the task ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TaskId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// ISO 3166-1 alpha-3 country code
///
/// Always three ASCII letters, stored upper case.
///
/// # Examples
///
/// ```
/// use hdx_exporter::domain::ids::CountryCode;
///
/// let code = CountryCode::new("ken").unwrap();
/// assert_eq!(code.as_str(), "KEN");
/// assert!(CountryCode::new("KE").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a new CountryCode, normalizing to upper case
    pub fn new(code: impl AsRef<str>) -> Result<Self, String> {
        let code = code.as_ref().trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!(
                "Invalid country code '{code}'. Expected three letters (ISO3)"
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CountryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

/// Interval of scheduled exports to discover (`daily`, `weekly`, ...)
///
/// The remote side decides which intervals exist, so any non-blank value is
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency(String);

impl Frequency {
    /// Creates a new Frequency
    pub fn new(frequency: impl Into<String>) -> Result<Self, String> {
        let frequency = frequency.into().trim().to_string();
        if frequency.is_empty() {
            return Err("Frequency cannot be empty".to_string());
        }
        Ok(Self(frequency))
    }

    /// Returns the frequency as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self("daily".to_string())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Frequency {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_rejects_blank() {
        assert!(TaskId::new("").is_err());
        assert!(TaskId::new("   ").is_err());
        assert!(TaskId::new("abc").is_ok());
    }

    #[test]
    fn test_task_id_deserialize_validates() {
        let id: TaskId = serde_json::from_str("\"task-1\"").unwrap();
        assert_eq!(id.as_str(), "task-1");
        assert!(serde_json::from_str::<TaskId>("\"\"").is_err());
    }

    #[test]
    fn test_country_code_normalizes_case() {
        let code = CountryCode::new(" uga ").unwrap();
        assert_eq!(code.as_str(), "UGA");
        assert_eq!(code.to_string(), "UGA");
    }

    #[test]
    fn test_country_code_rejects_invalid() {
        assert!(CountryCode::new("").is_err());
        assert!(CountryCode::new("KENY").is_err());
        assert!(CountryCode::new("K3N").is_err());
    }

    #[test]
    fn test_frequency_default_is_daily() {
        assert_eq!(Frequency::default().as_str(), "daily");
        assert!(Frequency::new(" ").is_err());
        assert_eq!(Frequency::new("weekly").unwrap().as_str(), "weekly");
    }
}
