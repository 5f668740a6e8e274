//! Strongly-typed identifiers for the watchdog

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the service-manager unit the watchdog restarts (e.g. `controlpod.service`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ServiceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServiceName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_display() {
        let name = ServiceName::new("controlpod.service");
        assert_eq!(name.to_string(), "controlpod.service");
        assert_eq!(name.as_str(), "controlpod.service");
    }

    #[test]
    fn blank_service_name_is_empty() {
        assert!(ServiceName::new("   ").is_empty());
        assert!(!ServiceName::from("controlpod").is_empty());
    }

    #[test]
    fn service_name_serializes_as_plain_string() {
        let name = ServiceName::from("controlpod.service");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"controlpod.service\"");

        let back: ServiceName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
