//! Support agent seniority

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentLevel {
    #[default]
    Junior,
    Middle,
    Senior,
    Lead,
}

impl AgentLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Middle => "middle",
            Self::Senior => "senior",
            Self::Lead => "lead",
        }
    }
}

impl fmt::Display for AgentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "junior" => Ok(Self::Junior),
            "middle" => Ok(Self::Middle),
            "senior" => Ok(Self::Senior),
            "lead" => Ok(Self::Lead),
            _ => Err(UnknownVariant::new("agent level", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_junior() {
        assert_eq!(AgentLevel::default(), AgentLevel::Junior);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Senior".parse::<AgentLevel>().unwrap(), AgentLevel::Senior);
        assert!("intern".parse::<AgentLevel>().is_err());
    }
}
