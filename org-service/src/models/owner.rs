//! Polymorphic owner tags for snippets and actions.

use serde::{Deserialize, Serialize};

/// The closed set of resource kinds that can own a snippet or action. An
/// unknown tag fails deserialization and surfaces as a 400 before any lookup
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    Company,
    Group,
    Service,
}

impl OwnerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::Company => "company",
            OwnerKind::Group => "group",
            OwnerKind::Service => "service",
        }
    }
}

impl std::str::FromStr for OwnerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(OwnerKind::Company),
            "group" => Ok(OwnerKind::Group),
            "service" => Ok(OwnerKind::Service),
            _ => Err(format!("Invalid owner kind: {}", s)),
        }
    }
}
