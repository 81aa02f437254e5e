//! OpenAlex resource types

use std::fmt;
use std::str::FromStr;

/// OpenAlex entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// Academic works (papers, articles, etc.)
    Works,
    /// Researchers and authors
    Authors,
    /// Journals, repositories, conferences
    Sources,
    /// Universities, research organizations
    Institutions,
    /// Academic publishers
    Publishers,
    /// Research topics (hierarchical classification)
    Topics,
    /// Funding organizations
    Funders,
}

impl Entity {
    /// Parse entity from string name (case-insensitive, singular or plural)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "works" | "work" => Some(Self::Works),
            "authors" | "author" => Some(Self::Authors),
            "sources" | "source" => Some(Self::Sources),
            "institutions" | "institution" => Some(Self::Institutions),
            "publishers" | "publisher" => Some(Self::Publishers),
            "topics" | "topic" => Some(Self::Topics),
            "funders" | "funder" => Some(Self::Funders),
            _ => None,
        }
    }

    /// URL path segment for this entity (`/works`, `/authors`, ...)
    pub fn path(&self) -> &'static str {
        match self {
            Self::Works => "works",
            Self::Authors => "authors",
            Self::Sources => "sources",
            Self::Institutions => "institutions",
            Self::Publishers => "publishers",
            Self::Topics => "topics",
            Self::Funders => "funders",
        }
    }

    /// List all available entities
    pub fn all() -> &'static [Entity] {
        &[
            Self::Works,
            Self::Authors,
            Self::Sources,
            Self::Institutions,
            Self::Publishers,
            Self::Topics,
            Self::Funders,
        ]
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown entity: {s}"))
    }
}
