use crate::{CardRecord, CatalogId, Legalities, Rarity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Projection of a catalog card carrying only what sampling needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub id: CatalogId,
    #[serde(default)]
    pub rarity: Option<Rarity>,
    #[serde(default)]
    pub legalities: Option<Legalities>,
}

impl IndexEntry {
    pub fn from_record(id: CatalogId, card: &CardRecord) -> Self {
        Self {
            id,
            rarity: card.rarity,
            legalities: card.legalities.clone(),
        }
    }

    /// Missing legality data never counts as legal.
    pub fn is_legal_in(&self, format: &str) -> bool {
        self.legalities
            .as_ref()
            .is_some_and(|legalities| legalities.is_legal_in(format))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown set {0}")]
    UnknownSet(String),
    #[error("card {0} not found")]
    NotFound(CatalogId),
    #[error("catalog timed out fetching {0}")]
    Timeout(CatalogId),
    #[error("catalog io error: {0}")]
    Io(String),
}

impl CatalogError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Io(_))
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

pub trait CatalogIndex {
    fn index_for_set(&self, set_code: &str) -> Result<Vec<IndexEntry>, CatalogError>;
}

/// Full-record lookup. Lookups for one pack may run on several threads.
pub trait CatalogResolver: Sync {
    fn resolve(&self, id: &CatalogId) -> Result<CardRecord, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Legality;

    #[test]
    fn absent_legality_is_not_legal() {
        let entry = IndexEntry {
            id: CatalogId::new("x"),
            rarity: Some(Rarity::Rare),
            legalities: None,
        };
        assert!(!entry.is_legal_in("commander"));
    }

    #[test]
    fn entry_projects_record() {
        let card = CardRecord::new("Sol Ring")
            .with_rarity(Rarity::Uncommon)
            .with_legality("commander", Legality::Legal);
        let entry = IndexEntry::from_record(CatalogId::new("c21-263"), &card);
        assert_eq!(entry.rarity, Some(Rarity::Uncommon));
        assert!(entry.is_legal_in("commander"));
        assert!(!entry.is_legal_in("vintage"));
    }

    #[test]
    fn retryable_errors() {
        assert!(CatalogError::Timeout(CatalogId::new("a")).is_retryable());
        assert!(CatalogError::Io("reset".to_string()).is_retryable());
        assert!(!CatalogError::NotFound(CatalogId::new("a")).is_retryable());
        assert!(!CatalogError::UnknownSet("zzz".to_string()).is_retryable());
    }
}
