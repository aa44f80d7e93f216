use crate::{CardRecord, Color, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    #[default]
    Name,
    ManaValue,
    Type,
    Set,
    Rarity,
}

impl GroupKey {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "cmc" | "mana_value" | "manavalue" | "mv" => Some(Self::ManaValue),
            "type" => Some(Self::Type),
            "set" => Some(Self::Set),
            "rarity" => Some(Self::Rarity),
            _ => None,
        }
    }

    /// Unknown keywords fall back to grouping by name.
    pub fn from_keyword_or_default(keyword: &str) -> Self {
        Self::from_keyword(keyword).unwrap_or_else(|| {
            tracing::debug!(keyword, "unknown group key, using name");
            Self::Name
        })
    }
}

/// Display filter for one binder session. Transitions return a new value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub colors: BTreeSet<Color>,
    #[serde(default)]
    pub rarities: BTreeSet<Rarity>,
    #[serde(default)]
    pub group_by: GroupKey,
}

impl FilterConfig {
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn toggle_color(&self, color: Color) -> Self {
        let mut next = self.clone();
        if !next.colors.remove(&color) {
            next.colors.insert(color);
        }
        next
    }

    pub fn toggle_rarity(&self, rarity: Rarity) -> Self {
        let mut next = self.clone();
        if !next.rarities.remove(&rarity) {
            next.rarities.insert(rarity);
        }
        next
    }

    pub fn with_group_by(&self, group_by: GroupKey) -> Self {
        Self {
            group_by,
            ..self.clone()
        }
    }
}

/// Predicate compiled from a [`FilterConfig`].
#[derive(Debug, Clone)]
pub struct CardFilter<'a> {
    needle: Option<String>,
    colors: &'a BTreeSet<Color>,
    rarities: &'a BTreeSet<Rarity>,
}

impl<'a> CardFilter<'a> {
    pub fn from_config(config: &'a FilterConfig) -> Self {
        let needle = if config.name.is_empty() {
            None
        } else {
            Some(config.name.to_lowercase())
        };
        Self {
            needle,
            colors: &config.colors,
            rarities: &config.rarities,
        }
    }

    pub fn matches(&self, card: &CardRecord) -> bool {
        self.matches_name(card) && self.matches_colors(card) && self.matches_rarity(card)
    }

    fn matches_name(&self, card: &CardRecord) -> bool {
        match &self.needle {
            Some(needle) => card.name.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }

    fn matches_colors(&self, card: &CardRecord) -> bool {
        self.colors.is_empty() || card.has_any_color(self.colors)
    }

    fn matches_rarity(&self, card: &CardRecord) -> bool {
        self.rarities.is_empty() || self.rarities.contains(&card.rarity_or_default())
    }
}

/// Keeps the cards matching every active predicate, in input order.
pub fn filter(cards: Vec<CardRecord>, config: &FilterConfig) -> Vec<CardRecord> {
    let predicate = CardFilter::from_config(config);
    cards
        .into_iter()
        .filter(|card| predicate.matches(card))
        .collect()
}
