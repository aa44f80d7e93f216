use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use vaultbinder_core::{CardRecord, CatalogId, Color, Legalities, Legality, Rarity, TypeLine};

/// One catalog file: either a bare card array or a paged list object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CatalogFile {
    Cards(Vec<Value>),
    Page { data: Vec<Value> },
}

impl CatalogFile {
    pub fn into_cards(self) -> Vec<Value> {
        match self {
            Self::Cards(cards) => cards,
            Self::Page { data } => data,
        }
    }
}

/// The catalog fields the engines care about. Everything else stays in the
/// payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCard {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub cmc: Option<f64>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub legalities: Option<BTreeMap<String, Legality>>,
}

impl RawCard {
    pub fn into_record(self, payload: Value) -> CardRecord {
        let mut colors = Vec::new();
        for symbol in self.colors.unwrap_or_default() {
            match Color::from_symbol(&symbol) {
                Some(color) if !colors.contains(&color) => colors.push(color),
                Some(_) => {}
                None => tracing::debug!(card = %self.name, symbol = %symbol, "skipping color"),
            }
        }
        let rarity = self.rarity.as_deref().and_then(Rarity::from_name);
        let mut card = CardRecord::new(self.name).with_colors(&colors);
        card.rarity = rarity;
        card.catalog_id = self.id.map(CatalogId::new);
        if let Some(cmc) = self.cmc {
            card = card.with_mana_value(cmc);
        }
        card.type_line = self.type_line.map(TypeLine::new);
        card.set_code = self.set.map(|set| set.to_lowercase());
        card.legalities = self.legalities.map(Legalities);
        card.payload = payload;
        card
    }
}
