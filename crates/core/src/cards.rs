use crate::Provenance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim().to_ascii_uppercase().as_str() {
            "W" => Some(Self::White),
            "U" => Some(Self::Blue),
            "B" => Some(Self::Black),
            "R" => Some(Self::Red),
            "G" => Some(Self::Green),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::White => "W",
            Self::Blue => "U",
            Self::Black => "B",
            Self::Red => "R",
            Self::Green => "G",
        }
    }

    /// Position in the W, U, B, R, G display order, starting at 1.
    pub fn order(self) -> u8 {
        match self {
            Self::White => 1,
            Self::Blue => 2,
            Self::Black => 3,
            Self::Red => 4,
            Self::Green => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl Rarity {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "common" => Some(Self::Common),
            "uncommon" => Some(Self::Uncommon),
            "rare" => Some(Self::Rare),
            "mythic" => Some(Self::Mythic),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Mythic => "mythic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Mythic => "Mythic",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Legality {
    Legal,
    NotLegal,
    Banned,
    Restricted,
    #[serde(other)]
    Unknown,
}

/// Format name to legality, as published by the source catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Legalities(pub BTreeMap<String, Legality>);

impl Legalities {
    pub fn get(&self, format: &str) -> Legality {
        self.0.get(format).copied().unwrap_or(Legality::Unknown)
    }

    pub fn is_legal_in(&self, format: &str) -> bool {
        self.get(format) == Legality::Legal
    }

    pub fn insert(&mut self, format: impl Into<String>, legality: Legality) {
        self.0.insert(format.into(), legality);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Land,
    Nonland,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TypeLine(pub String);

impl TypeLine {
    const SUBTYPE_SEPARATOR: char = '\u{2014}';

    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn classify(&self) -> TypeClass {
        if self.0.to_lowercase().contains("land") {
            TypeClass::Land
        } else {
            TypeClass::Nonland
        }
    }

    /// Text before the first em-dash, e.g. `Legendary Creature` for
    /// `Legendary Creature — Elf Druid`.
    pub fn primary_type(&self) -> &str {
        self.0
            .split(Self::SUBTYPE_SEPARATOR)
            .next()
            .unwrap_or_default()
            .trim()
    }
}

/// Stable identifier of a card in the source catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct CatalogId(pub String);

impl CatalogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Local id of one physical copy inside a collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardRecord {
    #[serde(default)]
    pub catalog_id: Option<CatalogId>,
    #[serde(default)]
    pub instance_id: Option<InstanceId>,
    pub name: String,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub rarity: Option<Rarity>,
    #[serde(default)]
    pub mana_value: f64,
    #[serde(default)]
    pub type_line: Option<TypeLine>,
    #[serde(default)]
    pub set_code: Option<String>,
    #[serde(default)]
    pub legalities: Option<Legalities>,
    /// Source catalog object, kept verbatim.
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub provenance: Option<Provenance>,
}

impl CardRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog_id: None,
            instance_id: None,
            name: name.into(),
            colors: Vec::new(),
            rarity: None,
            mana_value: 0.0,
            type_line: None,
            set_code: None,
            legalities: None,
            payload: serde_json::Value::Null,
            provenance: None,
        }
    }

    pub fn with_catalog_id(mut self, id: impl Into<String>) -> Self {
        self.catalog_id = Some(CatalogId::new(id));
        self
    }

    pub fn with_colors(mut self, colors: &[Color]) -> Self {
        self.colors = colors.to_vec();
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn with_mana_value(mut self, mana_value: f64) -> Self {
        self.mana_value = mana_value.max(0.0);
        self
    }

    pub fn with_type_line(mut self, line: impl Into<String>) -> Self {
        self.type_line = Some(TypeLine::new(line));
        self
    }

    pub fn with_set(mut self, set_code: impl Into<String>) -> Self {
        self.set_code = Some(set_code.into());
        self
    }

    pub fn with_legality(mut self, format: impl Into<String>, legality: Legality) -> Self {
        self.legalities
            .get_or_insert_with(Legalities::default)
            .insert(format, legality);
        self
    }

    /// Key shared by every copy of the same printing: the catalog id, or the
    /// name when the record was never linked to a catalog.
    pub fn identity_key(&self) -> &str {
        match &self.catalog_id {
            Some(id) if !id.0.is_empty() => id.as_str(),
            _ => &self.name,
        }
    }

    pub fn rarity_or_default(&self) -> Rarity {
        self.rarity.unwrap_or(Rarity::Common)
    }

    pub fn type_class(&self) -> TypeClass {
        self.type_line
            .as_ref()
            .map(TypeLine::classify)
            .unwrap_or(TypeClass::Nonland)
    }

    pub fn has_any_color(&self, colors: &std::collections::BTreeSet<Color>) -> bool {
        self.colors.iter().any(|color| colors.contains(color))
    }
}

/// An unopened booster sitting in a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackItem {
    pub id: InstanceId,
    pub name: String,
    pub set_code: String,
}

impl PackItem {
    pub fn booster(set_code: &str) -> Self {
        let set_code = set_code.to_lowercase();
        Self {
            id: InstanceId::generate(),
            name: format!("Booster Pack ({})", set_code.to_uppercase()),
            set_code,
        }
    }
}
