use serde::{Deserialize, Serialize};

pub const DEFAULT_LEGALITY_FORMAT: &str = "commander";

/// Picks per rarity tier for one pack.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackQuota {
    pub rare_or_mythic: usize,
    pub uncommon: usize,
    pub common: usize,
}

impl PackQuota {
    pub fn total(&self) -> usize {
        self.rare_or_mythic + self.uncommon + self.common
    }
}

impl Default for PackQuota {
    fn default() -> Self {
        Self {
            rare_or_mythic: 1,
            uncommon: 3,
            common: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackRule {
    #[serde(default)]
    pub quota: PackQuota,
    #[serde(default = "default_legality_format")]
    pub legality_format: String,
}

impl Default for PackRule {
    fn default() -> Self {
        Self {
            quota: PackQuota::default(),
            legality_format: default_legality_format(),
        }
    }
}

fn default_legality_format() -> String {
    DEFAULT_LEGALITY_FORMAT.to_string()
}
