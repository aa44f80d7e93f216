use crate::schema::{CatalogFile, RawCard};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use vaultbinder_core::{
    CardRecord, CatalogError, CatalogId, CatalogIndex, CatalogResolver, IndexEntry,
    MemoryCollection, PackRule,
};

const PACK_RULE_FILE: &str = "pack.json";

/// Card records keyed by catalog id, with a per-set listing in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: HashMap<CatalogId, CardRecord>,
    sets: BTreeMap<String, Vec<CatalogId>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record. Records without a catalog id cannot be looked up and
    /// are skipped; a repeated id replaces the earlier record.
    pub fn insert(&mut self, card: CardRecord) -> bool {
        let Some(id) = card.catalog_id.clone() else {
            tracing::debug!(card = %card.name, "skipping card without catalog id");
            return false;
        };
        let set = card.set_code.clone().unwrap_or_default();
        if let Some(previous) = self.cards.insert(id.clone(), card) {
            let old_set = previous.set_code.unwrap_or_default();
            if let Some(ids) = self.sets.get_mut(&old_set) {
                ids.retain(|existing| existing != &id);
            }
            tracing::debug!(%id, "replacing duplicate catalog entry");
        }
        self.sets.entry(set).or_default().push(id);
        true
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn set_codes(&self) -> impl Iterator<Item = &str> {
        self.sets
            .iter()
            .filter(|(code, ids)| !code.is_empty() && !ids.is_empty())
            .map(|(code, _)| code.as_str())
    }

    pub fn get(&self, id: &CatalogId) -> Option<&CardRecord> {
        self.cards.get(id)
    }
}

impl CatalogIndex for Catalog {
    fn index_for_set(&self, set_code: &str) -> Result<Vec<IndexEntry>, CatalogError> {
        let ids = self
            .sets
            .get(&set_code.to_lowercase())
            .ok_or_else(|| CatalogError::UnknownSet(set_code.to_string()))?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.cards
                    .get(id)
                    .map(|card| IndexEntry::from_record(id.clone(), card))
            })
            .collect())
    }
}

impl CatalogResolver for Catalog {
    fn resolve(&self, id: &CatalogId) -> Result<CardRecord, CatalogError> {
        self.cards
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }
}

/// Reads every `*.json` file in `dir`, in file name order.
pub fn load_catalog(dir: &Path) -> anyhow::Result<Catalog> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut catalog = Catalog::new();
    for path in &paths {
        let file: CatalogFile = load_json(path)?;
        let mut skipped = 0usize;
        for (idx, value) in file.into_cards().into_iter().enumerate() {
            let raw: RawCard = serde_json::from_value(value.clone())
                .with_context(|| format!("parse card {idx} in {}", path.display()))?;
            if !catalog.insert(raw.into_record(value)) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            tracing::warn!(file = %path.display(), skipped, "cards without catalog id ignored");
        }
    }
    tracing::info!(files = paths.len(), cards = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Reads `pack.json` from `dir`, or the default booster rule when absent.
pub fn load_pack_rule(dir: &Path) -> anyhow::Result<PackRule> {
    let path = dir.join(PACK_RULE_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no pack rule, using default booster");
        return Ok(PackRule::default());
    }
    load_json(path)
}

/// Reads a vault snapshot. A missing file is an empty collection.
pub fn load_vault(path: &Path) -> anyhow::Result<MemoryCollection> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no vault snapshot, starting empty");
        return Ok(MemoryCollection::new());
    }
    load_json(path)
}

pub fn save_vault(path: &Path, vault: &MemoryCollection) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(vault).context("serialize vault")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
