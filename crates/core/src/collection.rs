use crate::{CardRecord, InstanceId, OwnerId, PackItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown owner {0}")]
    UnknownOwner(OwnerId),
    #[error("pack {0} not found")]
    PackNotFound(InstanceId),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Host-side storage for single-owner collections. Each call is atomic on
/// its own; nothing spans calls.
pub trait CollectionStore {
    fn cards(&self, owner: &OwnerId) -> Result<Vec<CardRecord>, StoreError>;

    fn packs(&self, owner: &OwnerId) -> Result<Vec<PackItem>, StoreError>;

    /// Stores the cards, giving a fresh instance id to every card that has
    /// none, and returns them as stored.
    fn insert_cards(
        &mut self,
        owner: &OwnerId,
        cards: Vec<CardRecord>,
    ) -> Result<Vec<CardRecord>, StoreError>;

    fn insert_pack(&mut self, owner: &OwnerId, pack: PackItem) -> Result<(), StoreError>;

    fn remove_pack(&mut self, owner: &OwnerId, pack: InstanceId) -> Result<PackItem, StoreError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Vault {
    #[serde(default)]
    pub cards: Vec<CardRecord>,
    #[serde(default)]
    pub packs: Vec<PackItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MemoryCollection {
    #[serde(default)]
    pub vaults: BTreeMap<OwnerId, Vault>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_owner(&mut self, owner: OwnerId) -> &mut Vault {
        self.vaults.entry(owner).or_default()
    }

    pub fn owners(&self) -> impl Iterator<Item = &OwnerId> {
        self.vaults.keys()
    }

    pub fn vault(&self, owner: &OwnerId) -> Option<&Vault> {
        self.vaults.get(owner)
    }

    fn vault_mut(&mut self, owner: &OwnerId) -> Result<&mut Vault, StoreError> {
        self.vaults
            .get_mut(owner)
            .ok_or_else(|| StoreError::UnknownOwner(owner.clone()))
    }

    fn vault_ref(&self, owner: &OwnerId) -> Result<&Vault, StoreError> {
        self.vaults
            .get(owner)
            .ok_or_else(|| StoreError::UnknownOwner(owner.clone()))
    }
}

impl CollectionStore for MemoryCollection {
    fn cards(&self, owner: &OwnerId) -> Result<Vec<CardRecord>, StoreError> {
        Ok(self.vault_ref(owner)?.cards.clone())
    }

    fn packs(&self, owner: &OwnerId) -> Result<Vec<PackItem>, StoreError> {
        Ok(self.vault_ref(owner)?.packs.clone())
    }

    fn insert_cards(
        &mut self,
        owner: &OwnerId,
        cards: Vec<CardRecord>,
    ) -> Result<Vec<CardRecord>, StoreError> {
        let vault = self.vault_mut(owner)?;
        let stored: Vec<CardRecord> = cards
            .into_iter()
            .map(|mut card| {
                card.instance_id.get_or_insert_with(InstanceId::generate);
                card
            })
            .collect();
        vault.cards.extend(stored.iter().cloned());
        Ok(stored)
    }

    fn insert_pack(&mut self, owner: &OwnerId, pack: PackItem) -> Result<(), StoreError> {
        self.vault_mut(owner)?.packs.push(pack);
        Ok(())
    }

    fn remove_pack(&mut self, owner: &OwnerId, pack: InstanceId) -> Result<PackItem, StoreError> {
        let vault = self.vault_mut(owner)?;
        let idx = vault
            .packs
            .iter()
            .position(|item| item.id == pack)
            .ok_or(StoreError::PackNotFound(pack))?;
        Ok(vault.packs.remove(idx))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackSummary {
    pub set_code: String,
    pub count: usize,
}

/// Unopened packs counted per set, ordered by set code.
pub fn pack_summary(packs: &[PackItem]) -> Vec<PackSummary> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for pack in packs {
        let code = if pack.set_code.is_empty() {
            "unk".to_string()
        } else {
            pack.set_code.to_lowercase()
        };
        *counts.entry(code).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(set_code, count)| PackSummary { set_code, count })
        .collect()
}
