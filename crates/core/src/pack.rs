use crate::{
    CardRecord, CatalogError, CatalogId, CatalogResolver, IndexEntry, InstanceId, PackQuota,
    PackRule, ProvenanceStamp, RandomSource, Rarity, StoreError,
};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackRequest {
    pub set_code: String,
    pub quota: PackQuota,
    pub legality_format: String,
}

impl PackRequest {
    pub fn booster(set_code: impl Into<String>) -> Self {
        Self::from_rule(set_code, &PackRule::default())
    }

    pub fn from_rule(set_code: impl Into<String>, rule: &PackRule) -> Self {
        Self {
            set_code: set_code.into(),
            quota: rule.quota,
            legality_format: rule.legality_format.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PackError {
    #[error(
        "not enough {format} legal cards in {set_code}: {rare_or_mythic} rare/mythic, {uncommon} uncommon, {common} common"
    )]
    InsufficientPool {
        set_code: String,
        format: String,
        rare_or_mythic: usize,
        uncommon: usize,
        common: usize,
    },
    #[error("catalog lookup failed for {id}: {source}")]
    CatalogLookupFailure {
        id: String,
        #[source]
        source: CatalogError,
    },
    #[error("pack {0} not found")]
    PackNotFound(InstanceId),
    #[error("could not read collection: {0}")]
    CollectionReadFailure(#[source] StoreError),
    #[error("could not add opened cards: {0}")]
    CollectionWriteFailure(#[source] StoreError),
    #[error("added {inserted} cards but could not remove pack {pack}: {source}")]
    PackRemovalFailure {
        pack: InstanceId,
        inserted: usize,
        #[source]
        source: StoreError,
    },
}

impl PackError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::CatalogLookupFailure { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

/// Eligible index entries split by rarity tier.
#[derive(Debug, Default)]
pub struct RarityPools<'a> {
    pub rare_or_mythic: Vec<&'a IndexEntry>,
    pub uncommon: Vec<&'a IndexEntry>,
    pub common: Vec<&'a IndexEntry>,
}

impl<'a> RarityPools<'a> {
    /// Entries without a rarity or not legal in `format` are left out.
    pub fn partition(index: &'a [IndexEntry], format: &str) -> Self {
        let mut pools = Self::default();
        for entry in index.iter().filter(|entry| entry.is_legal_in(format)) {
            match entry.rarity {
                Some(Rarity::Rare | Rarity::Mythic) => pools.rare_or_mythic.push(entry),
                Some(Rarity::Uncommon) => pools.uncommon.push(entry),
                Some(Rarity::Common) => pools.common.push(entry),
                None => {}
            }
        }
        pools
    }

    pub fn validate(&self, request: &PackRequest) -> Result<(), PackError> {
        let quota = &request.quota;
        if self.common.len() < quota.common
            || self.uncommon.len() < quota.uncommon
            || self.rare_or_mythic.len() < quota.rare_or_mythic
        {
            return Err(PackError::InsufficientPool {
                set_code: request.set_code.clone(),
                format: request.legality_format.clone(),
                rare_or_mythic: self.rare_or_mythic.len(),
                uncommon: self.uncommon.len(),
                common: self.common.len(),
            });
        }
        Ok(())
    }

    /// Independent picks with replacement, rare/mythic first, then
    /// uncommons, then commons. A printing may appear more than once.
    /// Only called on pools that passed `validate`.
    pub(crate) fn draw<R: RandomSource + ?Sized>(
        &self,
        quota: &PackQuota,
        rng: &mut R,
    ) -> Vec<CatalogId> {
        let mut picks = Vec::with_capacity(quota.total());
        for (pool, count) in [
            (&self.rare_or_mythic, quota.rare_or_mythic),
            (&self.uncommon, quota.uncommon),
            (&self.common, quota.common),
        ] {
            for _ in 0..count {
                picks.push(pool[rng.pick_index(pool.len())].id.clone());
            }
        }
        picks
    }
}

/// Fetches full records for every pick. Lookups run in parallel; the
/// result keeps pick order.
pub fn resolve_picks<C: CatalogResolver + ?Sized>(
    picks: &[CatalogId],
    resolver: &C,
) -> Result<Vec<CardRecord>, PackError> {
    picks
        .par_iter()
        .map(|id| {
            resolver
                .resolve(id)
                .map_err(|source| PackError::CatalogLookupFailure {
                    id: id.to_string(),
                    source,
                })
        })
        .collect()
}

/// Generates the cards of one pack. Nothing is written anywhere; the caller
/// inserts the result and consumes the pack.
pub fn open_pack<C, R>(
    index: &[IndexEntry],
    request: &PackRequest,
    resolver: &C,
    rng: &mut R,
    stamp: &ProvenanceStamp,
) -> Result<Vec<CardRecord>, PackError>
where
    C: CatalogResolver + ?Sized,
    R: RandomSource + ?Sized,
{
    let pools = RarityPools::partition(index, &request.legality_format);
    if let Err(err) = pools.validate(request) {
        tracing::warn!(set = %request.set_code, error = %err, "pack pool too small");
        return Err(err);
    }
    let picks = pools.draw(&request.quota, rng);
    tracing::debug!(set = %request.set_code, picks = picks.len(), "pack drawn");
    let cards = resolve_picks(&picks, resolver)?;
    Ok(cards.into_iter().map(|card| stamp.apply(card)).collect())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RarityTier {
    pub rarity: Rarity,
    pub cards: Vec<CardRecord>,
}

impl RarityTier {
    pub fn label(&self) -> &'static str {
        self.rarity.label()
    }
}

/// Opened cards arranged for a results screen: mythic, rare, uncommon,
/// common, skipping empty tiers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PackResults {
    pub tiers: Vec<RarityTier>,
}

impl PackResults {
    pub fn from_cards(cards: &[CardRecord]) -> Self {
        let tiers = [Rarity::Mythic, Rarity::Rare, Rarity::Uncommon, Rarity::Common]
            .into_iter()
            .filter_map(|rarity| {
                let cards: Vec<CardRecord> = cards
                    .iter()
                    .filter(|card| card.rarity_or_default() == rarity)
                    .cloned()
                    .collect();
                (!cards.is_empty()).then_some(RarityTier { rarity, cards })
            })
            .collect();
        Self { tiers }
    }

    pub fn len(&self) -> usize {
        self.tiers.iter().map(|tier| tier.cards.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
