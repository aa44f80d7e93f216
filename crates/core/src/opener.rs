use crate::{
    open_pack, CardRecord, CatalogIndex, CatalogResolver, CollectionStore, Event, EventBus,
    InstanceId, OwnerId, PackError, PackItem, PackRequest, PackRule, ProvenanceStamp,
    RandomSource, StoreError,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct OpenedPack {
    pub pack: PackItem,
    /// Cards as stored, with their new instance ids.
    pub cards: Vec<CardRecord>,
}

/// Turns an owned pack into cards in the owner's collection.
pub struct PackOpener<'a, C: ?Sized> {
    catalog: &'a C,
    rule: PackRule,
}

impl<'a, C> PackOpener<'a, C>
where
    C: CatalogIndex + CatalogResolver + ?Sized,
{
    pub fn new(catalog: &'a C, rule: PackRule) -> Self {
        Self { catalog, rule }
    }

    pub fn rule(&self) -> &PackRule {
        &self.rule
    }

    /// Generates the pack, stores the cards, then removes the pack. The pack
    /// is only removed after the cards were written, so a failed write
    /// leaves the collection as it was.
    pub fn open<S, R>(
        &self,
        store: &mut S,
        owner: &OwnerId,
        pack_id: InstanceId,
        rng: &mut R,
        now: DateTime<Utc>,
        events: &mut EventBus,
    ) -> Result<OpenedPack, PackError>
    where
        S: CollectionStore + ?Sized,
        R: RandomSource + ?Sized,
    {
        let pack = store
            .packs(owner)
            .map_err(PackError::CollectionReadFailure)?
            .into_iter()
            .find(|item| item.id == pack_id)
            .ok_or(PackError::PackNotFound(pack_id))?;

        match self.open_found(store, owner, &pack, rng, now) {
            Ok(cards) => {
                tracing::info!(%owner, set = %pack.set_code, cards = cards.len(), "pack opened");
                events.push(Event::PackOpened {
                    owner: owner.clone(),
                    set_code: pack.set_code.clone(),
                    pack: pack.id,
                    cards: cards.len(),
                });
                Ok(OpenedPack { pack, cards })
            }
            Err(err) => {
                tracing::warn!(%owner, set = %pack.set_code, error = %err, "pack open failed");
                events.push(Event::PackOpenFailed {
                    owner: owner.clone(),
                    set_code: pack.set_code.clone(),
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn open_found<S, R>(
        &self,
        store: &mut S,
        owner: &OwnerId,
        pack: &PackItem,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Vec<CardRecord>, PackError>
    where
        S: CollectionStore + ?Sized,
        R: RandomSource + ?Sized,
    {
        let index = self.catalog.index_for_set(&pack.set_code).map_err(|source| {
            PackError::CatalogLookupFailure {
                id: pack.set_code.clone(),
                source,
            }
        })?;
        let request = PackRequest::from_rule(pack.set_code.clone(), &self.rule);
        let stamp = ProvenanceStamp::new(owner.clone(), now);
        let generated = open_pack(&index, &request, self.catalog, rng, &stamp)?;

        let stored = store
            .insert_cards(owner, generated)
            .map_err(PackError::CollectionWriteFailure)?;
        store
            .remove_pack(owner, pack.id)
            .map_err(|source| PackError::PackRemovalFailure {
                pack: pack.id,
                inserted: stored.len(),
                source,
            })?;
        Ok(stored)
    }
}

/// Gives every listed owner one booster of `set_code`. Returns how many
/// packs were handed out.
pub fn grant_packs<S: CollectionStore + ?Sized>(
    store: &mut S,
    owners: &[OwnerId],
    set_code: &str,
    events: &mut EventBus,
) -> Result<usize, StoreError> {
    let mut granted = 0;
    for owner in owners {
        let pack = PackItem::booster(set_code);
        let id = pack.id;
        store.insert_pack(owner, pack)?;
        events.push(Event::PackGranted {
            owner: owner.clone(),
            set_code: set_code.to_lowercase(),
            pack: id,
        });
        granted += 1;
    }
    tracing::info!(set = set_code, granted, "packs granted");
    Ok(granted)
}
