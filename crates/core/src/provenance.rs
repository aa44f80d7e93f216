use crate::{CardRecord, OwnerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeRecord {
    pub from: OwnerId,
    pub to: OwnerId,
    pub at: DateTime<Utc>,
}

/// Where a generated card came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provenance {
    pub owner: OwnerId,
    pub acquired_at: DateTime<Utc>,
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
}

impl Provenance {
    pub fn new(owner: OwnerId, acquired_at: DateTime<Utc>) -> Self {
        Self {
            owner,
            acquired_at,
            trades: Vec::new(),
        }
    }

    /// Appends a hand-off and moves ownership to the receiver.
    pub fn record_trade(&mut self, to: OwnerId, at: DateTime<Utc>) {
        let from = std::mem::replace(&mut self.owner, to.clone());
        self.trades.push(TradeRecord { from, to, at });
    }
}

/// Ownership stamp applied to every card coming out of one pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceStamp {
    pub owner: OwnerId,
    pub acquired_at: DateTime<Utc>,
}

impl ProvenanceStamp {
    pub fn new(owner: OwnerId, acquired_at: DateTime<Utc>) -> Self {
        Self { owner, acquired_at }
    }

    pub fn now(owner: OwnerId) -> Self {
        Self::new(owner, Utc::now())
    }

    /// Clears the local instance id so the store assigns a fresh one and
    /// attaches a new provenance record with an empty trade history.
    pub fn apply(&self, mut card: CardRecord) -> CardRecord {
        card.instance_id = None;
        card.provenance = Some(Provenance::new(self.owner.clone(), self.acquired_at));
        card
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InstanceId;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("timestamp")
    }

    #[test]
    fn stamp_replaces_instance_and_history() {
        let mut card = CardRecord::new("Llanowar Elves").with_catalog_id("dom-168");
        card.instance_id = Some(InstanceId::generate());
        let mut old = Provenance::new(OwnerId::new("someone-else"), at(1));
        old.record_trade(OwnerId::new("third"), at(2));
        card.provenance = Some(old);

        let stamped = ProvenanceStamp::new(OwnerId::new("vault-1"), at(100)).apply(card);

        assert_eq!(stamped.instance_id, None);
        assert_eq!(stamped.catalog_id.as_ref().map(|id| id.as_str()), Some("dom-168"));
        let provenance = stamped.provenance.expect("provenance");
        assert_eq!(provenance.owner, OwnerId::new("vault-1"));
        assert_eq!(provenance.acquired_at, at(100));
        assert!(provenance.trades.is_empty());
    }

    #[test]
    fn trade_moves_owner() {
        let mut provenance = Provenance::new(OwnerId::new("a"), at(1));
        provenance.record_trade(OwnerId::new("b"), at(5));
        assert_eq!(provenance.owner, OwnerId::new("b"));
        assert_eq!(
            provenance.trades,
            vec![TradeRecord {
                from: OwnerId::new("a"),
                to: OwnerId::new("b"),
                at: at(5),
            }]
        );
    }
}
