use crate::{filter, stack, CardRecord, FilterConfig, GroupKey, Stack};
use serde::Serialize;
use std::collections::HashMap;

const UNKNOWN_KEY: &str = "Unknown";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LogicalGroup {
    pub key: String,
    pub stacks: Vec<Stack>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum DisplayEntry {
    Single { card: CardRecord, quantity: usize },
    Group(LogicalGroup),
}

impl DisplayEntry {
    pub fn card_count(&self) -> usize {
        match self {
            Self::Single { quantity, .. } => *quantity,
            Self::Group(group) => group.stacks.iter().map(Stack::quantity).sum(),
        }
    }
}

pub fn group_key(card: &CardRecord, group_by: GroupKey) -> String {
    match group_by {
        GroupKey::Name => card.name.clone(),
        GroupKey::ManaValue => format!("{}", card.mana_value.max(0.0).floor() as u64),
        GroupKey::Type => card
            .type_line
            .as_ref()
            .map(|line| line.primary_type().to_string())
            .unwrap_or_else(|| UNKNOWN_KEY.to_string()),
        GroupKey::Set => card
            .set_code
            .clone()
            .unwrap_or_else(|| UNKNOWN_KEY.to_string()),
        GroupKey::Rarity => card
            .rarity
            .map(|rarity| rarity.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_KEY.to_string()),
    }
}

/// Buckets already-sorted stacks by the derived key without reordering them.
pub fn partition(stacks: Vec<Stack>, group_by: GroupKey) -> Vec<LogicalGroup> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<LogicalGroup> = Vec::new();
    for stack in stacks {
        let key = group_key(stack.representative(), group_by);
        match positions.get(&key) {
            Some(&idx) => groups[idx].stacks.push(stack),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(LogicalGroup {
                    key,
                    stacks: vec![stack],
                });
            }
        }
    }
    groups
}

/// Single-stack groups become bare entries.
pub fn flatten(groups: Vec<LogicalGroup>) -> Vec<DisplayEntry> {
    groups
        .into_iter()
        .map(|mut group| {
            if group.stacks.len() == 1 {
                let stack = group.stacks.remove(0);
                let quantity = stack.quantity();
                let card = stack.into_members().swap_remove(0);
                DisplayEntry::Single { card, quantity }
            } else {
                DisplayEntry::Group(group)
            }
        })
        .collect()
}

pub fn group(stacks: Vec<Stack>, group_by: GroupKey) -> Vec<DisplayEntry> {
    flatten(partition(stacks, group_by))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BinderView {
    pub entries: Vec<DisplayEntry>,
    /// Cards left after filtering, counting every copy.
    pub total_cards: usize,
}

/// Filter, stack and group a collection for display.
pub fn build_view(cards: Vec<CardRecord>, config: &FilterConfig) -> BinderView {
    let kept = filter(cards, config);
    let total_cards = kept.len();
    let entries = group(stack(kept), config.group_by);
    tracing::debug!(
        total_cards,
        entries = entries.len(),
        group_by = ?config.group_by,
        "binder view built"
    );
    BinderView {
        entries,
        total_cards,
    }
}
