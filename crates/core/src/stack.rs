use crate::{CardRecord, Color, TypeClass};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Copies of the same printing, kept in collection order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Stack {
    pub key: String,
    members: Vec<CardRecord>,
}

impl Stack {
    fn start(key: String, first: CardRecord) -> Self {
        Self {
            key,
            members: vec![first],
        }
    }

    pub fn members(&self) -> &[CardRecord] {
        &self.members
    }

    pub fn into_members(self) -> Vec<CardRecord> {
        self.members
    }

    pub fn quantity(&self) -> usize {
        self.members.len()
    }

    /// First copy seen; stacks are never empty.
    pub fn representative(&self) -> &CardRecord {
        &self.members[0]
    }

    pub fn sort_class(&self) -> SortClass {
        SortClass::of(self.representative())
    }
}

/// Binder position class of a card, ordered W, U, B, R, G, multicolor,
/// colorless, land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortClass {
    Mono(Color),
    Multicolor,
    Colorless,
    Land,
}

impl SortClass {
    pub fn of(card: &CardRecord) -> Self {
        if card.type_class() == TypeClass::Land {
            return Self::Land;
        }
        match card.colors.as_slice() {
            [] => Self::Colorless,
            [color] => Self::Mono(*color),
            _ => Self::Multicolor,
        }
    }

    pub fn weight(self) -> u8 {
        match self {
            Self::Mono(color) => color.order(),
            Self::Multicolor => 6,
            Self::Colorless => 7,
            Self::Land => 8,
        }
    }
}

/// Case-folded comparison first, exact comparison to break ties, with
/// lowercase ahead of uppercase.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| right.cmp(left))
}

/// Collapses cards into stacks by identity key and orders them by color
/// class, then name. Equal stacks keep first-occurrence order.
pub fn stack(cards: Vec<CardRecord>) -> Vec<Stack> {
    let mut stacks = collect_stacks(cards, |card| card.identity_key().to_string());
    stacks.sort_by(|left, right| {
        left.sort_class()
            .weight()
            .cmp(&right.sort_class().weight())
            .then_with(|| compare_names(&left.representative().name, &right.representative().name))
    });
    stacks
}

/// Deck-list stacking: one stack per card name, ordered by name.
pub fn stack_by_name(cards: Vec<CardRecord>) -> Vec<Stack> {
    let mut stacks = collect_stacks(cards, |card| card.name.clone());
    stacks.sort_by(|left, right| compare_names(&left.key, &right.key));
    stacks
}

fn collect_stacks(cards: Vec<CardRecord>, key_of: impl Fn(&CardRecord) -> String) -> Vec<Stack> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut stacks: Vec<Stack> = Vec::new();
    for card in cards {
        let key = key_of(&card);
        match positions.get(&key) {
            Some(&idx) => stacks[idx].members.push(card),
            None => {
                positions.insert(key.clone(), stacks.len());
                stacks.push(Stack::start(key, card));
            }
        }
    }
    stacks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(stacks: &[Stack]) -> Vec<&str> {
        stacks.iter().map(|stack| stack.key.as_str()).collect()
    }

    #[test]
    fn weight_order_example() {
        let cards = vec![
            CardRecord::new("Command Tower").with_type_line("Land"),
            CardRecord::new("Sol Ring").with_type_line("Artifact"),
            CardRecord::new("Ponder").with_colors(&[Color::Blue]),
            CardRecord::new("Baleful Strix").with_colors(&[Color::Blue, Color::Black]),
        ];
        let stacks = stack(cards);
        assert_eq!(
            keys(&stacks),
            vec!["Ponder", "Baleful Strix", "Sol Ring", "Command Tower"]
        );
        let weights: Vec<u8> = stacks.iter().map(|s| s.sort_class().weight()).collect();
        assert_eq!(weights, vec![2, 6, 7, 8]);
    }

    #[test]
    fn colored_land_still_sorts_last() {
        let cards = vec![
            CardRecord::new("Breeding Pool")
                .with_colors(&[Color::Green, Color::Blue])
                .with_type_line("Land — Forest Island"),
            CardRecord::new("Llanowar Elves").with_colors(&[Color::Green]),
        ];
        assert_eq!(keys(&stack(cards)), vec!["Llanowar Elves", "Breeding Pool"]);
    }

    #[test]
    fn mono_colors_follow_wubrg() {
        let cards = vec![
            CardRecord::new("g").with_colors(&[Color::Green]),
            CardRecord::new("r").with_colors(&[Color::Red]),
            CardRecord::new("b").with_colors(&[Color::Black]),
            CardRecord::new("u").with_colors(&[Color::Blue]),
            CardRecord::new("w").with_colors(&[Color::White]),
        ];
        assert_eq!(keys(&stack(cards)), vec!["w", "u", "b", "r", "g"]);
    }

    #[test]
    fn copies_collapse_by_catalog_id() {
        let cards = vec![
            CardRecord::new("Forest").with_catalog_id("m21-274").with_type_line("Basic Land"),
            CardRecord::new("Forest").with_catalog_id("znr-280").with_type_line("Basic Land"),
            CardRecord::new("Forest").with_catalog_id("m21-274").with_type_line("Basic Land"),
        ];
        let stacks = stack(cards);
        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[0].key, "m21-274");
        assert_eq!(stacks[0].quantity(), 2);
        assert_eq!(stacks[1].quantity(), 1);
    }

    #[test]
    fn names_compare_case_folded() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Banana", "apple"), Ordering::Greater);
        assert_eq!(compare_names("elf", "Elf"), Ordering::Less);
        assert_eq!(compare_names("Elf", "Elf"), Ordering::Equal);
    }

    #[test]
    fn duplicate_names_keep_insertion_order() {
        let cards = vec![
            CardRecord::new("Island").with_catalog_id("b").with_colors(&[Color::Blue]),
            CardRecord::new("Island").with_catalog_id("a").with_colors(&[Color::Blue]),
        ];
        assert_eq!(keys(&stack(cards)), vec!["b", "a"]);
    }

    #[test]
    fn deck_stacks_group_by_name() {
        let cards = vec![
            CardRecord::new("Sol Ring").with_catalog_id("c21-263"),
            CardRecord::new("Arcane Signet").with_catalog_id("c21-236"),
            CardRecord::new("Sol Ring").with_catalog_id("cmr-472"),
        ];
        let stacks = stack_by_name(cards);
        assert_eq!(keys(&stacks), vec!["Arcane Signet", "Sol Ring"]);
        assert_eq!(stacks[1].quantity(), 2);
    }
}
