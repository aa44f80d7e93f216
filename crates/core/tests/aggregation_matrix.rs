use vaultbinder_core::{
    build_view, filter, group, group_key, stack, CardRecord, Color, DisplayEntry, FilterConfig,
    GroupKey, RandomSource, Rarity, RngState, SortClass,
};

macro_rules! weight_case {
    ($name:ident, $colors:expr, $type_line:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let mut card = CardRecord::new("Probe").with_colors(&$colors);
            if let Some(line) = $type_line {
                card = card.with_type_line(line);
            }
            assert_eq!(SortClass::of(&card).weight(), $expected);
        }
    };
}

weight_case!(weight_white, [Color::White], None::<&str>, 1);
weight_case!(weight_blue, [Color::Blue], None::<&str>, 2);
weight_case!(weight_black, [Color::Black], None::<&str>, 3);
weight_case!(weight_red, [Color::Red], None::<&str>, 4);
weight_case!(weight_green, [Color::Green], None::<&str>, 5);
weight_case!(weight_two_colors, [Color::Blue, Color::Black], None::<&str>, 6);
weight_case!(
    weight_five_colors,
    [Color::White, Color::Blue, Color::Black, Color::Red, Color::Green],
    None::<&str>,
    6
);
weight_case!(weight_colorless, [], Some("Artifact"), 7);
weight_case!(weight_basic_land, [], Some("Basic Land — Forest"), 8);
weight_case!(weight_colored_land, [Color::Green], Some("Land"), 8);
weight_case!(weight_land_creature, [Color::Green], Some("Land Creature — Forest Dryad"), 8);
weight_case!(weight_lowercase_land, [], Some("snow land"), 8);

macro_rules! group_key_case {
    ($name:ident, $mode:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let card = CardRecord::new("Tarmogoyf")
                .with_colors(&[Color::Green])
                .with_mana_value(2.0)
                .with_type_line("Creature — Lhurgoyf")
                .with_set("mh2")
                .with_rarity(Rarity::Mythic);
            assert_eq!(group_key(&card, $mode), $expected);
        }
    };
}

group_key_case!(group_key_name, GroupKey::Name, "Tarmogoyf");
group_key_case!(group_key_mana_value, GroupKey::ManaValue, "2");
group_key_case!(group_key_type, GroupKey::Type, "Creature");
group_key_case!(group_key_set, GroupKey::Set, "mh2");
group_key_case!(group_key_rarity, GroupKey::Rarity, "mythic");

fn collection() -> Vec<CardRecord> {
    vec![
        CardRecord::new("Forest")
            .with_catalog_id("m21-274")
            .with_type_line("Basic Land — Forest")
            .with_set("m21"),
        CardRecord::new("Llanowar Elves")
            .with_catalog_id("dom-168")
            .with_colors(&[Color::Green])
            .with_rarity(Rarity::Common)
            .with_mana_value(1.0)
            .with_type_line("Creature — Elf Druid")
            .with_set("dom"),
        CardRecord::new("Forest")
            .with_catalog_id("m21-274")
            .with_type_line("Basic Land — Forest")
            .with_set("m21"),
        CardRecord::new("Counterspell")
            .with_catalog_id("mh2-267")
            .with_colors(&[Color::Blue])
            .with_rarity(Rarity::Uncommon)
            .with_mana_value(2.0)
            .with_type_line("Instant")
            .with_set("mh2"),
        CardRecord::new("Sol Ring")
            .with_catalog_id("c21-263")
            .with_rarity(Rarity::Uncommon)
            .with_mana_value(1.0)
            .with_type_line("Artifact")
            .with_set("c21"),
        CardRecord::new("Baleful Strix")
            .with_catalog_id("pc2-82")
            .with_colors(&[Color::Blue, Color::Black])
            .with_rarity(Rarity::Uncommon)
            .with_mana_value(2.0)
            .with_type_line("Artifact Creature — Bird")
            .with_set("pc2"),
        CardRecord::new("Llanowar Elves")
            .with_catalog_id("m19-314")
            .with_colors(&[Color::Green])
            .with_rarity(Rarity::Common)
            .with_mana_value(1.0)
            .with_type_line("Creature — Elf Druid")
            .with_set("m19"),
        CardRecord::new("Swords to Plowshares")
            .with_colors(&[Color::White])
            .with_rarity(Rarity::Uncommon)
            .with_mana_value(1.0)
            .with_type_line("Instant"),
        CardRecord::new("Dockside Extortionist")
            .with_catalog_id("c19-24")
            .with_colors(&[Color::Red])
            .with_rarity(Rarity::Rare)
            .with_mana_value(2.0)
            .with_type_line("Creature — Goblin Pirate")
            .with_set("c19"),
    ]
}

fn shuffled(mut cards: Vec<CardRecord>, seed: u64) -> Vec<CardRecord> {
    let mut rng = RngState::from_seed(seed);
    for idx in (1..cards.len()).rev() {
        let swap = rng.pick_index(idx + 1);
        cards.swap(idx, swap);
    }
    cards
}

fn stack_keys(cards: Vec<CardRecord>) -> Vec<String> {
    stack(cards).into_iter().map(|s| s.key).collect()
}

fn stack_names(cards: Vec<CardRecord>) -> Vec<String> {
    stack(cards)
        .iter()
        .map(|s| s.representative().name.clone())
        .collect()
}

#[test]
fn filter_is_idempotent() {
    let configs = [
        FilterConfig::default(),
        FilterConfig::default().with_name("el"),
        FilterConfig::default()
            .toggle_color(Color::Green)
            .toggle_color(Color::Blue),
        FilterConfig::default().toggle_rarity(Rarity::Uncommon),
        FilterConfig::default()
            .toggle_color(Color::Blue)
            .toggle_rarity(Rarity::Uncommon)
            .with_name("s"),
    ];
    for config in &configs {
        let once = filter(collection(), config);
        let twice = filter(once.clone(), config);
        assert_eq!(once, twice);
    }
}

#[test]
fn filter_or_semantics_example() {
    let cards = vec![
        CardRecord::new("Blue").with_colors(&[Color::Blue]),
        CardRecord::new("Esper").with_colors(&[Color::White, Color::Blue, Color::Black]),
        CardRecord::new("Black").with_colors(&[Color::Black]),
    ];
    let config = FilterConfig::default()
        .toggle_color(Color::White)
        .toggle_color(Color::Blue);
    let kept: Vec<String> = filter(cards, &config).into_iter().map(|c| c.name).collect();
    assert_eq!(kept, vec!["Blue", "Esper"]);
}

#[test]
fn stacking_accounts_for_every_card() {
    for seed in 0..8 {
        let cards = shuffled(collection(), seed);
        let total = cards.len();
        let stacks = stack(cards);
        assert_eq!(stacks.iter().map(|s| s.quantity()).sum::<usize>(), total);
        assert!(stacks.iter().all(|s| s.quantity() >= 1));
    }
}

#[test]
fn stacking_order_ignores_input_order() {
    let expected = stack_keys(collection());
    assert_eq!(
        expected,
        vec![
            "Swords to Plowshares",
            "mh2-267",
            "c19-24",
            "dom-168",
            "m19-314",
            "pc2-82",
            "c21-263",
            "m21-274",
        ]
    );
    // Same-name printings tie and keep input order, so compare names.
    let names = stack_names(collection());
    for seed in 1..16 {
        assert_eq!(stack_names(shuffled(collection(), seed)), names);
    }
}

#[test]
fn grouping_covers_every_stack_once() {
    for mode in [
        GroupKey::Name,
        GroupKey::ManaValue,
        GroupKey::Type,
        GroupKey::Set,
        GroupKey::Rarity,
    ] {
        let stacks = stack(collection());
        let mut expected: Vec<String> = stacks.iter().map(|s| s.key.clone()).collect();
        let mut seen: Vec<String> = Vec::new();
        for entry in group(stacks, mode) {
            match entry {
                DisplayEntry::Single { card, .. } => seen.push(card.identity_key().to_string()),
                DisplayEntry::Group(group) => {
                    assert!(group.stacks.len() > 1, "{mode:?} kept a one-stack group");
                    seen.extend(group.stacks.into_iter().map(|s| s.key));
                }
            }
        }
        expected.sort();
        seen.sort();
        assert_eq!(seen, expected, "{mode:?}");
    }
}

#[test]
fn grouping_by_name_merges_printings() {
    let view = build_view(collection(), &FilterConfig::default());
    assert_eq!(view.total_cards, 9);
    let elves = view
        .entries
        .iter()
        .find_map(|entry| match entry {
            DisplayEntry::Group(group) if group.key == "Llanowar Elves" => Some(group),
            _ => None,
        })
        .expect("elves group");
    assert_eq!(elves.stacks.len(), 2);
    let forest = view
        .entries
        .iter()
        .find_map(|entry| match entry {
            DisplayEntry::Single { card, quantity } if card.name == "Forest" => Some(*quantity),
            _ => None,
        })
        .expect("forest entry");
    assert_eq!(forest, 2);
}

#[test]
fn grouping_by_rarity_keeps_global_order() {
    let view = build_view(
        collection(),
        &FilterConfig::default().with_group_by(GroupKey::Rarity),
    );
    let labels: Vec<String> = view
        .entries
        .iter()
        .map(|entry| match entry {
            DisplayEntry::Single { card, .. } => card.name.clone(),
            DisplayEntry::Group(group) => group.key.clone(),
        })
        .collect();
    assert_eq!(labels, vec!["uncommon", "Dockside Extortionist", "common", "Forest"]);
}
