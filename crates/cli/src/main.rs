use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vaultbinder_core::{
    build_view, filter, grant_packs, pack_summary, stack_by_name, BinderView, CardRecord,
    CatalogIndex, CollectionStore, Color, DisplayEntry, EventBus, FilterConfig, GroupKey,
    MemoryCollection, OwnerId, PackError, PackOpener, PackResults, Rarity, RngState,
};
use vaultbinder_data::{load_catalog, load_pack_rule, load_vault, save_vault};

const LOG_ENV: &str = "VAULTBINDER_LOG";
const OWNER_ENV: &str = "VAULTBINDER_OWNER";
const DEFAULT_VAULT: &str = "vault.json";
const DEFAULT_ASSETS: &str = "assets";
const DEFAULT_OWNER: &str = "me";
const CATALOG_DIR: &str = "catalog";

#[derive(Debug, Clone)]
struct CliOptions {
    vault: PathBuf,
    assets: PathBuf,
    owner: OwnerId,
    seed: Option<u64>,
    json: bool,
    command: Command,
}

#[derive(Debug, Clone)]
enum Command {
    Help,
    Binder { filter: FilterConfig, decklist: bool },
    Packs,
    Open { selector: Option<String> },
    Grant { set_code: String, owners: Vec<OwnerId> },
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut vault = PathBuf::from(DEFAULT_VAULT);
    let mut assets = PathBuf::from(DEFAULT_ASSETS);
    let mut owner = std::env::var(OWNER_ENV).unwrap_or_else(|_| DEFAULT_OWNER.to_string());
    let mut seed = None;
    let mut json = false;
    let mut help = false;
    let mut decklist = false;
    let mut config = FilterConfig::default();
    let mut positional: Vec<String> = Vec::new();
    let mut idx = 0usize;
    while idx < args.len() {
        let arg = args[idx].as_str();
        let value = || {
            args.get(idx + 1)
                .cloned()
                .ok_or_else(|| format!("{arg} needs a value"))
        };
        match arg {
            "--vault" => {
                vault = PathBuf::from(value()?);
                idx += 1;
            }
            "--assets" => {
                assets = PathBuf::from(value()?);
                idx += 1;
            }
            "--owner" => {
                owner = value()?;
                idx += 1;
            }
            "--seed" => {
                let raw = value()?;
                seed = Some(
                    raw.parse::<u64>()
                        .map_err(|_| format!("invalid seed {raw}"))?,
                );
                idx += 1;
            }
            "--name" | "-n" => {
                config = config.with_name(value()?);
                idx += 1;
            }
            "--color" | "-c" => {
                let raw = value()?;
                let color = Color::from_symbol(&raw)
                    .ok_or_else(|| format!("unknown color {raw} (use W, U, B, R or G)"))?;
                config = config.toggle_color(color);
                idx += 1;
            }
            "--rarity" | "-r" => {
                let raw = value()?;
                let rarity =
                    Rarity::from_name(&raw).ok_or_else(|| format!("unknown rarity {raw}"))?;
                config = config.toggle_rarity(rarity);
                idx += 1;
            }
            "--group" | "-g" => {
                config = config.with_group_by(GroupKey::from_keyword_or_default(&value()?));
                idx += 1;
            }
            "--decklist" => decklist = true,
            "--json" => json = true,
            "--help" | "-h" => help = true,
            other if other.starts_with('-') => return Err(format!("unknown option {other}")),
            other => positional.push(other.to_string()),
        }
        idx += 1;
    }

    let mut rest = positional.into_iter();
    let command = match rest.next().as_deref() {
        _ if help => Command::Help,
        None | Some("help") => Command::Help,
        Some("binder") => Command::Binder {
            filter: config,
            decklist,
        },
        Some("packs") => Command::Packs,
        Some("open") => Command::Open {
            selector: rest.next(),
        },
        Some("grant") => {
            let set_code = rest
                .next()
                .ok_or_else(|| "grant needs a set code".to_string())?;
            Command::Grant {
                set_code,
                owners: rest.map(OwnerId::new).collect(),
            }
        }
        Some(other) => return Err(format!("unknown command {other}")),
    };

    Ok(CliOptions {
        vault,
        assets,
        owner: OwnerId::new(owner),
        seed,
        json,
        command,
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("run `vaultbinder help` for usage");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(&options) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(options: &CliOptions) -> Result<(), String> {
    match &options.command {
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Binder { filter, decklist } => show_binder(options, filter, *decklist),
        Command::Packs => show_packs(options),
        Command::Open { selector } => open_command(options, selector.as_deref()),
        Command::Grant { set_code, owners } => grant_command(options, set_code, owners),
    }
}

fn load_store(options: &CliOptions) -> Result<MemoryCollection, String> {
    load_vault(&options.vault).map_err(|err| format!("{err:#}"))
}

fn store_vault(options: &CliOptions, store: &MemoryCollection) -> Result<(), String> {
    save_vault(&options.vault, store).map_err(|err| format!("{err:#}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{raw}");
    Ok(())
}

fn log_events(events: &mut EventBus) {
    for event in events.drain() {
        tracing::info!(?event, "vault event");
    }
}

fn show_binder(options: &CliOptions, config: &FilterConfig, decklist: bool) -> Result<(), String> {
    let store = load_store(options)?;
    let cards = store
        .cards(&options.owner)
        .map_err(|err| err.to_string())?;

    if decklist {
        let stacks = stack_by_name(filter(cards, config));
        if options.json {
            return print_json(&stacks);
        }
        for stack in &stacks {
            println!("{} {}", stack.quantity(), stack.key);
        }
        return Ok(());
    }

    let view = build_view(cards, config);
    if options.json {
        return print_json(&view);
    }
    print_view(&view);
    Ok(())
}

fn describe(card: &CardRecord) -> String {
    let mut out = card.name.clone();
    if let Some(set) = &card.set_code {
        out.push_str(&format!(" [{}]", set.to_uppercase()));
    }
    if let Some(rarity) = card.rarity {
        out.push_str(&format!(" {}", rarity.label()));
    }
    out
}

fn print_view(view: &BinderView) {
    for entry in &view.entries {
        match entry {
            DisplayEntry::Single { card, quantity } => {
                println!("{quantity:>3}x {}", describe(card));
            }
            DisplayEntry::Group(group) => {
                println!("{} ({} cards)", group.key, entry.card_count());
                for stack in &group.stacks {
                    println!("    {:>3}x {}", stack.quantity(), describe(stack.representative()));
                }
            }
        }
    }
    println!("{} cards", view.total_cards);
}

fn show_packs(options: &CliOptions) -> Result<(), String> {
    let store = load_store(options)?;
    let packs = store
        .packs(&options.owner)
        .map_err(|err| err.to_string())?;
    let summary = pack_summary(&packs);
    if options.json {
        return print_json(&summary);
    }
    if summary.is_empty() {
        println!("no unopened packs");
        return Ok(());
    }
    for entry in &summary {
        println!("{:>3}x {}", entry.count, entry.set_code.to_uppercase());
    }
    Ok(())
}

/// `selector` is a pack id or a set code; without one the oldest pack opens.
fn open_command(options: &CliOptions, selector: Option<&str>) -> Result<(), String> {
    let mut store = load_store(options)?;
    let packs = store
        .packs(&options.owner)
        .map_err(|err| err.to_string())?;
    let pack = match selector {
        None => packs.first(),
        Some(selector) => packs
            .iter()
            .find(|pack| pack.id.to_string() == selector)
            .or_else(|| {
                packs
                    .iter()
                    .find(|pack| pack.set_code.eq_ignore_ascii_case(selector))
            }),
    }
    .ok_or_else(|| "no matching unopened pack".to_string())?;
    let pack_id = pack.id;

    let catalog =
        load_catalog(&options.assets.join(CATALOG_DIR)).map_err(|err| format!("{err:#}"))?;
    let rule = load_pack_rule(&options.assets).map_err(|err| format!("{err:#}"))?;
    let mut rng = match options.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    };
    tracing::debug!(seed = rng.seed(), "pack rng ready");

    let mut events = EventBus::default();
    let result = PackOpener::new(&catalog, rule).open(
        &mut store,
        &options.owner,
        pack_id,
        &mut rng,
        Utc::now(),
        &mut events,
    );
    log_events(&mut events);

    let opened = match result {
        Ok(opened) => opened,
        Err(err @ PackError::PackRemovalFailure { .. }) => {
            store_vault(options, &store)?;
            return Err(err.to_string());
        }
        Err(err) => return Err(err.to_string()),
    };
    store_vault(options, &store)?;

    let results = PackResults::from_cards(&opened.cards);
    if options.json {
        return print_json(&results);
    }
    println!(
        "opened {} ({} cards)",
        opened.pack.name,
        results.len()
    );
    for tier in &results.tiers {
        println!("{}:", tier.label());
        for card in &tier.cards {
            println!("  {}", describe(card));
        }
    }
    Ok(())
}

fn grant_command(options: &CliOptions, set_code: &str, owners: &[OwnerId]) -> Result<(), String> {
    let catalog =
        load_catalog(&options.assets.join(CATALOG_DIR)).map_err(|err| format!("{err:#}"))?;
    catalog
        .index_for_set(set_code)
        .map_err(|err| err.to_string())?;

    let mut store = load_store(options)?;
    let owners = if owners.is_empty() {
        vec![options.owner.clone()]
    } else {
        owners.to_vec()
    };
    for owner in &owners {
        store.add_owner(owner.clone());
    }
    let mut events = EventBus::default();
    let granted =
        grant_packs(&mut store, &owners, set_code, &mut events).map_err(|err| err.to_string())?;
    log_events(&mut events);
    store_vault(options, &store)?;
    println!("granted {granted} {} pack(s)", set_code.to_uppercase());
    Ok(())
}

fn print_help() {
    println!("usage: vaultbinder [options] <command>");
    println!();
    println!("Commands:");
    println!("  binder                   show the collection binder");
    println!("  packs                    list unopened packs per set");
    println!("  open [pack-id|set]       open one pack (oldest by default)");
    println!("  grant <set> [owners...]  give each owner one booster");
    println!("  help                     show this help");
    println!();
    println!("Options:");
    println!("  --vault <path>           vault snapshot (default {DEFAULT_VAULT})");
    println!("  --assets <dir>           catalog and pack rule dir (default {DEFAULT_ASSETS})");
    println!("  --owner <id>             collection owner (default ${OWNER_ENV} or {DEFAULT_OWNER})");
    println!("  --seed <n>               fixed seed for pack opening");
    println!("  --json                   print JSON instead of text");
    println!();
    println!("Binder filters:");
    println!("  -n, --name <text>        name contains text, ignoring case");
    println!("  -c, --color <W|U|B|R|G>  toggle a color (any selected color matches)");
    println!("  -r, --rarity <rarity>    toggle a rarity");
    println!("  -g, --group <key>        name, cmc, type, set or rarity");
    println!("  --decklist               one line per card name");
    println!();
    println!("Set {LOG_ENV} (e.g. debug) to see log output.");
}
