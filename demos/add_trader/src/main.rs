//! Add Trader Example
//!
//! Loads the trader package under `db/`, runs it through the mod lifecycle
//! against a fresh set of host tables and prints what was registered.
//!
//! Usage: `add_trader [config.ron]`. Set `RUST_LOG=debug` for every write.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tradepost_core::{DatabaseTables, LanguageCode, LocaleField};
use tradepost_registrar::{AddTraderMod, Host, ModLoader, RegistrarConfig};
use tradepost_script::Loader;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LANGUAGES: [&str; 3] = ["en", "fr", "ru"];

fn main() -> Result<()> {
    setup_logging();

    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| root.join("config.ron"));
    let config = RegistrarConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let mut loader = Loader::new();
    loader
        .load_directory(root.join("db"))
        .context("loading trader packages")?;
    let packages = loader.finish();
    tracing::info!(count = packages.len(), "trader packages loaded");

    let mut mods = ModLoader::new();
    for package in packages {
        mods.register(AddTraderMod::new(package, &config));
    }

    let mut host = Host::new(DatabaseTables::with_languages(LANGUAGES));
    mods.run(&mut host)?;

    println!("=== Tradepost Add Trader Example ===\n");
    for (id, record) in &host.tables.traders {
        println!("Trader {} ({})", id, record.base.nickname);
        for schedule in host.trader_config.schedules_for(id) {
            println!(
                "  refresh every {}..{} seconds",
                schedule.seconds.min(),
                schedule.seconds.max()
            );
        }
        for (root, costs) in &record.assort.barter_scheme {
            let level = record.assort.loyalty_level_of(root).unwrap_or_default();
            let price: f64 = costs.iter().map(|c| c.count).sum();
            println!("  offer {} at loyalty {} for {} roubles", root, level, price);
        }
        println!("  {} items in assortment", record.assort.items.len());

        let en = LanguageCode::new("en");
        if let Some(name) = host.tables.locales.get(&en, &LocaleField::FullName.key(id)) {
            println!("  en FullName: {}", name);
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG`
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
