use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hireflow::core::catalog::OptionCatalog;
use hireflow::core::config::{self, CliOverrides, ResolvedConfig, StartupNote};
use hireflow::core::notify::LogNotifier;
use hireflow::core::store::{self, MemoryStore, RecordStore};
use hireflow::core::{Action, App, update};
use hireflow::{ListFilter, Screen, SortColumn, tui};
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "hireflow", about = "Multi-step job application form and listing")]
struct Args {
    /// Records per page in the listing
    #[arg(long)]
    page_size: Option<usize>,

    /// Option catalog (TOML) to use instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Screen to open on
    #[arg(long, default_value_t, value_enum)]
    screen: Screen,

    /// Initial sort column
    #[arg(long, value_enum)]
    sort: Option<SortColumn>,

    /// Initial status filter
    #[arg(long, default_value_t, value_enum)]
    filter: ListFilter,

    /// Print the first page of records as JSON and exit
    #[arg(long)]
    list: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Held until the logger exists
    let mut notes = Vec::new();
    let file_config = match config::load_config(&mut notes) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Ignoring config file: {e}");
            notes.push(StartupNote::new(
                log::Level::Warn,
                format!("Ignoring config file: {e}"),
            ));
            None
        }
    };
    let cli = CliOverrides {
        page_size: args.page_size,
        catalog: args.catalog.clone(),
        sort: args.sort.map(Into::into),
    };
    let config = config::resolve(&file_config.unwrap_or_default(), &cli, &mut notes);

    // Initialize file logger - the terminal belongs to the UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }

    log::info!("Hireflow starting up (page size {})", config.page_size);
    config::replay_notes(&notes);

    let catalog = Arc::new(load_catalog(&config)?);
    let mut store = if config.seed_demo_records {
        MemoryStore::with_records(store::demo_records(&catalog))
    } else {
        MemoryStore::new()
    };

    if args.list {
        return print_listing(&config, catalog, &store, args.filter);
    }

    tui::run(&config, catalog, &mut store, args.screen, args.filter.into())
}

fn load_catalog(config: &ResolvedConfig) -> std::io::Result<OptionCatalog> {
    match &config.catalog_path {
        Some(path) => OptionCatalog::load(path).map_err(|e| {
            log::warn!("Catalog {} rejected: {}", path.display(), e);
            std::io::Error::new(std::io::ErrorKind::InvalidData, e)
        }),
        None => Ok(OptionCatalog::builtin()),
    }
}

fn print_listing(
    config: &ResolvedConfig,
    catalog: Arc<OptionCatalog>,
    store: &MemoryStore,
    filter: ListFilter,
) -> std::io::Result<()> {
    let mut app = App::from_config(catalog, config, Box::new(LogNotifier::new(false)));
    update(&mut app, Action::RecordsLoaded(store.snapshot()));
    update(&mut app, Action::SetFilter(filter.into()));

    let page = app.listing.derive();
    let json = serde_json::to_string_pretty(&page)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    println!("{json}");
    Ok(())
}
