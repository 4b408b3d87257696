//! Binary entry point: resolve configuration, bring up logging and the
//! preference store, load the requested show, and drive the Ratatui event
//! loop until the user exits.
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use setlist_sequence::config::{AppPaths, Cli};
use setlist_sequence::logging::init_logging;
use setlist_sequence::{data_dir, ensure_schema, load_show, run_app, App, Catalog};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = AppPaths::resolve(&cli, &data_dir()?);
    init_logging(&paths.log_file)?;

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => Catalog::bundled().context("bundled catalog is invalid")?,
    };

    if cli.list {
        print_catalog(&catalog);
        return Ok(());
    }

    // A missing show is fatal here; the app never runs on an empty catalog.
    let session = load_show(&catalog, cli.artist.as_deref(), cli.show.as_deref())
        .context("no show to build a setlist for")?;

    let prefs = ensure_schema()?;
    let mut app = App::new(&prefs, catalog, session, paths)?;
    info!("starting setlist builder");
    run_app(&mut app)
}

fn print_catalog(catalog: &Catalog) {
    for artist in catalog.artists() {
        println!("{} ({})", artist.name, artist.id);
        for show in &artist.shows {
            println!(
                "  {:<16} {} · {} · pick {} of {}",
                show.id,
                show.date,
                show.venue,
                show.max_songs(),
                show.songs.len()
            );
        }
    }
}
