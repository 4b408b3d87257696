//! Command-line and environment configuration.

use std::path::{Path, PathBuf};

use clap::Parser;

/// Build a setlist for a show and export it as a share card.
#[derive(Debug, Clone, Parser)]
#[command(name = "setlist-sequence", version)]
pub struct Cli {
    /// Artist id to open (falls back to the catalog default)
    #[arg(short, long, env = "SETLIST_ARTIST")]
    pub artist: Option<String>,

    /// Show id to open (falls back to the catalog default)
    #[arg(short, long, env = "SETLIST_SHOW")]
    pub show: Option<String>,

    /// Catalog JSON to use instead of the bundled one
    #[arg(short, long, env = "SETLIST_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Where share exports are written (default: <data dir>/exports)
    #[arg(short, long, env = "SETLIST_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Folder holding artist logos and backgrounds
    #[arg(long, env = "SETLIST_ASSET_DIR")]
    pub asset_dir: Option<PathBuf>,

    /// Print every artist/show in the catalog and exit
    #[arg(short, long)]
    pub list: bool,
}

/// Resolved runtime locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub export_dir: PathBuf,
    pub asset_dir: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn resolve(cli: &Cli, data_dir: &Path) -> Self {
        Self {
            export_dir: cli
                .export_dir
                .clone()
                .unwrap_or_else(|| data_dir.join("exports")),
            asset_dir: cli.asset_dir.clone(),
            log_file: data_dir.join("setlist-sequence.log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_selection() {
        let cli = Cli::try_parse_from([
            "setlist-sequence",
            "--artist",
            "harbor-lights",
            "-s",
            "portland-2025",
        ])
        .unwrap();
        assert_eq!(cli.artist.as_deref(), Some("harbor-lights"));
        assert_eq!(cli.show.as_deref(), Some("portland-2025"));
        assert!(!cli.list);
    }

    #[test]
    fn export_dir_defaults_under_data_dir() {
        let cli = Cli::try_parse_from(["setlist-sequence", "--list"]).unwrap();
        let paths = AppPaths::resolve(&cli, Path::new("/home/fan/.setlist-sequence"));
        assert!(cli.list);
        assert_eq!(
            paths.export_dir,
            Path::new("/home/fan/.setlist-sequence").join("exports")
        );
        assert_eq!(
            paths.log_file,
            Path::new("/home/fan/.setlist-sequence").join("setlist-sequence.log")
        );
    }

    #[test]
    fn explicit_export_dir_wins() {
        let cli =
            Cli::try_parse_from(["setlist-sequence", "--export-dir", "/tmp/out"]).unwrap();
        let paths = AppPaths::resolve(&cli, Path::new("/data"));
        assert_eq!(paths.export_dir, PathBuf::from("/tmp/out"));
    }
}
