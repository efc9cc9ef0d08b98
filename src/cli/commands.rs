//! CLI arguments

use crate::engine::Collection;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Export a MUBI user's watchlist and ratings to CSV
#[derive(Parser, Debug)]
#[command(name = "mubi-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// MUBI user id
    pub user_id: String,

    /// Bearer token, if the collections are private
    #[arg(long, env = "MUBI_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Items requested per page [default: 24]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: Option<u32>,

    /// Value of the client-country header (e.g. NL or US) [default: NL]
    #[arg(long)]
    pub country: Option<String>,

    /// Also write Letterboxd-compatible CSV files
    #[arg(long)]
    pub letterboxd: bool,

    /// Also write the unprojected flattened CSV files
    #[arg(long)]
    pub raw: bool,

    /// Directory to write CSV files to [default: .]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Collections to export (repeatable, default: all)
    #[arg(long = "collection", value_enum)]
    pub collections: Vec<CollectionArg>,

    /// Verbose request-level logging
    #[arg(short, long)]
    pub debug: bool,
}

/// Collection names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollectionArg {
    Watchlist,
    Ratings,
}

impl From<CollectionArg> for Collection {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Watchlist => Collection::Watchlist,
            CollectionArg::Ratings => Collection::Ratings,
        }
    }
}
