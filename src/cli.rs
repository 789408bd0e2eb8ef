use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "picnav",
    version,
    about = "Browse a paginated photo gallery server from the terminal.",
    long_about = None
)]
pub struct Cli {
    /// Gallery server base URL (overrides the configuration file)
    #[clap(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Number of page links shown in the navigation strip
    #[clap(short = 'p', long, value_name = "N")]
    pub max_pages: Option<u32>,

    /// Print one page of thumbnails and exit (defaults to the server's current page)
    #[clap(short, long, value_name = "PAGE", num_args = 0..=1, default_missing_value = "0")]
    pub dump: Option<u32>,

    /// Start in the zoom view on an item, given as an index or a `/dynamic/zoom/{index}` location
    #[clap(short, long, value_name = "LOCATION")]
    pub zoom: Option<String>,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,
}
