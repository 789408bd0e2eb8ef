use std::io;
use std::time::Duration;

use picnav::{
    cli::Cli,
    config::{Config, get_app_data_prefix},
    dump::dump_page,
    logging::{self, LogLevel},
    remote::HttpRemote,
    settings::Settings,
    ui::viewer::Viewer,
    zoom::ZoomNavigator,
};

use clap::Parser;
use eyre::{Result, eyre};
use tracing::warn;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = get_app_data_prefix()
        .ok()
        .and_then(|dir| logging::init(LogLevel::from_verbosity(cli.verbose, cli.debug), &dir));

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path.clone()),
        None => Config::new(),
    };
    let mut settings = match loaded {
        Ok(config) => config.settings,
        Err(err) => {
            eprintln!("Warning: Could not load configuration: {}", err);
            eprintln!("Starting with default settings");
            warn!(error = %err, "Falling back to default settings");
            Settings::default()
        }
    };

    if let Some(server) = &cli.server {
        settings.server_url = server.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        settings.max_display_pages = max_pages.max(1);
    }

    if let Some(page) = cli.dump {
        return dump_content(&settings, page);
    }

    let zoom_index = match &cli.zoom {
        Some(location) => Some(
            ZoomNavigator::from_location(location, 0)
                .map(|zoom| zoom.curr_pic())
                .ok_or_else(|| eyre!("not a zoom location: {location}"))?,
        ),
        None => None,
    };

    let mut viewer = Viewer::new(settings)?;
    viewer.run(zoom_index)
}

fn dump_content(settings: &Settings, page: u32) -> Result<()> {
    let remote = HttpRemote::new(
        &settings.server_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    dump_page(&remote, page, &mut out)
}
