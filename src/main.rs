use kilometre0_scraper::{MemoryStore, RecipeScraper, ScrapeError, ScraperConfig};
use log::error;
use serde::Serialize;
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: kilometre0-scraper <extract URL | import URL | scan-root [URL] | scan URL>";

enum Command {
    Extract(String),
    Import(String),
    ScanRoot(Option<String>),
    Scan(String),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Command> {
    let command = args.next()?;
    let url = args.next();
    match (command.as_str(), url) {
        ("extract", Some(url)) => Some(Command::Extract(url)),
        ("import", Some(url)) => Some(Command::Import(url)),
        ("scan-root", url) => Some(Command::ScanRoot(url)),
        ("scan", Some(url)) => Some(Command::Scan(url)),
        _ => None,
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to serialize output: {}", e),
    }
}

fn run(command: Command) -> Result<(), ScrapeError> {
    let scraper = RecipeScraper::new(ScraperConfig::load()?)?;

    match command {
        Command::Extract(url) => print_json(&scraper.extract(&url)?),
        Command::Import(url) => {
            let mut store = MemoryStore::new();
            print_json(&scraper.import(&url, &mut store)?);
        }
        Command::ScanRoot(url) => print_json(&scraper.scan_root(url.as_deref())?),
        Command::Scan(url) => print_json(&scraper.scan_category(&url)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(command) = parse_args(env::args().skip(1)) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            // Same shape the HTTP layer returns
            print_json(&e.to_body());
            ExitCode::FAILURE
        }
    }
}
