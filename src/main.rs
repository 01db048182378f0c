use std::env;
use std::error::Error;

use chrono::{Datelike, Local};
use log::{error, info};

use alumni_scraper_lib::delay_manager::DelayPolicy;
use alumni_scraper_lib::driver::ChromeSession;
use alumni_scraper_lib::errors::ScrapeError;
use alumni_scraper_lib::profile_scraper::{ProfileOutcome, ProfileScraper};
use alumni_scraper_lib::recovery::RecoveryLog;
use alumni_scraper_lib::{authenticator, collector, expander, logger, normalizer, writer};

const DEST: &str = "mta_alumni.csv";
const INSTITUTION: &str = "Mount Allison University";

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    let (email, password, max_clicks) = parse_args()?;

    let delays = DelayPolicy::default();
    let current_year = Local::now().year();

    // The session is owned here and torn down on every exit path, including
    // the fatal ones below.
    let session = ChromeSession::launch(delays.element_wait)
        .map_err(|e| fatal_phase("startup", ScrapeError::SessionTerminated(e.to_string())))?;

    info!("Starting alumni scrape (max {} expansion clicks)...", max_clicks);

    authenticator::sign_in(&session, &delays, &email, &password)
        .map_err(|e| fatal_phase("authentication", e))?;

    let clicks = expander::expand_results(&session, &delays, max_clicks)
        .map_err(|e| fatal_phase("expansion", e))?;
    info!("Expanded results with {} clicks.", clicks);

    let mut recovery = RecoveryLog::create().map_err(|e| fatal_phase("collection", e))?;
    let urls = collector::collect_profile_urls(&session, &mut recovery)
        .map_err(|e| fatal_phase("collection", e))?;

    let scraper = ProfileScraper::new(current_year);
    let outcomes = scraper
        .scrape_all(&session, &delays, &urls)
        .map_err(|e| fatal_phase("extraction", e))?;
    let skipped = outcomes
        .iter()
        .filter(|o| matches!(o, ProfileOutcome::Skipped { .. }))
        .count();

    let records = normalizer::normalize(outcomes, INSTITUTION, current_year as u16);
    info!(
        "Filtered down to {} records ({} profiles skipped).",
        records.len(),
        skipped
    );

    let rows = writer::write_csv(DEST, &records).map_err(|e| fatal_phase("write", e))?;
    info!("Done. {} rows in {}.", rows, DEST);
    Ok(())
}

fn parse_args() -> Result<(String, String, u32), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        error!("Usage: alumni_scraper <email> <password> <max_clicks>");
        return Err("expected exactly 3 arguments".into());
    }

    let max_clicks = args[3]
        .parse::<u32>()
        .map_err(|_| format!("max_clicks must be a non-negative integer, got '{}'", args[3]))?;

    Ok((args[1].clone(), args[2].clone(), max_clicks))
}

fn fatal_phase(phase: &str, err: ScrapeError) -> Box<dyn Error> {
    error!("{} phase failed: {}", phase, err);
    Box::new(err)
}
