use log::{info, warn};
use rand::Rng;

use crate::delay_manager::DelayPolicy;
use crate::driver::{smooth_scroll, PageDriver};
use crate::errors::{DriverError, ScrapeError};
use crate::extractor::{Extractor, ProfileData};

/// Result of visiting one profile: a populated record, or a skip with the
/// reason. Skips are collected, never fatal; every skipped URL is already in
/// the recovery file and can be revisited in a later run.
#[derive(Debug)]
pub enum ProfileOutcome {
    Scraped(ProfileData),
    Skipped { url: String, reason: String },
}

/// Visits each collected profile URL in discovery order and extracts the
/// field set. One browser page at a time, strictly sequential.
pub struct ProfileScraper {
    extractor: Extractor,
}

impl ProfileScraper {
    pub fn new(current_year: i32) -> Self {
        ProfileScraper {
            extractor: Extractor::new(current_year),
        }
    }

    /// Per-profile failure policy: an unparseable profile is logged and
    /// skipped. Session-level failures (browser gone, account flagged) abort
    /// the batch immediately.
    pub fn scrape_all(
        &self,
        driver: &dyn PageDriver,
        delays: &DelayPolicy,
        urls: &[String],
    ) -> Result<Vec<ProfileOutcome>, ScrapeError> {
        let mut outcomes = Vec::with_capacity(urls.len());

        for (ct, url) in urls.iter().enumerate() {
            info!("Profile {} / {}: {}", ct + 1, urls.len(), url);

            match self.scrape_profile(driver, delays, url) {
                Ok(profile) => outcomes.push(ProfileOutcome::Scraped(profile)),
                Err(ScrapeError::Extraction { url, reason }) => {
                    warn!("Skipping {}: {}", url, reason);
                    outcomes.push(ProfileOutcome::Skipped { url, reason });
                }
                Err(fatal) => return Err(fatal),
            }
        }

        Ok(outcomes)
    }

    fn scrape_profile(
        &self,
        driver: &dyn PageDriver,
        delays: &DelayPolicy,
        url: &str,
    ) -> Result<ProfileData, ScrapeError> {
        delays.wait(rand::thread_rng().gen_bool(0.5));
        driver.navigate(url).map_err(|err| match err {
            DriverError::Session(msg) => ScrapeError::SessionTerminated(msg),
            other => ScrapeError::Extraction {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })?;

        delays.pause();
        let html = driver.page_source().map_err(ScrapeError::session)?;

        // Idle on roughly half the profiles with a partial scroll, so page
        // dwell behavior is not uniform.
        if rand::thread_rng().gen_bool(0.5) {
            let page_height = driver.page_height().map_err(ScrapeError::session)?;
            let target = delays.sample_random_scroll(page_height);
            smooth_scroll(driver, delays, target).map_err(ScrapeError::session)?;
        }

        self.extractor.extract_profile(&html, url)
    }
}
