use log::{info, warn};
use rand::Rng;

use crate::delay_manager::DelayPolicy;
use crate::driver::{smooth_scroll, PageDriver};
use crate::errors::{DriverError, ScrapeError};

pub const ALUMNI_URL: &str = "https://www.linkedin.com/school/mount-allison-university/people/";
const SHOW_MORE_BUTTON: &str = "button.scaffold-finite-scroll__load-button";
const MAX_CLICK_RETRIES: u32 = 3;

/// Opens the alumni listing and activates the "Show more results" control up
/// to `max_clicks` times. Returns the number of clicks actually performed.
///
/// A missing control means the list is exhausted and expansion stops early;
/// that is the natural termination condition, not an error. A click that
/// times out is retried up to [`MAX_CLICK_RETRIES`] times and then also
/// treated as exhaustion. Only session-level failures propagate.
pub fn expand_results(
    driver: &dyn PageDriver,
    delays: &DelayPolicy,
    max_clicks: u32,
) -> Result<u32, ScrapeError> {
    delays.long_pause();
    driver.navigate(ALUMNI_URL).map_err(ScrapeError::session)?;

    let mut clicks = 0;
    let mut retries = 0;
    let mut long_wait_at = delays.sample_long_wait_cadence();

    while clicks < max_clicks {
        delays.pause();
        scroll_towards_control(driver, delays)?;

        let long = (clicks + 1) % long_wait_at == 0;
        if long {
            long_wait_at = delays.sample_long_wait_cadence();
        }
        delays.wait(long);

        delays.short_pause();
        match driver.click(SHOW_MORE_BUTTON) {
            Ok(()) => {
                clicks += 1;
                retries = 0;
            }
            Err(DriverError::ElementMissing(_)) => {
                info!(
                    "\"Show more\" control gone after {} clicks; list exhausted.",
                    clicks
                );
                break;
            }
            Err(DriverError::Timeout(selector)) => {
                retries += 1;
                if retries >= MAX_CLICK_RETRIES {
                    let err = ScrapeError::ExpansionTimeout(selector);
                    warn!("{}; proceeding with what was loaded.", err);
                    break;
                }
                warn!(
                    "Expansion click timed out (attempt {} of {}); retrying.",
                    retries, MAX_CLICK_RETRIES
                );
            }
            Err(DriverError::Session(msg)) => {
                return Err(ScrapeError::SessionTerminated(msg));
            }
        }
    }

    Ok(clicks)
}

/// Scrolls towards the bottom of the list, either all the way or to a random
/// partial depth, so each approach to the control looks different.
fn scroll_towards_control(
    driver: &dyn PageDriver,
    delays: &DelayPolicy,
) -> Result<(), ScrapeError> {
    let page_height = driver.page_height().map_err(ScrapeError::session)?;
    let scrolled = driver.scroll_position().map_err(ScrapeError::session)?;

    let target = if rand::thread_rng().gen_bool(0.5) {
        page_height
    } else {
        delays.sample_partial_scroll(page_height)
    };

    smooth_scroll(driver, delays, target - scrolled).map_err(ScrapeError::session)
}
