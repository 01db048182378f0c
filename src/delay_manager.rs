use std::thread;
use std::time::Duration;

use log::debug;
use rand::Rng;

/// Human-timing configuration for every pause and scroll in the run.
///
/// All waits are sampled uniformly from inclusive ranges so that no two
/// interactions land on the same cadence. `Default` carries the production
/// values; [`DelayPolicy::instant`] zeroes every wait for tests and dry runs.
#[derive(Debug, Clone)]
pub struct DelayPolicy {
    /// Pause before a click, in seconds.
    pub short_wait: (f64, f64),
    /// Pause between page interactions, in seconds.
    pub medium_wait: (f64, f64),
    /// Occasional longer pause, in seconds.
    pub long_wait: (f64, f64),
    /// Every this-many expansion clicks, take a long wait instead of a
    /// medium one. Resampled after each long wait.
    pub clicks_long_wait: (u32, u32),
    /// Pixel step per scroll increment.
    pub scroll_step: (i64, i64),
    /// Pause between scroll increments, in seconds.
    pub short_scroll_delay: (f64, f64),
    /// Longer pause inserted every few scroll increments, in seconds.
    pub long_scroll_delay: (f64, f64),
    /// Every this-many scroll increments, take the longer scroll delay.
    pub scrolls_long_delay: (u32, u32),
    /// Fraction of page height for a partial pre-click scroll.
    pub partial_scroll: (f64, f64),
    /// Fraction of page height for a random scroll on a profile page.
    pub random_scroll: (f64, f64),
    /// How long the driver waits for an element before reporting a timeout.
    pub element_wait: Duration,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy {
            short_wait: (0.1, 0.4),
            medium_wait: (2.0, 4.0),
            long_wait: (4.0, 8.0),
            clicks_long_wait: (10, 20),
            scroll_step: (50, 200),
            short_scroll_delay: (0.05, 0.1),
            long_scroll_delay: (0.2, 0.4),
            scrolls_long_delay: (3, 12),
            partial_scroll: (0.6, 0.8),
            random_scroll: (0.2, 0.8),
            element_wait: Duration::from_secs(10),
        }
    }
}

impl DelayPolicy {
    /// Zero-wait policy. Keeps scroll geometry but removes all sleeps, so the
    /// pipeline can be exercised without real-time pauses.
    pub fn instant() -> Self {
        DelayPolicy {
            short_wait: (0.0, 0.0),
            medium_wait: (0.0, 0.0),
            long_wait: (0.0, 0.0),
            short_scroll_delay: (0.0, 0.0),
            long_scroll_delay: (0.0, 0.0),
            element_wait: Duration::from_millis(10),
            ..DelayPolicy::default()
        }
    }

    pub fn short_pause(&self) {
        sleep_range(self.short_wait);
    }

    pub fn pause(&self) {
        self.wait(false);
    }

    pub fn long_pause(&self) {
        self.wait(true);
    }

    /// Medium pause, or a long one when `long` is set.
    pub fn wait(&self, long: bool) {
        let range = if long { self.long_wait } else { self.medium_wait };
        sleep_range(range);
    }

    pub fn scroll_delay(&self, long: bool) {
        let range = if long {
            self.long_scroll_delay
        } else {
            self.short_scroll_delay
        };
        sleep_range(range);
    }

    pub fn sample_scroll_step(&self) -> i64 {
        let mut rng = rand::thread_rng();
        rng.gen_range(self.scroll_step.0..=self.scroll_step.1)
    }

    /// Number of expansion clicks until the next long wait.
    pub fn sample_long_wait_cadence(&self) -> u32 {
        let mut rng = rand::thread_rng();
        rng.gen_range(self.clicks_long_wait.0..=self.clicks_long_wait.1)
    }

    /// Number of scroll increments until the next long scroll delay.
    pub fn sample_long_scroll_cadence(&self) -> u32 {
        let mut rng = rand::thread_rng();
        rng.gen_range(self.scrolls_long_delay.0..=self.scrolls_long_delay.1)
    }

    pub fn sample_partial_scroll(&self, page_height: i64) -> i64 {
        sample_fraction(self.partial_scroll, page_height)
    }

    pub fn sample_random_scroll(&self, page_height: i64) -> i64 {
        sample_fraction(self.random_scroll, page_height)
    }
}

fn sample_fraction(range: (f64, f64), page_height: i64) -> i64 {
    let mut rng = rand::thread_rng();
    let fraction = rng.gen_range(range.0..=range.1);
    (fraction * page_height as f64) as i64
}

fn sleep_range(range: (f64, f64)) {
    let mut rng = rand::thread_rng();
    let secs = rng.gen_range(range.0..=range.1);
    if secs > 0.0 {
        debug!("Waiting for {:.2} seconds...", secs);
        thread::sleep(Duration::from_secs_f64(secs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_policy_has_no_waits() {
        let policy = DelayPolicy::instant();
        // Must return immediately; a regression here would stall the suite.
        policy.short_pause();
        policy.pause();
        policy.long_pause();
        policy.scroll_delay(true);
    }

    #[test]
    fn fraction_sampling_stays_within_page() {
        let policy = DelayPolicy::default();
        for _ in 0..100 {
            let offset = policy.sample_partial_scroll(1000);
            assert!((600..=800).contains(&offset));
        }
    }

    #[test]
    fn scroll_step_stays_within_bounds() {
        let policy = DelayPolicy::default();
        for _ in 0..100 {
            let step = policy.sample_scroll_step();
            assert!((50..=200).contains(&step));
        }
    }
}
