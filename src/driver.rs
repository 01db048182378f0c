use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use log::debug;

use crate::delay_manager::DelayPolicy;
use crate::errors::DriverError;

const USER_AGENT_OVERRIDE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/91.0.4472.124 Safari/537.36";

/// Capability surface the pipeline needs from a browser session.
///
/// Phase code depends only on this trait; the concrete automation backend is
/// an implementation detail. `exists` is an immediate lookup, `click` and
/// `read_text` wait up to the session's element timeout before failing.
pub trait PageDriver {
    fn navigate(&self, url: &str) -> Result<(), DriverError>;
    fn exists(&self, selector: &str) -> bool;
    fn click(&self, selector: &str) -> Result<(), DriverError>;
    fn type_into(&self, selector: &str, text: &str) -> Result<(), DriverError>;
    fn read_text(&self, selector: &str) -> Result<String, DriverError>;
    fn page_source(&self) -> Result<String, DriverError>;
    fn scroll_by(&self, pixels: i64) -> Result<(), DriverError>;
    fn page_height(&self) -> Result<i64, DriverError>;
    fn scroll_position(&self) -> Result<i64, DriverError>;
    fn current_url(&self) -> String;
}

/// One Chrome tab driven over the DevTools protocol.
///
/// The browser process is owned by this struct and shut down when it drops,
/// on every exit path.
pub struct ChromeSession {
    // Held for its Drop impl; all interaction goes through the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launches a visible (non-headless) browser with automation-detection
    /// countermeasures and a spoofed user agent.
    pub fn launch(element_wait: Duration) -> Result<Self, DriverError> {
        let options = LaunchOptionsBuilder::default()
            .headless(false)
            .args(vec![
                OsStr::new("--disable-blink-features=AutomationControlled"),
                OsStr::new("--no-first-run"),
                OsStr::new("--disable-infobars"),
            ])
            .build()
            .map_err(|e| DriverError::Session(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| DriverError::Session(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| DriverError::Session(e.to_string()))?;
        tab.set_default_timeout(element_wait);
        tab.set_user_agent(USER_AGENT_OVERRIDE, None, None)
            .map_err(|e| DriverError::Session(e.to_string()))?;

        Ok(ChromeSession {
            _browser: browser,
            tab,
        })
    }

    fn evaluate_i64(&self, expression: &str) -> Result<i64, DriverError> {
        let result = self
            .tab
            .evaluate(expression, false)
            .map_err(|e| DriverError::Session(e.to_string()))?;
        result
            .value
            .and_then(|v| v.as_f64())
            .map(|v| v as i64)
            .ok_or_else(|| DriverError::Session(format!("'{}' returned no number", expression)))
    }
}

impl PageDriver for ChromeSession {
    fn navigate(&self, url: &str) -> Result<(), DriverError> {
        debug!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| DriverError::Session(e.to_string()))?;
        Ok(())
    }

    fn exists(&self, selector: &str) -> bool {
        self.tab.find_element(selector).is_ok()
    }

    fn click(&self, selector: &str) -> Result<(), DriverError> {
        let element = self
            .tab
            .wait_for_element(selector)
            .map_err(|_| DriverError::Timeout(selector.to_string()))?;
        element
            .scroll_into_view()
            .and_then(|el| el.click())
            .map_err(|e| DriverError::Session(e.to_string()))?;
        Ok(())
    }

    fn type_into(&self, selector: &str, text: &str) -> Result<(), DriverError> {
        let element = self
            .tab
            .wait_for_element(selector)
            .map_err(|_| DriverError::Timeout(selector.to_string()))?;
        element
            .click()
            .and_then(|el| el.type_into(text))
            .map_err(|e| DriverError::Session(e.to_string()))?;
        Ok(())
    }

    fn read_text(&self, selector: &str) -> Result<String, DriverError> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(|_| DriverError::ElementMissing(selector.to_string()))?;
        element
            .get_inner_text()
            .map(|text| text.trim().to_string())
            .map_err(|e| DriverError::Session(e.to_string()))
    }

    fn page_source(&self) -> Result<String, DriverError> {
        self.tab
            .get_content()
            .map_err(|e| DriverError::Session(e.to_string()))
    }

    fn scroll_by(&self, pixels: i64) -> Result<(), DriverError> {
        self.tab
            .evaluate(&format!("window.scrollBy(0, {});", pixels), false)
            .map_err(|e| DriverError::Session(e.to_string()))?;
        Ok(())
    }

    fn page_height(&self) -> Result<i64, DriverError> {
        self.evaluate_i64("document.body.scrollHeight")
    }

    fn scroll_position(&self) -> Result<i64, DriverError> {
        self.evaluate_i64("window.scrollY")
    }

    fn current_url(&self) -> String {
        self.tab.get_url()
    }
}

/// Scrolls down by `offset` pixels in randomized steps, with an occasional
/// longer pause, the way a reader would.
pub fn smooth_scroll(
    driver: &dyn PageDriver,
    delays: &DelayPolicy,
    offset: i64,
) -> Result<(), DriverError> {
    let mut scrolled = 0;
    let mut scrolls = 0;
    let mut long_delay_at = delays.sample_long_scroll_cadence();

    while scrolled < offset {
        scrolls += 1;
        delays.scroll_delay(scrolls % long_delay_at == 0);
        if scrolls % long_delay_at == 0 {
            long_delay_at = delays.sample_long_scroll_cadence();
        }

        let step = delays.sample_scroll_step().min(offset - scrolled);
        driver.scroll_by(step)?;
        scrolled += step;
    }

    Ok(())
}
