use log::info;

use crate::delay_manager::DelayPolicy;
use crate::driver::PageDriver;
use crate::errors::{DriverError, ScrapeError};

const LOGIN_URL: &str = "https://www.linkedin.com/login";
const EMAIL_FIELD: &str = "#username";
const PASSWORD_FIELD: &str = "#password";
const SIGN_IN_BUTTON: &str = "form.login__form button[type='submit'], button[data-litms-control-urn='login-submit']";
const GLOBAL_NAV: &str = "#global-nav";
const LOGIN_ERROR: &str = "#error-for-username, #error-for-password";

/// Signs into the network and waits for the authenticated landing state.
///
/// Any failure here is fatal: rejected credentials, a verification challenge
/// we cannot complete, or a login form that never rendered.
pub fn sign_in(
    driver: &dyn PageDriver,
    delays: &DelayPolicy,
    email: &str,
    password: &str,
) -> Result<(), ScrapeError> {
    delays.pause();
    driver.navigate(LOGIN_URL).map_err(ScrapeError::session)?;

    delays.pause();
    driver
        .type_into(EMAIL_FIELD, email)
        .map_err(login_form_error)?;

    delays.pause();
    driver
        .type_into(PASSWORD_FIELD, password)
        .map_err(login_form_error)?;

    delays.short_pause();
    driver.click(SIGN_IN_BUTTON).map_err(login_form_error)?;

    delays.long_pause();
    if driver.exists(GLOBAL_NAV) {
        info!("Signed in as {}.", email);
        return Ok(());
    }

    let landed_on = driver.current_url();
    if landed_on.contains("checkpoint") || landed_on.contains("challenge") {
        return Err(ScrapeError::Authentication(
            "verification challenge presented; cannot complete automatically".to_string(),
        ));
    }

    let reason = driver
        .read_text(LOGIN_ERROR)
        .unwrap_or_else(|_| "credentials rejected".to_string());
    Err(ScrapeError::Authentication(reason))
}

fn login_form_error(err: DriverError) -> ScrapeError {
    match err {
        DriverError::Session(msg) => ScrapeError::SessionTerminated(msg),
        other => ScrapeError::Authentication(format!("login form not usable: {}", other)),
    }
}
