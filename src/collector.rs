use std::collections::HashSet;

use log::info;
use scraper::{Html, Selector};
use url::Url;

use crate::driver::PageDriver;
use crate::errors::ScrapeError;
use crate::recovery::RecoveryLog;

const PROFILE_PREFIX: &str = "https://www.linkedin.com/in/";

/// Scans the expanded listing for profile links and appends each one to the
/// recovery log before extraction begins. Returns the unique URLs in
/// discovery order.
pub fn collect_profile_urls(
    driver: &dyn PageDriver,
    recovery: &mut RecoveryLog,
) -> Result<Vec<String>, ScrapeError> {
    let html = driver.page_source().map_err(ScrapeError::session)?;
    let urls = extract_profile_urls(&html);

    for url in &urls {
        recovery.append(url)?;
    }

    info!(
        "Collected {} unique profile URLs (recovery file: {}).",
        urls.len(),
        recovery.path().display()
    );
    Ok(urls)
}

/// Pulls profile anchor hrefs out of the rendered listing, canonicalized and
/// deduped by exact URL string, preserving discovery order.
pub fn extract_profile_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"a[href^="https://www.linkedin.com/in/"]"#).unwrap();

    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(href) if href.starts_with(PROFILE_PREFIX) => href,
            _ => continue,
        };

        let profile_url = canonicalize(href);
        if seen.insert(profile_url.clone()) {
            urls.push(profile_url);
        }
    }

    urls
}

/// Strips the query string and fragment so the same profile reached through
/// different listing widgets dedups to one URL.
fn canonicalize(href: &str) -> String {
    match Url::parse(href) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => href.split(['?', '#']).next().unwrap_or(href).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_strips_query_and_fragment() {
        assert_eq!(
            canonicalize("https://www.linkedin.com/in/jane-doe/?miniProfileUrn=abc#anchor"),
            "https://www.linkedin.com/in/jane-doe/"
        );
    }

    #[test]
    fn extraction_dedups_and_preserves_discovery_order() {
        let html = r#"
            <html><body>
              <a href="https://www.linkedin.com/in/alpha/?ref=1">Alpha</a>
              <a href="https://www.linkedin.com/in/beta/">Beta</a>
              <a href="https://www.linkedin.com/in/alpha/?ref=2">Alpha again</a>
              <a href="https://www.linkedin.com/feed/">Not a profile</a>
            </body></html>
        "#;

        assert_eq!(
            extract_profile_urls(html),
            vec![
                "https://www.linkedin.com/in/alpha/".to_string(),
                "https://www.linkedin.com/in/beta/".to_string(),
            ]
        );
    }

    #[test]
    fn non_profile_pages_yield_nothing() {
        let html = r#"<html><body><a href="https://example.com/">elsewhere</a></body></html>"#;
        assert!(extract_profile_urls(html).is_empty());
    }
}
