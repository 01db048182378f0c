use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::errors::ScrapeError;

const BOLD_ENTRY: &str =
    "div.display-flex.align-items-center.mr1.hoverable-link-text.t-bold > span[aria-hidden='true']";
const HIDDEN_SPAN: &str = "span[aria-hidden='true']";
const CARD_SECTION: &str = "section.artdeco-card";
const CARD_HEADER: &str = "h2 span[aria-hidden='true']";
const EDU_HEADER: &str = "h2.pvs-header__title span[aria-hidden='true']";
const LIST_ITEM: &str = "li.artdeco-list__item";
const CAPTION: &str = "span.pvs-entity__caption-wrapper";
const FLAT_COMPANY: &str = "span.t-14.t-normal > span[aria-hidden='true']";
const ROLE_MARKER: &str = "[data-view-name='profile-component-entity']";
const SCHOOL: &str = "div.display-flex.align-items-center.mr1 span[aria-hidden='true']";
const DEGREE: &str = "span.t-14.t-normal:not(.t-black--light) span[aria-hidden='true']";
const EDU_YEARS: &str = "span.t-14.t-normal.t-black--light span.pvs-entity__caption-wrapper";
const LOCATION: &str = "span.text-body-small.inline.t-black--light.break-words";

/// One education entry as it appears on a profile page.
#[derive(Debug, Clone, PartialEq)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: Option<String>,
    pub grad_year: Option<u16>,
}

/// Raw extraction product for one profile, before normalization.
#[derive(Debug, Clone)]
pub struct ProfileData {
    pub full_name: String,
    pub latest_title: Option<String>,
    pub latest_company: Option<String>,
    pub education: Vec<EducationEntry>,
    pub location: String,
    pub profile_url: String,
}

struct Role {
    title: String,
    company: String,
    end_year: i32,
    end_month: u8,
}

/// Pulls the fixed field set out of a rendered profile page.
///
/// Holds the compiled regexes for date parsing; selectors are compiled at the
/// use site. "Present" roles sort as December of next year so an ongoing role
/// always wins the most-recent comparison.
pub struct Extractor {
    month_year_regex: Regex,
    year_regex: Regex,
    present_regex: Regex,
    current_year: i32,
}

impl Extractor {
    pub fn new(current_year: i32) -> Self {
        Extractor {
            month_year_regex: Regex::new(r"([A-Za-z]{3,9})\s+(\d{4})").unwrap(),
            year_regex: Regex::new(r"\d{4}").unwrap(),
            present_regex: Regex::new(r"(?i)\bpresent\b").unwrap(),
            current_year,
        }
    }

    /// Extracts all fields from one profile page. A page without the expected
    /// structure (private or restricted profile, interstitial, wrong page)
    /// yields an `Extraction` error for the caller to skip.
    pub fn extract_profile(&self, html: &str, profile_url: &str) -> Result<ProfileData, ScrapeError> {
        let document = Html::parse_document(html);

        let full_name = self
            .extract_full_name(&document)
            .ok_or_else(|| extraction_error(profile_url, "profile heading not found"))?;
        let location = self
            .extract_location(&document)
            .ok_or_else(|| extraction_error(profile_url, "location element not found"))?;
        let (latest_title, latest_company) = self.extract_latest_employment(&document);
        let education = self.extract_education(&document);

        Ok(ProfileData {
            full_name,
            latest_title,
            latest_company,
            education,
            location,
            profile_url: profile_url.to_string(),
        })
    }

    fn extract_full_name(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("h1").unwrap();
        document
            .select(&selector)
            .next()
            .map(text_of)
            .filter(|name| !name.is_empty())
    }

    fn extract_location(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse(LOCATION).unwrap();
        document
            .select(&selector)
            .next()
            .map(text_of)
            .filter(|location| !location.is_empty())
    }

    /// Most recent role by parsed end date, across flat entries and
    /// multi-role company groups.
    fn extract_latest_employment(&self, document: &Html) -> (Option<String>, Option<String>) {
        let section = match find_card_section(document, "Experience") {
            Some(section) => section,
            None => return (None, None),
        };

        let item_sel = Selector::parse(LIST_ITEM).unwrap();
        let bold_sel = Selector::parse(BOLD_ENTRY).unwrap();
        let span_sel = Selector::parse(HIDDEN_SPAN).unwrap();
        let caption_sel = Selector::parse(CAPTION).unwrap();
        let flat_company_sel = Selector::parse(FLAT_COMPANY).unwrap();
        let nested_sel = Selector::parse("ul li").unwrap();
        let marker_sel = Selector::parse(ROLE_MARKER).unwrap();

        let mut roles: Vec<Role> = Vec::new();

        for item in section.select(&item_sel) {
            let grouped: Vec<ElementRef> = item
                .select(&nested_sel)
                .filter(|li| li.select(&marker_sel).next().is_some())
                .collect();

            if !grouped.is_empty() {
                // Multiple roles at one company: the item's first bold entry
                // is the company, each nested entity is a role.
                let company = match item.select(&bold_sel).next().map(text_of) {
                    Some(company) => company,
                    None => continue,
                };

                for role in grouped {
                    let title = role
                        .select(&bold_sel)
                        .next()
                        .or_else(|| role.select(&span_sel).next())
                        .map(text_of);
                    if let Some(title) = title {
                        let date_text = role.select(&caption_sel).next().map(text_of);
                        let (end_year, end_month) =
                            self.parse_end_date(date_text.as_deref().unwrap_or(""));
                        roles.push(Role {
                            title,
                            company: company.clone(),
                            end_year,
                            end_month,
                        });
                    }
                }
            } else {
                let title = item
                    .select(&bold_sel)
                    .next()
                    .or_else(|| item.select(&span_sel).next())
                    .map(text_of);
                let company = item.select(&flat_company_sel).next().map(text_of);

                if let (Some(title), Some(company)) = (title, company) {
                    let date_text = item.select(&caption_sel).next().map(text_of);
                    let (end_year, end_month) =
                        self.parse_end_date(date_text.as_deref().unwrap_or(""));
                    roles.push(Role {
                        title,
                        company,
                        end_year,
                        end_month,
                    });
                }
            }
        }

        for role in &mut roles {
            role.company = strip_company_annotation(&role.company);
        }
        roles.sort_by(|a, b| (b.end_year, b.end_month).cmp(&(a.end_year, a.end_month)));

        match roles.into_iter().next() {
            Some(newest) => (Some(newest.title), Some(newest.company)),
            None => (None, None),
        }
    }

    /// All education entries on the page, in listing order. Institution is
    /// required per entry; degree and graduation year stay optional.
    fn extract_education(&self, document: &Html) -> Vec<EducationEntry> {
        let section = match find_education_section(document) {
            Some(section) => section,
            None => return Vec::new(),
        };

        let item_sel = Selector::parse(LIST_ITEM).unwrap();
        let school_sel = Selector::parse(SCHOOL).unwrap();
        let degree_sel = Selector::parse(DEGREE).unwrap();
        let years_sel = Selector::parse(EDU_YEARS).unwrap();

        let mut entries = Vec::new();

        for item in section.select(&item_sel) {
            let institution = match item.select(&school_sel).next().map(text_of) {
                Some(institution) if !institution.is_empty() => institution,
                _ => continue,
            };

            let degree = item.select(&degree_sel).next().map(text_of);
            let grad_year = item
                .select(&years_sel)
                .next()
                .map(text_of)
                .and_then(|years| self.last_year_in(&years));

            entries.push(EducationEntry {
                institution,
                degree,
                grad_year,
            });
        }

        entries
    }

    /// End date of a role from its caption text, e.g. "Jan 2020 - Mar 2022 ·
    /// 2 yrs 3 mos". Ongoing roles ("Present") sort after everything real;
    /// captions with no date at all sort before everything.
    fn parse_end_date(&self, text: &str) -> (i32, u8) {
        let left = text.split('·').next().unwrap_or(text).trim();

        if self.present_regex.is_match(left) {
            return (self.current_year + 1, 12);
        }

        if let Some(caps) = self.month_year_regex.captures_iter(left).last() {
            let month = month_number(&caps[1]);
            let year = caps[2].parse().unwrap_or(0);
            return (year, month);
        }

        if let Some(found) = self.year_regex.find_iter(left).last() {
            return (found.as_str().parse().unwrap_or(0), 0);
        }

        (0, 0)
    }

    fn last_year_in(&self, text: &str) -> Option<u16> {
        self.year_regex
            .find_iter(text)
            .last()
            .and_then(|m| m.as_str().parse().ok())
    }
}

fn extraction_error(url: &str, reason: &str) -> ScrapeError {
    ScrapeError::Extraction {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Drops a trailing "· Full-time"-style annotation from a company string.
fn strip_company_annotation(company: &str) -> String {
    match company.rfind('·') {
        Some(idx) => company[..idx].trim().to_string(),
        None => company.trim().to_string(),
    }
}

fn find_card_section<'a>(document: &'a Html, header: &str) -> Option<ElementRef<'a>> {
    let section_sel = Selector::parse(CARD_SECTION).unwrap();
    let header_sel = Selector::parse(CARD_HEADER).unwrap();

    document.select(&section_sel).find(|section| {
        section
            .select(&header_sel)
            .next()
            .map(|label| text_of(label).contains(header))
            .unwrap_or(false)
    })
}

fn find_education_section(document: &Html) -> Option<ElementRef<'_>> {
    let section_sel = Selector::parse(CARD_SECTION).unwrap();
    let header_sel = Selector::parse(EDU_HEADER).unwrap();

    document.select(&section_sel).find(|section| {
        section
            .select(&header_sel)
            .next()
            .map(|label| text_of(label) == "Education")
            .unwrap_or(false)
    })
}

fn month_number(name: &str) -> u8 {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => 0,
    }
}
