use serde::Serialize;

use crate::extractor::ProfileData;
use crate::profile_scraper::ProfileOutcome;

/// One row of the final output. Field order here is the CSV column order.
#[derive(Debug, Clone, Serialize)]
pub struct AlumniRecord {
    pub full_name: String,
    pub latest_title: Option<String>,
    pub latest_company: Option<String>,
    pub mta_degree: Option<String>,
    pub mta_grad_year: u16,
    pub location: String,
    pub profile_url: String,
}

/// Applies the most-recent-degree and valid-graduation-year rules to every
/// scraped profile. Skipped profiles drop out here; no other transformation
/// is applied.
pub fn normalize(
    outcomes: Vec<ProfileOutcome>,
    institution: &str,
    current_year: u16,
) -> Vec<AlumniRecord> {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            ProfileOutcome::Scraped(profile) => {
                normalize_profile(profile, institution, current_year)
            }
            ProfileOutcome::Skipped { .. } => None,
        })
        .collect()
}

/// Selects the institution's education entry with the latest graduation year.
/// Entries without a year never qualify; a future year (likely a current
/// student) drops the whole record.
pub fn normalize_profile(
    profile: ProfileData,
    institution: &str,
    current_year: u16,
) -> Option<AlumniRecord> {
    let (grad_year, entry) = profile
        .education
        .iter()
        .filter(|entry| entry.institution.contains(institution))
        .filter_map(|entry| entry.grad_year.map(|year| (year, entry)))
        .max_by_key(|(year, _)| *year)?;

    if grad_year > current_year {
        return None;
    }

    Some(AlumniRecord {
        full_name: profile.full_name,
        latest_title: profile.latest_title,
        latest_company: profile.latest_company,
        mta_degree: entry.degree.clone(),
        mta_grad_year: grad_year,
        location: profile.location.clone(),
        profile_url: profile.profile_url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::EducationEntry;

    const INSTITUTION: &str = "Mount Allison University";
    const CURRENT_YEAR: u16 = 2026;

    fn profile_with_education(education: Vec<EducationEntry>) -> ProfileData {
        ProfileData {
            full_name: "Jane Doe".to_string(),
            latest_title: Some("Engineer".to_string()),
            latest_company: Some("Acme Labs".to_string()),
            education,
            location: "Sackville, New Brunswick, Canada".to_string(),
            profile_url: "https://www.linkedin.com/in/jane-doe/".to_string(),
        }
    }

    fn entry(institution: &str, degree: &str, grad_year: Option<u16>) -> EducationEntry {
        EducationEntry {
            institution: institution.to_string(),
            degree: Some(degree.to_string()),
            grad_year,
        }
    }

    #[test]
    fn most_recent_degree_wins() {
        let profile = profile_with_education(vec![
            entry(INSTITUTION, "Bachelor of Science", Some(2015)),
            entry(INSTITUTION, "Master of Science", Some(2018)),
        ]);

        let record = normalize_profile(profile, INSTITUTION, CURRENT_YEAR).unwrap();
        assert_eq!(record.mta_degree.as_deref(), Some("Master of Science"));
        assert_eq!(record.mta_grad_year, 2018);
    }

    #[test]
    fn future_graduation_year_drops_record() {
        let profile = profile_with_education(vec![entry(
            INSTITUTION,
            "Bachelor of Arts",
            Some(CURRENT_YEAR + 1),
        )]);

        assert!(normalize_profile(profile, INSTITUTION, CURRENT_YEAR).is_none());
    }

    #[test]
    fn missing_graduation_year_drops_record() {
        let profile =
            profile_with_education(vec![entry(INSTITUTION, "Bachelor of Commerce", None)]);

        assert!(normalize_profile(profile, INSTITUTION, CURRENT_YEAR).is_none());
    }

    #[test]
    fn other_institutions_do_not_qualify() {
        let profile = profile_with_education(vec![entry(
            "Dalhousie University",
            "Master of Science",
            Some(2018),
        )]);

        assert!(normalize_profile(profile, INSTITUTION, CURRENT_YEAR).is_none());
    }

    #[test]
    fn dated_entry_beats_undated_entry() {
        let profile = profile_with_education(vec![
            entry(INSTITUTION, "Certificate", None),
            entry(INSTITUTION, "Bachelor of Science", Some(2012)),
        ]);

        let record = normalize_profile(profile, INSTITUTION, CURRENT_YEAR).unwrap();
        assert_eq!(record.mta_degree.as_deref(), Some("Bachelor of Science"));
        assert_eq!(record.mta_grad_year, 2012);
    }

    #[test]
    fn skipped_outcomes_are_filtered_out() {
        let outcomes = vec![
            ProfileOutcome::Scraped(profile_with_education(vec![entry(
                INSTITUTION,
                "Bachelor of Science",
                Some(2015),
            )])),
            ProfileOutcome::Skipped {
                url: "https://www.linkedin.com/in/private/".to_string(),
                reason: "profile heading not found".to_string(),
            },
        ];

        let records = normalize(outcomes, INSTITUTION, CURRENT_YEAR);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Jane Doe");
    }

    #[test]
    fn current_year_graduates_are_kept() {
        let profile = profile_with_education(vec![entry(
            INSTITUTION,
            "Bachelor of Music",
            Some(CURRENT_YEAR),
        )]);

        let record = normalize_profile(profile, INSTITUTION, CURRENT_YEAR).unwrap();
        assert_eq!(record.mta_grad_year, CURRENT_YEAR);
    }
}
