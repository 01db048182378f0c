use std::path::Path;

use log::info;

use crate::errors::ScrapeError;
use crate::normalizer::AlumniRecord;

/// One-shot serialization of the surviving records, overwriting any prior
/// file at `dest`. Header row comes from the record's field names. Returns
/// the number of rows written.
pub fn write_csv<P: AsRef<Path>>(dest: P, records: &[AlumniRecord]) -> Result<usize, ScrapeError> {
    let mut writer = csv::WriterBuilder::new().from_path(&dest)?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(
        "Wrote {} rows to {}.",
        records.len(),
        dest.as_ref().display()
    );
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, url: &str, year: u16) -> AlumniRecord {
        AlumniRecord {
            full_name: name.to_string(),
            latest_title: Some("Engineer".to_string()),
            latest_company: None,
            mta_degree: Some("Bachelor of Science".to_string()),
            mta_grad_year: year,
            location: "Sackville, New Brunswick, Canada".to_string(),
            profile_url: url.to_string(),
        }
    }

    #[test]
    fn row_count_matches_record_count_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mta_alumni.csv");

        let records = vec![
            record("Jane Doe", "https://www.linkedin.com/in/jane-doe/", 2015),
            record("John Smith", "https://www.linkedin.com/in/john-smith/", 2018),
        ];
        let written = write_csv(&dest, &records).unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&dest).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "full_name,latest_title,latest_company,mta_degree,mta_grad_year,location,profile_url"
        );
    }

    #[test]
    fn profile_urls_remain_pairwise_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mta_alumni.csv");

        let records = vec![
            record("Jane Doe", "https://www.linkedin.com/in/jane-doe/", 2015),
            record("John Smith", "https://www.linkedin.com/in/john-smith/", 2018),
            record("Alice Roy", "https://www.linkedin.com/in/alice-roy/", 2020),
        ];
        write_csv(&dest, &records).unwrap();

        let mut reader = csv::Reader::from_path(&dest).unwrap();
        let urls: Vec<String> = reader
            .records()
            .map(|row| row.unwrap().get(6).unwrap().to_string())
            .collect();

        let mut deduped = urls.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(urls.len(), deduped.len());
    }

    #[test]
    fn rerun_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mta_alumni.csv");

        write_csv(
            &dest,
            &[
                record("Jane Doe", "https://www.linkedin.com/in/jane-doe/", 2015),
                record("John Smith", "https://www.linkedin.com/in/john-smith/", 2018),
            ],
        )
        .unwrap();
        write_csv(
            &dest,
            &[record("Alice Roy", "https://www.linkedin.com/in/alice-roy/", 2020)],
        )
        .unwrap();

        let content = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Alice Roy"));
        assert!(!content.contains("Jane Doe"));
    }
}
