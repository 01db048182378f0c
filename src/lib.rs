pub mod authenticator;
pub mod collector;
pub mod delay_manager;
pub mod driver;
pub mod errors;
pub mod expander;
pub mod extractor;
pub mod logger;
pub mod normalizer;
pub mod profile_scraper;
pub mod recovery;
pub mod writer;

// Exporting types for convenience
pub use delay_manager::DelayPolicy;
pub use driver::{ChromeSession, PageDriver};
pub use errors::{DriverError, ScrapeError};
pub use extractor::{EducationEntry, Extractor, ProfileData};
pub use normalizer::AlumniRecord;
pub use profile_scraper::{ProfileOutcome, ProfileScraper};
pub use recovery::RecoveryLog;
