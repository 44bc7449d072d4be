//! Page scraping and structured extraction
//!
//! Turns one loosely-structured source page into one structured profile.
//! The page carries no schema contract, so every extractor is built around
//! graceful degradation: layered fallbacks for the note pyramid, optional
//! scalar fields, and fetch errors that surface as values rather than
//! aborting the request.
//!
//! Components:
//! - `PageFetcher`: single-attempt HTTP GET with a fixed request policy
//! - `NotePyramidExtractor`: three-tier note recovery
//! - `FieldExtractor`: rating, description, accords, longevity, sillage
//! - `ProfileScraper`: cache-first orchestration of the above

pub mod coordinator;
pub mod fetcher;
pub mod fields;
pub mod notes;

pub use coordinator::ProfileScraper;
pub use fetcher::{FetchError, PageFetcher};
pub use fields::{visible_text, FieldExtractor, FieldsConfig, ACCORD_VOCABULARY};
pub use notes::{NotePyramidExtractor, NotesConfig};
