//! Row-level enrichment stages.
//!
//! Each stage is a pure function over one record's fields: sanitation,
//! town resolution, score computation, and taxonomy classification.
//! The spreadsheet boundary lives here as well.

pub mod sanitize;
pub mod score;
pub mod spreadsheet;
pub mod taxonomy;
pub mod town;

pub use sanitize::clean_field;
pub use score::ScoreCard;
pub use spreadsheet::SpreadsheetReader;
pub use taxonomy::{Stream, Taxonomy};
pub use town::TownMatch;
