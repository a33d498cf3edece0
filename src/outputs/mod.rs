//! Reading scraped source files and writing cleaned output.
//!
//! # Submodules
//!
//! - [`table`]: Reads raw delimited files and writes the `clean_` tables
//! - [`json`]: Writes load-ready article rows for the persistence step
//!
//! # Output Structure
//!
//! ```text
//! input_dir/
//! ├── eldeber_.csv           # raw scrape
//! └── clean_eldeber_.csv     # keyed by uid
//!
//! json_output_dir/           # optional
//! └── 2025-05-06/
//!     └── eldeber.json
//! ```

pub mod json;
pub mod table;
