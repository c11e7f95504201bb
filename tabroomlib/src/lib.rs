//! # tabroomlib
//!
//! Fixed-width text tables, and the storage glue that serves per-school
//! tournament summaries from a cache.
//!
//! ## Overview
//!
//! - **Table rendering** ([`table`]): a bordered monospace table builder with
//!   per-column alignment, datatypes, fixed or fitted widths, word wrapping
//!   and ANSI style-code awareness
//! - **Object store** ([`store`]): a flat key → bytes store, in memory or
//!   backed by a directory
//! - **Listing** ([`listing`]): the "recently updated tournaments" table
//! - **Cache lookup** ([`cache`]): serve a school's cached summary, or
//!   trigger generation for a cold tournament
//! - **Generation** ([`generate`]): store summarizer output under the keys the
//!   lookup reads
//!
//! ## Example
//!
//! ```rust
//! use tabroomlib::{Align, CellValue, Dtype, Texttable};
//!
//! let mut table = Texttable::new();
//! table.set_cols_align(&[Align::Left, Align::Right]).unwrap();
//! table.set_cols_dtype(&[Dtype::Text, Dtype::Float]).unwrap();
//! table.header(["School", "Win rate"]).unwrap();
//! table
//!     .add_row([CellValue::from("Lincoln"), CellValue::from(0.8126)])
//!     .unwrap();
//!
//! let out = table.draw();
//! assert!(out.contains("| Lincoln |    0.813 |"));
//! ```

pub mod cache;
pub mod error;
pub mod generate;
pub mod listing;
pub mod store;
pub mod table;

pub use cache::{
    handle_request, lookup, GenerationTrigger, HttpResponse, LookupOutcome, SummaryRequest,
    SummaryResponse,
};
pub use error::{TableError, TabroomError};
pub use generate::{
    run_generation, store_summaries, GenerationReport, Notifier, SchoolSummary, Summarizer,
    TournamentSummaries,
};
pub use listing::{publish_recent, recent_table, select_recent, ListingOptions, TournamentRecord};
pub use store::{DirStore, MemoryStore, ObjectStore};
pub use table::{
    Align, BorderChars, CellValue, CharWidth, Decorations, Dtype, Texttable, VAlign,
};

/// Result type for tabroomlib operations
pub type Result<T> = std::result::Result<T, TabroomError>;
