//! Recently-updated tournament listing.
//!
//! Picks the newest tournaments whose prompts have been generated and
//! renders them as a text table for display on the static site.
//!
//! The data flow is:
//! 1. Tournament records (as scanned from the tournament table)
//! 2. Selection (newest first, generated only, limited)
//! 3. Texttable rendering, published at [`RECENT_TOURNAMENTS_KEY`]

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::store::ObjectStore;
use crate::table::{Align, Texttable, VAlign, DEFAULT_MAX_WIDTH};
use crate::Result;

/// Object key the rendered listing is published under.
pub const RECENT_TOURNAMENTS_KEY: &str = "recent_tournaments.txt";

/// Maximum number of tournaments shown.
pub const DISPLAY_LIMIT: usize = 20;

/// Column headers of the listing.
pub const LISTING_HEADER: [&str; 4] = ["Tournament ID", "Tournament Name", "Locality", "Date"];

/// One scanned tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub tourn_id: String,
    pub tourn_name: String,
    #[serde(default)]
    pub locality: String,
    pub end_date: String,
    /// Only an explicit `false` hides the tournament
    #[serde(default)]
    pub prompts_generated: Option<bool>,
}

impl TournamentRecord {
    /// The listing row: `[id, name, locality, date]`.
    pub fn listing_row(&self) -> [&str; 4] {
        [
            self.tourn_id.as_str(),
            self.tourn_name.as_str(),
            self.locality.as_str(),
            self.end_date.as_str(),
        ]
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Options for building the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Maximum number of tournaments shown
    pub limit: usize,
    /// Table width budget (0 = unlimited)
    pub max_width: usize,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            limit: DISPLAY_LIMIT,
            max_width: DEFAULT_MAX_WIDTH,
        }
    }
}

impl ListingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the number of tournaments shown
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Builder: set the table width budget
    pub fn max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }
}

/// Newest tournaments first, at most `limit` of them, skipping those
/// marked as not generated.
///
/// Records are ordered by `end_date` descending (ISO dates compare as
/// strings); ties keep their input order.
pub fn select_recent(records: &[TournamentRecord], limit: usize) -> Vec<&TournamentRecord> {
    let mut sorted: Vec<&TournamentRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.end_date.cmp(&a.end_date));
    sorted
        .into_iter()
        .filter(|r| r.prompts_generated != Some(false))
        .take(limit)
        .collect()
}

/// Build the listing table.
pub fn recent_table(records: &[TournamentRecord], options: ListingOptions) -> Result<Texttable> {
    let mut table = Texttable::with_max_width(options.max_width);
    table.set_cols_align(&[Align::Left, Align::Left, Align::Center, Align::Center])?;
    table.set_cols_valign(&[VAlign::Top; 4])?;
    table.header(LISTING_HEADER)?;
    for record in select_recent(records, options.limit) {
        table.add_row(record.listing_row())?;
    }
    Ok(table)
}

/// Render the listing and publish it at [`RECENT_TOURNAMENTS_KEY`].
///
/// Returns the rendered text.
pub fn publish_recent<S: ObjectStore + ?Sized>(
    store: &mut S,
    records: &[TournamentRecord],
    options: ListingOptions,
) -> Result<String> {
    let table = recent_table(records, options)?;
    let text = table.draw();
    store.put(RECENT_TOURNAMENTS_KEY, text.as_bytes())?;
    info!(
        tournaments = table.rows().len(),
        key = RECENT_TOURNAMENTS_KEY,
        "published recent tournaments"
    );
    Ok(text)
}
