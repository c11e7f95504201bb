//! Cached summary lookup.
//!
//! Serves a school's cached results for a tournament. On a miss it either
//! reports that the school is unknown (the tournament has data) or triggers
//! generation for the whole tournament and leaves a placeholder behind.
//!
//! Object layout, per tournament `t` and school `s`:
//!
//! | Key | Content |
//! |-----|---------|
//! | `t/s/results.txt` | rendered results |
//! | `t/s/gpt_prompt.txt` | generation prompt |
//! | `t/s/numbered_list_response.txt` | pre-rendered listing |
//! | `t/placeholder.txt` | present while generation runs |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::TabroomError;
use crate::listing::string_or_number;
use crate::store::ObjectStore;
use crate::Result;

/// Longest accepted school name.
pub const MAX_SCHOOL_LEN: usize = 50;

/// Longest accepted tournament id.
pub const MAX_TOURNAMENT_ID_LEN: usize = 10;

/// Body written to the placeholder object.
pub const PLACEHOLDER_BODY: &str = "Placeholder during generation.";

pub const MSG_SCHOOL_NOT_FOUND: &str = "Tournament exists, but school does not. Check that your school name matches the official name.";
pub const MSG_GENERATING: &str =
    "File does not exist, will attempt to generate it. Check back in about 15 minutes.";
pub const NOT_AVAILABLE: &str = "N/A";

/// Key of a school's rendered results.
pub fn results_key(tournament: &str, school: &str) -> String {
    format!("{tournament}/{school}/results.txt")
}

/// Key of a school's generation prompt.
pub fn prompt_key(tournament: &str, school: &str) -> String {
    format!("{tournament}/{school}/gpt_prompt.txt")
}

/// Key of a school's pre-rendered numbered listing.
pub fn numbered_list_key(tournament: &str, school: &str) -> String {
    format!("{tournament}/{school}/numbered_list_response.txt")
}

/// Key of a tournament's in-flight placeholder.
pub fn placeholder_key(tournament: &str) -> String {
    format!("{tournament}/placeholder.txt")
}

/// A lookup request: `{"tournament": ..., "school": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(deserialize_with = "string_or_number")]
    pub tournament: String,
    #[serde(default)]
    pub school: String,
}

impl SummaryRequest {
    pub fn new(tournament: impl Into<String>, school: impl Into<String>) -> Self {
        Self {
            tournament: tournament.into(),
            school: school.into(),
        }
    }

    /// Parse and validate a JSON request body.
    pub fn from_json(body: &str) -> Result<Self> {
        let request: SummaryRequest = serde_json::from_str(body)
            .map_err(|e| TabroomError::InvalidRequest(format!("malformed body: {e}")))?;
        request.validate()?;
        Ok(request)
    }

    /// Tournament ids are short digit strings; school names are non-empty,
    /// at most 50 characters and must not contain `/`.
    pub fn validate(&self) -> Result<()> {
        let id = &self.tournament;
        if id.is_empty()
            || id.len() > MAX_TOURNAMENT_ID_LEN
            || !id.chars().all(|c| c.is_ascii_digit())
        {
            return Err(TabroomError::InvalidRequest(format!(
                "tournament id must be 1 to {MAX_TOURNAMENT_ID_LEN} digits, got '{id}'"
            )));
        }
        let school = self.school.trim();
        if school.is_empty() {
            return Err(TabroomError::InvalidRequest(
                "school name is required".to_string(),
            ));
        }
        if school.chars().count() > MAX_SCHOOL_LEN {
            return Err(TabroomError::InvalidRequest(format!(
                "school name must be at most {MAX_SCHOOL_LEN} characters"
            )));
        }
        if school.contains('/') {
            return Err(TabroomError::InvalidRequest(
                "school name must not contain '/'".to_string(),
            ));
        }
        Ok(())
    }
}

/// The JSON body returned to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub file_content: String,
    pub gpt_content: String,
}

impl SummaryResponse {
    fn message(text: &str) -> Self {
        Self {
            file_content: text.to_string(),
            gpt_content: NOT_AVAILABLE.to_string(),
        }
    }
}

/// What a lookup found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Results are cached for the school
    Hit(SummaryResponse),
    /// The tournament has data but not for this school
    SchoolNotFound,
    /// Nothing cached for the tournament; generation was triggered
    Generating,
}

impl LookupOutcome {
    pub fn into_response(self) -> SummaryResponse {
        match self {
            LookupOutcome::Hit(response) => response,
            LookupOutcome::SchoolNotFound => SummaryResponse::message(MSG_SCHOOL_NOT_FOUND),
            LookupOutcome::Generating => SummaryResponse::message(MSG_GENERATING),
        }
    }
}

/// Starts summary generation for a tournament without waiting for it.
pub trait GenerationTrigger {
    fn trigger(&self, request: &SummaryRequest) -> Result<()>;
}

/// Look up cached results, triggering generation on a cold tournament.
pub fn lookup<S, T>(store: &mut S, trigger: &T, request: &SummaryRequest) -> Result<LookupOutcome>
where
    S: ObjectStore + ?Sized,
    T: GenerationTrigger + ?Sized,
{
    let (tournament, school) = (&request.tournament, request.school.trim());

    let results = results_key(tournament, school);
    if store.exists(&results)? {
        let file_content = store.get_string(&results)?;
        let gpt_content = match store.get_string(&prompt_key(tournament, school)) {
            Ok(prompt) => prompt,
            Err(TabroomError::ObjectNotFound(_)) => NOT_AVAILABLE.to_string(),
            Err(e) => return Err(e),
        };
        info!(tournament = %tournament, school, "cache hit");
        return Ok(LookupOutcome::Hit(SummaryResponse {
            file_content,
            gpt_content,
        }));
    }

    if store.count_prefix(&format!("{tournament}/"))? > 0 {
        info!(tournament = %tournament, school, "school not found in cached tournament");
        return Ok(LookupOutcome::SchoolNotFound);
    }

    trigger.trigger(request)?;
    store.put(&placeholder_key(tournament), PLACEHOLDER_BODY.as_bytes())?;
    info!(tournament = %tournament, school, "cache miss, generation triggered");
    Ok(LookupOutcome::Generating)
}

/// An HTTP-style response with CORS headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub is_base64_encoded: bool,
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    fn new(status_code: u16, body: String) -> Self {
        Self {
            is_base64_encoded: false,
            status_code,
            headers: cors_headers(),
            body,
        }
    }

    fn json<B: Serialize>(status_code: u16, body: &B) -> Result<Self> {
        Ok(Self::new(status_code, serde_json::to_string(body)?))
    }
}

/// Headers attached to every response.
pub fn cors_headers() -> BTreeMap<String, String> {
    [
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Headers", "Content-Type"),
        ("Access-Control-Allow-Methods", "OPTIONS,POST,GET"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Handle a raw request body end to end.
///
/// Invalid requests answer 400 and store or trigger failures answer 500;
/// both still carry the CORS headers.
pub fn handle_request<S, T>(store: &mut S, trigger: &T, body: &str) -> Result<HttpResponse>
where
    S: ObjectStore + ?Sized,
    T: GenerationTrigger + ?Sized,
{
    let request = match SummaryRequest::from_json(body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejected request");
            return HttpResponse::json(400, &ErrorBody {
                error: &e.to_string(),
            });
        }
    };

    match lookup(store, trigger, &request) {
        Ok(outcome) => HttpResponse::json(200, &outcome.into_response()),
        Err(e) => {
            warn!(error = %e, tournament = %request.tournament, "lookup failed");
            HttpResponse::json(500, &ErrorBody {
                error: &e.to_string(),
            })
        }
    }
}
