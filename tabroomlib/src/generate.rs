//! Storing generated summaries.
//!
//! Generation for a tournament produces, per school, an optional prompt and
//! an optional numbered listing. These land in the object store under the
//! keys the cache lookup reads, and the tournament placeholder is removed
//! once they are written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::cache::{numbered_list_key, placeholder_key, prompt_key, SummaryRequest};
use crate::store::ObjectStore;
use crate::Result;

/// Generated outputs for one school.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpt_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbered_list_response: Option<String>,
}

/// Summaries for every school in a tournament, keyed by school name.
pub type TournamentSummaries = BTreeMap<String, SchoolSummary>;

/// Produces per-school summaries for a tournament.
pub trait Summarizer {
    fn summarize(&self, tournament: &str) -> Result<TournamentSummaries>;
}

/// Delivers a short operator notification.
pub trait Notifier {
    fn notify(&self, message: &str) -> Result<()>;
}

/// What a generation run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub tournament: String,
    /// Schools returned by the summarizer
    pub schools: usize,
    /// Keys written, in write order
    pub written: Vec<String>,
}

/// Message sent when a run starts.
pub fn start_message(request: &SummaryRequest) -> String {
    format!(
        "Running tabroom_summary for {}; requested school is {}",
        request.tournament, request.school
    )
}

/// Write every present output to the store.
pub fn store_summaries<S: ObjectStore + ?Sized>(
    store: &mut S,
    tournament: &str,
    summaries: &TournamentSummaries,
) -> Result<Vec<String>> {
    let mut written = Vec::new();
    for (school, summary) in summaries {
        let outputs = [
            (prompt_key(tournament, school), &summary.gpt_prompt),
            (numbered_list_key(tournament, school), &summary.numbered_list_response),
        ];
        for (key, body) in outputs {
            if let Some(body) = body {
                store.put(&key, body.as_bytes())?;
                written.push(key);
            }
        }
    }
    Ok(written)
}

/// Run generation for the requested tournament.
///
/// A failing notifier is logged and skipped; so is a failure to remove the
/// placeholder. Summarizer and store failures abort the run.
pub fn run_generation<S, Z, N>(
    request: &SummaryRequest,
    summarizer: &Z,
    store: &mut S,
    notifier: &N,
) -> Result<GenerationReport>
where
    S: ObjectStore + ?Sized,
    Z: Summarizer + ?Sized,
    N: Notifier + ?Sized,
{
    let tournament = request.tournament.as_str();

    if let Err(e) = notifier.notify(&start_message(request)) {
        error!(error = %e, tournament, "failed to send notification");
    }

    let summaries = summarizer.summarize(tournament)?;
    let written = store_summaries(store, tournament, &summaries)?;

    if let Err(e) = store.delete(&placeholder_key(tournament)) {
        warn!(error = %e, tournament, "failed to remove placeholder");
    }

    info!(
        tournament,
        schools = summaries.len(),
        objects = written.len(),
        "generation finished"
    );
    Ok(GenerationReport {
        tournament: tournament.to_string(),
        schools: summaries.len(),
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PLACEHOLDER_BODY;
    use crate::error::TabroomError;
    use crate::store::MemoryStore;
    use std::cell::RefCell;

    struct FixedSummarizer(TournamentSummaries);

    impl Summarizer for FixedSummarizer {
        fn summarize(&self, _tournament: &str) -> Result<TournamentSummaries> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSummarizer;

    impl Summarizer for BrokenSummarizer {
        fn summarize(&self, tournament: &str) -> Result<TournamentSummaries> {
            Err(TabroomError::Summarizer {
                tournament: tournament.to_string(),
                message: "upstream timeout".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) -> Result<()> {
            self.messages.borrow_mut().push(message.to_string());
            Ok(())
        }
    }

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify(&self, _message: &str) -> Result<()> {
            Err(TabroomError::Notify("no route".to_string()))
        }
    }

    fn summaries() -> TournamentSummaries {
        let mut map = TournamentSummaries::new();
        map.insert(
            "Lincoln".to_string(),
            SchoolSummary {
                gpt_prompt: Some("prompt".to_string()),
                numbered_list_response: Some("1. result".to_string()),
            },
        );
        map.insert(
            "Washington".to_string(),
            SchoolSummary {
                gpt_prompt: Some("other".to_string()),
                numbered_list_response: None,
            },
        );
        map
    }

    #[test]
    fn test_start_message() {
        let request = SummaryRequest::new("20134", "Lincoln");
        assert_eq!(
            start_message(&request),
            "Running tabroom_summary for 20134; requested school is Lincoln"
        );
    }

    #[test]
    fn test_run_generation_writes_outputs_and_clears_placeholder() {
        let mut store = MemoryStore::new();
        store
            .put("20134/placeholder.txt", PLACEHOLDER_BODY.as_bytes())
            .unwrap();
        let notifier = RecordingNotifier::default();
        let request = SummaryRequest::new("20134", "Lincoln");

        let report = run_generation(
            &request,
            &FixedSummarizer(summaries()),
            &mut store,
            &notifier,
        )
        .unwrap();

        assert_eq!(report.schools, 2);
        assert_eq!(
            report.written,
            vec![
                "20134/Lincoln/gpt_prompt.txt",
                "20134/Lincoln/numbered_list_response.txt",
                "20134/Washington/gpt_prompt.txt",
            ]
        );
        assert!(!store.exists("20134/placeholder.txt").unwrap());
        assert!(!store
            .exists("20134/Washington/numbered_list_response.txt")
            .unwrap());
        assert_eq!(
            store.get_string("20134/Lincoln/gpt_prompt.txt").unwrap(),
            "prompt"
        );
        assert_eq!(notifier.messages.borrow().len(), 1);
    }

    #[test]
    fn test_failing_notifier_does_not_abort() {
        let mut store = MemoryStore::new();
        let report = run_generation(
            &SummaryRequest::new("7", "A"),
            &FixedSummarizer(summaries()),
            &mut store,
            &FailingNotifier,
        )
        .unwrap();
        assert_eq!(report.written.len(), 3);
    }

    #[test]
    fn test_summarizer_failure_keeps_placeholder() {
        let mut store = MemoryStore::new();
        store.put("7/placeholder.txt", b"x").unwrap();
        let err = run_generation(
            &SummaryRequest::new("7", "A"),
            &BrokenSummarizer,
            &mut store,
            &RecordingNotifier::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TabroomError::Summarizer { .. }));
        assert!(store.exists("7/placeholder.txt").unwrap());
    }

    #[test]
    fn test_school_summary_from_json() {
        let parsed: TournamentSummaries =
            serde_json::from_str(r#"{"Lincoln": {"gpt_prompt": "p"}}"#).unwrap();
        assert_eq!(parsed["Lincoln"].gpt_prompt.as_deref(), Some("p"));
        assert_eq!(parsed["Lincoln"].numbered_list_response, None);
    }
}
