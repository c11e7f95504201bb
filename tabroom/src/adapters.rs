//! Command-line stand-ins for the hosted collaborators.
//!
//! In deployment the lookup enqueues generation on a worker, the summarizer
//! calls out to the results scraper and the notifier posts to a chat hook.
//! From the command line these become a log line, a JSON file and another
//! log line.

use std::fs;
use std::path::PathBuf;

use tabroomlib::error::TabroomError;
use tabroomlib::{GenerationTrigger, Notifier, SummaryRequest, Summarizer, TournamentSummaries};
use tracing::info;

/// Records the generation request in the log and returns immediately.
#[derive(Debug, Default)]
pub struct LogTrigger;

impl GenerationTrigger for LogTrigger {
    fn trigger(&self, request: &SummaryRequest) -> tabroomlib::Result<()> {
        info!(
            tournament = %request.tournament,
            school = %request.school,
            "generation requested"
        );
        Ok(())
    }
}

/// Reads summaries for any tournament from one JSON file shaped like
/// `{"School": {"gpt_prompt": "...", "numbered_list_response": "..."}}`.
#[derive(Debug)]
pub struct FileSummarizer {
    path: PathBuf,
}

impl FileSummarizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Summarizer for FileSummarizer {
    fn summarize(&self, tournament: &str) -> tabroomlib::Result<TournamentSummaries> {
        let text = fs::read_to_string(&self.path).map_err(|e| TabroomError::Summarizer {
            tournament: tournament.to_string(),
            message: format!("cannot read {}: {e}", self.path.display()),
        })?;
        serde_json::from_str(&text).map_err(|e| TabroomError::Summarizer {
            tournament: tournament.to_string(),
            message: format!("malformed summaries in {}: {e}", self.path.display()),
        })
    }
}

/// Writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) -> tabroomlib::Result<()> {
        info!("{message}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_summarizer_reads_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summaries.json");
        fs::write(&path, r#"{"Lincoln": {"gpt_prompt": "p"}}"#).unwrap();

        let summaries = FileSummarizer::new(&path).summarize("20134").unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries["Lincoln"].gpt_prompt.as_deref(), Some("p"));
    }

    #[test]
    fn test_file_summarizer_missing_file() {
        let dir = tempdir().unwrap();
        let err = FileSummarizer::new(dir.path().join("absent.json"))
            .summarize("20134")
            .unwrap_err();
        assert!(matches!(err, TabroomError::Summarizer { tournament, .. } if tournament == "20134"));
    }
}
