//! Where confirmed submissions go.

use std::{convert::Infallible, future::Future};

use crate::draft::Submission;

/// Receives confirmed submissions, typically a moderation queue.
pub trait SubmissionSink: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn accept(
    &self,
    submission: Submission,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Records submissions in the log and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SubmissionSink for LogSink {
  type Error = Infallible;

  async fn accept(&self, submission: Submission) -> Result<(), Infallible> {
    tracing::info!(
      submission_id = %submission.submission_id,
      submitted_at = %submission.submitted_at,
      name = %submission.entry.name,
      from = %submission.entry.from,
      now = %submission.entry.now,
      "submission received for review"
    );
    Ok(())
  }
}
