//! Transcription Job
//!
//! One transcription request and its outcome.

use crate::audio::AudioFileRef;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Rejected status transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobStateError {
    #[error("Job is already {0:?}")]
    AlreadyFinished(JobStatus),

    #[error("Cannot complete a job that is {0:?}")]
    NotInProgress(JobStatus),
}

/// A transcription job.
///
/// `Pending -> InProgress -> Completed | Failed`. `InProgress` may be entered
/// again for each provider tried; `Pending` may also fail directly when no
/// provider could be selected. Terminal states reject every transition.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionJob {
    id: Uuid,
    audio: AudioFileRef,
    status: JobStatus,
    result: Option<String>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    provider_used: Option<String>,
}

impl TranscriptionJob {
    /// Create a pending job
    pub fn new(audio: AudioFileRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            audio,
            status: JobStatus::Pending,
            result: None,
            error_message: None,
            created_at: Utc::now(),
            completed_at: None,
            provider_used: None,
        }
    }

    /// Record that `provider` is about to be tried
    pub fn mark_in_progress(&mut self, provider: &str) -> Result<(), JobStateError> {
        self.ensure_not_finished()?;
        self.status = JobStatus::InProgress;
        self.provider_used = Some(provider.to_string());
        Ok(())
    }

    pub fn mark_completed(&mut self, result: String) -> Result<(), JobStateError> {
        self.ensure_not_finished()?;
        if self.status != JobStatus::InProgress {
            return Err(JobStateError::NotInProgress(self.status));
        }
        self.status = JobStatus::Completed;
        self.result = Some(result);
        self.error_message = None;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Fail the job. The provider last tried stays recorded.
    pub fn mark_failed(&mut self, message: impl Into<String>) -> Result<(), JobStateError> {
        self.ensure_not_finished()?;
        self.status = JobStatus::Failed;
        self.error_message = Some(message.into());
        self.result = None;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn ensure_not_finished(&self) -> Result<(), JobStateError> {
        if self.status.is_terminal() {
            Err(JobStateError::AlreadyFinished(self.status))
        } else {
            Ok(())
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn audio(&self) -> &AudioFileRef {
        &self.audio
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Transcribed text, present only when completed
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Failure description, present only when failed
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn provider_used(&self) -> Option<&str> {
        self.provider_used.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == JobStatus::Failed
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}
