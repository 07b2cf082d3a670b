//! Generate minutes use case
//!
//! Upload → scratch file → transcription → correction → summary. Every
//! stage returns a `Result`; the first fault ends the run. The scratch file
//! is held by a lease whose `Drop` releases it, so it is removed exactly
//! once on success, on any fault, on cancellation, and when the caller
//! abandons the future mid-flight.

use std::future::Future;
use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::audio::AudioUpload;
use crate::domain::minutes::{LanguageHint, Minutes, PipelineStage};
use crate::domain::timing::Duration;

use super::ports::{
    AudioStore, CompletionError, ScratchFile, StorageError, Summarizer, TextRefiner, Transcriber,
    TranscriptionError,
};

/// Tagged faults of the minutes pipeline
#[derive(Debug, Error)]
pub enum MinutesError {
    #[error("Speech or language model client is not initialized")]
    ServiceUnavailable,

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("No text could be extracted from the audio")]
    EmptyTranscript,

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Text refinement failed: {0}")]
    Refinement(CompletionError),

    #[error("Summarization failed: {0}")]
    Summarization(CompletionError),

    #[error("Request cancelled after stage '{0}'")]
    Cancelled(PipelineStage),
}

impl MinutesError {
    /// Last stage reached before the fault
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::ServiceUnavailable | Self::Storage(_) => PipelineStage::Received,
            Self::EmptyTranscript | Self::Transcription(_) => PipelineStage::Stored,
            Self::Refinement(_) => PipelineStage::Transcribed,
            Self::Summarization(_) => PipelineStage::Refined,
            Self::Cancelled(stage) => *stage,
        }
    }

    /// Short machine tag for logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "service_unavailable",
            Self::Storage(_) => "storage",
            Self::EmptyTranscript => "empty_transcript",
            Self::Transcription(_) => "transcription",
            Self::Refinement(_) => "refinement",
            Self::Summarization(_) => "summarization",
            Self::Cancelled(_) => "cancelled",
        }
    }
}

/// Per-run settings fixed at startup
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Recognition language passed to every transcription
    pub language: LanguageHint,
    /// Budget for the transcription call
    pub transcription_timeout: Duration,
    /// Budget for each chat completion call
    pub completion_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            language: LanguageHint::default(),
            transcription_timeout: Duration::default_transcription_timeout(),
            completion_timeout: Duration::default_completion_timeout(),
        }
    }
}

/// Object-safe entry point used by the HTTP layer
#[async_trait]
pub trait MinutesGenerator: Send + Sync {
    /// Whether every external client initialized
    fn is_ready(&self) -> bool;

    /// Run one upload through the whole pipeline
    async fn generate(
        &self,
        upload: AudioUpload,
        cancel: CancellationToken,
    ) -> Result<Minutes, MinutesError>;
}

/// Releases its scratch file when dropped
struct ScratchLease<'a, S: AudioStore> {
    store: &'a S,
    file: ScratchFile,
}

impl<S: AudioStore> ScratchLease<'_, S> {
    fn path(&self) -> &Path {
        self.file.path()
    }
}

impl<S: AudioStore> Drop for ScratchLease<'_, S> {
    fn drop(&mut self) {
        match self.store.release(&self.file) {
            Ok(()) => debug!(file = %self.file.path().display(), "Released scratch file"),
            Err(e) => warn!(error = %e, "Failed to release scratch file"),
        }
    }
}

/// Await `fut` for at most `budget`, mapping expiry into the stage's error
async fn bounded<F, T, E>(budget: Duration, fut: F, on_timeout: fn(String) -> E) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(budget.as_std(), fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(budget.to_string())),
    }
}

/// Minutes generation use case.
///
/// Clients are optional because they are built at startup and may fail
/// there (no API key, bad TLS setup); a half-configured server still starts
/// and answers every request with `ServiceUnavailable`.
pub struct GenerateMinutesUseCase<S, T, R, M>
where
    S: AudioStore,
    T: Transcriber,
    R: TextRefiner,
    M: Summarizer,
{
    store: S,
    transcriber: Option<T>,
    refiner: Option<R>,
    summarizer: Option<M>,
    settings: PipelineSettings,
}

impl<S, T, R, M> GenerateMinutesUseCase<S, T, R, M>
where
    S: AudioStore,
    T: Transcriber,
    R: TextRefiner,
    M: Summarizer,
{
    /// Create a new use case instance
    pub fn new(
        store: S,
        transcriber: Option<T>,
        refiner: Option<R>,
        summarizer: Option<M>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            store,
            transcriber,
            refiner,
            summarizer,
            settings,
        }
    }

    /// Whether every external client is present
    pub fn is_ready(&self) -> bool {
        self.transcriber.is_some() && self.refiner.is_some() && self.summarizer.is_some()
    }

    /// Execute the pipeline for one upload
    pub async fn execute(
        &self,
        upload: AudioUpload,
        cancel: &CancellationToken,
    ) -> Result<Minutes, MinutesError> {
        let (Some(transcriber), Some(refiner), Some(summarizer)) = (
            self.transcriber.as_ref(),
            self.refiner.as_ref(),
            self.summarizer.as_ref(),
        ) else {
            return Err(MinutesError::ServiceUnavailable);
        };

        if cancel.is_cancelled() {
            return Err(MinutesError::Cancelled(PipelineStage::Received));
        }

        let started = Instant::now();
        debug!(
            stage = %PipelineStage::Received,
            size = %upload.human_readable_size(),
            mime = %upload.mime_type(),
            name = upload.original_name().unwrap_or("-"),
            "Audio upload received"
        );

        let file = self.store.acquire(upload).await?;
        let lease = ScratchLease {
            store: &self.store,
            file,
        };
        info!(
            stage = %PipelineStage::Stored,
            file = %lease.path().display(),
            "Audio stored"
        );

        let mut reached = PipelineStage::Stored;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.run_stages(lease.path(), &mut reached, transcriber, refiner, summarizer) => Some(result),
        };
        let result = outcome.unwrap_or(Err(MinutesError::Cancelled(reached)));

        drop(lease);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(stage = %PipelineStage::Done, elapsed_ms, "Minutes generated"),
            Err(e) => warn!(
                stage = %e.stage(),
                fault = e.kind(),
                elapsed_ms,
                error = %e,
                "Minutes pipeline failed"
            ),
        }
        result
    }

    async fn run_stages(
        &self,
        audio: &Path,
        reached: &mut PipelineStage,
        transcriber: &T,
        refiner: &R,
        summarizer: &M,
    ) -> Result<Minutes, MinutesError> {
        let transcript = bounded(
            self.settings.transcription_timeout,
            transcriber.transcribe(audio, &self.settings.language),
            TranscriptionError::TimedOut,
        )
        .await?;
        if transcript.is_blank() {
            return Err(MinutesError::EmptyTranscript);
        }
        *reached = PipelineStage::Transcribed;
        info!(
            stage = %PipelineStage::Transcribed,
            chars = transcript.text().chars().count(),
            "Audio transcribed"
        );

        let full_text = bounded(
            self.settings.completion_timeout,
            refiner.refine(&transcript),
            CompletionError::TimedOut,
        )
        .await
        .map_err(MinutesError::Refinement)?;
        *reached = PipelineStage::Refined;
        info!(stage = %PipelineStage::Refined, "Transcript refined");

        let summary = bounded(
            self.settings.completion_timeout,
            summarizer.summarize(&full_text),
            CompletionError::TimedOut,
        )
        .await
        .map_err(MinutesError::Summarization)?;
        *reached = PipelineStage::Summarized;
        info!(stage = %PipelineStage::Summarized, "Summary written");

        Ok(Minutes { full_text, summary })
    }
}

#[async_trait]
impl<S, T, R, M> MinutesGenerator for GenerateMinutesUseCase<S, T, R, M>
where
    S: AudioStore,
    T: Transcriber,
    R: TextRefiner,
    M: Summarizer,
{
    fn is_ready(&self) -> bool {
        GenerateMinutesUseCase::is_ready(self)
    }

    async fn generate(
        &self,
        upload: AudioUpload,
        cancel: CancellationToken,
    ) -> Result<Minutes, MinutesError> {
        self.execute(upload, &cancel).await
    }
}
