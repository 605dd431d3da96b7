//! Integration Tests for the Transcription Pipeline
//!
//! Tests the complete flow: Settings -> Plan -> ProviderCatalog -> SelectionPolicy
//! -> PlanExecutor -> TranscriptionJob
//!
//! These tests verify:
//! 1. Module interactions work correctly
//! 2. Retries and fallbacks cascade in the right order
//! 3. Failures end in a terminal job with a diagnostic message

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use polyscribe_lib::audio::AudioFileRef;
use polyscribe_lib::config::{ProvidersSettings, Settings};
use polyscribe_lib::transcription::{
    AvailabilityFirstPolicy, FormatAwarePolicy, JobStatus, PlanExecutor, PolicyKind,
    ProviderCatalog, ProviderError, ProviderOptions, TranscriptionJob, TranscriptionPlan,
    TranscriptionProvider,
};
use polyscribe_lib::utils::metrics;

// ============================================================================
// Test Fixtures and Mock Providers
// ============================================================================

/// Write a short 16kHz mono WAV file
fn write_wav(dir: &Path, name: &str, seconds: u32) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..(16000 * seconds) {
        let t = i as f32 / 16000.0;
        let sample = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.3;
        writer.write_sample((sample * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

/// Write a file with arbitrary content
fn write_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"not really audio").unwrap();
    path
}

/// Provider settings with both built-in providers configured
fn configured_providers() -> ProvidersSettings {
    let mut settings = ProvidersSettings::default();
    settings.openai.api_key = "sk-integration".to_string();
    settings.gemini.credentials_path = Some(PathBuf::from("/etc/gemini/credentials.json"));
    settings.gemini.project_id = Some("integration".to_string());
    settings
}

/// Mock transcription provider that fails a fixed number of times first
struct MockTranscriptionProvider {
    name: &'static str,
    available: bool,
    formats: &'static [&'static str],
    fail_times: u32,
    error: ProviderError,
    call_count: Arc<AtomicU32>,
}

impl MockTranscriptionProvider {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            available: true,
            formats: &[".wav", ".mp3"],
            fail_times: 0,
            error: ProviderError::AttemptFailed("Mock failure".to_string()),
            call_count: Arc::new(AtomicU32::new(0)),
        }
    }

    fn available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    fn failing(mut self, times: u32) -> Self {
        self.fail_times = times;
        self
    }

    fn with_error(mut self, error: ProviderError) -> Self {
        self.fail_times = u32::MAX;
        self.error = error;
        self
    }

    fn with_call_counter(mut self, counter: Arc<AtomicU32>) -> Self {
        self.call_count = counter;
        self
    }
}

#[async_trait]
impl TranscriptionProvider for MockTranscriptionProvider {
    async fn attempt(
        &self,
        audio: &AudioFileRef,
        _options: &ProviderOptions,
        _timeout: Duration,
    ) -> Result<String, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;

        if call <= self.fail_times {
            Err(self.error.clone())
        } else {
            Ok(format!("{} heard {}", self.name, audio.filename()))
        }
    }

    fn name(&self) -> &str {
        self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn supports_format(&self, format: &str) -> bool {
        polyscribe_lib::audio::is_supported_format(self.formats, format)
    }
}

fn catalog_of(providers: Vec<MockTranscriptionProvider>) -> Arc<ProviderCatalog> {
    let catalog = ProviderCatalog::new();
    for provider in providers {
        catalog.register(Arc::new(provider)).unwrap();
    }
    Arc::new(catalog)
}

// ============================================================================
// SECTION 1: Built-in Provider Pipeline
// ============================================================================

mod builtin_pipeline {
    use super::*;

    #[tokio::test]
    async fn test_wav_file_transcribed_by_primary() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_wav(dir.path(), "meeting.wav", 2)).unwrap();

        assert_eq!(audio.format(), ".wav");
        assert!((audio.duration_seconds().unwrap() - 2.0).abs() < 0.01);

        let catalog = Arc::new(ProviderCatalog::with_builtin_providers(&configured_providers()).unwrap());
        let executor = PlanExecutor::with_default_policy(catalog);
        let plan = TranscriptionPlan::simple("openai", Some("gemini"));

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(job.provider_used(), Some("openai"));
        assert_eq!(job.result(), Some("[simulated openai] transcription of meeting.wav"));
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_to_gemini() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_wav(dir.path(), "call_fail.wav", 1)).unwrap();

        let catalog = Arc::new(ProviderCatalog::with_builtin_providers(&configured_providers()).unwrap());
        let executor = PlanExecutor::with_default_policy(catalog);
        let plan = TranscriptionPlan::builder(["openai", "gemini"])
            .max_attempts(2)
            .build()
            .unwrap();

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert!(job.is_completed());
        assert_eq!(job.provider_used(), Some("gemini"));
        assert_eq!(job.result(), Some("[simulated gemini] transcription of call_fail.wav"));
    }

    #[tokio::test]
    async fn test_all_providers_fail() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_wav(dir.path(), "gemini_fail.wav", 1)).unwrap();

        let catalog = Arc::new(ProviderCatalog::with_builtin_providers(&configured_providers()).unwrap());
        let executor = PlanExecutor::with_default_policy(catalog);
        let plan = TranscriptionPlan::simple("openai", Some("gemini"));

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert!(job.is_failed());
        assert_eq!(job.provider_used(), Some("gemini"));
        let message = job.error_message().unwrap();
        assert!(message.starts_with("All providers failed. Last error:"));
        assert!(message.contains("Simulated Gemini API failure"));
    }

    #[tokio::test]
    async fn test_unconfigured_providers_resolve_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_wav(dir.path(), "memo.wav", 1)).unwrap();

        let catalog = Arc::new(ProviderCatalog::with_builtin_providers(&ProvidersSettings {
            openai: polyscribe_lib::config::OpenAiSettings {
                api_key_env: "POLYSCRIBE_TEST_UNSET_OPENAI_KEY".to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap());
        let executor = PlanExecutor::with_default_policy(catalog);
        let plan = TranscriptionPlan::simple("openai", Some("gemini"));

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert!(job.is_failed());
        assert!(job.provider_used().is_none());
        assert!(job
            .error_message()
            .unwrap()
            .starts_with("No provider available for requested names"));
    }

    #[tokio::test]
    async fn test_format_aware_skips_incompatible_primary() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_file(dir.path(), "lecture.flac")).unwrap();

        let catalog = Arc::new(ProviderCatalog::with_builtin_providers(&configured_providers()).unwrap());
        let executor = PlanExecutor::new(catalog, Box::new(FormatAwarePolicy::new(audio.format())));
        let plan = TranscriptionPlan::simple("openai", Some("gemini"));

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert!(job.is_completed());
        assert_eq!(job.provider_used(), Some("gemini"));
    }

    #[tokio::test]
    async fn test_gemini_timeout_is_terminal_for_provider() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_wav(dir.path(), "timeout.wav", 1)).unwrap();

        let catalog = Arc::new(ProviderCatalog::with_builtin_providers(&configured_providers()).unwrap());
        let executor = PlanExecutor::with_default_policy(catalog);
        let plan = TranscriptionPlan::builder(["gemini"])
            .max_attempts(3)
            .timeout(Duration::from_secs(7))
            .build()
            .unwrap();

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert!(job.is_failed());
        assert!(job.error_message().unwrap().contains("timed out after 7s"));
    }
}

// ============================================================================
// SECTION 2: Retry and Fallback Accounting
// ============================================================================

mod retry_fallback {
    use super::*;

    #[tokio::test]
    async fn test_retries_then_fallback_call_counts() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_file(dir.path(), "clip.mp3")).unwrap();

        let primary_calls = Arc::new(AtomicU32::new(0));
        let fallback_calls = Arc::new(AtomicU32::new(0));
        let catalog = catalog_of(vec![
            MockTranscriptionProvider::new("primary")
                .failing(u32::MAX)
                .with_call_counter(primary_calls.clone()),
            MockTranscriptionProvider::new("fallback")
                .failing(1)
                .with_call_counter(fallback_calls.clone()),
        ]);
        let executor = PlanExecutor::with_default_policy(catalog);
        let plan = TranscriptionPlan::builder(["primary", "fallback"])
            .max_attempts(3)
            .build()
            .unwrap();

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert!(job.is_completed());
        assert_eq!(job.result(), Some("fallback heard clip.mp3"));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 3);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unavailable_error_skips_retries() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_file(dir.path(), "clip.wav")).unwrap();

        let calls = Arc::new(AtomicU32::new(0));
        let catalog = catalog_of(vec![MockTranscriptionProvider::new("flaky")
            .with_error(ProviderError::Unavailable("quota exhausted".to_string()))
            .with_call_counter(calls.clone())]);
        let executor = PlanExecutor::with_default_policy(catalog);
        let plan = TranscriptionPlan::builder(["flaky"]).max_attempts(5).build().unwrap();

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert!(job.is_failed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(job.error_message().unwrap().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_availability_first_tries_unavailable_last() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_file(dir.path(), "clip.wav")).unwrap();

        let offline_calls = Arc::new(AtomicU32::new(0));
        let catalog = catalog_of(vec![
            MockTranscriptionProvider::new("offline")
                .available(false)
                .with_call_counter(offline_calls.clone()),
            MockTranscriptionProvider::new("online").failing(u32::MAX),
        ]);
        let executor = PlanExecutor::new(catalog, Box::new(AvailabilityFirstPolicy));
        let plan = TranscriptionPlan::with_fallbacks(["offline", "online"]).unwrap();

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert_eq!(offline_calls.load(Ordering::SeqCst), 1);
        assert!(job.is_completed());
        assert_eq!(job.provider_used(), Some("offline"));
    }

    #[tokio::test]
    async fn test_unsupported_format_moves_to_next_provider() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioFileRef::from_path(write_file(dir.path(), "clip.ogg")).unwrap();

        let calls = Arc::new(AtomicU32::new(0));
        let catalog = catalog_of(vec![
            MockTranscriptionProvider::new("narrow").with_call_counter(calls.clone()),
            MockTranscriptionProvider {
                formats: &[".ogg"],
                ..MockTranscriptionProvider::new("ogg")
            },
        ]);
        let executor = PlanExecutor::with_default_policy(catalog);
        let plan = TranscriptionPlan::with_fallbacks(["narrow", "ogg"]).unwrap();

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(job.provider_used(), Some("ogg"));
        assert!(job.is_completed());
    }
}

// ============================================================================
// SECTION 3: Settings-Driven Execution
// ============================================================================

mod settings_driven {
    use super::*;

    #[tokio::test]
    async fn test_settings_file_drives_execution() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");
        std::fs::write(
            &config_path,
            r#"
            [transcription]
            providers = ["gemini", "openai"]
            max_attempts = 2
            timeout_seconds = 30
            policy = "format-aware"

            [transcription.options.gemini]
            language_code = "pt-BR"

            [providers.openai]
            api_key = "sk-from-file"

            [providers.gemini]
            credentials_path = "/etc/gemini/credentials.json"
            project_id = "from-file"
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        settings.validate().unwrap();
        assert_eq!(settings.transcription.policy, PolicyKind::FormatAware);

        let audio = AudioFileRef::from_path(write_file(dir.path(), "briefing.mp4")).unwrap();
        let plan = settings.transcription.to_plan().unwrap();
        let catalog = Arc::new(ProviderCatalog::with_builtin_providers(&settings.providers).unwrap());
        let executor = PlanExecutor::new(catalog, settings.transcription.policy.build(audio.format()));

        let job = executor.execute(TranscriptionJob::new(audio), &plan).await;

        // gemini does not accept .mp4, so openai is the only candidate
        assert!(job.is_completed());
        assert_eq!(job.provider_used(), Some("openai"));
    }

    #[tokio::test]
    async fn test_concurrent_jobs_share_executor() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog_of(vec![MockTranscriptionProvider::new("shared")]);
        let executor = PlanExecutor::with_default_policy(catalog);
        let plan = TranscriptionPlan::with_fallbacks(["shared"]).unwrap();

        let before = metrics().read().get_summary().total_executions;

        let jobs: Vec<TranscriptionJob> = ["a.wav", "b.wav", "c.wav"]
            .iter()
            .map(|name| TranscriptionJob::new(AudioFileRef::from_path(write_file(dir.path(), name)).unwrap()))
            .collect();
        let mut jobs = jobs.into_iter();
        let (a, b, c) = tokio::join!(
            executor.execute(jobs.next().unwrap(), &plan),
            executor.execute(jobs.next().unwrap(), &plan),
            executor.execute(jobs.next().unwrap(), &plan),
        );

        for job in [&a, &b, &c] {
            assert!(job.is_completed());
        }
        assert_eq!(c.result(), Some("shared heard c.wav"));
        assert!(metrics().read().get_summary().total_executions >= before + 3);
    }
}
