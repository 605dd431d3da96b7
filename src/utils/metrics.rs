//! Execution Metrics
//!
//! Collect and expose statistics about plan executions: how often jobs
//! succeed, how many attempts they need and which providers finish them.

use crate::transcription::JobStatus;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;
use uuid::Uuid;

/// Maximum number of execution records to keep
const MAX_HISTORY: usize = 100;

/// Global metrics instance
static METRICS: once_cell::sync::Lazy<RwLock<ExecutionMetrics>> =
    once_cell::sync::Lazy::new(|| RwLock::new(ExecutionMetrics::new()));

/// Get the global metrics instance
pub fn metrics() -> &'static RwLock<ExecutionMetrics> {
    &METRICS
}

/// Execution metrics collector
pub struct ExecutionMetrics {
    /// Most recent executions
    executions: VecDeque<ExecutionRecord>,
    /// Current session start time
    session_start: Instant,
    /// Executions recorded this session, including evicted ones
    total_executions: u64,
    /// Attempts made this session
    total_attempts: u64,
}

impl ExecutionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            executions: VecDeque::with_capacity(MAX_HISTORY),
            session_start: Instant::now(),
            total_executions: 0,
            total_attempts: 0,
        }
    }

    /// Record a finished execution
    pub fn record_execution(&mut self, record: ExecutionRecord) {
        self.total_executions += 1;
        self.total_attempts += record.attempts as u64;

        if self.executions.len() >= MAX_HISTORY {
            self.executions.pop_front();
        }
        self.executions.push_back(record);
    }

    /// Get summary statistics over the retained records
    pub fn get_summary(&self) -> MetricsSummary {
        let count = self.executions.len();

        if count == 0 {
            return MetricsSummary {
                session_duration_ms: self.session_start.elapsed().as_millis() as u64,
                ..MetricsSummary::default()
            };
        }

        let completed = self
            .executions
            .iter()
            .filter(|r| r.status == JobStatus::Completed)
            .count();
        let failed = self
            .executions
            .iter()
            .filter(|r| r.status == JobStatus::Failed)
            .count();
        let attempts: u64 = self.executions.iter().map(|r| r.attempts as u64).sum();
        let processing: u64 = self.executions.iter().map(|r| r.processing_time_ms).sum();

        let mut completions_by_provider = BTreeMap::new();
        for record in self.executions.iter().filter(|r| r.status == JobStatus::Completed) {
            if let Some(provider) = &record.provider {
                *completions_by_provider.entry(provider.clone()).or_insert(0) += 1;
            }
        }

        // Executions that needed more than their first provider
        let fallbacks = self.executions.iter().filter(|r| r.providers_tried > 1).count();

        MetricsSummary {
            execution_count: count,
            completed_count: completed,
            failed_count: failed,
            success_rate: completed as f64 / count as f64,
            avg_attempts: attempts as f64 / count as f64,
            avg_processing_ms: processing / count as u64,
            fallback_count: fallbacks,
            completions_by_provider,
            session_duration_ms: self.session_start.elapsed().as_millis() as u64,
            total_executions: self.total_executions,
            total_attempts: self.total_attempts,
        }
    }

    /// Get recent execution records, newest first
    pub fn get_recent(&self, count: usize) -> Vec<ExecutionRecord> {
        self.executions.iter().rev().take(count).cloned().collect()
    }

    /// Reset metrics
    pub fn reset(&mut self) {
        self.executions.clear();
        self.session_start = Instant::now();
        self.total_executions = 0;
        self.total_attempts = 0;
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Record of a single plan execution
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionRecord {
    /// Timestamp when the record was created (unix ms)
    pub timestamp_ms: u64,
    pub job_id: Uuid,
    /// Final job status
    pub status: JobStatus,
    /// Provider that produced the outcome, if any was tried
    pub provider: Option<String>,
    /// Attempts made across all providers
    pub attempts: u32,
    /// Providers entered, including ones rejected by validation
    pub providers_tried: u32,
    /// Wall-clock execution time in milliseconds
    pub processing_time_ms: u64,
}

impl ExecutionRecord {
    /// Create a new record builder
    pub fn builder() -> ExecutionRecordBuilder {
        ExecutionRecordBuilder::new()
    }
}

/// Builder for ExecutionRecord
pub struct ExecutionRecordBuilder {
    record: ExecutionRecord,
}

impl ExecutionRecordBuilder {
    fn new() -> Self {
        Self {
            record: ExecutionRecord {
                timestamp_ms: std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis() as u64,
                job_id: Uuid::nil(),
                status: JobStatus::Pending,
                provider: None,
                attempts: 0,
                providers_tried: 0,
                processing_time_ms: 0,
            },
        }
    }

    pub fn job_id(mut self, id: Uuid) -> Self {
        self.record.job_id = id;
        self
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn provider(mut self, provider: Option<&str>) -> Self {
        self.record.provider = provider.map(str::to_string);
        self
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.record.attempts = attempts;
        self
    }

    pub fn providers_tried(mut self, providers: u32) -> Self {
        self.record.providers_tried = providers;
        self
    }

    pub fn processing_time_ms(mut self, ms: u64) -> Self {
        self.record.processing_time_ms = ms;
        self
    }

    pub fn build(self) -> ExecutionRecord {
        self.record
    }
}

/// Summary of execution metrics
#[derive(Debug, Clone, Serialize, Default)]
pub struct MetricsSummary {
    /// Number of retained execution records
    pub execution_count: usize,
    pub completed_count: usize,
    pub failed_count: usize,
    /// Completed / retained executions
    pub success_rate: f64,
    /// Average attempts per execution
    pub avg_attempts: f64,
    /// Average wall-clock time per execution (ms)
    pub avg_processing_ms: u64,
    /// Executions that moved past their first provider
    pub fallback_count: usize,
    /// Completed executions per provider
    pub completions_by_provider: BTreeMap<String, usize>,
    /// Session duration in ms
    pub session_duration_ms: u64,
    /// Executions recorded in this session
    pub total_executions: u64,
    /// Attempts recorded in this session
    pub total_attempts: u64,
}
