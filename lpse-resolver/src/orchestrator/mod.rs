//! Orchestrator module for the resolver.
//!
//! Coordinates the line reader, the LPSE service and the JSON line writer.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use lpse_repository::{ApplySummary, LpseService, Resolution};

use crate::errors::PipelineError;
use crate::reader::{LineReader, RequestLine};

/// Configuration for the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// Pass each resolution to the service's query applicator.
    pub apply: bool,
    /// Resolve requests as type-ahead lookahead queries.
    pub lookahead: bool,
}

/// One output record, written as a single JSON line.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRecord {
    pub request: RequestLine,
    pub resolution: Resolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<ApplySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub requests: u64,
    pub apply_errors: u64,
}

/// Orchestrator that resolves a stream of request lines.
pub struct Orchestrator {
    service: LpseService,
    config: OrchestratorConfig,
    /// Total number of requests resolved since startup.
    total_requests: AtomicU64,
    /// Total number of requests the applicator failed on.
    total_apply_errors: AtomicU64,
}

impl Orchestrator {
    /// Create a new orchestrator that only resolves.
    pub fn new(service: LpseService) -> Self {
        Self::with_config(service, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(service: LpseService, config: OrchestratorConfig) -> Self {
        Self {
            service,
            config,
            total_requests: AtomicU64::new(0),
            total_apply_errors: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &LpseService {
        &self.service
    }

    /// Run until the input ends or a shutdown signal is received.
    ///
    /// A failing applicator does not stop the run; the error is recorded on
    /// that request's output line.
    #[instrument(skip(self, input, output), fields(collection = %self.service.registry().collection_name()))]
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<RunSummary, PipelineError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            apply = self.config.apply,
            lookahead = self.config.lookahead,
            "Starting LPSE resolver"
        );

        let mut reader = LineReader::new(input);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                request = reader.next_request() => {
                    match request? {
                        Some(request) => {
                            let record = self.process(request).await;
                            let mut line = serde_json::to_vec(&record)?;
                            line.push(b'\n');
                            output
                                .write_all(&line)
                                .await
                                .map_err(|e| PipelineError::write(e.to_string()))?;
                        }
                        None => {
                            info!("Input ended");
                            break;
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        output
            .flush()
            .await
            .map_err(|e| PipelineError::write(e.to_string()))?;

        let summary = RunSummary {
            requests: self.total_requests.load(Ordering::Relaxed),
            apply_errors: self.total_apply_errors.load(Ordering::Relaxed),
        };
        info!(
            total_requests = summary.requests,
            total_apply_errors = summary.apply_errors,
            "Resolver shutdown complete"
        );
        Ok(summary)
    }

    async fn process(&self, request: RequestLine) -> ResolvedRecord {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        let query_string = request.query_string.as_deref();
        let resolution = if self.config.lookahead {
            self.service.resolve_lookahead(&request.path, query_string)
        } else {
            self.service.resolve(&request.path, query_string)
        };
        debug!(
            line = request.line,
            canonical_uri = %resolution.canonical_uri,
            "Request resolved"
        );

        let (applied, error) = if self.config.apply {
            match self.service.apply(&resolution).await {
                Ok(summary) => (Some(summary), None),
                Err(e) => {
                    self.total_apply_errors.fetch_add(1, Ordering::Relaxed);
                    warn!(line = request.line, error = %e, "Failed to apply resolution");
                    (None, Some(e.to_string()))
                }
            }
        } else {
            (None, None)
        };

        ResolvedRecord {
            request,
            resolution,
            applied,
            error,
        }
    }
}
