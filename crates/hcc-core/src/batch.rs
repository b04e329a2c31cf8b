//! Batch member scoring.
//!
//! Members are scored independently against the shared, read-only lookup
//! snapshot, in parallel through rayon unless disabled. A failing member is
//! reported in its own outcome and never aborts the batch.

use std::time::Instant;

use hcc_model::{Beneficiary, MemberScore, ModelVersion};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::info;

use crate::engine::{CalcParams, RafEngine};
use crate::error::EngineError;

/// Configuration for batch scoring.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    /// Score members on the rayon pool.
    pub parallel: bool,
    /// Overrides applied to every member.
    pub params: CalcParams,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            params: CalcParams::default(),
        }
    }
}

impl BatchConfig {
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn with_params(mut self, params: CalcParams) -> Self {
        self.params = params;
        self
    }
}

/// One member to score.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberRequest {
    pub member_id: String,
    #[serde(flatten)]
    pub beneficiary: Beneficiary,
    /// Diagnosis or category codes; separators inside entries are allowed.
    #[serde(default)]
    pub conditions: Vec<String>,
    /// Per-member version, overriding the batch setting.
    #[serde(default)]
    pub version: Option<ModelVersion>,
}

/// A member as read from input: ready to score, or rejected with the reason.
#[derive(Debug)]
pub enum MemberInput {
    Request(MemberRequest),
    Rejected { member_id: String, error: EngineError },
}

impl MemberInput {
    pub fn member_id(&self) -> &str {
        match self {
            MemberInput::Request(request) => &request.member_id,
            MemberInput::Rejected { member_id, .. } => member_id,
        }
    }
}

impl From<MemberRequest> for MemberInput {
    fn from(request: MemberRequest) -> Self {
        MemberInput::Request(request)
    }
}

#[derive(Debug)]
pub struct MemberOutcome {
    pub member_id: String,
    pub result: Result<MemberScore, EngineError>,
}

impl MemberOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes in request order, with timing.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<MemberOutcome>,
    pub elapsed_ms: u64,
}

impl BatchReport {
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok()).count()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.len() - self.failed_count()
    }
}

pub struct BatchScorer<'e> {
    engine: &'e RafEngine,
    config: BatchConfig,
}

impl<'e> BatchScorer<'e> {
    pub fn new(engine: &'e RafEngine, config: BatchConfig) -> Self {
        Self { engine, config }
    }

    pub fn score(&self, requests: &[MemberRequest]) -> BatchReport {
        self.score_with_progress(requests, || {})
    }

    /// Scores every request, calling `on_member` once per finished member.
    pub fn score_with_progress<F>(&self, requests: &[MemberRequest], on_member: F) -> BatchReport
    where
        F: Fn() + Sync,
    {
        let started = Instant::now();
        let score_one = |request: &MemberRequest| {
            let outcome = self.score_member(request);
            on_member();
            outcome
        };

        let outcomes: Vec<MemberOutcome> = if self.config.parallel {
            requests.par_iter().map(score_one).collect()
        } else {
            requests.iter().map(score_one).collect()
        };
        finish(outcomes, started)
    }

    pub fn score_inputs(&self, inputs: Vec<MemberInput>) -> BatchReport {
        self.score_inputs_with_progress(inputs, || {})
    }

    /// Like [`Self::score_with_progress`], but rejected inputs pass through
    /// as failed outcomes in their original position.
    pub fn score_inputs_with_progress<F>(&self, inputs: Vec<MemberInput>, on_member: F) -> BatchReport
    where
        F: Fn() + Sync,
    {
        let started = Instant::now();
        let score_one = |input: MemberInput| {
            let outcome = match input {
                MemberInput::Request(request) => self.score_member(&request),
                MemberInput::Rejected { member_id, error } => MemberOutcome {
                    member_id,
                    result: Err(error),
                },
            };
            on_member();
            outcome
        };

        let outcomes: Vec<MemberOutcome> = if self.config.parallel {
            inputs.into_par_iter().map(score_one).collect()
        } else {
            inputs.into_iter().map(score_one).collect()
        };
        finish(outcomes, started)
    }

    fn score_member(&self, request: &MemberRequest) -> MemberOutcome {
        let params = CalcParams {
            version: request.version.or(self.config.params.version),
            ..self.config.params
        };
        MemberOutcome {
            member_id: request.member_id.clone(),
            result: self
                .engine
                .score_member(&request.conditions, &request.beneficiary, &params),
        }
    }
}

fn finish(outcomes: Vec<MemberOutcome>, started: Instant) -> BatchReport {
    let report = BatchReport {
        outcomes,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        members = report.outcomes.len(),
        failed = report.failed_count(),
        elapsed_ms = report.elapsed_ms,
        "batch scored"
    );
    report
}

/// Scores `requests` in parallel with the engine defaults.
pub fn score_batch(engine: &RafEngine, requests: &[MemberRequest]) -> Vec<MemberOutcome> {
    BatchScorer::new(engine, BatchConfig::default())
        .score(requests)
        .outcomes
}
