//! Phase context threaded between externally driven steps.
//!
//! A workflow engine invokes one phase at a time and passes this record from
//! each step's output to the next step's input. Worker fields travel as
//! strings on the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use matmul_core::constants::{DEFAULT_MATRIX_SIZE, DEFAULT_MAX_VALUE, SEED_FROM_CLOCK};
use matmul_core::error::{MatMulError, Result};
use matmul_core::model::CalculationId;
use matmul_core::report::{now_millis, Report};

use crate::handler::CalculationHandler;

/// Record passed between phases. Every field is optional on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PipelineContext {
    pub start: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    pub matrix_size: usize,
    pub max_value: i32,
    pub seed: i64,
    #[serde(rename = "CalculationID", skip_serializing_if = "Option::is_none")]
    pub calculation_id: Option<CalculationId>,
    #[serde(rename = "WorkerID", skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_count: Option<String>,
}

impl PipelineContext {
    /// Fill unset creation parameters: size 200, max value 150, clock seed.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        if self.matrix_size == 0 {
            tracing::info!(size = DEFAULT_MATRIX_SIZE, "no size set, using default");
            self.matrix_size = DEFAULT_MATRIX_SIZE;
        }
        if self.max_value == 0 {
            tracing::info!(max_value = DEFAULT_MAX_VALUE, "no max value set, using default");
            self.max_value = DEFAULT_MAX_VALUE;
        }
        if self.seed == 0 {
            self.seed = SEED_FROM_CLOCK;
        }
        self
    }

    fn id(&self) -> Result<&CalculationId> {
        self.calculation_id
            .as_ref()
            .ok_or_else(|| MatMulError::Config("context has no CalculationID".into()))
    }

    fn worker_count(&self) -> Result<usize> {
        parse_field("WorkerCount", self.worker_count.as_deref())
    }

    fn worker_id(&self) -> Result<usize> {
        parse_field("WorkerID", self.worker_id.as_deref())
    }
}

fn parse_field(name: &str, value: Option<&str>) -> Result<usize> {
    let raw = value.ok_or_else(|| MatMulError::Config(format!("context has no {name}")))?;
    raw.trim()
        .parse()
        .map_err(|e| MatMulError::Config(format!("{name} {raw:?}: {e}")))
}

/// One step of the externally driven lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Create,
    Serial,
    Schedule,
    Work,
    Assemble,
    Report,
}

impl Phase {
    pub const ALL: [Self; 6] = [
        Self::Create,
        Self::Serial,
        Self::Schedule,
        Self::Work,
        Self::Assemble,
        Self::Report,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Serial => "serial",
            Self::Schedule => "schedule",
            Self::Work => "work",
            Self::Assemble => "assemble",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = MatMulError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MatMulError::Config(format!("unknown phase: {s}")))
    }
}

/// What a phase hands to the next step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PhaseOutput {
    Context(PipelineContext),
    Report(Report),
}

/// Run a single phase against `handler`.
pub fn run_phase(
    handler: &CalculationHandler,
    phase: Phase,
    ctx: PipelineContext,
) -> Result<PhaseOutput> {
    tracing::debug!(%phase, "running phase");
    match phase {
        Phase::Create => {
            let start = now_millis();
            let ctx = ctx.with_defaults();
            let id = handler.create_calculation(ctx.matrix_size, ctx.max_value, ctx.seed)?;
            Ok(PhaseOutput::Context(PipelineContext {
                start,
                callback_url: ctx.callback_url,
                matrix_size: ctx.matrix_size,
                max_value: ctx.max_value,
                seed: ctx.seed,
                calculation_id: Some(id),
                worker_id: None,
                worker_count: None,
            }))
        }
        Phase::Serial => {
            handler.run_serial_multiply(ctx.id()?)?;
            Ok(PhaseOutput::Context(PipelineContext {
                worker_count: Some("0".into()),
                ..ctx
            }))
        }
        Phase::Schedule => {
            handler.schedule_tasks(ctx.id()?, ctx.worker_count()?)?;
            Ok(PhaseOutput::Context(ctx))
        }
        Phase::Work => {
            handler.run_worker(ctx.id()?, ctx.worker_id()?)?;
            Ok(PhaseOutput::Context(ctx))
        }
        Phase::Assemble => {
            handler.assemble_result(ctx.id()?, ctx.worker_count()?)?;
            Ok(PhaseOutput::Context(ctx))
        }
        Phase::Report => {
            let report = handler.generate_report(
                ctx.id()?,
                ctx.start,
                ctx.worker_count()?,
                ctx.callback_url.as_deref(),
            )?;
            Ok(PhaseOutput::Report(report))
        }
    }
}
