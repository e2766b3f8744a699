//! Application entry point and dispatch.

use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use matmul_core::error::MatMulError;
use matmul_orchestration::{
    run_phase, run_pipeline, CalculationHandler, HttpCallbackNotifier, NullNotifier,
    PipelineContext, PipelineRequest, ReportNotifier,
};
use matmul_store::{ComputationStore, FsStore, InMemoryStore};

use crate::config::{AppConfig, Command, PhaseArgs, RunArgs, StoreKind};
use crate::output::{write_json_line, ReportPresenter};

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    match &config.command {
        Command::Run(args) => run_local(args),
        Command::Phase(args) => run_single_phase(args),
    }
}

fn open_store(
    kind: StoreKind,
    dir: Option<&Path>,
) -> Result<Arc<dyn ComputationStore>, MatMulError> {
    match kind {
        StoreKind::Memory => Ok(Arc::new(InMemoryStore::new())),
        StoreKind::Fs => {
            let dir = dir.ok_or_else(|| {
                MatMulError::Config("--store fs requires --store-dir".into())
            })?;
            Ok(Arc::new(FsStore::open(dir)?))
        }
    }
}

fn notifier(callback: Option<&str>, timeout: Duration) -> Arc<dyn ReportNotifier> {
    if callback.is_some() {
        Arc::new(HttpCallbackNotifier::new(timeout))
    } else {
        Arc::new(NullNotifier)
    }
}

fn run_local(args: &RunArgs) -> Result<()> {
    let store = open_store(args.store, args.store_dir.as_deref())?;
    let handler = CalculationHandler::with_notifier(
        store,
        notifier(args.callback.as_deref(), args.callback_timeout_duration()),
    );

    let request = PipelineRequest {
        size: args.size,
        max_value: args.max_value,
        seed: args.seed,
        callback_url: args.callback.clone(),
        policy: args.policy(),
        keep_matrices: args.show_matrices,
    };
    let outcome = run_pipeline(&handler, &request)?;

    let presenter = ReportPresenter {
        json: args.json,
        quiet: args.quiet,
        show_matrices: args.show_matrices,
    };
    let mut stdout = io::stdout().lock();
    presenter
        .present(&mut stdout, &outcome)
        .context("failed to write report")?;
    stdout.flush()?;
    Ok(())
}

fn run_single_phase(args: &PhaseArgs) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read phase context from stdin")?;
    let ctx = parse_context(&input)?;

    let store: Arc<dyn ComputationStore> = Arc::new(FsStore::open(&args.store_dir)?);
    let handler = CalculationHandler::with_notifier(
        store,
        notifier(ctx.callback_url.as_deref(), args.callback_timeout_duration()),
    );

    let output = run_phase(&handler, args.phase, ctx)
        .with_context(|| format!("phase {} failed", args.phase))?;

    let mut stdout = io::stdout().lock();
    write_json_line(&mut stdout, &output).context("failed to write phase output")?;
    stdout.flush()?;
    Ok(())
}

/// Blank input is an empty context.
fn parse_context(input: &str) -> Result<PipelineContext, MatMulError> {
    if input.trim().is_empty() {
        return Ok(PipelineContext::default());
    }
    serde_json::from_str(input)
        .map_err(|e| MatMulError::Config(format!("invalid phase context: {e}")))
}
