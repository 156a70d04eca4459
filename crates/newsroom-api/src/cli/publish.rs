//! Full-pipeline publish command.

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use newsroom_core::pipeline::ResearchError;
use newsroom_infra::publish::publisher::{file_essay, PublicationReport};
use newsroom_types::progress::ProgressEvent;
use newsroom_types::run::{RunRecord, RunStatus};

use crate::state::AppState;

/// Config-file overrides taken from the command line.
pub struct PublishOpts {
    pub essay_only: bool,
    pub timeout: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub refine_rounds: Option<u32>,
}

/// Research `topic` and publish every artifact (or just the essay).
pub async fn publish(state: &AppState, topic: &str, opts: PublishOpts, json: bool) -> Result<()> {
    let mut run = state.config.run.clone();
    if let Some(secs) = opts.timeout {
        run.timeout_secs = secs;
    }
    if let Some(rounds) = opts.refine_rounds {
        run.max_refine_rounds = rounds;
    }
    let output_dir = opts.output_dir.unwrap_or_else(|| run.output_dir.clone());

    let desk = state.desk(run)?;
    let progress = (!json).then(|| spawn_progress_printer(state, "Commissioning the story..."));

    let record = RunRecord::started(Uuid::now_v7(), topic);
    let story = match desk.research(topic).await {
        Ok(story) => story,
        Err(err) => {
            finish_progress(progress);
            return report_failure(record, err, json);
        }
    };

    if opts.essay_only {
        let essay = file_essay(&output_dir, topic, &story).await?;
        finish_progress(progress);

        if json {
            let summary = serde_json::json!({
                "topic": topic,
                "essay": essay,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!();
            println!(
                "  {} Essay filed at {}",
                style("✓").green().bold(),
                style(essay.display()).cyan()
            );
            println!();
        }
        return Ok(());
    }

    let publisher = state.publisher(output_dir)?;
    let outcome = publisher.publish(Uuid::now_v7(), topic, &story).await;
    finish_progress(progress);
    let report = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(topic, &report);
    Ok(())
}

/// Print the final artifact summary.
fn print_report(topic: &str, report: &PublicationReport) {
    println!();
    println!(
        "  {} Published '{}'",
        style("✓").green().bold(),
        style(topic).cyan()
    );
    println!();

    println!("  {}", style("── Artifacts ──").dim());
    println!("  Essay:        {}", report.essay.display());
    println!("  Storyboard:   {}", report.storyboard.display());
    match &report.illustration {
        Some(path) => println!("  Illustration: {}", path.display()),
        None => println!("  Illustration: {}", style("skipped").yellow()),
    }
    match &report.video {
        Some(path) => println!("  Video:        {}", path.display()),
        None => println!("  Video:        {}", style("skipped").yellow()),
    }

    if !report.warnings.is_empty() {
        println!();
        println!("  {}", style("── Warnings ──").dim());
        for warning in &report.warnings {
            println!("  {} {}", style("!").yellow().bold(), warning);
        }
    }
    println!();
}

/// Print the failure banner for a run that produced no story, then
/// propagate the error for the exit code.
pub(crate) fn report_failure(mut record: RunRecord, err: ResearchError, json: bool) -> Result<()> {
    let status = match &err {
        ResearchError::TimedOut { .. } => RunStatus::TimedOut,
        _ => RunStatus::Failed,
    };
    record.finish(status, Some(err.to_string()));

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!();
        match &err {
            ResearchError::TimedOut { secs } => {
                println!(
                    "  {} Research timed out after {secs}s. Try a longer --timeout.",
                    style("⏱").yellow().bold()
                );
            }
            other => {
                println!("  {} Research failed: {}", style("✗").red().bold(), other);
            }
        }
        println!();
    }
    Err(err.into())
}

/// Follow the progress bus with a spinner until the handle is dropped.
pub(crate) fn spawn_progress_printer(
    state: &AppState,
    initial: &str,
) -> (tokio::task::JoinHandle<()>, ProgressBar) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(initial.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let mut rx = state.progress.subscribe();
    let handle = tokio::spawn({
        let spinner = spinner.clone();
        async move {
            loop {
                match rx.recv().await {
                    Ok(ProgressEvent::StageUpdate { message, .. }) => spinner.set_message(message),
                    Ok(ProgressEvent::StepCompleted { step, .. }) => {
                        spinner.set_message(format!("{step} finished"));
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "progress receiver lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    });

    (handle, spinner)
}

/// Stop the progress printer and clear its spinner line.
pub(crate) fn finish_progress(progress: Option<(tokio::task::JoinHandle<()>, ProgressBar)>) {
    if let Some((handle, spinner)) = progress {
        handle.abort();
        spinner.finish_and_clear();
    }
}
