//! Essay-only research command.

use anyhow::Result;
use console::style;
use uuid::Uuid;

use newsroom_infra::publish::publisher::file_essay;
use newsroom_types::run::RunRecord;

use super::publish::{finish_progress, report_failure, spawn_progress_printer};
use crate::state::AppState;

/// Research `topic` and print the essay to stdout, or save it with `--save`.
pub async fn research(state: &AppState, topic: &str, save: bool, json: bool) -> Result<()> {
    let desk = state.desk(state.config.run.clone())?;
    let progress = (!json).then(|| spawn_progress_printer(state, "Commissioning the story..."));

    let record = RunRecord::started(Uuid::now_v7(), topic);
    let story = match desk.research(topic).await {
        Ok(story) => story,
        Err(err) => {
            finish_progress(progress);
            return report_failure(record, err, json);
        }
    };
    finish_progress(progress);

    if save {
        let path = file_essay(&state.config.run.output_dir, topic, &story).await?;
        if json {
            let summary = serde_json::json!({
                "topic": topic,
                "essay": path,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!();
            println!(
                "  {} Essay filed at {}",
                style("✓").green().bold(),
                style(path.display()).cyan()
            );
            println!();
        }
        return Ok(());
    }

    if json {
        let summary = serde_json::json!({
            "topic": topic,
            "body": story.body,
            "references": story.references,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", story.to_markdown());
    }

    Ok(())
}
