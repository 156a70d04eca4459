//! Configuration status command.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use crate::state::{key_present, AppState, OPENAI_KEY_VAR, TAVILY_KEY_VAR};

/// Display the effective configuration, collaborator endpoints, and which
/// API keys are present in the environment.
pub fn status(state: &AppState, json: bool) -> Result<()> {
    let config = &state.config;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "config_dir": state.config_dir.display().to_string(),
            "run": {
                "timeout_secs": config.run.timeout_secs,
                "max_refine_rounds": config.run.max_refine_rounds,
                "angle_workers": config.run.angle_workers,
                "output_dir": config.run.output_dir.display().to_string(),
            },
            "collaborators": {
                "search": { "base_url": config.search.base_url },
                "text": {
                    "base_url": config.text.base_url,
                    "model": config.text.model,
                    "planner_model": config.text.planner_model,
                },
                "image": {
                    "base_url": config.image.base_url,
                    "model": config.image.model,
                    "size": config.image.size,
                },
                "video": { "program": config.video.program },
            },
            "keys": {
                "tavily_api_key": key_present(TAVILY_KEY_VAR),
                "openai_api_key": key_present(OPENAI_KEY_VAR),
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Newsroom v{}",
        style("📰").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Run ──").dim());
    println!("  Timeout:       {}s", config.run.timeout_secs);
    println!("  Refine rounds: {}", config.run.max_refine_rounds);
    println!("  Angle workers: {}", config.run.angle_workers);
    println!(
        "  Output dir:    {}",
        style(config.run.output_dir.display()).dim()
    );
    println!();

    println!("  {}", style("── Collaborators ──").dim());
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Role").fg(Color::White),
        Cell::new("Endpoint").fg(Color::White),
        Cell::new("Model").fg(Color::White),
    ]);
    table.add_row(vec!["search", config.search.base_url.as_str(), "-"]);
    table.add_row(vec![
        "planner",
        config.text.base_url.as_str(),
        config.text.planner_model.as_str(),
    ]);
    table.add_row(vec![
        "writer",
        config.text.base_url.as_str(),
        config.text.model.as_str(),
    ]);
    table.add_row(vec![
        "image",
        config.image.base_url.as_str(),
        config.image.model.as_str(),
    ]);
    table.add_row(vec!["video", "-", config.video.program.as_str()]);
    println!("{table}");
    println!();

    println!("  {}", style("── Keys ──").dim());
    let check_mark = |ok: bool| {
        if ok {
            format!("{}", style("✓").green())
        } else {
            format!("{}", style("✗").red())
        }
    };
    println!("  {} {}", check_mark(key_present(TAVILY_KEY_VAR)), TAVILY_KEY_VAR);
    println!("  {} {}", check_mark(key_present(OPENAI_KEY_VAR)), OPENAI_KEY_VAR);
    println!();

    println!("  {}", style("── System ──").dim());
    println!(
        "  Config dir: {}",
        style(state.config_dir.display()).dim()
    );
    println!();

    Ok(())
}
