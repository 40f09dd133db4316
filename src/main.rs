use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use flowscope::api::{FlowsClient, SnapshotSource};
use flowscope::app::App;
use flowscope::config::Config;
use flowscope::inspector::{project, RenderModel, StageDetail, StepMark, ViewState};
use flowscope::logging;

#[derive(Parser)]
#[command(name = "flowscope")]
#[command(about = "Terminal inspector for server-driven authentication flows")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a flow's execution in the TUI panel
    Watch {
        /// Flow slug, or a full flow URL to extract the slug from
        flow: String,
    },

    /// Fetch one inspection snapshot and print it
    Show {
        /// Flow slug, or a full flow URL to extract the slug from
        flow: String,
    },
}

/// Resolve the flow slug from a bare slug or a flow URL.
///
/// Flow pages live at `/if/flow/<slug>/...`, so the slug is the third
/// path segment. A malformed path yields an empty slug; the fetch is
/// still attempted and fails upstream with a backend error.
fn resolve_flow_slug(input: &str) -> String {
    if !input.contains('/') {
        return input.to_string();
    }

    let path = match input.find("://") {
        Some(idx) => {
            let rest = &input[idx + 3..];
            match rest.find('/') {
                Some(p) => &rest[p..],
                None => "",
            }
        }
        None => input,
    };

    let slug = path.split('/').nth(3).unwrap_or_default().to_string();
    if slug.is_empty() {
        tracing::warn!(%input, "could not extract a flow slug; the fetch will fail upstream");
    }
    slug
}

/// Print a render model as plain text (for the `show` command).
fn print_model(model: &RenderModel) {
    match model {
        RenderModel::Loading => println!("Loading"),
        RenderModel::Denied { status_text } => println!("Access denied: {}", status_text),
        RenderModel::Populated(view) => {
            println!("Next stage");
            println!("  Stage name: {}", view.next_stage.name);
            println!("  Stage kind: {}", view.next_stage.verbose_name);
            match &view.next_stage.detail {
                StageDetail::FlowCompleted => println!("  This flow is completed."),
                StageDetail::Object(body) => {
                    for line in body.lines() {
                        println!("  {}", line);
                    }
                }
            }

            println!("\nPlan history");
            for entry in &view.history {
                let glyph = match entry.mark {
                    StepMark::Completed => "✓",
                    StepMark::Current => "▶",
                    StepMark::Pending => "○",
                };
                println!("  {} {} {}", glyph, entry.name, entry.verbose_name);
            }

            println!("\nPlan context");
            for line in view.plan_context.lines() {
                println!("  {}", line);
            }

            println!("\nSession ID");
            println!("  {}", view.session_id);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = matches!(cli.command, Commands::Watch { .. });
    let _logging = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Commands::Watch { flow } => {
            let slug = resolve_flow_slug(&flow);
            let client: Arc<dyn SnapshotSource> = Arc::new(FlowsClient::new(&config.api)?);
            let mut app = App::new(config, slug, client);
            app.run().await
        }
        Commands::Show { flow } => {
            let slug = resolve_flow_slug(&flow);
            let client = FlowsClient::new(&config.api)?;
            match client.fetch_inspection(&slug).await {
                Ok(snapshot) => {
                    print_model(&project(&ViewState::Populated(snapshot)));
                    Ok(())
                }
                Err(error) => {
                    eprintln!("Error: {}", error.status_text());
                    std::process::exit(1);
                }
            }
        }
    }
}
