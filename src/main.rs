use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dwz::api::{HouseholdArgs, OptimizeArgs, optimize_command, plan_command, run_http_server};
use dwz::core::JurisdictionRules;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "dwz",
    about = "Die-with-zero retirement planner (earliest age, sustainable spend, super split)"
)]
struct Cli {
    #[arg(long, global = true, help = "JSON file with jurisdiction rules")]
    rules: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Print a retirement plan as JSON.
    Plan(HouseholdArgs),
    /// Print the recommended super savings split as JSON.
    Optimize(OptimizeArgs),
}

fn load_rules(path: Option<&Path>) -> anyhow::Result<JurisdictionRules> {
    let Some(path) = path else {
        return Ok(JurisdictionRules::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading rules file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing rules file {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rules = load_rules(cli.rules.as_deref())?;

    match cli.command {
        Command::Serve { port } => run_http_server(port, rules)
            .await
            .with_context(|| format!("serving on port {port}"))?,
        Command::Plan(args) => {
            let response = plan_command(&args, &rules)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Optimize(args) => {
            let response = optimize_command(&args, &rules)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
