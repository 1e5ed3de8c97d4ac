use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use app_gate::config::{load_config, load_default_config};
use app_gate::gate::{AccessGate, SessionIdentity};
use app_gate::routing::{normalize_path, AllowList};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Management CLI for the app gate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what the gate decides for a path
    Check {
        /// Request path, e.g. /blog/2024/post
        path: String,

        /// Evaluate as a signed-in user
        #[arg(short, long)]
        authenticated: bool,

        /// Configuration file with extra public paths
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the public path patterns
    Patterns {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Fetch a page of insights queries from a running server
    Queries {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        /// Access token of a project member
        #[arg(short, long, env = "APP_GATE_TOKEN")]
        token: String,

        /// Project id
        #[arg(short, long)]
        project: String,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        page: Option<u32>,

        /// Lower bound, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// Upper bound, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
    },
}

fn load_allow_list(config: Option<&PathBuf>) -> Result<AllowList, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => load_config(path)?,
        None => load_default_config()?,
    };
    Ok(AllowList::with_extra(&config.gate.extra_public_paths)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { path, authenticated, config } => {
            let gate = AccessGate::new(load_allow_list(config.as_ref())?);
            let identity = if authenticated {
                SessionIdentity::present("cli")
            } else {
                SessionIdentity::Absent
            };
            let decision = gate.decide(&normalize_path(&path), &identity);
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::Patterns { config } => {
            for pattern in load_allow_list(config.as_ref())?.patterns() {
                println!("{}", pattern);
            }
        }
        Commands::Queries { url, token, project, limit, page, from, to } => {
            let client = reqwest::Client::new();

            let mut headers = HeaderMap::new();
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))?,
            );

            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }
            if let Some(from) = from {
                query.push(("from", from));
            }
            if let Some(to) = to {
                query.push(("to", to));
            }

            let res = client
                .get(format!("{}/api/project/{}/insights/queries", url, project))
                .headers(headers)
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if let Err(e) = ensure_success(status) {
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(e);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Non-2xx answers fail the command so scripts see a non-zero exit.
fn ensure_success(status: reqwest::StatusCode) -> Result<(), Box<dyn std::error::Error>> {
    if status.is_success() {
        Ok(())
    } else {
        Err(format!("server returned status {}", status).into())
    }
}
