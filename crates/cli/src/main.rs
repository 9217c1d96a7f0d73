//! Workpool CLI - Command-line client for the Workpool daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527";

#[derive(Parser)]
#[command(name = "workpool")]
#[command(about = "Workpool queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "WORKPOOL_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a message to a processor
    Enqueue {
        /// Processor ID (1-based)
        processor: usize,

        /// Number of messages to submit
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Show the queue size of a processor
    Size {
        /// Processor ID (1-based)
        processor: usize,
    },

    /// Show per-processor statistics
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct EnqueueResult {
    message: String,
    count: usize,
    queue_size: usize,
}

#[derive(Deserialize, Tabled)]
struct ProcessorRow {
    id: usize,
    state: String,
    worker_count: usize,
    live_workers: usize,
    queue_size: usize,
    enqueued: u64,
    processed: u64,
    failed: u64,
    faulted: u64,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Enqueue { processor, count } => {
            let mut results = Vec::with_capacity(count);
            for _ in 0..count {
                let result = call_rpc(
                    &cli.rpc_url,
                    "queue.enqueue.v1",
                    json!({ "processor": processor }),
                )
                .await?;
                results.push(serde_json::from_value::<EnqueueResult>(result)?);
            }

            println!(
                "{}",
                format!("✓ {} message(s) enqueued on processor {}", count, processor)
                    .green()
                    .bold()
            );
            println!();
            println!("{}", Table::new(results));
        }

        Commands::Size { processor } => {
            let result = call_rpc(
                &cli.rpc_url,
                "queue.size.v1",
                json!({ "processor": processor }),
            )
            .await?;

            println!(
                "  {} {}",
                format!("Processor {} queue size:", processor).bold(),
                result["queue_size"]
            );
        }

        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                    println!();

                    let rows: Vec<ProcessorRow> =
                        serde_json::from_value(stats["processors"].clone())?;
                    let degraded: Vec<_> = rows
                        .iter()
                        .filter(|row| row.state == "RUNNING" && row.live_workers < row.worker_count)
                        .map(|row| row.id)
                        .collect();

                    println!("{}", Table::new(rows));

                    for id in degraded {
                        println!(
                            "  {} processor {} is running with fewer workers than configured",
                            "!".yellow().bold(),
                            id
                        );
                    }
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
