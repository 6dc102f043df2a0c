//! # Loopback Service Binary
//!
//! Runs the contract-only stand-in for the remote API.
//!
//! ```bash
//! cargo run --bin stub_server -- --addr 127.0.0.1:8000
//! ```

use clap::Parser;
use log::info;

use securevision_client::common::logging::init_logger;
use securevision_client::stub;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    info!("🌐 Loopback service running on http://{}", args.addr);

    stub::serve(listener).await?;

    Ok(())
}
