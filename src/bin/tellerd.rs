use std::fs::File;
use std::net::TcpListener;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use teller::bin_utils::fixtures::load_ledger;
use teller::bin_utils::tcp::FramedTcp;
use teller::dispatch::Dispatcher;
use teller::policy::FeePolicy;

/// Banking protocol server: serves one client connection at a time over
/// a ledger seeded from CSV fixtures.
#[derive(Debug, Parser)]
#[command(name = "tellerd")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:7450")]
    bind: String,

    /// CSV file with bank rows (id,name,fee).
    #[arg(long)]
    banks: PathBuf,

    /// CSV file with user rows (id,login,password,citizen,name).
    #[arg(long)]
    users: PathBuf,

    /// CSV file with account rows (iban,user,bank,balance).
    #[arg(long)]
    accounts: PathBuf,

    /// Where inter-bank transfer fees go: `burn` or `credit:<iban>`.
    #[arg(long, default_value = "burn")]
    fee_policy: FeePolicy,
}

fn open(path: &PathBuf) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open `{}`", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let ledger = load_ledger(open(&args.banks)?, open(&args.users)?, open(&args.accounts)?)?;
    let mut dispatcher = Dispatcher::new(ledger, args.fee_policy);

    let listener = TcpListener::bind(&args.bind)
        .with_context(|| format!("Failed to bind `{}`", args.bind))?;
    info!(addr = %args.bind, "listening");

    // one client at a time; the next connection waits its turn
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let peer = stream
                    .peer_addr()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                info!(%peer, "client connected");
                let mut channel = FramedTcp::new(stream);
                if let Err(err) = dispatcher.serve(&mut channel) {
                    warn!(%peer, "connection ended with error: {err}");
                } else {
                    info!(%peer, "client disconnected");
                }
            }
            Err(err) => warn!("accept failed: {err}"),
        }
    }
    Ok(())
}
