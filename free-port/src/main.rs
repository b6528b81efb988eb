use anyhow::Result;
use clap::Parser;
use free_port::{free_ports, free_tcp_address, free_tcp_port, Port, PortConfig};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host for the single port and address lookups (overrides FREE_PORT_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Host for the batch lookup (overrides FREE_PORT_BATCH_HOST)
    #[arg(long)]
    batch_host: Option<String>,

    /// Number of ports in the batch (overrides FREE_PORT_COUNT)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Print a single JSON object instead of three lines
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(Serialize)]
struct Allocation {
    port: Port,
    address: String,
    ports: Vec<Port>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = PortConfig::from_env()?;

    // Logs go to stderr, stdout carries the ports
    let log_level = args.log_level.as_deref().unwrap_or(&config.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let host = args.host.unwrap_or(config.host);
    let batch_host = args.batch_host.unwrap_or(config.batch_host);
    let count = args.count.unwrap_or(config.count);

    let allocation = Allocation {
        port: free_tcp_port(&host)?,
        address: free_tcp_address(&host)?,
        ports: free_ports(&batch_host, count)?,
    };
    tracing::info!(host = %host, batch_host = %batch_host, count, "Allocated free ports");

    if args.json {
        println!("{}", serde_json::to_string(&allocation)?);
    } else {
        println!("{}", allocation.port);
        println!("{}", allocation.address);
        println!("{:?}", allocation.ports);
    }

    Ok(())
}
