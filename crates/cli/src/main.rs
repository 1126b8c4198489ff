use clap::Parser;
use frontdoh_domain::CliOverrides;
use tracing::{error, info};

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "frontdoh")]
#[command(version)]
#[command(about = "Proxies DNS queries to a DoH server, possibly using domain fronting")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// TLS SNI (front domain) used to reach the DoH server [default: youtube.com]
    #[arg(short = 's', long, value_name = "SNI")]
    sni: Option<String>,

    /// Listen address [default: 0.0.0.0:5353]
    #[arg(short = 'l', long, value_name = "ADDRESS")]
    listen: Option<String>,

    /// HTTP Host header naming the DoH provider [default: dns.google.com]
    #[arg(long, value_name = "HOST")]
    host_header: Option<String>,

    /// DoH request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            listen_address: self.listen.clone(),
            tls_server_name: self.sni.clone(),
            host_header: self.host_header.clone(),
            request_timeout: self.timeout,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config);

    info!("Starting Frontdoh v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = server::start_dns_server(&config).await {
        error!(error = %e, "DNS server error");
        return Err(e);
    }

    Ok(())
}
