use clap::Parser;
use echomind::Cli;
use echomind_core::telemetry;
use tokio::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    telemetry::init_tracing(telemetry::env_filter_or("warn"))?;

    let cli = Cli::parse();
    let runtime = Runtime::new()?;
    runtime.block_on(echomind::run(cli))
}
