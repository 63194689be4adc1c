use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use rollcall::cli::{Cli, ConsoleNotifier, report_error, run};
use rollcall::rollcall_config::AppConfig;
use rollcall::rollcall_core::Notifier;
use rollcall::rollcall_observability::init_tracing;
use rollcall::state::AppContext;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let _log_guard = init_tracing(&config.logging);

    match start(config, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn start(config: AppConfig, cli: Cli) -> anyhow::Result<()> {
    let notifier: Arc<dyn Notifier> = if cli.json {
        Arc::new(ConsoleNotifier::quiet())
    } else {
        Arc::new(ConsoleNotifier::new())
    };

    let ctx = AppContext::from_config(config, notifier).await?;
    run(&ctx, cli).await
}
