use clap::Parser;
use innovation_admin::app_config::verify_config;
use innovation_admin::cli::{init_tracing, load_app_or_exit, CommonArgs};

/// Prints the forced-update settings document and the type of its version field.
#[derive(Parser)]
#[command(name = "verify_config", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let app = load_app_or_exit(&cli.common.paths()).await;
    let report = verify_config(&app.firestore()).await?;

    println!("{}", report);
    Ok(())
}
