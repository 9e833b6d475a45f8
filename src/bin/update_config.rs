use clap::Parser;
use innovation_admin::app_config::update_min_version;
use innovation_admin::cli::{init_tracing, load_app_or_exit, CommonArgs};

/// Sets the minimum supported Android version and the forced-update prompt.
#[derive(Parser)]
#[command(name = "update_config", version)]
struct Cli {
    /// Minimum supported version code
    #[arg(default_value_t = 13)]
    version_code: i64,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let app = load_app_or_exit(&cli.common.paths()).await;
    let config = update_min_version(&app.firestore(), cli.version_code).await?;

    println!("min_version_code = {}", config.min_version_code);
    Ok(())
}
