use clap::Parser;
use innovation_admin::cli::{init_tracing, load_app_or_exit, CommonArgs};
use innovation_admin::rules::DeployTargets;
use std::fmt::Display;

/// Deploys Firestore security rules and checks the index descriptor.
#[derive(Parser)]
#[command(name = "deploy_config", version)]
struct Cli {
    /// Deploy firestore.rules (the default when no flag is given)
    #[arg(long)]
    rules: bool,

    /// Check firestore.indexes.json
    #[arg(long)]
    indexes: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let paths = cli.common.paths();

    let app = load_app_or_exit(&paths).await;

    let targets = DeployTargets::from_flags(cli.rules, cli.indexes);
    let outcome = app.rules().deploy(&paths, targets).await;

    if let Some(result) = outcome.rules {
        print_step(result);
    }
    if let Some(result) = outcome.indexes {
        print_step(result);
    }

    Ok(())
}

/// Step failures are reported and do not change the exit status.
fn print_step<T: Display, E: Display>(result: Result<T, E>) {
    match result {
        Ok(report) => println!("{}", report),
        Err(err) => eprintln!("{}", err),
    }
}
