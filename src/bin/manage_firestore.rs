use clap::{Parser, Subcommand};
use innovation_admin::cli::{init_tracing, load_app_or_exit, CommonArgs};
use innovation_admin::users::{delete_user_completely, list_users};

/// Lists and removes user records.
#[derive(Parser)]
#[command(name = "manage_firestore", version, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a table of users, optionally only those with the given role
    #[command(name = "list_users")]
    ListUsers {
        /// Exact role to match, e.g. mentor
        role: Option<String>,
    },
    /// Delete a user from `users` and from its role collection
    #[command(name = "delete_user")]
    DeleteUser {
        /// Document ID of the user
        uid: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let app = load_app_or_exit(&cli.common.paths()).await;
    let db = app.firestore();

    match cli.command {
        Commands::ListUsers { role } => {
            let table = list_users(&db, role.as_deref()).await?;
            println!("{}", table);
        }
        Commands::DeleteUser { uid } => {
            let outcome = delete_user_completely(&db, &uid).await?;
            println!("{}", outcome);
        }
    }
    Ok(())
}
