use clap::Parser;
use innovation_admin::cli::{init_tracing, load_app_or_exit, CommonArgs};
use innovation_admin::messaging::{wall_post_test_message, DEFAULT_TEST_POST_ID};

/// Sends a test wall-post notification to the `all_posts` topic.
#[derive(Parser)]
#[command(name = "send_test_notification", version)]
struct Cli {
    /// Post the notification should open
    #[arg(default_value = DEFAULT_TEST_POST_ID)]
    post_id: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let app = load_app_or_exit(&cli.common.paths()).await;

    tracing::info!("Sending test notification for Post ID: {}", cli.post_id);
    let name = app
        .messaging()
        .send(&wall_post_test_message(&cli.post_id))
        .await?;

    println!("Successfully sent message: {}", name);
    Ok(())
}
