use clap::Parser;
use innovation_admin::cli::{init_tracing, CommonArgs};
use innovation_admin::images::ImageFetcher;

/// Downloads incubator hero images 1 to 40 into the app's asset directory.
#[derive(Parser)]
#[command(name = "download_images", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let fetcher = ImageFetcher::new(cli.common.paths().images_dir())?;
    let summary = fetcher.run().await?;

    println!(
        "Saved {} of {} images to {}",
        summary.saved.len(),
        summary.attempted(),
        fetcher.output_dir().display()
    );
    Ok(())
}
