use std::path::PathBuf;

use clap::Parser;
use llll_wiki_scraping::{
    api::WikiClient,
    config::ConfigArgs,
    pipeline::{fetch_voices, load_card_list, save_voices},
};

#[derive(Parser)]
struct Opts {
    #[clap(flatten)]
    config: ConfigArgs,
    /// Card list to read; defaults to the listing stage output of the member.
    #[clap(long)]
    input: Option<PathBuf>,
    #[clap(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();
    let config = opts.config.load()?;
    let client = WikiClient::from_config(&config)?;

    let input = opts.input.unwrap_or_else(|| config.card_list_path());
    let output = opts.output.unwrap_or_else(|| config.voices_path());
    let cards = load_card_list(&input)?;
    let records = fetch_voices(&client, &config, cards).await;
    save_voices(&output, &records)?;
    println!("Done!");
    Ok(())
}
