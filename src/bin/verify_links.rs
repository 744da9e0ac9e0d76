use std::path::PathBuf;

use clap::Parser;
use llll_wiki_scraping::{
    config::ConfigArgs,
    pipeline::load_card_list,
    verify::{verify_all, LinkVerifier},
};
use llll_wiki_scraping_utils::fs_util::write_json;
use log::info;

/// Checks that every link in a card list points to an existing page.
#[derive(Parser)]
struct Opts {
    #[clap(flatten)]
    config: ConfigArgs,
    /// Card list to read; defaults to the listing stage output of the member.
    #[clap(long)]
    input: Option<PathBuf>,
    /// Also write the result as JSON.
    #[clap(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();
    let config = opts.config.load()?;

    let input = opts.input.unwrap_or_else(|| config.card_list_path());
    let cards = load_card_list(&input)?;
    println!("{}件のリンクを検証します\n", cards.len());

    let verifier = LinkVerifier::new(&config.user_agent, config.probe_timeout())?;
    let report = verify_all(&verifier, cards, config.probe_delay()).await;
    println!();
    print!("{report}");

    if let Some(path) = opts.report {
        write_json(&path, &report)?;
        info!("Saved the report to {path:?}");
    }
    Ok(())
}
