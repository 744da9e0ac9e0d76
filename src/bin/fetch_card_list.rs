use clap::Parser;
use llll_wiki_scraping::{
    api::WikiClient,
    config::ConfigArgs,
    pipeline::{fetch_card_list, save_card_list},
};

#[derive(Parser)]
struct Opts {
    #[clap(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();
    let config = opts.config.load()?;
    let client = WikiClient::from_config(&config)?;

    let cards = fetch_card_list(&client, &config).await?;
    for (i, card) in cards.iter().take(5).enumerate() {
        println!("Card {}: {} {}", i + 1, card.rarity(), card.name());
        println!("    {}", card.link());
    }
    if cards.len() > 5 {
        println!("... and {} more", cards.len() - 5);
    }
    save_card_list(&config.card_list_path(), &cards)?;
    Ok(())
}
