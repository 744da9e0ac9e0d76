use clap::Parser;
use llll_wiki_scraping::api::WikiClient;
use llll_wiki_scraping::config::ConfigArgs;
use llll_wiki_scraping::pipeline::fetch_card_list;
use llll_wiki_scraping::pipeline::fetch_voices;
use llll_wiki_scraping::pipeline::load_card_list;
use llll_wiki_scraping::pipeline::save_card_list;
use llll_wiki_scraping::pipeline::save_voices;
use log::info;

/// Downloads the card list of a member and the voice lines of every card.
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
    let card_list_path = config.card_list_path();
    let voices_path = config.voices_path();

    println!("{}", "=".repeat(80));
    println!("カード情報とボイスデータの取得を開始: {}", config.member);
    println!("{}", "=".repeat(80));

    info!("Step 1: fetching the card list");
    let cards = fetch_card_list(&client, &config).await?;
    save_card_list(&card_list_path, &cards)?;

    info!("Step 2: fetching voice lines");
    let cards = load_card_list(&card_list_path)?;
    let total = cards.len();
    let records = fetch_voices(&client, &config, cards).await;

    info!("Step 3: saving the result");
    save_voices(&voices_path, &records)?;

    println!("{}", "=".repeat(80));
    println!("完了！");
    println!("{}", "=".repeat(80));
    println!("取得したカード数: {total}");
    println!("出力ファイル: {}", voices_path.display());
    Ok(())
}
