use std::path::Path;

use llll_wiki_scraping_utils::fs_util::{read_csv, write_csv};
use log::info;
use scraper::Html;

use crate::{
    aggregate::{aggregate, AggregatedRecord, WikiVoiceSource},
    api::{Decoding, WikiClient},
    card::{parse_card_list_page, CardRecord},
    config::Config,
    throttle::FixedDelay,
};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("The card list table was not found on {0}")]
    CardTableNotFound(String),
    #[error("No card was found on {0}")]
    NoCards(String),
}

/// Listing stage: downloads the member page and extracts its cards.
/// Having no card to work on is the only condition that stops the whole batch.
pub async fn fetch_card_list(
    client: &WikiClient,
    config: &Config,
) -> anyhow::Result<Vec<CardRecord>> {
    let url = config.member_page_url();
    info!("Fetching {url}");
    let html = client.fetch_document(&url, Decoding::LegacyFirst).await?;
    Ok(cards_from_listing(&html, config, url)?)
}

/// Extracts the cards of a downloaded member page, failing when there is nothing to work on.
pub fn cards_from_listing(
    html: &Html,
    config: &Config,
    url: String,
) -> Result<Vec<CardRecord>, PipelineError> {
    let Some(cards) = parse_card_list_page(html, &config.member, &config.wiki_root) else {
        return Err(PipelineError::CardTableNotFound(url));
    };
    if cards.is_empty() {
        return Err(PipelineError::NoCards(url));
    }
    Ok(cards)
}

/// Detail stage: visits every card page in order, keeping the configured delay between requests.
pub async fn fetch_voices(
    client: &WikiClient,
    config: &Config,
    cards: Vec<CardRecord>,
) -> Vec<AggregatedRecord> {
    let mut source = WikiVoiceSource::new(client, FixedDelay::new(config.fetch_delay()));
    aggregate(cards, &mut source).await
}

pub fn save_card_list(path: &Path, cards: &[CardRecord]) -> anyhow::Result<()> {
    write_csv(path, cards, false)?;
    info!("Saved {} cards to {path:?}", cards.len());
    Ok(())
}

pub fn load_card_list(path: &Path) -> anyhow::Result<Vec<CardRecord>> {
    let cards = read_csv(path)?;
    info!("Loaded {} cards from {path:?}", cards.len());
    Ok(cards)
}

/// Written with a byte-order mark so that spreadsheet software detects UTF-8.
pub fn save_voices(path: &Path, records: &[AggregatedRecord]) -> anyhow::Result<()> {
    write_csv(path, records, true)?;
    info!("Saved {} records to {path:?}", records.len());
    Ok(())
}
