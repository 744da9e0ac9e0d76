use getset::Getters;
use log::{info, warn};
use scraper::Html;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    link::{card_link_with_root, CardLink},
    table::{parse_rows, Row, TableLocator},
};

pub const CARD_NAME_COLUMN: &str = "カード名";
pub const RARITY_COLUMN: &str = "レアリティ";

/// A card of a member, as listed on the member page.  Column names follow the listing file.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct CardRecord {
    #[serde(rename = "メンバー")]
    member: String,
    #[serde(rename = "レアリティ")]
    rarity: String,
    #[serde(rename = "カード名")]
    name: String,
    #[serde(rename = "リンク")]
    link: CardLink,
}

impl CardRecord {
    /// Builds a record from a parsed listing row.  Rows without a card name are rejected.
    pub fn from_row(row: &Row, member: &str, wiki_root: &str) -> Option<Self> {
        let name = row.get(CARD_NAME_COLUMN).filter(|name| !name.is_empty())?;
        Some(Self {
            member: member.to_owned(),
            rarity: row.get(RARITY_COLUMN).cloned().unwrap_or_default(),
            name: name.clone(),
            link: card_link_with_root(wiki_root, name, member),
        })
    }
}

/// Extracts the cards from a member page.
/// Returns `None` if the card table cannot be located at all.
pub fn parse_card_list_page(html: &Html, member: &str, wiki_root: &str) -> Option<Vec<CardRecord>> {
    let Some(table) = TableLocator::card_list().locate(html) else {
        warn!("The card list table was not found");
        return None;
    };
    let rows = parse_rows(table);
    let cards: Vec<_> = rows
        .iter()
        .filter_map(|row| CardRecord::from_row(row, member, wiki_root))
        .collect();
    info!(
        "{} cards were found ({} rows skipped)",
        cards.len(),
        rows.len() - cards.len()
    );
    Some(cards)
}
