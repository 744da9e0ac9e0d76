use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use llll_wiki_scraping::{
    card::parse_card_list_page,
    link::{DEFAULT_MEMBER, WIKI_ROOT},
    table::{parse_rows, TableLocator},
};
use scraper::Html;

#[derive(Parser)]
struct Opts {
    input_file: PathBuf,
    #[clap(long, default_value = DEFAULT_MEMBER)]
    member: String,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();
    let html = Html::parse_document(&fs_err::read_to_string(opts.input_file)?);

    let table = TableLocator::card_list()
        .locate(&html)
        .context("Card list table not found")?;
    for row in parse_rows(table) {
        println!("{row:?}");
    }
    println!();
    for card in parse_card_list_page(&html, &opts.member, WIKI_ROOT).unwrap_or_default() {
        println!("{card:?}");
    }
    Ok(())
}
