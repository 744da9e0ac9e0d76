use std::path::PathBuf;

use clap::Parser;
use llll_wiki_scraping::voice::parse_voice_page;
use scraper::Html;

#[derive(Parser)]
struct Opts {
    input_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();
    let html = Html::parse_document(&fs_err::read_to_string(opts.input_file)?);
    for (category, text) in parse_voice_page(&html).iter() {
        println!("{category}: {text:?}");
    }
    Ok(())
}
