use llll_wiki_scraping_utils::selector;
use log::debug;
use scraper::{ElementRef, Html};

/// Markers of the "演出・ボイス" heading on a card page.
pub const VOICE_SECTION_MARKERS: [&str; 2] = ["演出", "ボイス"];

/// Finds the first `h2`–`h4` heading containing every marker, in any order,
/// and returns the `div` that follows it as a sibling.
pub fn locate_section<'a>(html: &'a Html, markers: &[&str]) -> Option<ElementRef<'a>> {
    let heading = html.select(selector!("h2, h3, h4")).find(|heading| {
        let text = heading.text().collect::<String>();
        markers.iter().all(|marker| text.contains(marker))
    })?;
    debug!(
        "Section heading found: {:?}",
        heading.text().collect::<String>()
    );
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "div")
}
