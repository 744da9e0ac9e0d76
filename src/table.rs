use indexmap::IndexMap;
use itertools::Itertools;
use llll_wiki_scraping_utils::selector;
use log::{debug, warn};
use scraper::{ElementRef, Html};

/// Concatenation of every text node of `e`, each trimmed.
pub fn stripped_text(e: ElementRef) -> String {
    e.text().map(str::trim).collect()
}

/// A rule deciding whether a table is the one we are looking for.
#[derive(Clone, Debug)]
pub enum TableRule {
    /// The header cells contain every `required` label and at least one `optional` label.
    /// Unrelated extra columns are allowed.
    HeaderShape {
        required: &'static [&'static str],
        optional: &'static [&'static str],
    },
    /// The nearest heading (`h2` to `h4`) before the table contains one of `markers`.
    PrecedingHeading { markers: &'static [&'static str] },
}

impl TableRule {
    fn matches(&self, candidate: &Candidate) -> bool {
        match self {
            TableRule::HeaderShape { required, optional } => {
                let headers = candidate
                    .table
                    .select(selector!("th"))
                    .map(stripped_text)
                    .collect_vec();
                let contains = |label: &&str| headers.iter().any(|h| h == label);
                required.iter().all(contains) && optional.iter().any(contains)
            }
            TableRule::PrecedingHeading { markers } => candidate.heading.is_some_and(|heading| {
                let text = stripped_text(heading);
                markers.iter().any(|marker| text.contains(marker))
            }),
        }
    }
}

struct Candidate<'a> {
    table: ElementRef<'a>,
    heading: Option<ElementRef<'a>>,
}

/// Every table in document order, paired with the last heading that starts before it.
fn candidates(html: &Html) -> Vec<Candidate<'_>> {
    let mut heading = None;
    let mut ret = vec![];
    for element in html.select(selector!("h2, h3, h4, table")) {
        if element.value().name() == "table" {
            ret.push(Candidate {
                table: element,
                heading,
            });
        } else {
            heading = Some(element);
        }
    }
    ret
}

/// Finds a table by trying each rule in order against every table.
/// A later rule is consulted only if no table satisfies the earlier ones.
#[derive(Clone, Debug)]
pub struct TableLocator {
    rules: Vec<TableRule>,
}

impl TableLocator {
    pub fn new(rules: Vec<TableRule>) -> Self {
        Self { rules }
    }

    /// Locator for the table of implemented cards on a member page.
    pub fn card_list() -> Self {
        Self::new(vec![
            TableRule::HeaderShape {
                required: &["レアリティ", "カード名"],
                optional: &["初出ガチャ", "スマイル", "ピュア", "クール"],
            },
            TableRule::PrecedingHeading {
                markers: &["実装カード", "カード一覧"],
            },
        ])
    }

    pub fn locate<'a>(&self, html: &'a Html) -> Option<ElementRef<'a>> {
        let candidates = candidates(html);
        self.rules.iter().find_map(|rule| {
            let (i, found) = candidates.iter().find_position(|c| rule.matches(c))?;
            debug!("Table #{i} matched {rule:?}");
            Some(found.table)
        })
    }
}

/// Field names taken from the first row of a table, by column position.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HeaderTemplate(Vec<String>);

impl HeaderTemplate {
    /// Maps the `i`-th cell to the `i`-th label.  Cells without a label are dropped,
    /// and labels without a cell are left out of the record.
    pub fn record(&self, cells: impl IntoIterator<Item = String>) -> Row {
        self.0.iter().cloned().zip(cells).collect()
    }
}

pub type Row = IndexMap<String, String>;

fn cells(row: ElementRef) -> Vec<String> {
    row.select(selector!("th, td")).map(stripped_text).collect()
}

/// Parses a table positionally, using its first row as the header template.
pub fn parse_rows(table: ElementRef) -> Vec<Row> {
    let mut rows = table.select(selector!("tr"));
    let headers = rows.next().map(cells).unwrap_or_default();
    if headers.is_empty() {
        warn!("No header was found in the table");
        return vec![];
    }
    debug!("Detected headers: {headers:?}");
    let template = HeaderTemplate(headers);
    rows.map(cells)
        .filter(|cells| !cells.is_empty())
        .map(|cells| template.record(cells))
        .collect()
}
