use derive_more::{AsRef, Display, From};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const WIKI_ROOT: &str = "https://wikiwiki.jp/llll_wiki/";
pub const SCHOOL_PAGE_URL: &str =
    "https://wikiwiki.jp/llll_wiki/%E8%93%AE%E3%83%8E%E7%A9%BA%E5%A5%B3%E5%AD%A6%E9%99%A2";
pub const DEFAULT_MEMBER: &str = "藤島慈";

/// Absolute address of a card's detail page.  Also the join key between the
/// listing stage and the detail stage.
#[derive(
    Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, From, AsRef, Display, Serialize, Deserialize,
)]
#[as_ref(forward)]
pub struct CardLink(String);

impl CardLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Percent-encodes `s` as UTF-8, leaving `/` and the unreserved characters as is.
pub fn encode_path(s: &str) -> String {
    s.split('/').map(urlencoding::encode).join("/")
}

/// Page name of a card: the card name in full-width brackets, followed by the member name.
/// ASCII slashes in the card name would split the page path, so they become full-width.
pub fn card_page_name(card_name: &str, member_name: &str) -> String {
    format!("［{}］{}", card_name.replace('/', "／"), member_name)
}

pub fn card_link_with_root(wiki_root: &str, card_name: &str, member_name: &str) -> CardLink {
    format!(
        "{wiki_root}{}",
        encode_path(&card_page_name(card_name, member_name))
    )
    .into()
}

pub fn card_link(card_name: &str, member_name: &str) -> CardLink {
    card_link_with_root(WIKI_ROOT, card_name, member_name)
}

/// Address of the page listing every card of a member.
pub fn member_page_url(school_page_url: &str, member_name: &str) -> String {
    format!(
        "{}/{}",
        school_page_url.trim_end_matches('/'),
        encode_path(member_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_in_card_name_becomes_full_width() {
        assert_eq!(card_page_name("Card/Name", "M"), "［Card／Name］M");
        assert_eq!(
            card_link("Card/Name", "M").as_str(),
            "https://wikiwiki.jp/llll_wiki/%EF%BC%BBCard%EF%BC%8FName%EF%BC%BDM"
        );
    }

    #[test]
    fn link_is_deterministic() {
        let a = card_link("ハナムスビ", DEFAULT_MEMBER);
        let b = card_link("ハナムスビ", DEFAULT_MEMBER);
        assert_eq!(a, b);
        assert!(a.as_str().starts_with(WIKI_ROOT));
        assert!(a.as_str()[WIKI_ROOT.len()..].is_ascii());
    }

    #[test]
    fn unreserved_characters_are_kept() {
        assert_eq!(encode_path("a-b_c.d~e f"), "a-b_c.d~e%20f");
        assert_eq!(encode_path("x/y"), "x/y");
    }

    #[test]
    fn member_page() {
        assert_eq!(
            member_page_url(SCHOOL_PAGE_URL, "桂城泉"),
            format!("{SCHOOL_PAGE_URL}/%E6%A1%82%E5%9F%8E%E6%B3%89")
        );
        assert_eq!(
            member_page_url("https://example.com/school/", "a b"),
            "https://example.com/school/a%20b"
        );
    }
}
