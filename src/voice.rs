use std::ops::Index;

use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use llll_wiki_scraping_utils::selector;
use log::{trace, warn};
use scraper::{ElementRef, Html};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::section::{locate_section, VOICE_SECTION_MARKERS};

/// Kinds of voice lines on a card page.  The declaration order is the column order
/// of the output file, and the strum names are the column headers.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Enum,
    EnumIter,
    IntoStaticStr,
    strum::Display,
)]
pub enum VoiceCategory {
    #[strum(serialize = "入手時")]
    Acquisition,
    #[strum(serialize = "特訓時")]
    Training,
    #[strum(serialize = "特訓1回目")]
    TrainingFirst,
    #[strum(serialize = "特訓2回目")]
    TrainingSecond,
    #[strum(serialize = "ライブ開始")]
    LiveStart,
    #[strum(serialize = "スキル発動")]
    SkillActivation,
    #[strum(serialize = "スキル発動(クロスボイス)")]
    SkillActivationCrossover,
    #[strum(serialize = "SP発動")]
    SpecialActivation,
}

impl VoiceCategory {
    pub fn column_name(self) -> &'static str {
        self.into()
    }
}

/// How a matching row is stored into its slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Assign {
    /// The last matching row wins.
    Overwrite,
    /// Only the first matching row is stored.  Once the slot is filled the rule
    /// stops matching, so the row falls through to the rules after it.
    FirstOnly,
}

#[derive(Clone, Copy, Debug)]
pub struct VoiceRule {
    pub markers: &'static [&'static str],
    pub category: VoiceCategory,
    pub assign: Assign,
}

impl VoiceRule {
    fn matches(&self, label: &str, record: &VoiceRecord) -> bool {
        self.markers.iter().any(|marker| label.contains(marker))
            && match self.assign {
                Assign::Overwrite => true,
                Assign::FirstOnly => record[self.category].is_empty(),
            }
    }
}

/// Evaluated from top to bottom; the first matching rule decides the category.
/// Specific markers must come before the generic ones they contain
/// (`特訓1回目` before `特訓時`, `クロスボイス` before `スキル発動`).
pub static VOICE_RULES: [VoiceRule; 8] = {
    use Assign::*;
    use VoiceCategory::*;
    [
        VoiceRule {
            markers: &["入手時"],
            category: Acquisition,
            assign: Overwrite,
        },
        VoiceRule {
            markers: &["特訓1回目"],
            category: TrainingFirst,
            assign: Overwrite,
        },
        VoiceRule {
            markers: &["特訓2回目"],
            category: TrainingSecond,
            assign: Overwrite,
        },
        VoiceRule {
            markers: &["特訓時"],
            category: Training,
            assign: Overwrite,
        },
        VoiceRule {
            markers: &["ライブ開始"],
            category: LiveStart,
            assign: Overwrite,
        },
        VoiceRule {
            markers: &["クロスボイス"],
            category: SkillActivationCrossover,
            assign: Overwrite,
        },
        VoiceRule {
            markers: &["スキル発動"],
            category: SkillActivation,
            assign: FirstOnly,
        },
        VoiceRule {
            markers: &["SP発動", "SP スキル発動"],
            category: SpecialActivation,
            assign: Overwrite,
        },
    ]
};

/// Voice lines of a card, one slot per category.  Every slot exists; unmatched ones are empty.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct VoiceRecord(EnumMap<VoiceCategory, String>);

impl VoiceRecord {
    pub const LEN: usize = VoiceCategory::LENGTH;

    pub fn get(&self, category: VoiceCategory) -> &str {
        &self.0[category]
    }

    pub fn iter(&self) -> impl Iterator<Item = (VoiceCategory, &str)> {
        VoiceCategory::iter().map(|c| (c, self.get(c)))
    }

    pub fn filled_count(&self) -> usize {
        self.0.values().filter(|v| !v.is_empty()).count()
    }

    /// Classifies `label` and stores `message` into the matching slot.
    /// Returns the category, or `None` if no rule matched.
    pub fn apply(&mut self, label: &str, message: &str) -> Option<VoiceCategory> {
        let rule = VOICE_RULES.iter().find(|rule| rule.matches(label, &*self))?;
        trace!("{label:?} => {:?}", rule.category);
        self.0[rule.category] = message.to_owned();
        Some(rule.category)
    }
}

impl Index<VoiceCategory> for VoiceRecord {
    type Output = String;
    fn index(&self, category: VoiceCategory) -> &String {
        &self.0[category]
    }
}

fn trimmed_text(e: ElementRef) -> String {
    e.text().collect::<String>().trim().to_owned()
}

/// Classifies the rows of the first table inside `section`.
/// The first cell of a row is the label and the second one is the message.
pub fn classify_section(section: ElementRef) -> VoiceRecord {
    let mut record = VoiceRecord::default();
    let Some(table) = section.select(selector!("table")).next() else {
        warn!("No table was found in the voice section");
        return record;
    };
    for row in table.select(selector!("tr")) {
        let cells = row.select(selector!("th, td")).take(2).collect_vec();
        if let [label, message] = cells[..] {
            record.apply(&trimmed_text(label), &trimmed_text(message));
        }
    }
    record
}

/// Extracts the voice lines of a card page.  A page without the voice section
/// yields an all-empty record.
pub fn parse_voice_page(html: &Html) -> VoiceRecord {
    match locate_section(html, &VOICE_SECTION_MARKERS) {
        Some(section) => classify_section(section),
        None => {
            warn!("The voice section was not found");
            VoiceRecord::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_of(rows: &[(&str, &str)]) -> VoiceRecord {
        let mut record = VoiceRecord::default();
        for (label, message) in rows {
            record.apply(label, message);
        }
        record
    }

    #[test]
    fn column_names_in_order() {
        assert_eq!(
            VoiceCategory::iter().map(VoiceCategory::column_name).collect_vec(),
            [
                "入手時",
                "特訓時",
                "特訓1回目",
                "特訓2回目",
                "ライブ開始",
                "スキル発動",
                "スキル発動(クロスボイス)",
                "SP発動",
            ]
        );
    }

    #[test]
    fn specific_before_generic() {
        let mut record = VoiceRecord::default();
        assert_eq!(
            record.apply("特訓時（特訓1回目）", "a"),
            Some(VoiceCategory::TrainingFirst)
        );
        assert_eq!(
            record.apply("特訓時 特訓2回目", "b"),
            Some(VoiceCategory::TrainingSecond)
        );
        assert_eq!(record.apply("特訓時", "c"), Some(VoiceCategory::Training));
        assert_eq!(
            record.apply("スキル発動(クロスボイス)", "d"),
            Some(VoiceCategory::SkillActivationCrossover)
        );
        assert_eq!(record.get(VoiceCategory::SkillActivation), "");
        assert_eq!(record.get(VoiceCategory::Training), "c");
    }

    #[test]
    fn acquisition_overwrites() {
        let record = record_of(&[("入手時", "m1"), ("入手時", "m2")]);
        assert_eq!(record[VoiceCategory::Acquisition], "m2");
    }

    #[test]
    fn generic_skill_activation_keeps_first() {
        let record = record_of(&[("スキル発動1", "s1"), ("スキル発動2", "s2")]);
        assert_eq!(record[VoiceCategory::SkillActivation], "s1");
    }

    #[test]
    fn crossover_overwrites() {
        let record = record_of(&[("クロスボイス1", "c1"), ("クロスボイス2", "c2")]);
        assert_eq!(record[VoiceCategory::SkillActivationCrossover], "c2");
    }

    #[test]
    fn filled_skill_slot_falls_through_to_special() {
        let mut record = VoiceRecord::default();
        assert_eq!(
            record.apply("SP スキル発動", "first"),
            Some(VoiceCategory::SkillActivation)
        );
        assert_eq!(
            record.apply("SP スキル発動", "second"),
            Some(VoiceCategory::SpecialActivation)
        );
        assert_eq!(record.apply("SP発動", "third"), Some(VoiceCategory::SpecialActivation));
        assert_eq!(record[VoiceCategory::SkillActivation], "first");
        assert_eq!(record[VoiceCategory::SpecialActivation], "third");
    }

    #[test]
    fn empty_first_message_does_not_fill_skill_slot() {
        let record = record_of(&[("スキル発動", ""), ("スキル発動", "s")]);
        assert_eq!(record[VoiceCategory::SkillActivation], "s");
    }

    #[test]
    fn unmatched_labels_are_ignored() {
        let mut record = VoiceRecord::default();
        assert_eq!(record.apply("ホーム画面", "x"), None);
        assert_eq!(record, VoiceRecord::default());
        assert_eq!(record.iter().count(), 8);
        assert_eq!(record.filled_count(), 0);
    }

    #[test]
    fn voice_page() {
        let html = Html::parse_document(
            r#"
            <h2 id="voice">演出・ボイス</h2>
            <div class="h-scrollable">
              <table>
                <tr><th>種類</th><th>セリフ</th></tr>
                <tr><th>入手時</th><td>
                  よろしくね！
                </td></tr>
                <tr><th>ライブ開始</th><td>いくよ！</td><td>extra</td></tr>
                <tr><th>スキル発動</th></tr>
                <tr><th>スキル発動</th><td>それっ</td></tr>
                <tr><th>スキル発動</th><td>まだまだ</td></tr>
                <tr><th>SP発動</th><td>全力で！</td></tr>
              </table>
            </div>
            "#,
        );
        let record = parse_voice_page(&html);
        assert_eq!(record[VoiceCategory::Acquisition], "よろしくね！");
        assert_eq!(record[VoiceCategory::LiveStart], "いくよ！");
        assert_eq!(record[VoiceCategory::SkillActivation], "それっ");
        assert_eq!(record[VoiceCategory::SpecialActivation], "全力で！");
        assert_eq!(record.filled_count(), 4);
    }

    #[test]
    fn page_without_voice_section_is_empty() {
        let html = Html::parse_document(
            "<h2>ステータス</h2><div><table><tr><td>入手時</td><td>x</td></tr></table></div>",
        );
        assert_eq!(parse_voice_page(&html), VoiceRecord::default());
    }

    #[test]
    fn section_without_table_is_empty() {
        let html = Html::parse_document("<h3>演出・ボイス</h3><div><p>準備中</p></div>");
        assert_eq!(parse_voice_page(&html), VoiceRecord::default());
    }
}
