use std::future::Future;

use log::{info, warn};
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::{
    api::{Decoding, WikiClient},
    card::CardRecord,
    link::CardLink,
    throttle::Pacer,
    voice::{parse_voice_page, VoiceCategory, VoiceRecord},
};

/// Where the voice lines of a card come from.
pub trait VoiceSource {
    fn voices(&mut self, link: &CardLink) -> impl Future<Output = anyhow::Result<VoiceRecord>>;
}

/// Fetches card pages from the wiki, one at a time, pausing between requests as the pacer says.
pub struct WikiVoiceSource<'c, P> {
    client: &'c WikiClient,
    pacer: P,
}

impl<'c, P: Pacer> WikiVoiceSource<'c, P> {
    pub fn new(client: &'c WikiClient, pacer: P) -> Self {
        Self { client, pacer }
    }
}

impl<P: Pacer> VoiceSource for WikiVoiceSource<'_, P> {
    async fn voices(&mut self, link: &CardLink) -> anyhow::Result<VoiceRecord> {
        self.pacer.pause().await;
        let html = self
            .client
            .fetch_document(link.as_str(), Decoding::Utf8)
            .await?;
        Ok(parse_voice_page(&html))
    }
}

/// A card together with its voice lines.  Serialized flat: card columns, then one column per category.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AggregatedRecord {
    pub card: CardRecord,
    pub voices: VoiceRecord,
}

impl Serialize for AggregatedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("AggregatedRecord", 4 + VoiceRecord::LEN)?;
        s.serialize_field("メンバー", self.card.member())?;
        s.serialize_field("レアリティ", self.card.rarity())?;
        s.serialize_field("カード名", self.card.name())?;
        s.serialize_field("リンク", self.card.link())?;
        for (category, text) in self.voices.iter() {
            s.serialize_field(category.column_name(), text)?;
        }
        s.end()
    }
}

/// Joins every card with its voice lines, preserving the order of `cards`.
/// A card whose voices cannot be obtained gets an all-empty record; the batch goes on.
pub async fn aggregate<S: VoiceSource>(
    cards: Vec<CardRecord>,
    source: &mut S,
) -> Vec<AggregatedRecord> {
    let total = cards.len();
    let mut ret = Vec::with_capacity(total);
    for (i, card) in cards.into_iter().enumerate() {
        println!("[{}/{}] {} {}", i + 1, total, card.rarity(), card.name());
        let voices = match source.voices(card.link()).await {
            Ok(voices) => {
                info!("  Extracted {} voice entries", voices.filled_count());
                voices
            }
            Err(e) => {
                warn!("  Failed to get voices for {}: {e:#}", card.link());
                VoiceRecord::default()
            }
        };
        ret.push(AggregatedRecord { card, voices });
    }
    ret
}
