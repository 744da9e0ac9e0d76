use std::time::Duration;

use anyhow::{bail, Context};
use log::debug;
use reqwest::{header, IntoUrl, Response};
use scraper::Html;

use crate::config::Config;

/// How the body of a page is turned into text.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Decoding {
    /// Always UTF-8.
    Utf8,
    /// The charset named by `Content-Type` if any; otherwise Shift_JIS,
    /// falling back to UTF-8 when the body is not valid Shift_JIS.
    LegacyFirst,
}

pub struct WikiClient {
    client: reqwest::Client,
}

impl WikiClient {
    pub fn new(user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Self::new(&config.user_agent, config.fetch_timeout())
    }

    pub async fn fetch_document(
        &self,
        url: impl IntoUrl,
        decoding: Decoding,
    ) -> anyhow::Result<Html> {
        let url = url.into_url()?;
        let text = (async {
            let response = self.client.get(url.clone()).send().await?;
            if !response.status().is_success() {
                bail!("Server returned {:?}", response.status());
            }
            decode(response, decoding).await
        })
        .await
        .with_context(|| format!("While fetching {url}"))?;
        Ok(Html::parse_document(&text))
    }
}

fn declares_charset(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|x| x.to_str().ok())
        .is_some_and(|x| x.to_ascii_lowercase().contains("charset"))
}

async fn decode(response: Response, decoding: Decoding) -> anyhow::Result<String> {
    Ok(match decoding {
        Decoding::Utf8 => String::from_utf8_lossy(&response.bytes().await?).into_owned(),
        Decoding::LegacyFirst if declares_charset(&response) => response.text().await?,
        Decoding::LegacyFirst => decode_legacy_first(&response.bytes().await?),
    })
}

pub fn decode_legacy_first(bytes: &[u8]) -> String {
    match encoding_rs::SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => {
            debug!("The body is not valid Shift_JIS; decoding as UTF-8");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
