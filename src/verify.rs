use std::{fmt::Display, time::Duration};

use log::debug;
use reqwest::StatusCode;
use serde::Serialize;

use crate::{
    card::CardRecord,
    throttle::{FixedDelay, Pacer},
};

/// Outcome of probing a single link.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LinkStatus {
    /// The final status was in `200..400`.
    Ok(StatusCode),
    /// The server answered with an error status, even to a full `GET`.
    Failed(StatusCode),
    /// No answer at all.
    Error(String),
}

pub fn is_success(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

pub struct LinkVerifier {
    client: reqwest::Client,
}

impl LinkVerifier {
    pub fn new(user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Probes with `HEAD`, retrying once with `GET` if the server reports an error,
    /// since some servers do not answer `HEAD` properly.
    pub async fn verify(&self, url: &str) -> LinkStatus {
        let status = async {
            let status = self.client.head(url).send().await?.status();
            if status.is_client_error() || status.is_server_error() {
                debug!("HEAD {url} returned {status}; retrying with GET");
                return Ok(self.client.get(url).send().await?.status());
            }
            reqwest::Result::Ok(status)
        }
        .await;
        match status {
            Ok(status) if is_success(status) => LinkStatus::Ok(status),
            Ok(status) => LinkStatus::Failed(status),
            Err(e) => LinkStatus::Error(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailedLink {
    #[serde(flatten)]
    pub card: CardRecord,
    pub status: u16,
}

#[derive(Debug, Serialize)]
pub struct ErroredLink {
    #[serde(flatten)]
    pub card: CardRecord,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct VerificationReport {
    pub succeeded: Vec<CardRecord>,
    pub failed: Vec<FailedLink>,
    pub errored: Vec<ErroredLink>,
}

impl VerificationReport {
    pub fn push(&mut self, card: CardRecord, status: LinkStatus) {
        match status {
            LinkStatus::Ok(_) => self.succeeded.push(card),
            LinkStatus::Failed(status) => self.failed.push(FailedLink {
                card,
                status: status.as_u16(),
            }),
            LinkStatus::Error(error) => self.errored.push(ErroredLink { card, error }),
        }
    }
}

impl Display for VerificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "検証結果サマリー")?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "成功: {}件", self.succeeded.len())?;
        writeln!(f, "失敗: {}件", self.failed.len())?;
        writeln!(f, "エラー: {}件", self.errored.len())?;
        if !self.failed.is_empty() {
            writeln!(f)?;
            writeln!(f, "失敗したリンク:")?;
            for item in &self.failed {
                writeln!(f, "  - {} {}", item.card.rarity(), item.card.name())?;
                writeln!(f, "    URL: {}", item.card.link())?;
                writeln!(f, "    ステータス: {}", item.status)?;
            }
        }
        if !self.errored.is_empty() {
            writeln!(f)?;
            writeln!(f, "エラーが発生したリンク:")?;
            for item in &self.errored {
                writeln!(f, "  - {} {}", item.card.rarity(), item.card.name())?;
                writeln!(f, "    URL: {}", item.card.link())?;
                writeln!(f, "    エラー: {}", item.error)?;
            }
        }
        Ok(())
    }
}

/// Probes every card link in order, waiting `delay` between two probes.
pub async fn verify_all(
    verifier: &LinkVerifier,
    cards: Vec<CardRecord>,
    delay: Duration,
) -> VerificationReport {
    let mut pacer = FixedDelay::new(delay);
    let mut report = VerificationReport::default();
    let total = cards.len();
    for (i, card) in cards.into_iter().enumerate() {
        pacer.pause().await;
        println!("[{}/{}] {} {}", i + 1, total, card.rarity(), card.name());
        println!("  URL: {}", card.link());
        let status = verifier.verify(card.link().as_str()).await;
        match &status {
            LinkStatus::Ok(status) => println!("  ✓ 成功 (ステータス: {})", status.as_u16()),
            LinkStatus::Failed(status) => println!("  ✗ 失敗 (ステータス: {})", status.as_u16()),
            LinkStatus::Error(error) => println!("  ✗ エラー: {error}"),
        }
        report.push(card, status);
    }
    report
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;
    use crate::config::USER_AGENT;

    fn card(name: &str) -> CardRecord {
        CardRecord::builder()
            .member("M".to_owned())
            .rarity("SR".to_owned())
            .name(name.to_owned())
            .link(format!("https://example.com/{name}").into())
            .build()
    }

    #[test]
    fn success_range() {
        assert!(is_success(StatusCode::OK));
        assert!(is_success(StatusCode::FOUND));
        assert!(!is_success(StatusCode::NOT_FOUND));
        assert!(!is_success(StatusCode::CONTINUE));
    }

    #[test]
    fn report_partitions() {
        let mut report = VerificationReport::default();
        report.push(card("a"), LinkStatus::Ok(StatusCode::OK));
        report.push(card("b"), LinkStatus::Failed(StatusCode::NOT_FOUND));
        report.push(card("c"), LinkStatus::Error("timed out".to_owned()));
        report.push(card("d"), LinkStatus::Ok(StatusCode::MOVED_PERMANENTLY));

        assert_eq!(report.succeeded, [card("a"), card("d")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].status, 404);
        assert_eq!(report.errored[0].error, "timed out");

        let summary = report.to_string();
        assert!(summary.contains("成功: 2件"));
        assert!(summary.contains("失敗: 1件"));
        assert!(summary.contains("エラー: 1件"));
        assert!(summary.contains("URL: https://example.com/b"));
        assert!(summary.contains("エラー: timed out"));
    }

    #[test]
    fn report_as_json() {
        let mut report = VerificationReport::default();
        report.push(card("b"), LinkStatus::Failed(StatusCode::NOT_FOUND));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"][0]["カード名"], "b");
        assert_eq!(json["failed"][0]["status"], 404);
    }

    /// Answers one request per connection and records `"METHOD /path"` for each.
    /// `/a` rejects `HEAD` but accepts `GET`, `/c` accepts anything, the rest is 404.
    async fn serve(listener: TcpListener, log: Arc<Mutex<Vec<String>>>) {
        while let Ok((mut stream, _)) = listener.accept().await {
            let log = log.clone();
            tokio::spawn(async move {
                let mut buf = vec![];
                let mut chunk = [0; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let mut words = request.split_whitespace();
                let method = words.next().unwrap_or_default().to_owned();
                let path = words.next().unwrap_or_default().to_owned();
                let status = match (method.as_str(), path.as_str()) {
                    ("HEAD", "/a") => "405 Method Not Allowed",
                    ("GET", "/a") | (_, "/c") => "200 OK",
                    _ => "404 Not Found",
                };
                log.lock().unwrap().push(format!("{method} {path}"));
                let response =
                    format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                let _ = stream.write_all(response.as_bytes()).await;
            });
        }
    }

    #[tokio::test]
    async fn head_then_get() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let log = Arc::new(Mutex::new(vec![]));
        tokio::spawn(serve(listener, log.clone()));

        let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let closed_addr = closed.local_addr().unwrap();
        drop(closed);

        let verifier = LinkVerifier::new(USER_AGENT, Duration::from_secs(5)).unwrap();
        let a = verifier.verify(&format!("http://{addr}/a")).await;
        let b = verifier.verify(&format!("http://{addr}/b")).await;
        let c = verifier.verify(&format!("http://{addr}/c")).await;
        let d = verifier.verify(&format!("http://{closed_addr}/d")).await;

        assert_eq!(a, LinkStatus::Ok(StatusCode::OK));
        assert_eq!(b, LinkStatus::Failed(StatusCode::NOT_FOUND));
        assert_eq!(c, LinkStatus::Ok(StatusCode::OK));
        assert!(matches!(d, LinkStatus::Error(_)));
        assert_eq!(
            *log.lock().unwrap(),
            ["HEAD /a", "GET /a", "HEAD /b", "GET /b", "HEAD /c"]
        );
    }
}
