#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use news_indexer::types::*;
use news_indexer::FeedClient;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Serves canned feed bodies. Unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct StaticFeedClient {
    feeds: HashMap<String, String>,
    requests: AtomicUsize,
}

impl StaticFeedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, body: impl Into<String>) -> Self {
        self.feeds.insert(url.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedClient for StaticFeedClient {
    async fn fetch_feed(&self, url: &str) -> Result<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.feeds.get(url).cloned().ok_or_else(|| IndexerError::Fetch {
            url: url.to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

pub struct Item<'a> {
    pub title: Option<&'a str>,
    pub link: Option<&'a str>,
    pub description: &'a str,
    pub published: Option<DateTime<Utc>>,
}

impl<'a> Item<'a> {
    pub fn new(title: &'a str, link: &'a str, description: &'a str) -> Self {
        Self {
            title: Some(title),
            link: Some(link),
            description,
            published: None,
        }
    }

    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published = Some(at);
        self
    }
}

pub fn rss(channel_title: &str, items: &[Item<'_>]) -> String {
    let mut body = String::new();
    for item in items {
        body.push_str("<item>");
        if let Some(title) = item.title {
            body.push_str(&format!("<title>{}</title>", title));
        }
        if let Some(link) = item.link {
            body.push_str(&format!("<link>{}</link>", link));
        }
        body.push_str(&format!("<description>{}</description>", item.description));
        if let Some(published) = item.published {
            body.push_str(&format!("<pubDate>{}</pubDate>", published.to_rfc2822()));
        }
        body.push_str("</item>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>{}</title><link>https://example.com/</link><description>test</description>{}</channel></rss>"#,
        channel_title, body
    )
}

pub fn article(url: &str, title: &str, summary: &str) -> Article {
    Article {
        url: url.to_string(),
        title: title.to_string(),
        summary: summary.to_string(),
        author: None,
        source_feed: "Test Feed".to_string(),
        published_at: None,
    }
}

pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay_ms: 1,
        multiplier: 2.0,
        max_delay_ms: 5,
    }
}

/// Local HTTP server answering each request with the next scripted
/// `(status, body)` pair; the last pair repeats.
pub struct ScriptedServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedServer {
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let counter = hits.clone();
        let log = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses[n.min(responses.len() - 1)].clone();

                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {} Scripted\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url,
            hits,
            requests,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw requests received so far: request line, headers and body.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    let mut expected_len = None;

    loop {
        if expected_len.is_none() {
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                expected_len = Some(end + 4 + body_len);
            }
        }
        if matches!(expected_len, Some(len) if request.len() >= len) {
            break;
        }
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(read) => request.extend_from_slice(&buf[..read]),
        }
    }

    String::from_utf8_lossy(&request).into_owned()
}
