mod common;

use chrono::{TimeZone, Utc};
use common::{rss, Item};
use news_indexer::{FeedParser, FeedSource, IndexerError};

#[test]
fn test_parse_rss_entries() {
    let published = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
    let body = rss(
        "Energy Wire",
        &[
            Item::new("Reactor restart", "https://example.com/restart", "The reactor restarted.")
                .published(published),
            Item::new("Solar farm", "https://example.com/solar", "Panels installed."),
        ],
    );

    let source = FeedSource::new("https://example.com/feed.xml");
    let parsed = FeedParser::parse_feed(&body, &source).unwrap();

    assert_eq!(parsed.title.as_deref(), Some("Energy Wire"));
    assert_eq!(parsed.malformed, 0);
    assert_eq!(parsed.articles.len(), 2);

    let first = &parsed.articles[0];
    assert_eq!(first.url, "https://example.com/restart");
    assert_eq!(first.title, "Reactor restart");
    assert_eq!(first.summary, "The reactor restarted.");
    assert_eq!(first.source_feed, "Energy Wire");
    assert_eq!(first.published_at, Some(published));
    assert_eq!(parsed.articles[1].published_at, None);
}

#[test]
fn test_entries_without_title_or_link_are_counted() {
    let body = rss(
        "Mixed",
        &[
            Item::new("Good entry", "https://example.com/good", "fine"),
            Item {
                title: None,
                link: Some("https://example.com/untitled"),
                description: "no title",
                published: None,
            },
            Item {
                title: Some("No link"),
                link: None,
                description: "no link",
                published: None,
            },
        ],
    );

    let parsed = FeedParser::parse_feed(&body, &FeedSource::new("https://example.com/mixed")).unwrap();

    assert_eq!(parsed.articles.len(), 1);
    assert_eq!(parsed.malformed, 2);
    assert_eq!(parsed.articles[0].url, "https://example.com/good");
}

#[test]
fn test_label_overrides_feed_title() {
    let body = rss("Channel Title", &[Item::new("A", "https://example.com/a", "x")]);
    let source = FeedSource::new("https://example.com/feed").with_label("IAEA News");

    let parsed = FeedParser::parse_feed(&body, &source).unwrap();
    assert_eq!(parsed.articles[0].source_feed, "IAEA News");
}

#[test]
fn test_parse_atom_feed() {
    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Physics</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2025-05-01T12:00:00Z</updated>
  <entry>
    <title>Neutrino mass bound tightened</title>
    <link href="https://example.org/neutrino"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <updated>2025-05-01T12:00:00Z</updated>
    <author><name>Jo Researcher</name></author>
    <summary>New detector results.</summary>
  </entry>
</feed>"#;

    let parsed = FeedParser::parse_feed(body, &FeedSource::new("https://example.org/atom")).unwrap();

    assert_eq!(parsed.articles.len(), 1);
    let entry = &parsed.articles[0];
    assert_eq!(entry.url, "https://example.org/neutrino");
    assert_eq!(entry.summary, "New detector results.");
    assert_eq!(entry.author.as_deref(), Some("Jo Researcher"));
    assert_eq!(
        entry.published_at,
        Some(Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap())
    );
}

#[test]
fn test_non_feed_document_is_parse_error() {
    let html = "<html><body><h1>Not a feed</h1></body></html>";
    let result = FeedParser::parse_feed(html, &FeedSource::new("https://example.com/page"));
    assert!(matches!(result, Err(IndexerError::Parse(_))));
}

#[test]
fn test_atom_entry_prefers_alternate_link() {
    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Links</title>
  <id>urn:example:links</id>
  <updated>2025-03-14T09:30:00Z</updated>
  <entry>
    <title>Fusion milestone</title>
    <id>urn:example:links:1</id>
    <updated>2025-03-14T09:30:00Z</updated>
    <link rel="self" href="https://example.com/api/entries/1"/>
    <link rel="replies" href="https://example.com/fusion#comments"/>
    <link rel="alternate" href="https://example.com/fusion"/>
    <summary>Ignition achieved again.</summary>
  </entry>
  <entry>
    <title>Only a self link</title>
    <id>urn:example:links:2</id>
    <updated>2025-03-14T09:30:00Z</updated>
    <link rel="self" href="https://example.com/api/entries/2"/>
    <summary>Fallback.</summary>
  </entry>
</feed>"#;

    let parsed = FeedParser::parse_feed(body, &FeedSource::new("https://example.com/atom")).unwrap();

    assert_eq!(parsed.articles.len(), 2);
    assert_eq!(parsed.articles[0].url, "https://example.com/fusion");
    assert_eq!(parsed.articles[1].url, "https://example.com/api/entries/2");
}
