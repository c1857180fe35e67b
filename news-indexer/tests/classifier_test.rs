mod common;

use chrono::{Duration, Utc};
use common::article;
use news_indexer::defaults::DEFAULT_KEYWORDS;
use news_indexer::{classify, IndexerError, KeywordSet, RecencyWindow};

#[test]
fn test_matches_keyword_in_title_or_summary() {
    let keywords = KeywordSet::new(DEFAULT_KEYWORDS.iter().copied()).unwrap();

    let in_summary = article(
        "https://example.com/a",
        "Energy update",
        "This article discusses nuclear fusion and reactors.",
    );
    let in_title = article("https://example.com/b", "New Reactor design approved", "");

    assert!(classify(&in_summary, &keywords));
    assert!(classify(&in_title, &keywords));
}

#[test]
fn test_no_keyword_means_not_relevant() {
    let keywords = KeywordSet::new(["reactor", "uranium", "tokamak"]).unwrap();
    let unrelated = article(
        "https://example.com/garden",
        "Spring planting",
        "This article is about gardening and plants.",
    );

    assert!(!keywords.classify(&unrelated));
    assert!(keywords.matching_keywords(&unrelated).is_empty());
}

#[test]
fn test_match_is_case_insensitive_both_ways() {
    let keywords = KeywordSet::new(["IAEA", "breeder reactor"]).unwrap();

    let lower = article("https://example.com/1", "iaea inspectors arrive", "");
    let upper = article("https://example.com/2", "Plans", "A BREEDER REACTOR is planned");

    assert!(keywords.classify(&lower));
    assert!(keywords.classify(&upper));
}

#[test]
fn test_matching_keywords_keeps_configured_spelling_and_order() {
    let keywords = KeywordSet::new(["NRC", "uranium", "fusion"]).unwrap();
    let a = article(
        "https://example.com/3",
        "Fusion startup raises funds",
        "The nrc reviewed the uranium supply.",
    );

    assert_eq!(keywords.matching_keywords(&a), vec!["NRC", "uranium", "fusion"]);
}

#[test]
fn test_keyword_only_in_url_does_not_match() {
    let keywords = KeywordSet::new(["reactor"]).unwrap();
    let a = article("https://example.com/reactor-news", "Weather", "Sunny");

    assert!(!keywords.classify(&a));
}

#[test]
fn test_empty_keyword_set_is_config_error() {
    let empty: Vec<String> = Vec::new();
    assert!(matches!(
        KeywordSet::new(empty),
        Err(IndexerError::ClassificationConfig(_))
    ));

    let blank = KeywordSet::new(["", "   ", "\t"]);
    assert!(matches!(blank, Err(IndexerError::ClassificationConfig(_))));
}

#[test]
fn test_duplicate_keywords_collapse() {
    let keywords = KeywordSet::new(["Reactor", "reactor", " REACTOR "]).unwrap();
    assert_eq!(keywords.len(), 1);
    assert_eq!(keywords.keywords(), &["Reactor".to_string()]);
}

#[test]
fn test_recency_window() {
    let window = RecencyWindow::last_days(7);

    let mut fresh = article("https://example.com/new", "Recent Article", "");
    fresh.published_at = Some(Utc::now() - Duration::hours(2));

    let mut old = article("https://example.com/old", "Old Article", "");
    old.published_at = Some(Utc::now() - Duration::days(10));

    let undated = article("https://example.com/undated", "Undated", "");

    assert!(window.is_recent(&fresh));
    assert!(!window.is_recent(&old));
    assert!(window.is_recent(&undated));
    assert!(RecencyWindow::unbounded().is_recent(&old));
}
