//! Router tests: every domain-table entry lands on its documented engine.

use citeflex::router::domains::{ACADEMIC_PUBLISHERS, GOVERNMENT, LEGAL, NEWSPAPERS};
use citeflex::router::{EngineKind, UrlRouter, UrlType, dispatch};

/// Classify `url` and check the route agrees with the first matching rule.
fn check_table_entry(router: &UrlRouter, domain: &str, name: &str, expected: UrlType) {
    let url = format!("https://{domain}/2024/01/01/story");
    let rules = router.matching_rules(&url).unwrap();
    assert!(rules.contains(&expected), "{domain} not claimed as {expected}: {rules:?}");

    let route = router.classify(&url).unwrap();
    assert_eq!(route.url_type, rules[0], "{domain}: classify disagrees with rule order");
    assert_eq!(route.engine, dispatch(route.url_type));

    if route.url_type == expected {
        assert_eq!(route.publication, Some(name), "{domain}");
    }
}

#[test]
fn test_newspaper_table() {
    let router = UrlRouter::new();
    for (domain, name) in NEWSPAPERS {
        check_table_entry(&router, domain, name, UrlType::Newspaper);
    }
}

#[test]
fn test_government_table() {
    let router = UrlRouter::new();
    for (domain, name) in GOVERNMENT {
        check_table_entry(&router, domain, name, UrlType::Government);
    }
}

#[test]
fn test_legal_table() {
    let router = UrlRouter::new();
    for (domain, name) in LEGAL {
        check_table_entry(&router, domain, name, UrlType::Legal);
    }
}

#[test]
fn test_academic_table() {
    let router = UrlRouter::new();
    for (domain, name) in ACADEMIC_PUBLISHERS {
        check_table_entry(&router, domain, name, UrlType::AcademicPublisher);
    }
}

#[test]
fn test_documented_engines() {
    let cases = [
        ("https://doi.org/10.1038/nature12373", EngineKind::Crossref),
        ("https://www.jstor.org/stable/1885099", EngineKind::Crossref),
        ("https://arxiv.org/abs/1706.03762", EngineKind::Arxiv),
        ("https://pubmed.ncbi.nlm.nih.gov/32015507/", EngineKind::Pubmed),
        ("https://en.wikipedia.org/wiki/Ada_Lovelace", EngineKind::Wikipedia),
        ("https://youtu.be/dQw4w9WgXcQ", EngineKind::Youtube),
        ("https://vimeo.com/76979871", EngineKind::Vimeo),
        ("https://openlibrary.org/isbn/9780226458083", EngineKind::Books),
        (
            "https://www.semanticscholar.org/paper/204e3073870fae3d05bcbc2f6a8e263d9b72e776",
            EngineKind::SemanticScholar,
        ),
        ("https://supreme.justia.com/cases/federal/us/410/113/", EngineKind::Legal),
        ("https://www.nytimes.com/2024/03/05/nyregion/council.html", EngineKind::Newspaper),
        ("https://www.cdc.gov/flu/index.html", EngineKind::Government),
        ("https://example.com/blog/post", EngineKind::Generic),
    ];

    let router = UrlRouter::new();
    for (url, engine) in cases {
        let route = router.classify(url).unwrap();
        assert_eq!(route.engine, engine, "{url}");
    }
}

#[test]
fn test_classification_is_stable() {
    let router = UrlRouter::new();
    let url = "https://www.theguardian.com/world/2024/jan/01/story#comments";
    let first = router.classify(url).unwrap();
    let second = router.classify(url).unwrap();
    assert_eq!(first, second);
    assert!(!first.url.contains('#'));
}
