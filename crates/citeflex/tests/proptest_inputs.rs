//! Property-based tests: detection, routing, scraping and formatting never
//! panic, and formatter output stays well formed.

use proptest::prelude::*;

use citeflex::engines::PageMeta;
use citeflex::formatters::{format_export, get_formatter, strip_markup};
use citeflex::input::{InputKind, detect};
use citeflex::models::{CitationForm, CitationMetadata, CitationStyle, CitationType, ExportFormat};
use citeflex::router::{UrlRouter, dispatch};

fn arb_citation_type() -> impl Strategy<Value = CitationType> {
    prop_oneof![
        Just(CitationType::Journal),
        Just(CitationType::Book),
        Just(CitationType::Newspaper),
        Just(CitationType::Government),
        Just(CitationType::Legal),
        Just(CitationType::Webpage),
        Just(CitationType::Video),
        Just(CitationType::Encyclopedia),
        Just(CitationType::Preprint),
        Just(CitationType::Medical),
    ]
}

fn arb_style() -> impl Strategy<Value = CitationStyle> {
    prop_oneof![Just(CitationStyle::Chicago), Just(CitationStyle::Apa), Just(CitationStyle::Mla)]
}

/// Metadata with any subset of the common fields filled in.
fn arb_metadata() -> impl Strategy<Value = CitationMetadata> {
    let text = || proptest::option::of("[A-Za-z][A-Za-z0-9 .,:'-]{0,40}");
    (
        arb_citation_type(),
        text(),
        proptest::collection::vec("[A-Z][a-z]{1,10}( [A-Z]\\.)? [A-Z][a-z]{1,12}", 0..6),
        proptest::option::of("(1[89][0-9]{2}|20[0-2][0-9])(-0[1-9]-1[0-9])?"),
        text(),
        text(),
        proptest::option::of("[0-9]{1,3}"),
        proptest::option::of("[0-9]{1,4}(-[0-9]{1,4})?"),
        proptest::option::of("10\\.[0-9]{4}/[a-z0-9.]{1,12}"),
        text(),
        proptest::option::of("[0-9]{1,3} U\\.S\\. [0-9]{1,4}"),
    )
        .prop_map(|(citation_type, title, authors, date, container, publisher, volume, pages, doi, case_name, citation)| {
            CitationMetadata {
                citation_type,
                title,
                authors,
                date,
                journal: container.clone(),
                newspaper: container.clone(),
                website: container,
                publisher,
                volume,
                pages,
                doi,
                case_name,
                citation,
                ..CitationMetadata::default()
            }
        })
}

proptest! {
    /// Detection accepts any text.
    #[test]
    fn detect_never_panics(text in "\\PC{0,200}") {
        let _ = detect(&text);
    }

    /// Text containing a DOI is never searched as free text.
    #[test]
    fn detect_finds_embedded_doi(prefix in "[0-9]{4,5}", suffix in "[a-z0-9]{1,12}") {
        let text = format!("see 10.{prefix}/{suffix} for details");
        let kind = detect(&text);
        let is_doi = matches!(kind, InputKind::Doi { .. });
        prop_assert!(is_doi, "{:?}", kind);
    }

    /// Classification accepts any text and agrees with the rule order.
    #[test]
    fn classify_never_panics(raw in "\\PC{0,120}") {
        let router = UrlRouter::new();
        if let Ok(route) = router.classify(&raw) {
            prop_assert_eq!(route.engine, dispatch(route.url_type));
            let rules = router.matching_rules(&raw).unwrap();
            if let Some(first) = rules.first() {
                prop_assert_eq!(*first, route.url_type);
            }
        }
    }

    /// Hosts built from arbitrary labels always classify.
    #[test]
    fn classify_accepts_any_host(host in "[a-z]{4,12}\\.(com|org|gov|edu|co\\.uk)", path in "(/[a-z0-9]{1,8}){0,4}") {
        let router = UrlRouter::new();
        let route = router.classify(&format!("https://{host}{path}")).unwrap();
        prop_assert_eq!(route.domain, host);
    }

    /// Page parsing accepts any markup.
    #[test]
    fn page_parse_never_panics(html in "\\PC{0,300}") {
        let _ = PageMeta::parse(&html);
    }

    /// Every form in every style is non-empty with balanced italics.
    #[test]
    fn formatters_well_formed(meta in arb_metadata(), style in arb_style(), page in proptest::option::of("[0-9]{1,3}")) {
        let formatter = get_formatter(style);
        for form in [CitationForm::Full, CitationForm::Short, CitationForm::Ibid] {
            let out = formatter.format(&meta, form, page.as_deref());
            prop_assert!(!out.trim().is_empty());
            prop_assert_eq!(out.matches("<i>").count(), out.matches("</i>").count(), "{}", out);
            prop_assert!(!strip_markup(&out).contains("<i>"));
        }
        let _ = formatter.format_bibliography(&meta);
    }

    /// Exports always produce one complete record.
    #[test]
    fn exports_well_formed(meta in arb_metadata()) {
        let ris = format_export(std::slice::from_ref(&meta), ExportFormat::Ris);
        prop_assert!(ris.starts_with("TY  - "));
        prop_assert!(ris.trim_end().ends_with("ER  -"), "ris record is not closed: {}", ris);

        let bib = format_export(std::slice::from_ref(&meta), ExportFormat::Bibtex);
        prop_assert!(bib.starts_with('@'));
        prop_assert!(bib.trim_end().ends_with('}'), "bibtex record is not closed: {}", bib);
    }
}
