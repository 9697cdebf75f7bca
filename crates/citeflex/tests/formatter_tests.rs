//! Cross-style formatter tests.

use citeflex::formatters::{
    ApaFormatter, ChicagoFormatter, CitationFormatter, MlaFormatter, get_formatter, strip_markup,
};
use citeflex::models::{CitationForm, CitationMetadata, CitationStyle, CitationType};

fn samples() -> Vec<CitationMetadata> {
    vec![
        CitationMetadata {
            citation_type: CitationType::Journal,
            title: Some("Prospect Theory: An Analysis of Decision under Risk".into()),
            authors: vec!["Daniel Kahneman".into(), "Amos Tversky".into()],
            date: Some("1979-03".into()),
            journal: Some("Econometrica".into()),
            volume: Some("47".into()),
            issue: Some("2".into()),
            pages: Some("263-291".into()),
            doi: Some("10.2307/1914185".into()),
            ..CitationMetadata::default()
        },
        CitationMetadata {
            citation_type: CitationType::Newspaper,
            title: Some("City Council Votes".into()),
            authors: vec!["Jane Doe".into()],
            date: Some("2024-03-05".into()),
            newspaper: Some("The New York Times".into()),
            url: Some("https://www.nytimes.com/2024/03/05/nyregion/council.html".into()),
            ..CitationMetadata::default()
        },
        CitationMetadata {
            citation_type: CitationType::Legal,
            case_name: Some("Roe v. Wade".into()),
            citation: Some("410 U.S. 113".into()),
            year: Some("1973".into()),
            court: Some("Supreme Court of the United States".into()),
            ..CitationMetadata::default()
        },
        CitationMetadata {
            citation_type: CitationType::Webpage,
            title: Some("Release Notes".into()),
            website: Some("Example".into()),
            url: Some("https://example.com/notes".into()),
            access_date: Some("2024-06-01".into()),
            ..CitationMetadata::default()
        },
    ]
}

#[test]
fn test_formatting_is_idempotent() {
    for style in CitationStyle::ALL {
        let formatter = get_formatter(style);
        for meta in samples() {
            let copy = meta.clone();
            for form in [CitationForm::Full, CitationForm::Short, CitationForm::Ibid] {
                let first = formatter.format(&meta, form, Some("12"));
                let second = formatter.format(&copy, form, Some("12"));
                assert_eq!(first, second, "{style} {form:?}");
            }
            assert_eq!(formatter.format_bibliography(&meta), formatter.format_bibliography(&copy));
        }
    }
}

#[test]
fn test_get_formatter_matches_style() {
    let meta = &samples()[0];
    assert_eq!(get_formatter(CitationStyle::Chicago).format_full(meta), ChicagoFormatter.format_full(meta));
    assert_eq!(get_formatter(CitationStyle::Apa).format_full(meta), ApaFormatter.format_full(meta));
    assert_eq!(get_formatter(CitationStyle::Mla).format_full(meta), MlaFormatter.format_full(meta));
}

#[test]
fn test_full_form_never_doubles_terminal_punctuation() {
    for style in CitationStyle::ALL {
        for meta in samples() {
            let plain = strip_markup(&get_formatter(style).format_full(&meta));
            assert!(!plain.contains(".."), "{style}: {plain}");
            assert!(!plain.contains(",,"), "{style}: {plain}");
        }
    }
}

#[test]
fn test_only_chicago_uses_ibid() {
    let meta = &samples()[0];
    assert_eq!(ChicagoFormatter.format(meta, CitationForm::Ibid, None), "Ibid.");
    assert!(ApaFormatter.format(meta, CitationForm::Ibid, None).starts_with("(Kahneman"));
    assert!(MlaFormatter.format(meta, CitationForm::Ibid, None).starts_with("(Kahneman"));
}
