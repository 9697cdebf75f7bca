//! Personal name parsing for author lists.

/// Lowercase particles that belong to the family name (`van Gogh`, `de la Cruz`).
const PARTICLES: &[&str] = &[
    "van", "von", "de", "der", "den", "da", "das", "di", "du", "la", "le", "del", "della", "dos",
    "ter", "ten", "bin", "ibn", "al", "st.",
];

/// Generational suffixes kept apart from the family name.
const SUFFIXES: &[&str] = &["jr", "jr.", "sr", "sr.", "ii", "iii", "iv", "v"];

/// Words that mark a corporate author.
const ORGANIZATION_WORDS: &[&str] = &[
    "association", "organization", "organisation", "institute", "department", "agency",
    "committee", "council", "bureau", "office", "university", "society", "center", "centre",
    "commission", "foundation", "ministry", "staff", "board", "service", "news", "press",
    "group", "inc", "inc.", "ltd", "llc", "corporation", "company", "government", "team",
];

/// A parsed author name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    /// Given names, if any.
    pub given: Option<String>,
    /// Family name, including particles.
    pub family: String,
    /// Generational suffix (`Jr.`, `III`).
    pub suffix: Option<String>,
    /// Corporate author, never inverted.
    pub organization: bool,
}

impl PersonName {
    /// Parse a display name in either `Given Family` or `Family, Given` order.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        if is_organization(&name) {
            return Self::organization(name);
        }

        if let Some((family, rest)) = name.split_once(',') {
            let mut parts = rest.split(',').map(str::trim).filter(|p| !p.is_empty());
            let first = parts.next();
            let second = parts.next();
            let (given, suffix) = match (first, second) {
                (Some(g), Some(s)) => (Some(g), Some(s)),
                (Some(g), None) if is_suffix(g) => (None, Some(g)),
                (g, _) => (g, None),
            };
            return Self {
                given: given.map(str::to_string),
                family: family.trim().to_string(),
                suffix: suffix.map(normalize_suffix),
                organization: false,
            };
        }

        let mut tokens: Vec<&str> = name.split(' ').collect();
        let suffix = match tokens.last() {
            Some(last) if tokens.len() > 2 && is_suffix(last) => tokens.pop().map(normalize_suffix),
            _ => None,
        };

        if tokens.len() < 2 {
            return Self::organization(name);
        }

        let mut family_start = tokens.len() - 1;
        while family_start > 1 && is_particle(tokens[family_start - 1]) {
            family_start -= 1;
        }

        Self {
            given: Some(tokens[..family_start].join(" ")),
            family: tokens[family_start..].join(" "),
            suffix,
            organization: false,
        }
    }

    fn organization(name: String) -> Self {
        Self { given: None, family: name, suffix: None, organization: true }
    }

    /// `Given Family Jr.`
    #[must_use]
    pub fn given_first(&self) -> String {
        let mut out = match &self.given {
            Some(given) => format!("{given} {}", self.family),
            None => self.family.clone(),
        };
        if let Some(suffix) = &self.suffix {
            out.push(' ');
            out.push_str(suffix);
        }
        out
    }

    /// `Family, Given, Jr.`
    #[must_use]
    pub fn family_first(&self) -> String {
        let mut out = match &self.given {
            Some(given) => format!("{}, {given}", self.family),
            None => self.family.clone(),
        };
        if let Some(suffix) = &self.suffix {
            out.push_str(", ");
            out.push_str(suffix);
        }
        out
    }

    /// Initials of the given names: `Jean-Paul Ray` gives `J.-P. R.`.
    #[must_use]
    pub fn initials(&self) -> Option<String> {
        let given = self.given.as_deref()?;
        let initials: Vec<String> = given
            .split_whitespace()
            .map(|word| {
                word.split('-')
                    .filter_map(|part| part.chars().find(|c| c.is_alphabetic()))
                    .map(|c| format!("{}.", c.to_uppercase()))
                    .collect::<Vec<_>>()
                    .join("-")
            })
            .filter(|s| !s.is_empty())
            .collect();
        (!initials.is_empty()).then(|| initials.join(" "))
    }

    /// `Family, G. M., Jr.` as used in APA reference lists.
    #[must_use]
    pub fn family_initials(&self) -> String {
        let mut out = match self.initials() {
            Some(initials) => format!("{}, {initials}", self.family),
            None => self.family.clone(),
        };
        if let Some(suffix) = &self.suffix {
            out.push_str(", ");
            out.push_str(suffix);
        }
        out
    }
}

fn is_particle(word: &str) -> bool {
    PARTICLES.contains(&word)
}

fn is_suffix(word: &str) -> bool {
    SUFFIXES.contains(&word.to_ascii_lowercase().as_str())
}

fn normalize_suffix(word: &str) -> String {
    match word.to_ascii_lowercase().trim_end_matches('.') {
        "jr" => "Jr.".to_string(),
        "sr" => "Sr.".to_string(),
        _ => word.to_ascii_uppercase(),
    }
}

fn is_organization(name: &str) -> bool {
    name.split(|c: char| c.is_whitespace() || c == ',')
        .any(|w| ORGANIZATION_WORDS.contains(&w.to_ascii_lowercase().as_str()))
        || name.split_whitespace().count() > 5
}
