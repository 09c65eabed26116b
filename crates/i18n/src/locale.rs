use std::fmt;

/// A language with an optional country, e.g. `en` or `en_US`.
///
/// The language is stored lowercase and the country uppercase. The empty
/// language is the root locale, whose catalog holds locale-neutral messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    /// A language-only locale. The tag is taken as-is apart from case folding;
    /// no region is split off.
    pub fn new(language: &str) -> Self {
        Self {
            language: language.trim().to_lowercase(),
            country: None,
        }
    }

    pub fn with_country(language: &str, country: &str) -> Self {
        let country = country.trim();
        Self {
            language: language.trim().to_lowercase(),
            country: (!country.is_empty()).then(|| country.to_uppercase()),
        }
    }

    /// Parses catalog-style tags: `en`, `en_US` or `en-US`.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().split_once(['_', '-']) {
            Some((language, country)) => Self::with_country(language, country),
            None => Self::new(tag),
        }
    }

    pub fn root() -> Self {
        Self {
            language: String::new(),
            country: None,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.country.is_none()
    }

    /// This locale without its country, or `None` if it has no country.
    pub fn language_only(&self) -> Option<Locale> {
        self.country.as_ref().map(|_| Locale::new(&self.language))
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => f.write_str(&self.language),
        }
    }
}
