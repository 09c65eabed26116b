//! The `MessageSource` seam and an in-memory catalog implementation.

use crate::error::MessageError;
use crate::locale::Locale;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

/// Resolves message codes to localized text.
pub trait MessageSource: Send + Sync + Debug {
    /// Resolves `code` for `locale`, substituting `args` into `{0}`, `{1}`, ...
    /// placeholders. With no arguments the message text is returned verbatim.
    fn message(&self, code: &str, args: &[&str], locale: &Locale) -> Result<String, MessageError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSourceConfig {
    /// Return the code itself instead of failing when no catalog has it.
    ///
    /// Defaults to `false`.
    pub use_code_as_default_message: bool,

    /// Tried after the requested locale and its language, before the root catalog.
    ///
    /// Defaults to `None`.
    pub fallback_locale: Option<Locale>,
}

type Catalog = HashMap<String, String>;

/// An in-memory message source with one catalog per locale.
///
/// Lookup order for a locale `ll_CC`: `ll_CC`, then `ll`, then the configured
/// fallback locale (and its language), then the root catalog.
#[derive(Debug, Default)]
pub struct StaticMessageSource {
    catalogs: RwLock<HashMap<Locale, Catalog>>,
    config: MessageSourceConfig,
}

impl StaticMessageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MessageSourceConfig) -> Self {
        Self {
            catalogs: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &MessageSourceConfig {
        &self.config
    }

    /// Adds or replaces a single message.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::Unavailable` if the internal lock is poisoned.
    pub fn add_message(
        &self,
        locale: &Locale,
        code: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), MessageError> {
        let mut catalogs = self.write_catalogs()?;
        catalogs
            .entry(locale.clone())
            .or_default()
            .insert(code.into(), text.into());
        Ok(())
    }

    /// Loads messages from Java-properties style text and returns how many
    /// entries were read.
    ///
    /// Supports `key=value`, `key: value` and `key value` lines, `#` and `!`
    /// comments, and a trailing backslash to continue a value on the next line.
    pub fn add_properties(&self, locale: &Locale, text: &str) -> Result<usize, MessageError> {
        let entries = parse_properties(text);
        let count = entries.len();
        let mut catalogs = self.write_catalogs()?;
        catalogs.entry(locale.clone()).or_default().extend(entries);
        log::debug!("Loaded {} messages for locale '{}'", count, locale);
        Ok(count)
    }

    /// Number of messages across all catalogs. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.catalogs
            .read()
            .map(|c| c.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_catalogs(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Locale, Catalog>>, MessageError> {
        self.catalogs
            .write()
            .map_err(|_| MessageError::Unavailable("message catalog lock poisoned".to_string()))
    }

    fn candidates(&self, locale: &Locale) -> Vec<Locale> {
        let mut chain = vec![locale.clone()];
        chain.extend(locale.language_only());
        if let Some(fallback) = &self.config.fallback_locale {
            chain.push(fallback.clone());
            chain.extend(fallback.language_only());
        }
        chain.push(Locale::root());
        chain.dedup();
        chain
    }
}

impl MessageSource for StaticMessageSource {
    fn message(&self, code: &str, args: &[&str], locale: &Locale) -> Result<String, MessageError> {
        let catalogs = self
            .catalogs
            .read()
            .map_err(|_| MessageError::Unavailable("message catalog lock poisoned".to_string()))?;

        let found = self.candidates(locale).into_iter().find_map(|candidate| {
            catalogs
                .get(&candidate)
                .and_then(|catalog| catalog.get(code))
                .map(|text| (candidate, text))
        });

        match found {
            Some((resolved, text)) => {
                if &resolved != locale {
                    log::debug!(
                        "Message '{}' for locale '{}' resolved from '{}'",
                        code,
                        locale,
                        resolved
                    );
                }
                format_message(code, text, args)
            }
            None if self.config.use_code_as_default_message => Ok(code.to_string()),
            None => Err(MessageError::NoSuchMessage {
                code: code.to_string(),
                locale: locale.to_string(),
            }),
        }
    }
}

/// Replaces `{n}` placeholders with `args[n]`. Placeholders without a matching
/// argument are kept as written.
fn format_message(code: &str, pattern: &str, args: &[&str]) -> Result<String, MessageError> {
    if args.is_empty() {
        return Ok(pattern.to_string());
    }
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| MessageError::MalformedPattern {
            code: code.to_string(),
            pattern: pattern.to_string(),
        })?;
        let placeholder = &after[..close];
        match placeholder.trim().parse::<usize>().ok().and_then(|i| args.get(i)) {
            Some(arg) => out.push_str(arg),
            None => {
                out.push('{');
                out.push_str(placeholder);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn parse_properties(text: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let mut logical = line.to_string();
        while logical.ends_with('\\') {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }
        let (key, value) = match logical.find(['=', ':', ' ', '\t']) {
            Some(pos) => {
                let value = logical[pos + 1..].trim_start();
                let value = value
                    .strip_prefix(['=', ':'])
                    .map(str::trim_start)
                    .unwrap_or(value);
                (logical[..pos].trim_end(), value)
            }
            None => (logical.as_str(), ""),
        };
        entries.push((key.to_string(), value.to_string()));
    }
    entries
}
