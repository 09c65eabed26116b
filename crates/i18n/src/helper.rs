use crate::error::MessageError;
use crate::locale::Locale;
use crate::source::MessageSource;
use std::sync::Arc;

/// Resolves message codes for a bare language tag such as `"en"`.
///
/// The helper holds no state of its own; it is as thread-safe as the source
/// it wraps, and cloning it shares that source.
#[derive(Debug, Clone)]
pub struct MessageHelper {
    source: Arc<dyn MessageSource>,
}

impl MessageHelper {
    pub fn new(source: Arc<dyn MessageSource>) -> Self {
        Self { source }
    }

    /// Looks up `code` for `language` with no message arguments.
    ///
    /// The language tag becomes a language-only [`Locale`]; no region is
    /// derived from it. Resolution failures from the source are returned as-is.
    pub fn message(&self, code: &str, language: &str) -> Result<String, MessageError> {
        let locale = Locale::new(language);
        self.source.message(code, &[], &locale)
    }

    pub fn source(&self) -> &Arc<dyn MessageSource> {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticMessageSource;
    use std::sync::Mutex;

    fn helper_with(messages: &[(&str, &str, &str)]) -> MessageHelper {
        let source = StaticMessageSource::new();
        for (language, code, text) in messages {
            source.add_message(&Locale::new(language), *code, *text).unwrap();
        }
        MessageHelper::new(Arc::new(source))
    }

    #[test]
    fn test_resolves_per_language() {
        let helper = helper_with(&[
            ("en", "greeting", "Hello"),
            ("fr", "greeting", "Bonjour"),
        ]);
        assert_eq!(helper.message("greeting", "en").unwrap(), "Hello");
        assert_eq!(helper.message("greeting", "fr").unwrap(), "Bonjour");
    }

    #[test]
    fn test_language_tag_is_case_insensitive() {
        let helper = helper_with(&[("en", "greeting", "Hello")]);
        assert_eq!(helper.message("greeting", "EN").unwrap(), "Hello");
    }

    #[test]
    fn test_unknown_code_propagates() {
        let helper = helper_with(&[("en", "greeting", "Hello")]);
        let err = helper.message("missing", "en").unwrap_err();
        assert!(matches!(err, MessageError::NoSuchMessage { ref code, .. } if code == "missing"));
    }

    /// Records the locale each request was made with.
    #[derive(Debug, Default)]
    struct RecordingSource {
        seen: Mutex<Vec<(String, usize, Locale)>>,
    }

    impl MessageSource for RecordingSource {
        fn message(
            &self,
            code: &str,
            args: &[&str],
            locale: &Locale,
        ) -> Result<String, MessageError> {
            self.seen
                .lock()
                .unwrap()
                .push((code.to_string(), args.len(), locale.clone()));
            Ok(format!("[{}]", code))
        }
    }

    #[test]
    fn test_delegates_with_language_only_locale_and_no_args() {
        let source = Arc::new(RecordingSource::default());
        let helper = MessageHelper::new(source.clone());

        assert_eq!(helper.message("tab.add", "de_AT").unwrap(), "[tab.add]");

        let seen = source.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "tab.add");
        assert_eq!(seen[0].1, 0);
        assert_eq!(seen[0].2.country(), None);
        assert_eq!(seen[0].2.language(), "de_at");
    }
}
