use std::sync::Arc;
use ulayout::{Locale, MessageError, MessageHelper, MessageSourceConfig, StaticMessageSource};

const EN: &str = "\
# Layout management labels
layout.add.tab = Add Tab
layout.remove.channel = Remove channel
layout.footer = Footer
";

const DE: &str = "\
layout.add.tab = Tab hinzufügen
layout.remove.channel: Kanal entfernen
";

fn helper() -> MessageHelper {
    let source = StaticMessageSource::with_config(MessageSourceConfig {
        fallback_locale: Some(Locale::new("en")),
        ..Default::default()
    });
    source.add_properties(&Locale::new("en"), EN).unwrap();
    source.add_properties(&Locale::new("de"), DE).unwrap();
    MessageHelper::new(Arc::new(source))
}

#[test]
fn test_helper_resolves_by_language() {
    let helper = helper();
    assert_eq!(helper.message("layout.add.tab", "en").unwrap(), "Add Tab");
    assert_eq!(helper.message("layout.add.tab", "de").unwrap(), "Tab hinzufügen");
    assert_eq!(helper.message("layout.remove.channel", "DE").unwrap(), "Kanal entfernen");
}

#[test]
fn test_helper_falls_back_to_configured_locale() {
    let helper = helper();
    assert_eq!(helper.message("layout.footer", "de").unwrap(), "Footer");
    assert_eq!(helper.message("layout.add.tab", "ja").unwrap(), "Add Tab");
}

#[test]
fn test_helper_propagates_unknown_codes() {
    let helper = helper();
    let err = helper.message("layout.unknown", "de").unwrap_err();
    assert_eq!(
        err,
        MessageError::NoSuchMessage {
            code: "layout.unknown".to_string(),
            locale: "de".to_string(),
        }
    );
}

#[test]
fn test_helper_is_shareable_across_threads() {
    let helper = helper();
    let handles: Vec<_> = ["en", "de"]
        .into_iter()
        .map(|language| {
            let helper = helper.clone();
            std::thread::spawn(move || helper.message("layout.add.tab", language).unwrap())
        })
        .collect();
    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec!["Add Tab", "Tab hinzufügen"]);
}
