/// The small two-level layout used throughout the examples.
pub const SCENARIO: &str = r#"<layout><folder ID="root"><channel ID="n1" fname="weather"/><folder ID="f2"><channel ID="n2" fname="news"/></folder></folder></layout>"#;

/// A layout shaped like a real portal layout: header/footer folders, tabs,
/// columns and channels, with whitespace and comments between elements.
pub const PORTAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<layout>
  <!-- user layout -->
  <folder ID="s1" name="Root folder" type="root" hidden="false" unremovable="true" immutable="true">
    <folder ID="s2" name="Header folder" type="header" hidden="true">
      <channel ID="n3" fname="header" chanID="1" name="Header" hidden="false"/>
    </folder>
    <folder ID="s4" name="Home" type="regular">
      <folder ID="s5" name="Column" width="50%">
        <channel ID="n6" fname="weather" chanID="12" title="Weather"/>
        <channel ID="n7" fname="news" chanID="17" title="News &amp; Notes"/>
      </folder>
      <folder ID="s8" name="Column" width="50%">
        <channel ID="n9" fname="calendar" chanID="23"/>
        <!-- duplicate functional name, later in document order -->
        <channel ID="n10" fname="weather" chanID="12"/>
      </folder>
    </folder>
    <folder ID="s11" name="Footer folder" type="footer">
      <channel ID="n12" fname="footer" chanID="2"/>
    </folder>
  </folder>
</layout>
"#;

/// Ids of `PORTAL` in document order.
pub const PORTAL_IDS: &[&str] = &[
    "s1", "s2", "n3", "s4", "s5", "n6", "n7", "s8", "n9", "n10", "s11", "n12",
];
