//! Read-only access to a user's portal layout.
//!
//! A layout is an XML document with a `<layout>` wrapper around one root
//! `<folder>`; folders nest further folders and `<channel>` leaves, and every
//! node carries a unique `ID` attribute. [`SimpleLayout`] answers structural
//! queries over such a document and exports whole layouts or subtrees into a
//! [`DocumentSink`].
//!
//! ```
//! use ulayout::{SimpleLayout, UserLayout};
//!
//! let layout = SimpleLayout::from_xml(
//!     "u1",
//!     r#"<layout><folder ID="root"><channel ID="n1" fname="weather"/></folder></layout>"#,
//! )?;
//! assert_eq!(layout.root_id().unwrap(), "root");
//! assert_eq!(layout.node_id_for_fname("weather")?.unwrap(), "n1");
//! # Ok::<(), ulayout::LayoutError>(())
//! ```

pub mod description;
pub mod error;
pub mod layout;
pub mod listener;

pub use description::{NodeDescription, NodeKind};
pub use error::LayoutError;
pub use layout::{SimpleLayout, UserLayout};
pub use listener::LayoutEventListener;

// Re-export the building blocks callers need alongside a layout.
pub use ulayout_dom::{DocumentSink, LayoutDocument, NodeHandle, SinkError, XmlWriterSink};
pub use ulayout_i18n::{
    Locale, MessageError, MessageHelper, MessageSource, MessageSourceConfig, StaticMessageSource,
};
pub use ulayout_types::{CacheKey, LayoutId, NodeId};
pub use ulayout_xpath1::{Expression, XPathError, parse_expression};
