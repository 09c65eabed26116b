//! Message resolution for layout user interfaces.
//!
//! A [`MessageHelper`] turns a message code and a bare language tag into a
//! localized string by delegating to a [`MessageSource`]. The crate ships an
//! in-memory [`StaticMessageSource`] with Java-properties style catalogs.

mod error;
mod helper;
mod locale;
mod source;

pub use error::MessageError;
pub use helper::MessageHelper;
pub use locale::Locale;
pub use source::{MessageSource, MessageSourceConfig, StaticMessageSource};
