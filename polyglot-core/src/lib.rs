//! Request culture negotiation, preference persistence and resource-string lookup.
//!
//! Nothing in here knows about a web framework: the server feeds requests in through
//! [`resolution::RequestView`] and turns a [`selection::PreferenceResponse`] into its own
//! cookie and redirect types.

pub mod accept_language;
pub mod catalog;
pub mod cookie;
pub mod culture;
pub mod error;
pub mod options;
pub mod resolution;
pub mod selection;

pub use culture::CultureTag;
pub use error::{PolyglotError, PolyglotResult};
