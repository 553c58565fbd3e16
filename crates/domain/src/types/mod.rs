//! Domain types

pub mod application;
pub mod url_event;

pub use application::ApplicationInfo;
pub use url_event::UrlEvent;
