//! Screen-level view renderers, one module per `View` variant.

pub mod library;
pub mod playing;
pub mod settings;
pub mod welcome;
