//! Adapters for the external growth-assessment service.

pub mod gemini;
pub mod unavailable;

pub use gemini::GeminiProvider;
pub use unavailable::UnavailableProvider;
