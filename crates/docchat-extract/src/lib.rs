//! # docchat-extract
//!
//! Document loaders for docchat: plain text, PDF, and web pages.
//!
//! File loaders implement [`docchat_core::DocumentLoader`] and are
//! dispatched by extension through [`LoaderRegistry`]; URL sources go
//! through [`WebLoader`]. Unsupported extensions surface
//! [`docchat_core::ExtractError::UnsupportedFormat`] rather than being
//! silently mis-parsed.

pub mod pdf;
pub mod registry;
pub mod text;
pub mod web;

pub use pdf::PdfLoader;
pub use registry::LoaderRegistry;
pub use text::TextLoader;
pub use web::WebLoader;
