//! Bulletin Preprocessors
//!
//! This module turns the page texts of one bulletin into the single cleaned
//! blob that the segmenter works on.
//!
//! ## Architecture
//!
//! ```text
//! Extracted page texts
//!     ↓
//! [Preprocessor]  (boilerplate lines and masthead removed)
//!     ↓
//! Cleaned bulletin text
//!     ↓
//! [Segmenter]
//! ```
//!
//! Extraction of page text from the binary document happens upstream.

pub mod preprocessor;
pub mod text_cleaner;

pub use preprocessor::Preprocessor;
pub use text_cleaner::TextCleaner;
