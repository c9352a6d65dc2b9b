//! Source document discovery for docnav.
//!
//! This crate provides a [`Source`] trait for abstracting how documentation
//! source files are found and read. The TOC builder only sees docnames
//! (extension-less, `/`-separated identifiers such as `guide/intro`), never
//! file paths.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Source`] trait with `scan()` and `read()` methods
//! - [`FsSource`] implementation walking a source directory with
//!   include/exclude glob patterns
//! - [`MockSource`] for testing (behind `mock` feature flag)
//! - [`extract_title`] for first-heading lookup in Markdown and reST
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docnav_source::{FsSource, Source};
//!
//! let source = FsSource::new(PathBuf::from("docs"));
//! for doc in source.scan()? {
//!     println!("{}: {}", doc.docname, doc.title);
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod source;
mod title;

pub use fs::FsSource;
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use source::{Document, Source, SourceError, SourceErrorKind, SourceFormat};
pub use title::extract_title;
