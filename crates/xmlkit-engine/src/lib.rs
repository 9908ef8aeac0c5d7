//! The XML engine underneath xmlkit.
//!
//! This crate wraps [`quick-xml`] and exposes it the way a native XML engine
//! is usually exposed: with a boolean "advance" primitive, fallible
//! load/save primitives that signal failure through a sentinel (`None` or
//! `false`), and an ambient diagnostic log that records what went wrong.
//!
//! # Overview
//!
//! - [`diagnostics`]: the per-thread diagnostic sink (collect-mode flag plus
//!   append-only log)
//! - [`XmlReader`]: pull reader; [`XmlReader::read`] returns `false` on end of
//!   input *and* on a fatal fault, the log tells the two apart
//! - [`load`] / [`save`]: build an [`XmlDocument`] tree, serialize it back
//! - [`XmlWriter`]: streaming writer behind the [`XmlSink`] trait
//!
//! # Example
//!
//! ```rust
//! use xmlkit_engine::{diagnostics, load, XmlReader};
//!
//! let previous = diagnostics::use_internal_errors(true);
//! let offset = diagnostics::log_len();
//!
//! let document = load(XmlReader::from_str("<root><child/></root>")).unwrap();
//! assert_eq!(document.root.name, "root");
//! assert!(diagnostics::take_since(offset).is_empty());
//!
//! diagnostics::use_internal_errors(previous);
//! ```
//!
//! Callers normally do not touch [`diagnostics`] directly; the `xmlkit` crate
//! wraps it in scoped capture.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod load;
pub mod node;
pub mod reader;
pub mod save;
pub mod source;
pub mod tree;
pub mod writer;

pub use config::ReaderConfig;
pub use load::load;
pub use node::{AttributeNode, ElementNode, NodeSequence, NodeType};
pub use reader::XmlReader;
pub use save::{SaveOptions, save, save_element};
pub use tree::{Declaration, XmlAttribute, XmlDocument, XmlElement, XmlNode};
pub use writer::{XmlSink, XmlWriter};
