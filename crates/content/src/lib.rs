//! # content
//!
//! Rust library for the document-intelligence side of the stack: the Azure
//! AI Content Understanding service and the records the document processor
//! writes.
//!
//! This crate provides functionality for:
//! - Calling Content Understanding analyzers and polling their async results
//! - Counting people in images via description-text parsing
//! - Local document extraction producing document-store records
//! - Loading and validating extraction schema definitions
//!
//! ## Example
//!
//! ```no_run
//! use content::Client;
//!
//! let key = std::env::var("CONTENT_UNDERSTANDING_KEY").expect("key not set");
//! let client = Client::new("https://cu-docs.cognitiveservices.azure.com/", key);
//!
//! let report = client
//!     .count_people("https://example.com/team.jpg")
//!     .expect("analysis failed");
//! println!("{} people: {}", report.count, report.description);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod extract;
pub mod people;
pub mod schema;

pub use client::{Client, PeopleReport, description_from};
pub use error::{Error, ErrorCategory, Result};
pub use extract::{DocumentMetadata, DocumentRecord, Extraction, ProcessingStatus, mime_for};
pub use schema::SchemaStore;
