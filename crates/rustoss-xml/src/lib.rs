//! OSS XML response models and deserialization for `RustOSS`.
//!
//! The OSS REST API answers listings and errors with XML bodies. This crate
//! holds the typed models and a small pull-parser based deserializer.
//!
//! # Key components
//!
//! - [`types`] - response models (`ListAllMyBucketsResult`, `ListBucketResult`, `ErrorResponse`)
//! - [`OssDeserialize`] trait and [`from_xml`] function for parsing response bodies
//! - [`XmlError`] for malformed or unexpected documents
//!
//! # XML conventions
//!
//! - Booleans: lowercase `true`/`false`
//! - Timestamps: ISO 8601 format (`2006-02-03T16:45:09.000Z`)

pub mod deserialize;
pub mod error;
pub mod types;

pub use deserialize::{OssDeserialize, from_xml};
pub use error::XmlError;
pub use types::{
    Bucket, ErrorResponse, ListAllMyBucketsResult, ListBucketResult, ObjectSummary, Owner,
};
