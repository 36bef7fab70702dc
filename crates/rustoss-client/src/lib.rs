//! Async client for OSS-compatible object storage.
//!
//! Every request is dated, signed with [`rustoss_auth`] and handed to a
//! [`Transport`]. The default transport is `reqwest`; tests and embedders can
//! supply their own.
//!
//! # Overview
//!
//! - [`OssClient`] - bucket and object operations
//! - [`Connection`] - signing, dispatch and error mapping
//! - [`Transport`] / [`ReqwestTransport`] - the network seam
//! - [`ClientConfig`] - endpoint, timeouts, proxy; loadable from `OSS_*` variables

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod transport;
pub mod types;

pub use client::OssClient;
pub use config::{ClientConfig, ProxySettings};
pub use connection::{Connection, http_date};
pub use error::{ClientError, ClientResult};
pub use transport::{ReqwestTransport, Transport};
pub use types::{ListObjectsOptions, ObjectOutput, PutObjectOptions};
