//! OSS request signing and verification for RustOSS.
//!
//! OSS authenticates requests with `Base64(HMAC-SHA1(secret, canonical_string))`.
//! The signature is carried either in an `Authorization: OSS <id>:<sig>` header
//! or, for pre-signed URLs, in the `OSSAccessKeyId`, `Expires` and `Signature`
//! query parameters.
//!
//! Signing is a pure function of its inputs, so every type here can be shared
//! freely across threads.
//!
//! # Usage
//!
//! ```rust
//! use http::Method;
//! use rustoss_auth::{Credentials, SignableRequest, authorization_header};
//!
//! let creds = Credentials::new("44CF9590006BF252F707", "OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV");
//! let request = SignableRequest::new(Method::GET, "/bucket/key")
//!     .date("Thu, 17 Nov 2005 18:49:58 GMT");
//!
//! let header = authorization_header(&request, &creds).unwrap();
//! assert!(header.starts_with("OSS 44CF9590006BF252F707:"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical string construction
//! - [`credentials`] - Key pairs and credential providers
//! - [`error`] - Authentication error types
//! - [`presigned`] - Pre-signed URL signing and verification
//! - [`signer`] - Header signing and verification

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod presigned;
pub mod signer;

pub use canonical::{SignableRequest, canonical_string, presigned_canonical_string};
pub use credentials::{CredentialProvider, Credentials, StaticCredentialProvider};
pub use error::AuthError;
pub use presigned::{PresignedQuery, presign, presigned_url, verify_presigned};
pub use signer::{AuthResult, authorization_header, sign, verify_authorization};
