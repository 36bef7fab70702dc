//! Published signing examples, as plain fixture functions.
//!
//! Each test builds what it needs from these; nothing is shared or mutated.

/// Header-signed PUT with vendor headers.
pub mod example1 {
    /// The example request as an `http` request head.
    #[must_use]
    pub fn request() -> http::request::Parts {
        let (parts, ()) = http::Request::builder()
            .method("PUT")
            .uri("/quotes/nelson")
            .header("Content-Md5", "c8fdb181845a4ca6b8fec737b3581d76")
            .header("Content-Type", "text/html")
            .header("Date", "Thu, 17 Nov 2005 18:49:58 GMT")
            .header("X-OSS-Meta-Author", "foo@bar.com")
            .header("X-OSS-Magic", "abracadabra")
            .body(())
            .expect("fixture request is valid")
            .into_parts();
        parts
    }

    /// Expected canonical string.
    #[must_use]
    pub fn canonical_string() -> &'static str {
        "PUT\nc8fdb181845a4ca6b8fec737b3581d76\ntext/html\nThu, 17 Nov 2005 18:49:58 GMT\nx-oss-magic:abracadabra\nx-oss-meta-author:foo@bar.com\n/quotes/nelson"
    }

    /// Example access key ID.
    #[must_use]
    pub fn access_key_id() -> &'static str {
        "44CF9590006BF252F707"
    }

    /// Example secret access key.
    #[must_use]
    pub fn secret_access_key() -> &'static str {
        "OtxrzxIsfpFjA7SwPzILwy8Bw21TLhquhboDYROV"
    }

    /// Expected signature.
    #[must_use]
    pub fn signature() -> &'static str {
        "63mwfl+zYIOG6k95yxbgMruQ6QI="
    }

    /// Expected `Authorization` header.
    #[must_use]
    pub fn authorization_header() -> &'static str {
        "OSS 44CF9590006BF252F707:63mwfl+zYIOG6k95yxbgMruQ6QI="
    }
}

/// Pre-signed GET.
pub mod example3 {
    /// The example request; its `Date` must not affect the pre-signed signature.
    #[must_use]
    pub fn request() -> http::request::Parts {
        let (parts, ()) = http::Request::builder()
            .method("GET")
            .uri("/quotes/nelson")
            .header("Date", date())
            .body(())
            .expect("fixture request is valid")
            .into_parts();
        parts
    }

    /// A non-RFC-1123 date carried by the request.
    #[must_use]
    pub fn date() -> &'static str {
        "Thu Mar  9 01:24:20 CST 2006"
    }

    /// Expiration timestamp.
    #[must_use]
    pub fn expires() -> i64 {
        1_141_889_120
    }

    /// Expected query string.
    #[must_use]
    pub fn query_string() -> &'static str {
        "OSSAccessKeyId=44CF9590006BF252F707&Expires=1141889120&Signature=vjbyPxybdZaNmGa%2ByT272YEAiv4%3D"
    }

    /// Expected canonical string.
    #[must_use]
    pub fn canonical_string() -> &'static str {
        "GET\n\n\n1141889120\n/quotes/nelson"
    }
}
