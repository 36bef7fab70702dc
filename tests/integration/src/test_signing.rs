//! Signing against the published examples.

#[cfg(test)]
mod tests {
    use http::Method;
    use rustoss_auth::{
        AuthError, Credentials, SignableRequest, StaticCredentialProvider, authorization_header,
        canonical_string, presign, presigned_canonical_string, sign, verify_authorization,
        verify_presigned,
    };

    use crate::fixtures::{example1, example3};
    use crate::{credentials, init_tracing};

    #[test]
    fn test_should_match_header_signing_example() {
        init_tracing();
        let request = SignableRequest::from_parts(&example1::request());

        assert_eq!(canonical_string(&request), example1::canonical_string());
        assert_eq!(sign(&request, &credentials()).unwrap(), example1::signature());
        assert_eq!(
            authorization_header(&request, &credentials()).unwrap(),
            example1::authorization_header()
        );
    }

    #[test]
    fn test_should_match_presigned_example_ignoring_date() {
        init_tracing();
        let request = SignableRequest::from_parts(&example3::request());

        assert_eq!(
            presigned_canonical_string(&request, example3::expires()),
            example3::canonical_string()
        );
        let query = presign(&request, &credentials(), example3::expires()).unwrap();
        assert_eq!(query.to_query_string(), example3::query_string());
    }

    #[test]
    fn test_should_verify_signed_example_request() {
        let mut parts = example1::request();
        parts.headers.insert(
            http::header::AUTHORIZATION,
            example1::authorization_header().parse().unwrap(),
        );
        let provider = StaticCredentialProvider::from(&credentials());

        let result = verify_authorization(&parts, &provider).unwrap();
        assert_eq!(result.access_key_id, example1::access_key_id());

        parts.headers.insert("x-oss-magic", "hocus-pocus".parse().unwrap());
        assert!(matches!(
            verify_authorization(&parts, &provider),
            Err(AuthError::SignatureDoesNotMatch)
        ));
    }

    #[test]
    fn test_should_verify_presigned_example_until_expiry() {
        let uri = format!("/quotes/nelson?{}", example3::query_string());
        let (parts, ()) = http::Request::get(uri).body(()).unwrap().into_parts();
        let provider = StaticCredentialProvider::from(&credentials());

        assert!(verify_presigned(&parts, &provider, example3::expires()).is_ok());
        assert!(matches!(
            verify_presigned(&parts, &provider, example3::expires() + 1),
            Err(AuthError::RequestExpired)
        ));
    }

    #[test]
    fn test_should_sign_identically_across_threads() {
        let creds = credentials();
        let request = SignableRequest::from_parts(&example1::request());

        let signatures: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| sign(&request, &creds).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(signatures.iter().all(|s| s == example1::signature()));
    }

    #[test]
    fn test_should_refuse_to_sign_with_empty_secret() {
        let creds = Credentials::new(example1::access_key_id(), "");
        let request = SignableRequest::new(Method::GET, "/quotes/nelson");

        assert!(matches!(sign(&request, &creds), Err(AuthError::MissingSecretKey)));
        assert!(matches!(
            presign(&request, &creds, example3::expires()),
            Err(AuthError::MissingSecretKey)
        ));
    }
}
