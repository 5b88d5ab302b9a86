//! Signature header integration tests.

#[cfg(test)]
mod tests {
    use imbo_auth::{Credentials, RequestSigner, Timestamp, derive_signature_headers};

    use crate::{accepts_signature, init_tracing, reference_digest, remove_param};

    const URI: &str = "http://imbo/users/user1/images/abc123";
    const TS: &str = "2024-01-01T00:00:00Z";

    fn timestamp() -> Timestamp {
        Timestamp::parse(TS).unwrap()
    }

    #[test]
    fn test_should_reproduce_documented_vector() {
        let headers =
            derive_signature_headers("DELETE", URI, "user1", "user1", "secret", TS).unwrap();
        let expected = reference_digest(
            "secret",
            "DELETE|http://imbo/users/user1/images/abc123|user1|2024-01-01T00:00:00Z",
        );
        assert_eq!(headers.signature(), expected);
    }

    #[test]
    fn test_should_sign_delete_request_accepted_by_reference_verifier() {
        init_tracing();
        let signer = RequestSigner::new(Credentials::for_user("user1", "secret").unwrap());
        let mut request = http::Request::delete(URI).body(()).unwrap();
        signer.sign_request(&mut request, &timestamp()).unwrap();

        assert!(accepts_signature("DELETE", URI, request.headers(), "user1", "secret"));
        assert!(!accepts_signature("PUT", URI, request.headers(), "user1", "secret"));
        assert!(!accepts_signature("DELETE", URI, request.headers(), "user1", "wrong"));
    }

    #[test]
    fn test_should_sign_metadata_update_for_delegated_key() {
        let uri = "http://imbo/users/user1/images/abc123/metadata";
        let signer = RequestSigner::new(Credentials::new("user1", "writer", "secret").unwrap());
        let mut request = http::Request::post(uri).body("{}").unwrap();
        signer.sign_request(&mut request, &timestamp()).unwrap();

        assert_eq!(request.headers()["x-imbo-publickey"], "writer");
        assert!(accepts_signature("POST", uri, request.headers(), "user1", "secret"));

        // Without the public key header the server would verify against the user.
        let mut stripped = request.headers().clone();
        stripped.remove("x-imbo-publickey");
        assert!(!accepts_signature("POST", uri, &stripped, "user1", "secret"));
    }

    #[test]
    fn test_should_sign_query_variant_accepted_by_reference_verifier() {
        let signer = RequestSigner::new(Credentials::new("user1", "writer", "secret").unwrap());
        let signed = signer.sign_url_query("DELETE", URI, &timestamp()).unwrap();

        let (without_signature, signature) = remove_param(&signed, "signature");
        let (unsigned, encoded_timestamp) = remove_param(&without_signature, "timestamp");
        assert_eq!(unsigned, format!("{URI}?publicKey=writer"));
        assert_eq!(encoded_timestamp.as_deref(), Some("2024-01-01T00%3A00%3A00Z"));

        let payload = format!("DELETE|{unsigned}|writer|2024-01-01T00:00:00Z");
        assert_eq!(signature.unwrap(), reference_digest("secret", &payload));
    }

    #[test]
    fn test_should_not_depend_on_the_wall_clock() {
        let future = "2030-06-15T12:30:45Z";
        let first = derive_signature_headers("PUT", URI, "user1", "user1", "secret", future).unwrap();
        let second =
            derive_signature_headers("PUT", URI, "user1", "user1", "secret", future).unwrap();
        assert_eq!(first, second);
    }
}
