//! Access token integration tests.

#[cfg(test)]
mod tests {
    use imbo_auth::{Credentials, RequestSigner, derive_access_token};

    use crate::{accepts_access_token, init_tracing, remove_param};

    const IMAGE: &str = "http://imbo/users/user1/images/abc123.png";

    #[test]
    fn test_should_be_accepted_by_reference_verifier() {
        init_tracing();
        let uri = format!("{IMAGE}?t[]=thumbnail:width=50,height=50&t[]=border");
        let signed = derive_access_token("user1", "user1", "secret", &uri).unwrap();

        assert!(accepts_access_token(&signed, "secret"));
        assert!(!accepts_access_token(&signed, "other-secret"));
    }

    #[test]
    fn test_should_reject_tampered_transformations() {
        let signed =
            derive_access_token("user1", "user1", "secret", &format!("{IMAGE}?t[]=thumbnail"))
                .unwrap();
        let tampered = signed.replace("thumbnail", "border");
        assert!(!accepts_access_token(&tampered, "secret"));
    }

    #[test]
    fn test_should_carry_public_key_for_delegated_key() {
        init_tracing();
        let signer = RequestSigner::new(Credentials::new("user1", "reader", "secret").unwrap());
        let signed = signer.sign_url(&format!("{IMAGE}?t[]=thumbnail")).unwrap();

        let (_, public_key) = remove_param(&signed, "publicKey");
        assert_eq!(public_key.as_deref(), Some("reader"));
        assert!(accepts_access_token(&signed, "secret"));

        // Dropping the public key invalidates the token.
        let (without_key, _) = remove_param(&signed, "publicKey");
        assert!(!accepts_access_token(&without_key, "secret"));
    }

    #[test]
    fn test_should_omit_public_key_for_owner() {
        let signed = derive_access_token("user1", "user1", "secret", IMAGE).unwrap();
        let (_, public_key) = remove_param(&signed, "publicKey");
        assert!(public_key.is_none());
        assert!(accepts_access_token(&signed, "secret"));
    }

    #[test]
    fn test_should_accept_uris_with_trailing_separators() {
        init_tracing();
        for uri in [
            format!("{IMAGE}?t[]=thumbnail&"),
            format!("{IMAGE}?"),
            format!("{IMAGE}?t[]=thumbnail&?"),
        ] {
            let signed = derive_access_token("user1", "user1", "secret", &uri).unwrap();
            assert!(accepts_access_token(&signed, "secret"), "{signed}");
            assert!(!signed.contains("&&") && !signed.contains("?&"));
        }
    }

    #[test]
    fn test_should_always_emit_64_lowercase_hex_chars() {
        for uri in [
            IMAGE.to_owned(),
            format!("{IMAGE}?t[]=crop:x=0,y=0,width=10,height=10"),
            "https://imbo.example.com/users/someone/images.json?page=2&limit=20".to_owned(),
        ] {
            let signed = derive_access_token("someone", "someone", "k", &uri).unwrap();
            let (unsigned, token) = remove_param(&signed, "accessToken");
            let token = token.unwrap();
            assert_eq!(unsigned, uri);
            assert_eq!(token.len(), 64);
            assert!(token.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        }
    }
}
