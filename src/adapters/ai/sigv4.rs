//! AWS Signature Version 4 for Bedrock runtime requests.
//!
//! Only what InvokeModel needs: a POST with a JSON body, no query string,
//! signing `accept`, `content-type`, `host`, `x-amz-date` and, for temporary
//! credentials, `x-amz-security-token`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

use crate::domain::foundation::Timestamp;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "bedrock";
const JSON: &str = "application/json";

type HmacSha256 = Hmac<Sha256>;

/// Static or temporary AWS credentials.
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    secret_access_key: Secret<String>,
    session_token: Option<Secret<String>>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: Secret::new(secret_access_key.into()),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(Secret::new(token.into()));
        self
    }
}

/// Headers to attach to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub security_token: Option<String>,
}

/// What gets signed.
#[derive(Debug, Clone, Copy)]
pub struct SigningInput<'a> {
    pub host: &'a str,
    /// Path exactly as sent on the wire (already percent-encoded once).
    pub path: &'a str,
    pub region: &'a str,
    pub body: &'a [u8],
    pub at: Timestamp,
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn uri_encode(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn hmac(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Derives the per-day signing key.
pub fn signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{secret}").as_bytes(), date_stamp);
    let k_region = hmac(&k_date, region);
    let k_service = hmac(&k_region, service);
    hmac(&k_service, "aws4_request")
}

/// Canonical URI: every path segment encoded again on top of the wire form.
fn canonical_uri(path: &str) -> String {
    path.split('/')
        .map(uri_encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Signs an InvokeModel request.
pub fn sign(credentials: &AwsCredentials, input: SigningInput<'_>) -> SignedHeaders {
    let amz_date = input.at.amz_date();
    let date_stamp = input.at.amz_date_stamp();
    let security_token = credentials
        .session_token
        .as_ref()
        .map(|token| token.expose_secret().clone());

    let mut headers = vec![
        ("accept", JSON.to_string()),
        ("content-type", JSON.to_string()),
        ("host", input.host.to_string()),
        ("x-amz-date", amz_date.clone()),
    ];
    if let Some(token) = &security_token {
        headers.push(("x-amz-security-token", token.clone()));
    }

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "POST\n{}\n\n{}\n{}\n{}",
        canonical_uri(input.path),
        canonical_headers,
        signed_headers,
        sha256_hex(input.body)
    );

    let scope = format!("{}/{}/{}/aws4_request", date_stamp, input.region, SERVICE);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let key = signing_key(
        credentials.secret_access_key.expose_secret(),
        &date_stamp,
        input.region,
        SERVICE,
    );
    let signature = hex::encode(hmac(&key, &string_to_sign));

    SignedHeaders {
        authorization: format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, credentials.access_key_id, scope, signed_headers, signature
        ),
        amz_date,
        security_token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(at: Timestamp) -> SigningInput<'static> {
        SigningInput {
            host: "bedrock-runtime.us-east-1.amazonaws.com",
            path: "/model/us.anthropic.claude-haiku-4-5-20251001-v1%3A0/invoke",
            region: "us-east-1",
            body: b"{}",
            at,
        }
    }

    #[test]
    fn derives_documented_signing_key() {
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn uri_encode_keeps_unreserved_characters() {
        assert_eq!(uri_encode("abc-_.~XYZ09"), "abc-_.~XYZ09");
        assert_eq!(uri_encode("v1:0"), "v1%3A0");
        assert_eq!(uri_encode("a b"), "a%20b");
    }

    #[test]
    fn canonical_uri_double_encodes_escapes() {
        assert_eq!(
            canonical_uri("/model/m-v1%3A0/invoke"),
            "/model/m-v1%253A0/invoke"
        );
    }

    #[test]
    fn authorization_header_has_expected_structure() {
        let at = Timestamp::from_unix_secs(1_700_000_000);
        let creds = AwsCredentials::new("AKIDEXAMPLE", "secret");
        let signed = sign(&creds, input(at));

        assert_eq!(signed.amz_date, "20231114T221320Z");
        assert!(signed.authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20231114/us-east-1/bedrock/aws4_request, "
        ));
        assert!(signed
            .authorization
            .contains("SignedHeaders=accept;content-type;host;x-amz-date, "));
        let signature = signed.authorization.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signed.security_token.is_none());
    }

    #[test]
    fn signing_is_deterministic_and_body_sensitive() {
        let at = Timestamp::from_unix_secs(1_700_000_000);
        let creds = AwsCredentials::new("AKIDEXAMPLE", "secret");

        let first = sign(&creds, input(at));
        let second = sign(&creds, input(at));
        assert_eq!(first, second);

        let mut other = input(at);
        other.body = b"{\"a\":1}";
        assert_ne!(sign(&creds, other).authorization, first.authorization);
    }

    #[test]
    fn session_token_is_signed() {
        let at = Timestamp::from_unix_secs(1_700_000_000);
        let creds = AwsCredentials::new("AKID", "secret").with_session_token("token");
        let signed = sign(&creds, input(at));

        assert_eq!(signed.security_token.as_deref(), Some("token"));
        assert!(signed
            .authorization
            .contains("SignedHeaders=accept;content-type;host;x-amz-date;x-amz-security-token, "));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = AwsCredentials::new("AKID", "super-secret").with_session_token("session-xyz");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("session-xyz"));
    }
}
