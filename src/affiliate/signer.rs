//! Request signing for the affiliate partner API.
//!
//! The partner authenticates a request body by an MD5 digest over the token
//! and every value in the body, joined with `:`. Values are collected
//! depth-first; mapping keys are visited in sorted order (the `signature` key
//! itself is skipped) while sequences keep their element order. MD5 is what
//! the partner verifies against, so it is used for wire compatibility only.

use md5::{Digest, Md5};
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::collation::KeyOrdering;
use super::config::AffiliateConfig;
use super::error::AffiliateError;
use super::headers::build_headers;
use super::payload::{SignaturePayload, format_instant};

/// Name of the body field carrying the signature. Never part of the signed values.
pub const SIGNATURE_FIELD: &str = "signature";

const SEPARATOR: &str = ":";

/// A lowercase hexadecimal MD5 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Wrap an already computed hex digest.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Flatten a payload into the ordered values that are signed, using the
/// default key collation.
pub fn collect_values_in_order(payload: &SignaturePayload) -> Vec<String> {
    collect_values_with_ordering(payload, KeyOrdering::default())
}

/// Flatten a payload into the ordered values that are signed.
pub fn collect_values_with_ordering(payload: &SignaturePayload, ordering: KeyOrdering) -> Vec<String> {
    let mut values = Vec::new();
    collect_into(payload, ordering, &mut values);
    values
}

fn collect_into(payload: &SignaturePayload, ordering: KeyOrdering, out: &mut Vec<String>) {
    match payload {
        SignaturePayload::Mapping(entries) => {
            let mut keyed: Vec<&(String, SignaturePayload)> = entries
                .iter()
                .filter(|(key, _)| key != SIGNATURE_FIELD)
                .collect();
            keyed.sort_by(|(a, _), (b, _)| ordering.compare(a, b));
            for (_, value) in keyed {
                collect_into(value, ordering, out);
            }
        }
        SignaturePayload::Sequence(items) => {
            for item in items {
                collect_into(item, ordering, out);
            }
        }
        SignaturePayload::DateTime(instant) => out.push(format_instant(instant)),
        SignaturePayload::Primitive(primitive) => out.push(primitive.to_signature_string()),
        SignaturePayload::Null => {}
    }
}

/// Sign a payload with the default key collation.
pub fn sign(token: &str, payload: &SignaturePayload) -> Signature {
    sign_with_ordering(token, payload, KeyOrdering::default())
}

/// Sign a payload: `md5(token:value1:value2:...)` as lowercase hex.
pub fn sign_with_ordering(token: &str, payload: &SignaturePayload, ordering: KeyOrdering) -> Signature {
    let values = collect_values_with_ordering(payload, ordering);

    let mut base = String::from(token);
    for value in &values {
        base.push_str(SEPARATOR);
        base.push_str(value);
    }

    Signature(hex::encode(Md5::digest(base.as_bytes())))
}

/// A request body with its signature and authentication headers.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub signature: Signature,
    pub headers: HeaderMap,
    /// JSON body with the signature stored under `"signature"`.
    pub body: Value,
}

/// Signs requests for one affiliate account.
///
/// # Example
///
/// ```rust,ignore
/// use tripcast::affiliate::{RequestSigner, SignaturePayload};
///
/// let signer = RequestSigner::new("partner-token", "tripcast.app");
/// let payload = SignaturePayload::mapping()
///     .with("marker", "12345")
///     .with("locale", "en");
///
/// let request = signer.prepare(payload, Some(client_ip))?;
/// ```
#[derive(Clone)]
pub struct RequestSigner {
    token: SecretString,
    real_host: String,
    key_ordering: KeyOrdering,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("token", &"[REDACTED]")
            .field("real_host", &self.real_host)
            .field("key_ordering", &self.key_ordering)
            .finish()
    }
}

impl RequestSigner {
    pub fn new(token: impl Into<String>, real_host: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            real_host: real_host.into(),
            key_ordering: KeyOrdering::default(),
        }
    }

    /// Build a signer from configuration. A missing token is kept as empty
    /// and reported when headers are built.
    pub fn from_config(config: &AffiliateConfig) -> Self {
        let token = config
            .token
            .as_ref()
            .map(|token| token.expose_secret().to_string())
            .unwrap_or_default();

        Self::new(token, config.real_host.clone()).with_key_ordering(config.key_ordering)
    }

    #[must_use]
    pub fn with_key_ordering(mut self, ordering: KeyOrdering) -> Self {
        self.key_ordering = ordering;
        self
    }

    pub fn real_host(&self) -> &str {
        &self.real_host
    }

    pub fn key_ordering(&self) -> KeyOrdering {
        self.key_ordering
    }

    pub fn sign(&self, payload: &SignaturePayload) -> Signature {
        sign_with_ordering(self.token.expose_secret(), payload, self.key_ordering)
    }

    /// Authentication headers for an already signed payload.
    pub fn headers(
        &self,
        signature: &Signature,
        client_ip: Option<&str>,
    ) -> Result<HeaderMap, AffiliateError> {
        build_headers(signature, &self.real_host, self.token.expose_secret(), client_ip)
    }

    /// Sign a payload and build everything needed to send it.
    ///
    /// Any `signature` key already present in a mapping payload is ignored
    /// while signing and replaced in the body.
    pub fn prepare(
        &self,
        payload: SignaturePayload,
        client_ip: Option<&str>,
    ) -> Result<SignedRequest, AffiliateError> {
        let signature = self.sign(&payload);
        let headers = self.headers(&signature, client_ip)?;

        let mut payload = payload;
        payload.insert(SIGNATURE_FIELD, signature.as_str());

        tracing::debug!(
            target: "tripcast::affiliate",
            real_host = %self.real_host,
            has_client_ip = headers.contains_key(super::headers::USER_IP_HEADER),
            "Signed affiliate request"
        );

        Ok(SignedRequest {
            body: payload.to_json(),
            signature,
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn md5_hex(input: &str) -> String {
        hex::encode(Md5::digest(input.as_bytes()))
    }

    #[test]
    fn test_known_vector() {
        let payload = SignaturePayload::mapping()
            .with("x", "a")
            .with("y", vec!["b", "c"]);

        assert_eq!(collect_values_in_order(&payload), vec!["a", "b", "c"]);
        assert_eq!(sign("TOK", &payload).as_str(), md5_hex("TOK:a:b:c"));
    }

    #[test]
    fn test_md5_hex_format() {
        // RFC 1321 test suite.
        assert_eq!(md5_hex("a"), "0cc175b9c0f1b6a831c399e269772661");

        let signature = sign("a", &SignaturePayload::Null);
        assert_eq!(signature.as_str(), "0cc175b9c0f1b6a831c399e269772661");
        assert_eq!(signature.as_str().len(), 32);
    }

    #[test]
    fn test_key_insertion_order_does_not_matter() {
        let ab = SignaturePayload::mapping().with("a", 1i64).with("b", 2i64);
        let ba = SignaturePayload::mapping().with("b", 2i64).with("a", 1i64);
        assert_eq!(sign("TOK", &ab), sign("TOK", &ba));
    }

    #[test]
    fn test_nested_key_order_does_not_matter() {
        let first = SignaturePayload::from(json!({
            "passengers": {"adults": 1, "children": 0, "infants": 0},
            "segments": [{"origin": "MOW", "destination": "LED", "date": "2024-06-01"}]
        }));
        let second = SignaturePayload::mapping()
            .with(
                "segments",
                vec![SignaturePayload::mapping()
                    .with("date", "2024-06-01")
                    .with("destination", "LED")
                    .with("origin", "MOW")],
            )
            .with(
                "passengers",
                SignaturePayload::mapping()
                    .with("infants", 0i64)
                    .with("children", 0i64)
                    .with("adults", 1i64),
            );

        assert_eq!(
            collect_values_in_order(&first),
            vec!["1", "0", "0", "2024-06-01", "LED", "MOW"]
        );
        assert_eq!(sign("TOK", &first), sign("TOK", &second));
    }

    #[test]
    fn test_sequence_order_matters() {
        let forward = SignaturePayload::mapping().with("list", vec![1i64, 2]);
        let reversed = SignaturePayload::mapping().with("list", vec![2i64, 1]);
        assert_ne!(sign("TOK", &forward), sign("TOK", &reversed));
    }

    #[test]
    fn test_signature_key_is_excluded() {
        let plain = SignaturePayload::mapping().with("marker", "123").with("host", "a.b");
        let with_signature = plain.clone().with("signature", "stale");

        assert_eq!(collect_values_in_order(&with_signature), vec!["a.b", "123"]);
        assert_eq!(sign("TOK", &plain), sign("TOK", &with_signature));
    }

    #[test]
    fn test_nested_signature_key_is_excluded() {
        let plain = SignaturePayload::mapping()
            .with("inner", SignaturePayload::mapping().with("v", "1"));
        let nested = SignaturePayload::mapping().with(
            "inner",
            SignaturePayload::mapping().with("v", "1").with("signature", "x"),
        );
        assert_eq!(sign("TOK", &plain), sign("TOK", &nested));
    }

    #[test]
    fn test_nulls_contribute_nothing() {
        let payload = SignaturePayload::from(json!({"a": "1", "b": null, "c": [null, "2"]}));
        assert_eq!(collect_values_in_order(&payload), vec!["1", "2"]);
        assert_eq!(sign("TOK", &payload).as_str(), md5_hex("TOK:1:2"));
    }

    #[test]
    fn test_datetime_uses_iso_instant() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        let payload = SignaturePayload::mapping().with("departure", instant);

        assert_eq!(collect_values_in_order(&payload), vec!["2024-06-01T08:30:00.000Z"]);
    }

    #[test]
    fn test_primitives_stringify() {
        let payload = SignaturePayload::mapping()
            .with("a", true)
            .with("b", 2.0)
            .with("c", -3i64)
            .with("d", "text");
        assert_eq!(collect_values_in_order(&payload), vec!["true", "2", "-3", "text"]);
    }

    #[test]
    fn test_empty_payload_signs_token_only() {
        assert_eq!(sign("TOK", &SignaturePayload::mapping()).as_str(), md5_hex("TOK"));
    }

    #[test]
    fn test_orderings_diverge_on_mixed_case_keys() {
        let payload = SignaturePayload::mapping().with("Zone", "z").with("area", "a");

        assert_eq!(
            collect_values_with_ordering(&payload, KeyOrdering::Collated),
            vec!["a", "z"]
        );
        assert_eq!(
            collect_values_with_ordering(&payload, KeyOrdering::Bytewise),
            vec!["z", "a"]
        );
    }

    #[test]
    fn test_signer_prepare() {
        let signer = RequestSigner::new("TOK", "tripcast.app");
        let payload = SignaturePayload::mapping()
            .with("x", "a")
            .with("y", vec!["b", "c"])
            .with("signature", "old");

        let request = signer.prepare(payload, Some("::ffff:192.0.2.1")).unwrap();

        assert_eq!(request.signature.as_str(), md5_hex("TOK:a:b:c"));
        assert_eq!(request.body["signature"], request.signature.as_str());
        assert_eq!(request.body["y"], json!(["b", "c"]));
        assert_eq!(request.headers["x-signature"], request.signature.as_str());
        assert_eq!(request.headers["x-user-ip"], "192.0.2.1");
    }

    #[test]
    fn test_signer_prepare_requires_token() {
        let signer = RequestSigner::new("", "tripcast.app");
        let result = signer.prepare(SignaturePayload::mapping(), None);
        assert!(matches!(result, Err(AffiliateError::MissingToken)));
    }

    #[test]
    fn test_signer_debug_redacts_token() {
        let signer = RequestSigner::new("super-secret", "tripcast.app");
        let debug = format!("{:?}", signer);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("tripcast.app"));
    }

    #[test]
    fn test_signer_from_config() {
        let config = AffiliateConfig::default()
            .with_token("TOK")
            .with_real_host("tripcast.app")
            .with_key_ordering(KeyOrdering::Bytewise);

        let signer = RequestSigner::from_config(&config);
        assert_eq!(signer.real_host(), "tripcast.app");
        assert_eq!(signer.key_ordering(), KeyOrdering::Bytewise);

        let payload = SignaturePayload::mapping().with("x", "a");
        assert_eq!(signer.sign(&payload), sign("TOK", &payload));
    }
}
