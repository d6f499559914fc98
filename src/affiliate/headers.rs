//! Authentication headers for the affiliate partner API.
//!
//! The header names are part of the partner's wire contract.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use super::error::AffiliateError;
use super::signer::Signature;

pub const AFFILIATE_USER_ID_HEADER: &str = "x-affiliate-user-id";
pub const REAL_HOST_HEADER: &str = "x-real-host";
pub const SIGNATURE_HEADER: &str = "x-signature";
pub const USER_IP_HEADER: &str = "x-user-ip";

const IPV4_MAPPED_PREFIX: &str = "::ffff:";

/// Strip the IPv4-mapped IPv6 prefix from a client address.
///
/// `"::ffff:192.0.2.1"` becomes `"192.0.2.1"`; other input is returned
/// trimmed and otherwise unchanged.
pub fn normalize_ip(ip: &str) -> String {
    let ip = ip.trim();
    match ip.get(..IPV4_MAPPED_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(IPV4_MAPPED_PREFIX) => {
            ip[IPV4_MAPPED_PREFIX.len()..].to_string()
        }
        _ => ip.to_string(),
    }
}

/// Build the headers for a signed affiliate request.
///
/// `x-user-ip` is only attached when `client_ip` is non-empty after
/// normalization.
///
/// # Errors
///
/// Fails with [`AffiliateError::MissingToken`] or
/// [`AffiliateError::MissingRealHost`] when either is empty, and with
/// [`AffiliateError::InvalidHeaderValue`] when a value cannot be sent as a
/// header.
pub fn build_headers(
    signature: &Signature,
    real_host: &str,
    token: &str,
    client_ip: Option<&str>,
) -> Result<HeaderMap, AffiliateError> {
    if token.trim().is_empty() {
        return Err(AffiliateError::MissingToken);
    }
    if real_host.trim().is_empty() {
        return Err(AffiliateError::MissingRealHost);
    }

    let mut headers = HeaderMap::with_capacity(6);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    insert(&mut headers, AFFILIATE_USER_ID_HEADER, token)?;
    insert(&mut headers, REAL_HOST_HEADER, real_host)?;
    insert(&mut headers, SIGNATURE_HEADER, signature.as_str())?;

    if let Some(ip) = client_ip.map(normalize_ip).filter(|ip| !ip.is_empty()) {
        insert(&mut headers, USER_IP_HEADER, &ip)?;
    }

    Ok(headers)
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), AffiliateError> {
    let value = HeaderValue::from_str(value)
        .map_err(|_| AffiliateError::InvalidHeaderValue { header: name })?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}
