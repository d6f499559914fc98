//! Travelpayouts affiliate integration.
//!
//! Every request to the partner API carries an MD5 signature over the
//! request body and a fixed set of authentication headers. The partner
//! rejects a request with a wrong signature without explaining why, so the
//! canonical value ordering implemented in [`signer`] must not drift.
//!
//! # Example
//!
//! ```rust,ignore
//! use tripcast::affiliate::{RequestSigner, SignaturePayload, sign};
//!
//! let payload = SignaturePayload::mapping()
//!     .with("x", "a")
//!     .with("y", vec!["b", "c"]);
//!
//! // md5("TOK:a:b:c")
//! let signature = sign("TOK", &payload);
//!
//! let signer = RequestSigner::from_config(&config.affiliate);
//! let request = signer.prepare(payload, Some("::ffff:192.0.2.1"))?;
//! ```

pub mod client;
pub mod collation;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod signer;

pub use client::{AffiliateClient, FlightSearchRequest, Passengers, Segment, TripClass};
pub use collation::KeyOrdering;
pub use config::AffiliateConfig;
pub use error::AffiliateError;
pub use headers::{
    AFFILIATE_USER_ID_HEADER, REAL_HOST_HEADER, SIGNATURE_HEADER, USER_IP_HEADER, build_headers,
    normalize_ip,
};
pub use payload::{Primitive, SignaturePayload};
pub use signer::{
    RequestSigner, Signature, SignedRequest, collect_values_in_order, collect_values_with_ordering,
    sign, sign_with_ordering,
};
