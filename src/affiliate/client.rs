//! HTTP client for the Travelpayouts flight search API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::config::AffiliateConfig;
use super::error::AffiliateError;
use super::headers::normalize_ip;
use super::payload::SignaturePayload;
use super::signer::{RequestSigner, SignedRequest};

const FLIGHT_SEARCH_PATH: &str = "v1/flight_search";

/// Cabin class, as the partner encodes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripClass {
    #[default]
    #[serde(rename = "Y")]
    Economy,
    #[serde(rename = "C")]
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passengers {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

/// One leg of a search, with IATA codes and a `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub origin: String,
    pub destination: String,
    pub date: String,
}

impl Segment {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            origin: origin.into().to_ascii_uppercase(),
            destination: destination.into().to_ascii_uppercase(),
            date: date.into(),
        }
    }
}

/// Body of a flight search request, before signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSearchRequest {
    pub marker: String,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ip: Option<String>,
    pub locale: String,
    pub trip_class: TripClass,
    pub passengers: Passengers,
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl FlightSearchRequest {
    /// The request as a signable payload.
    pub fn to_payload(&self) -> Result<SignaturePayload, AffiliateError> {
        let value = serde_json::to_value(self).map_err(crate::error::TripcastError::from)?;
        Ok(SignaturePayload::from(value))
    }
}

/// Client for signed Travelpayouts requests.
///
/// # Example
///
/// ```rust,ignore
/// use tripcast::affiliate::{AffiliateClient, Segment};
///
/// let client = AffiliateClient::from_config(&config.affiliate)?;
/// let search = client.flight_search(vec![Segment::new("LIS", "BCN", "2024-06-01")], Some(&ip));
/// let results = client.search_flights(&search, Some(&ip)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AffiliateClient {
    signer: RequestSigner,
    marker: String,
    base_url: Url,
    client: reqwest::Client,
}

impl AffiliateClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Fails when the base URL cannot be parsed. Missing credentials are
    /// reported per request.
    pub fn from_config(config: &AffiliateConfig) -> Result<Self, AffiliateError> {
        let base_url = parse_base_url(&config.base_url)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent("tripcast")
            .build()
            .unwrap_or_default();

        Ok(Self {
            signer: RequestSigner::from_config(config),
            marker: config.marker.clone().unwrap_or_default(),
            base_url,
            client,
        })
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Build an economy search for one adult, filled with this client's
    /// marker and host.
    pub fn flight_search(&self, segments: Vec<Segment>, client_ip: Option<&str>) -> FlightSearchRequest {
        FlightSearchRequest {
            marker: self.marker.clone(),
            host: self.signer.real_host().to_string(),
            user_ip: client_ip.map(normalize_ip).filter(|ip| !ip.is_empty()),
            locale: "en".to_string(),
            trip_class: TripClass::default(),
            passengers: Passengers::default(),
            segments,
            currency: None,
        }
    }

    /// Sign a flight search without sending it.
    pub fn prepare_flight_search(
        &self,
        search: &FlightSearchRequest,
        client_ip: Option<&str>,
    ) -> Result<SignedRequest, AffiliateError> {
        self.signer.prepare(search.to_payload()?, client_ip)
    }

    /// Sign and send a flight search, returning the partner's JSON response.
    pub async fn search_flights(
        &self,
        search: &FlightSearchRequest,
        client_ip: Option<&str>,
    ) -> Result<Value, AffiliateError> {
        let request = self.prepare_flight_search(search, client_ip)?;
        let url = self.endpoint(FLIGHT_SEARCH_PATH)?;

        tracing::info!(
            target: "tripcast::affiliate",
            url = %url,
            segments = search.segments.len(),
            "Sending flight search"
        );

        let response = self
            .client
            .post(url)
            .headers(request.headers)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(target: "tripcast::affiliate", error = %e, "Flight search request failed");
                e
            })?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, AffiliateError> {
        self.base_url
            .join(path)
            .map_err(|e| AffiliateError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Parse a base URL so that relative joins append to its path.
fn parse_base_url(raw: &str) -> Result<Url, AffiliateError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&with_slash).map_err(|e| AffiliateError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(AffiliateError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}
