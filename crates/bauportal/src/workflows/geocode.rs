use serde::Deserialize;
use tokio::runtime::Runtime;
use tracing::debug;

/// Resolved coordinates for a free-text project address, used to center the
/// map view.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("geocoding service returned status {0}")]
    Status(u16),
    #[error("no match for address '{0}'")]
    NoMatch(String),
    #[error("malformed geocoder payload: {0}")]
    Payload(String),
    #[error("geocoder runtime unavailable: {0}")]
    Runtime(String),
}

/// Address lookup seam so views can be tested with fixed coordinates.
pub trait AddressResolver: std::fmt::Debug + Send + Sync {
    fn resolve(&self, address: &str) -> Result<GeocodedPlace, GeocodeError>;
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Thin client over the public Nominatim search endpoint. Unauthenticated;
/// the service requires an identifying user agent.
pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
    runtime: Runtime,
}

impl NominatimClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bauportal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| GeocodeError::Transport(err.to_string()))?;
        let runtime = Runtime::new().map_err(|err| GeocodeError::Runtime(err.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            runtime,
        })
    }
}

impl std::fmt::Debug for NominatimClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AddressResolver for NominatimClient {
    fn resolve(&self, address: &str) -> Result<GeocodedPlace, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, %address, "geocoding address");

        let hits: Vec<NominatimHit> = self.runtime.block_on(async {
            let response = self
                .client
                .get(&url)
                .query(&[("format", "json"), ("q", address)])
                .send()
                .await
                .map_err(|err| GeocodeError::Transport(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(GeocodeError::Status(status.as_u16()));
            }

            response
                .json::<Vec<NominatimHit>>()
                .await
                .map_err(|err| GeocodeError::Payload(err.to_string()))
        })?;

        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoMatch(address.to_string()))?;

        Ok(GeocodedPlace {
            latitude: parse_coordinate(&hit.lat)?,
            longitude: parse_coordinate(&hit.lon)?,
            display_name: hit.display_name,
        })
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::Payload(format!("coordinate '{raw}' is not a number")))
}
