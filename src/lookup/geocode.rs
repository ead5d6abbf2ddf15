use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, join_url, LookupError, LookupResult};
use crate::models::GeoPoint;

pub const LOCATION_NOT_FOUND: &str =
    "Location not found. Try a postal code or a more detailed address.";

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Client for the Nominatim-shaped free-text geocoder.
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: &str) -> LookupResult<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.to_string(),
        })
    }

    /// First match for a free-text query.
    pub fn search(&self, query: &str) -> LookupResult<GeoPoint> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::NotFound(LOCATION_NOT_FOUND.to_string()));
        }

        let url = join_url(&self.base_url, "search");
        debug!(%url, query, "geocoding");
        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Connection(format!(
                "geocoder returned {}",
                status
            )));
        }

        let places: Vec<Place> = response.json()?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(LOCATION_NOT_FOUND.to_string()))?;

        let lat = place.lat.parse::<f64>();
        let lng = place.lon.parse::<f64>();
        match (lat, lng) {
            (Ok(lat), Ok(lng)) => Ok(GeoPoint { lat, lng }),
            _ => Err(LookupError::InvalidResponse(format!(
                "bad coordinates {}, {}",
                place.lat, place.lon
            ))),
        }
    }
}
