//! HTTP implementation of the geo services over public endpoints:
//! Nominatim for place search and reverse geocoding, Open-Meteo for current
//! weather. Request/response shapes are private to this module; only the
//! trait signatures are load-bearing.

use annotations::WeatherReport;
use foundation::geo::GeoPoint;
use serde::Deserialize;

use crate::error::EnrichmentError;
use crate::service::{BoxFuture, GeoServices, PlaceHit};

const DEFAULT_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

// Nominatim's usage policy requires an identifying agent.
const USER_AGENT: &str = concat!("globe-journal/", env!("CARGO_PKG_VERSION"));

pub struct OpenGeoServices {
    http: reqwest::Client,
    search_url: String,
    reverse_url: String,
    weather_url: String,
}

impl OpenGeoServices {
    pub fn new() -> Result<Self, EnrichmentError> {
        Self::with_endpoints(DEFAULT_SEARCH_URL, DEFAULT_REVERSE_URL, DEFAULT_WEATHER_URL)
    }

    pub fn with_endpoints(
        search_url: impl Into<String>,
        reverse_url: impl Into<String>,
        weather_url: impl Into<String>,
    ) -> Result<Self, EnrichmentError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| EnrichmentError::with_source("failed to build http client", err))?;
        Ok(Self {
            http,
            search_url: search_url.into(),
            reverse_url: reverse_url.into(),
            weather_url: weather_url.into(),
        })
    }

    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, EnrichmentError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| EnrichmentError::with_source(format!("request to {url} failed"), err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::new(format!(
                "request to {url} returned {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|err| EnrichmentError::with_source("failed to read response body", err))
    }
}

impl GeoServices for OpenGeoServices {
    fn search_place(
        &self,
        query: String,
    ) -> BoxFuture<'_, Result<Vec<PlaceHit>, EnrichmentError>> {
        Box::pin(async move {
            let body = self
                .get_text(
                    &self.search_url,
                    &[("format", "json".to_owned()), ("q", query)],
                )
                .await?;
            parse_search_response(&body)
        })
    }

    fn reverse_geocode(&self, point: GeoPoint) -> BoxFuture<'_, Result<String, EnrichmentError>> {
        Box::pin(async move {
            let body = self
                .get_text(
                    &self.reverse_url,
                    &[
                        ("format", "json".to_owned()),
                        ("lat", point.latitude.to_string()),
                        ("lon", point.longitude.to_string()),
                    ],
                )
                .await?;
            parse_reverse_response(&body)
        })
    }

    fn fetch_weather(
        &self,
        point: GeoPoint,
    ) -> BoxFuture<'_, Result<WeatherReport, EnrichmentError>> {
        Box::pin(async move {
            let body = self
                .get_text(
                    &self.weather_url,
                    &[
                        ("latitude", point.latitude.to_string()),
                        ("longitude", point.longitude.to_string()),
                        (
                            "current",
                            "temperature_2m,relative_humidity_2m,weather_code".to_owned(),
                        ),
                    ],
                )
                .await?;
            parse_forecast_response(&body)
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResultDto {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct ReverseDto {
    #[serde(default)]
    address: Option<AddressDto>,
}

#[derive(Debug, Deserialize)]
struct AddressDto {
    #[serde(default)]
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastDto {
    current: CurrentDto,
}

#[derive(Debug, Deserialize)]
struct CurrentDto {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: u8,
}

fn parse_search_response(body: &str) -> Result<Vec<PlaceHit>, EnrichmentError> {
    let results: Vec<SearchResultDto> = serde_json::from_str(body)
        .map_err(|err| EnrichmentError::with_source("malformed search response", err))?;

    let mut hits = Vec::with_capacity(results.len());
    for dto in results {
        let latitude: f64 = dto
            .lat
            .parse()
            .map_err(|err| EnrichmentError::with_source("malformed latitude", err))?;
        let longitude: f64 = dto
            .lon
            .parse()
            .map_err(|err| EnrichmentError::with_source("malformed longitude", err))?;
        hits.push(PlaceHit {
            point: GeoPoint::new(latitude, longitude),
            label: dto.display_name,
        });
    }
    Ok(hits)
}

fn parse_reverse_response(body: &str) -> Result<String, EnrichmentError> {
    let dto: ReverseDto = serde_json::from_str(body)
        .map_err(|err| EnrichmentError::with_source("malformed reverse response", err))?;
    dto.address
        .and_then(|a| a.country_code)
        .ok_or_else(|| EnrichmentError::new("no country code for point"))
}

fn parse_forecast_response(body: &str) -> Result<WeatherReport, EnrichmentError> {
    let dto: ForecastDto = serde_json::from_str(body)
        .map_err(|err| EnrichmentError::with_source("malformed forecast response", err))?;
    Ok(WeatherReport {
        temperature_c: dto.current.temperature_2m,
        humidity_pct: dto.current.relative_humidity_2m,
        summary: weather_summary(dto.current.weather_code).to_owned(),
    })
}

/// WMO weather interpretation codes, collapsed to display strings.
fn weather_summary(code: u8) -> &'static str {
    match code {
        0 => "clear sky",
        1..=3 => "partly cloudy",
        45 | 48 => "fog",
        51..=57 => "drizzle",
        61..=67 => "rain",
        71..=77 => "snow",
        80..=82 => "rain showers",
        85 | 86 => "snow showers",
        95..=99 => "thunderstorm",
        _ => "unknown conditions",
    }
}
