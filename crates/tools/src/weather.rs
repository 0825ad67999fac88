//! Weather forecast tool backed by the National Weather Service API.
//!
//! Two requests per call: `/points/{lat},{lon}` resolves the forecast
//! office grid, then the returned `forecast` URL yields the periods.
//! Upstream failures are reported as the tool's output text so the model
//! can read them as an observation.

use async_trait::async_trait;
use rustedreact_core::error::ToolError;
use rustedreact_core::tool::{Tool, ToolParams, check_params};
use serde::Deserialize;
use tracing::debug;

use crate::number_param;

/// How many forecast periods are reported.
const PERIODS_SHOWN: usize = 3;

pub struct WeatherTool {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherTool {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<String, reqwest::Error> {
        let points_url = format!("{}/points/{latitude},{longitude}", self.base_url);
        debug!(url = %points_url, "Resolving forecast grid");

        let response = self.client.get(&points_url).send().await?;
        if !response.status().is_success() {
            return Ok(format!("Weather API error: Status {}", response.status().as_u16()));
        }
        let points: PointsResponse = response.json().await?;
        let Some(forecast_url) = points.properties.forecast else {
            return Ok("Weather API error: no forecast available for these coordinates".into());
        };

        let response = self.client.get(&forecast_url).send().await?;
        if !response.status().is_success() {
            return Ok(format!("Forecast API error: Status {}", response.status().as_u16()));
        }
        let forecast: ForecastResponse = response.json().await?;

        Ok(format_forecast(latitude, longitude, &forecast.properties.periods))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Gets weather forecast from National Weather Service for US locations. Input: latitude (float), longitude (float). Example: get_weather(latitude=38.8894, longitude=-77.0352)"
    }

    async fn call(&self, params: ToolParams) -> Result<String, ToolError> {
        check_params(&params, &["latitude", "longitude"])?;
        let latitude = number_param(&params, "latitude")?
            .ok_or_else(|| ToolError::InvalidArguments("missing 'latitude' (number)".into()))?;
        let longitude = number_param(&params, "longitude")?
            .ok_or_else(|| ToolError::InvalidArguments("missing 'longitude' (number)".into()))?;

        match self.lookup(latitude, longitude).await {
            Ok(report) => Ok(report),
            Err(e) => Ok(format!("Error fetching weather: {e}")),
        }
    }
}

/// Render the header plus one line per period (at most three).
pub fn format_forecast(latitude: f64, longitude: f64, periods: &[Period]) -> String {
    let mut out = format!("Weather forecast for coordinates ({latitude}, {longitude}):\n");
    for period in periods.iter().take(PERIODS_SHOWN) {
        out.push_str(&format!(
            "- {}: {}°{} - {}\n",
            period.name,
            display_temperature(&period.temperature),
            period.temperature_unit,
            period.short_forecast
        ));
    }
    out
}

// Plain numbers, or `{"value": n, ...}` when the API returns quantitative values.
fn display_temperature(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => map
            .get("value")
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".into()),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// --- NWS API types (internal) ---

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    #[serde(default)]
    forecast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<Period>,
}

/// One forecast period as returned by the NWS gridpoint forecast.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub name: String,
    pub temperature: serde_json::Value,
    pub temperature_unit: String,
    pub short_forecast: String,
}
