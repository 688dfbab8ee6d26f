use super::{ProviderError, ProviderQuery, ResourceProvider, day_string, get_json};
use crate::config::ProviderConfig;
use crate::domain::{ResourceKind, ResourceRecord, WeatherRecord};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "weather";

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: Daily,
}

#[derive(Debug, Deserialize)]
pub struct Daily {
    pub data: Vec<DailyPoint>,
}

#[derive(Debug, Deserialize)]
pub struct DailyPoint {
    /// Unix seconds at the start of the day.
    pub time: i64,
    pub summary: String,
}

/// Dark Sky style daily forecast client.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    config: ProviderConfig,
}

impl WeatherClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    fn forecast_url(&self, query: &ProviderQuery) -> Result<url::Url, ProviderError> {
        let raw = format!(
            "{}/forecast/{}/{},{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_key,
            query.latitude,
            query.longitude
        );
        url::Url::parse(&raw)
            .map_err(|e| ProviderError::unavailable(PROVIDER, format!("invalid URL: {e}")))
    }
}

pub fn normalize_day(day: DailyPoint) -> Result<WeatherRecord, ProviderError> {
    let at = DateTime::from_timestamp(day.time, 0)
        .ok_or_else(|| ProviderError::shape(PROVIDER, format!("time out of range: {}", day.time)))?;

    Ok(WeatherRecord {
        forecast: day.summary,
        time: day_string(at),
    })
}

#[async_trait]
impl ResourceProvider for WeatherClient {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Weather
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<ResourceRecord>, ProviderError> {
        let url = self.forecast_url(query)?;
        let response: ForecastResponse = get_json(PROVIDER, self.client.get(url)).await?;

        response
            .daily
            .data
            .into_iter()
            .map(|day| normalize_day(day).map(ResourceRecord::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_day_renders_calendar_day() {
        let response: ForecastResponse = serde_json::from_str(
            r#"{
                "latitude": 34.09,
                "daily": {
                    "summary": "Light rain on Sunday.",
                    "data": [
                        { "time": 1539561600, "summary": "Partly cloudy in the morning.", "icon": "partly-cloudy-day" },
                        { "time": 1539648000, "summary": "Clear throughout the day." }
                    ]
                }
            }"#,
        )
        .unwrap();

        let days: Vec<_> = response
            .daily
            .data
            .into_iter()
            .map(|d| normalize_day(d).unwrap())
            .collect();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].forecast, "Partly cloudy in the morning.");
        assert_eq!(days[0].time, "Mon Oct 15 2018");
        assert_eq!(days[1].time, "Tue Oct 16 2018");
    }

    #[test]
    fn missing_daily_block_fails_to_decode() {
        let decoded = serde_json::from_str::<ForecastResponse>(r#"{ "currently": {} }"#);
        assert!(decoded.is_err());
    }

    #[test]
    fn forecast_url_embeds_key_and_coordinates() {
        let client = WeatherClient::with_shared_client(
            Client::new(),
            ProviderConfig {
                base_url: "https://api.darksky.net/".to_string(),
                api_key: "k".to_string(),
            },
        );
        let url = client
            .forecast_url(&ProviderQuery {
                search_query: "90210".to_string(),
                latitude: 34.09,
                longitude: -118.4,
            })
            .unwrap();
        assert_eq!(url.as_str(), "https://api.darksky.net/forecast/k/34.09,-118.4");
    }
}
