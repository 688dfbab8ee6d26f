use super::{ProviderError, ProviderQuery, ResourceProvider, get_json, parse_url};
use crate::config::ProviderConfig;
use crate::constants::providers::BUSINESS_SEARCH_TERM;
use crate::domain::{BusinessListing, ResourceKind, ResourceRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "yelp";

#[derive(Debug, Deserialize)]
pub struct BusinessSearchResponse {
    pub businesses: Vec<Business>,
}

#[derive(Debug, Deserialize)]
pub struct Business {
    pub name: String,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub url: String,
}

/// Yelp Fusion business search, authenticated with a bearer token.
#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    config: ProviderConfig,
}

impl YelpClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }
}

#[must_use]
pub fn normalize(business: Business) -> BusinessListing {
    BusinessListing {
        name: business.name,
        image_url: business.image_url.filter(|u| !u.is_empty()),
        price: business.price,
        rating: business.rating,
        url: business.url,
    }
}

#[async_trait]
impl ResourceProvider for YelpClient {
    fn kind(&self) -> ResourceKind {
        ResourceKind::BusinessListing
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<ResourceRecord>, ProviderError> {
        let url = parse_url(
            PROVIDER,
            &self.config.base_url,
            &[
                ("term", BUSINESS_SEARCH_TERM.to_string()),
                ("latitude", query.latitude.to_string()),
                ("longitude", query.longitude.to_string()),
            ],
        )?;

        let request = self.client.get(url).bearer_auth(&self.config.api_key);
        let response: BusinessSearchResponse = get_json(PROVIDER, request).await?;

        Ok(response
            .businesses
            .into_iter()
            .map(|b| normalize(b).into())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_listing_fields() {
        let response: BusinessSearchResponse = serde_json::from_str(
            r#"{
                "businesses": [
                    {
                        "id": "abc",
                        "name": "Nate 'n Al",
                        "image_url": "https://s3-media1.fl.yelpcdn.com/bphoto/x/o.jpg",
                        "price": "$$",
                        "rating": 4.0,
                        "url": "https://www.yelp.com/biz/nate-n-al"
                    },
                    {
                        "name": "No Photo Diner",
                        "image_url": "",
                        "rating": 3.5,
                        "url": "https://www.yelp.com/biz/no-photo"
                    }
                ],
                "total": 2
            }"#,
        )
        .unwrap();

        let listings: Vec<_> = response.businesses.into_iter().map(normalize).collect();

        assert_eq!(listings[0].name, "Nate 'n Al");
        assert_eq!(listings[0].price.as_deref(), Some("$$"));
        assert_eq!(listings[0].rating, Some(4.0));
        assert!(listings[0].image_url.is_some());
        assert_eq!(listings[1].price, None);
        assert_eq!(listings[1].image_url, None);
    }
}
