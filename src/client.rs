//! Read-only HubSpot API client.
//!
//! Every listing is a single GET: HubSpot caps one page at `limit` records
//! (100 here, 20 for blogs) and follow-up pages are never requested, so
//! portals with larger collections are exported partially.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::resource::{Record, Resource};

pub const DEFAULT_ENDPOINT: &str = "https://api.hubapi.com";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode listing from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Deserialize)]
struct ListPage {
    objects: Vec<Record>,
    #[serde(default)]
    total: Option<u64>,
}

/// Records of one fetched page. Finite and not restartable.
#[derive(Debug)]
pub struct Listing {
    resource: Resource,
    records: std::vec::IntoIter<Record>,
}

impl Listing {
    pub fn resource(&self) -> Resource {
        self.resource
    }
}

impl Iterator for Listing {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.records.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for Listing {}

pub struct HubSpotClient {
    hub_id: String,
    api_key: String,
    endpoint: String,
    http: Client,
}

impl HubSpotClient {
    pub fn new(hub_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_endpoint(hub_id, api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(
        hub_id: impl Into<String>,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        HubSpotClient {
            hub_id: hub_id.into(),
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn hub_id(&self) -> &str {
        &self.hub_id
    }

    /// Blogs of the portal. HubSpot returns at most 20.
    pub fn blogs(&self) -> Result<Listing, ClientError> {
        self.list(Resource::Blog)
    }

    pub fn authors(&self) -> Result<Listing, ClientError> {
        self.list(Resource::Author)
    }

    pub fn topics(&self) -> Result<Listing, ClientError> {
        self.list(Resource::Topic)
    }

    pub fn posts(&self) -> Result<Listing, ClientError> {
        self.list(Resource::Post)
    }

    pub fn comments(&self) -> Result<Listing, ClientError> {
        self.list(Resource::Comment)
    }

    /// Fetch the first page of a collection.
    fn list(&self, resource: Resource) -> Result<Listing, ClientError> {
        let url = format!("{}{}", self.endpoint, resource.path());

        let mut query: Vec<(&str, String)> = vec![
            ("portalId", self.hub_id.clone()),
            ("hapikey", self.api_key.clone()),
        ];
        if let Some(limit) = resource.page_limit() {
            query.push(("limit", limit.to_string()));
        }

        debug!("GET {} ({})", url, resource);
        // reqwest errors carry the full URL, which includes the API key.
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .map_err(|e| ClientError::Request {
                url: url.clone(),
                source: e.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { url, status });
        }

        let page: ListPage = response.json().map_err(|e| ClientError::Decode {
            url: url.clone(),
            source: e.without_url(),
        })?;

        if let Some(total) = page.total {
            if total > page.objects.len() as u64 {
                warn!(
                    "{}: fetched {} of {} records; the rest are not paginated and will be missing",
                    resource,
                    page.objects.len(),
                    total
                );
            }
        }

        Ok(Listing {
            resource,
            records: page.objects.into_iter(),
        })
    }
}
