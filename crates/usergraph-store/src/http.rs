//! HTTP backend for the remote object store.
//!
//! Wire contract:
//!
//! | Call   | Request             | Success | Other outcomes                     |
//! |--------|---------------------|---------|------------------------------------|
//! | fetch  | `GET <base>/<id>`   | 200     | 404 -> `None`, else unexpected     |
//! | write  | `PUT <base>/<id>`   | 200     | 409 -> conflict, 404 -> not found  |
//! | create | `POST <base>`       | 201     | anything else is unexpected        |
//!
//! Ids `.` and `..` are never sent: fetch reports them absent, write as not found.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use usergraph_types::{GraphNode, NewNode, NodeId};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// Network client for a running object store.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpObjectStore {
    base_url: Url,
    http_client: Client,
}

impl HttpObjectStore {
    /// Build a client from `config`, validating the base URL.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| StoreError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "url cannot carry path segments".into(),
            });
        }
        let http_client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/<id>`, with the id encoded as a single path segment.
    ///
    /// `.` and `..` collapse into the collection path instead of naming an
    /// object, so no object can live there: they are `NotFound`.
    fn object_url(&self, id: &NodeId) -> StoreResult<Url> {
        if matches!(id.as_str(), "." | "..") {
            return Err(StoreError::NotFound(id.clone()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "url cannot carry path segments".into(),
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn unexpected(status: StatusCode, response: Response) -> StoreError {
    // The body is diagnostic only; an unreadable body still reports the status.
    let body = response.text().await.unwrap_or_default();
    StoreError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn fetch(&self, id: &NodeId) -> StoreResult<Option<GraphNode>> {
        let url = match self.object_url(id) {
            Ok(url) => url,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        debug!(%url, "fetching object");
        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(decode(response).await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(unexpected(status, response).await),
        }
    }

    async fn write(&self, node: &GraphNode) -> StoreResult<GraphNode> {
        let url = self.object_url(&node.id)?;
        debug!(%url, version = node.version, "writing object");
        let response = self
            .http_client
            .put(url)
            .header(ACCEPT, "application/json")
            .json(node)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => decode(response).await,
            StatusCode::CONFLICT => Err(StoreError::VersionConflict {
                id: node.id.clone(),
                version: node.version,
            }),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(node.id.clone())),
            status => Err(unexpected(status, response).await),
        }
    }

    async fn create(&self, node: &NewNode) -> StoreResult<GraphNode> {
        debug!(url = %self.base_url, "creating object");
        let response = self
            .http_client
            .post(self.base_url.clone())
            .header(ACCEPT, "application/json")
            .json(node)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => decode(response).await,
            status => Err(unexpected(status, response).await),
        }
    }

    fn location(&self) -> String {
        self.base_url.to_string()
    }
}
