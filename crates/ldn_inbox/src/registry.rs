//! HTTP client for the ontology registry.
//!
//! The registry stores every graph as an "ontology" addressed by IRI:
//! - `GET  {api_url}/ont?format=..&iri=..` fetches one
//! - `PUT  {api_url}/ont` replaces the contents of an existing one
//! - `POST {api_url}/ont` registers a new one

use std::time::Duration;

use ldn_graph::RdfFormat;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::error::{Error, Result};

/// Registry name of the inbox graph.
pub const INBOX_GRAPH_NAME: &str = "Linked Data Notifications Inbox Graph";
/// File name the inbox graph is uploaded as.
pub const INBOX_UPLOADED_FILENAME: &str = "inbox.ttl";

const VISIBILITY: &str = "public";
const STATUS: &str = "stable";

/// Body of the `PUT /ont` call that replaces an ontology's contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOntology {
    pub iri: String,
    pub name: String,
    pub visibility: String,
    pub status: String,
    pub uploaded_filename: String,
    pub contents: String,
    pub format: String,
    pub user_name: String,
}

impl UpdateOntology {
    /// The update that republishes the inbox graph.
    pub fn inbox_graph(iri: &str, contents: String, format: &str, user_name: &str) -> Self {
        Self {
            iri: iri.trim_end_matches('/').to_string(),
            name: INBOX_GRAPH_NAME.to_string(),
            visibility: VISIBILITY.to_string(),
            status: STATUS.to_string(),
            uploaded_filename: INBOX_UPLOADED_FILENAME.to_string(),
            contents,
            format: format.to_string(),
            user_name: user_name.to_string(),
        }
    }
}

/// Body of the `POST /ont` call that registers a new ontology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOntology {
    pub iri: String,
    pub original_iri: String,
    pub name: String,
    pub org_name: String,
    pub visibility: String,
    pub status: String,
    pub user_name: String,
    pub contents: String,
    pub format: String,
}

impl RegisterOntology {
    /// The registration of a single notification.
    pub fn notification(
        id: &str,
        iri: &str,
        org_name: &str,
        user_name: &str,
        contents: String,
        format: &str,
    ) -> Self {
        Self {
            iri: iri.to_string(),
            original_iri: iri.to_string(),
            name: format!("Linked Data Notification: {}", id),
            org_name: org_name.to_string(),
            visibility: VISIBILITY.to_string(),
            status: STATUS.to_string(),
            user_name: user_name.to_string(),
            contents,
            format: format.to_string(),
        }
    }
}

/// A basic-auth client for the registry API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    api_url: String,
    username: String,
    password: String,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Create a client from registry settings.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Registry(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            username: config.username.clone().unwrap_or_default(),
            password: config.password.clone().unwrap_or_default(),
            http,
        })
    }

    /// The account name sent with every write.
    pub fn username(&self) -> &str {
        &self.username
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.basic_auth(&self.username, Some(&self.password))
    }

    /// Fetch the serialized contents of the ontology `iri`.
    ///
    /// A 404 from the registry is reported as [`Error::NotFound`].
    pub async fn fetch_ontology(&self, iri: &str, format: RdfFormat) -> Result<String> {
        let req = self.authorized(
            self.http
                .get(self.url("/ont"))
                .query(&[("format", format.short_code()), ("iri", iri)]),
        );

        let resp = req
            .send()
            .await
            .map_err(|e| Error::Registry(format!("fetching <{}> failed: {}", iri, e)))?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(Error::NotFound(iri.to_string())),
            status if !status.is_success() => Err(Error::Registry(format!(
                "fetching <{}> returned {}",
                iri, status
            ))),
            _ => resp
                .text()
                .await
                .map_err(|e| Error::Registry(format!("reading <{}> failed: {}", iri, e))),
        }
    }

    /// Replace the contents of an existing ontology.
    pub async fn update_ontology(&self, body: &UpdateOntology) -> Result<()> {
        let req = self.authorized(self.http.put(self.url("/ont")).json(body));
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Registry(format!("updating <{}> failed: {}", body.iri, e)))?;

        if !resp.status().is_success() {
            return Err(Error::Registry(format!(
                "updating <{}> returned {}",
                body.iri,
                resp.status()
            )));
        }
        Ok(())
    }

    /// Register a brand new ontology.
    pub async fn register_ontology(&self, body: &RegisterOntology) -> Result<()> {
        let req = self.authorized(self.http.post(self.url("/ont")).json(body));
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Registry(format!("registering <{}> failed: {}", body.iri, e)))?;

        if !resp.status().is_success() {
            return Err(Error::Registry(format!(
                "registering <{}> returned {}",
                body.iri,
                resp.status()
            )));
        }
        Ok(())
    }
}
