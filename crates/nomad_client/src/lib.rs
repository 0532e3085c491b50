//! Crate for interacting with the Nomad HTTP API.
//!
//! This crate provides a client for the small slice of the API the deploy
//! flow needs: listing and creating namespaces, parsing rendered
//! job-specification text into Nomad's JSON job structure, and registering
//! the parsed job. Remote validation failures are surfaced with the response
//! body passed through unmodified so the scheduler's own diagnostics reach
//! the caller.

use reqwest::{Method, RequestBuilder, Response};
use tracing::{debug, info, instrument};
use url::Url;

pub mod errors;
pub use errors::Error;

pub mod models;
pub use models::{Namespace, RegisterResponse};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

const TOKEN_HEADER: &str = "X-Nomad-Token";

/// A client for one Nomad cluster address, optionally authenticated with an
/// ACL token.
#[derive(Debug, Clone)]
pub struct NomadClient {
    http: reqwest::Client,
    address: Url,
    token: Option<String>,
}

impl NomadClient {
    /// Create a client for the given cluster address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] when the address is not a valid URL.
    pub fn new(address: &str, token: Option<String>) -> Result<Self, Error> {
        let address = Url::parse(address).map_err(|error| Error::InvalidAddress {
            address: address.to_string(),
            reason: error.to_string(),
        })?;
        Ok(NomadClient {
            http: reqwest::Client::new(),
            address,
            token,
        })
    }

    /// List the namespaces the cluster knows about.
    #[instrument(skip(self))]
    pub async fn list_namespaces(&self) -> Result<Vec<Namespace>, Error> {
        let response = self
            .request(Method::GET, "/v1/namespaces")?
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Create a namespace with the given name.
    #[instrument(skip(self))]
    pub async fn create_namespace(&self, name: &str) -> Result<(), Error> {
        info!(namespace = name, "creating namespace");
        let body = serde_json::json!({ "Name": name });
        let response = self
            .request(Method::POST, "/v1/namespace")?
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Verify the target namespace exists, creating it when permitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NamespaceMissing`] when the namespace does not exist
    /// and `create_missing` is false.
    #[instrument(skip(self))]
    pub async fn ensure_namespace(&self, name: &str, create_missing: bool) -> Result<(), Error> {
        let namespaces = self.list_namespaces().await?;
        if namespaces.iter().any(|namespace| namespace.name == name) {
            debug!(namespace = name, "namespace exists");
            return Ok(());
        }
        if !create_missing {
            return Err(Error::NamespaceMissing {
                namespace: name.to_string(),
            });
        }
        self.create_namespace(name).await
    }

    /// Parse rendered job-specification text into Nomad's JSON job structure.
    ///
    /// The scheduler is the authority on job-spec validity; a rejection here
    /// carries its validation message verbatim.
    #[instrument(skip(self, hcl))]
    pub async fn parse_job(&self, hcl: &str) -> Result<serde_json::Value, Error> {
        debug!(bytes = hcl.len(), "parsing job specification remotely");
        let body = serde_json::json!({ "JobHCL": hcl, "Canonicalize": true });
        let response = self
            .request(Method::POST, "/v1/jobs/parse")?
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Register a parsed job and return the scheduler's assigned identifiers.
    #[instrument(skip(self, job))]
    pub async fn register_job(&self, job: &serde_json::Value) -> Result<RegisterResponse, Error> {
        let body = serde_json::json!({ "Job": job });
        let response = self
            .request(Method::POST, "/v1/jobs")?
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let registered: RegisterResponse = response.json().await?;
        info!(eval_id = %registered.eval_id, "job registered");
        Ok(registered)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        let url = self.address.join(path).map_err(|error| Error::InvalidAddress {
            address: format!("{}{path}", self.address),
            reason: error.to_string(),
        })?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        Ok(builder)
    }

    /// Map non-success responses to [`Error::Api`] with the body verbatim.
    async fn check(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.text().await {
            Ok(body) => body,
            Err(error) => format!("<unreadable response body: {error}>"),
        };
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}
