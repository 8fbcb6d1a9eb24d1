// Copyright 2025 Pulvetech
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Async HTTP client for the service endpoints.
//!
//! Every method issues exactly one request against the configured base URL.
//! A non-2xx status is turned into [`ApiError::Status`] before the body is
//! touched; transport failures become [`ApiError::Network`]. Failures are
//! also written to the diagnostic log via the `log` facade.

use log::error;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{
    Certification, ContactRequest, Drone, NewCertification, StatisticMetric, UploadResponse,
};

/// Client for the DronesPulvetech REST API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for the given base URL (e.g. `http://localhost:3000/api`).
    ///
    /// A trailing slash on the base URL is tolerated.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// The base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and classify the outcome without reading the body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let request = self
            .http
            .get(self.url(endpoint))
            .header(CONTENT_TYPE, "application/json");

        let result = match self.send(request).await {
            Ok(response) => response.json::<T>().await.map_err(ApiError::Decode),
            Err(err) => Err(err),
        };

        self.log_failure(endpoint, &result);
        result
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self
            .http
            .post(self.url(endpoint))
            .header(CONTENT_TYPE, "application/json")
            .json(body);

        let result = self.send(request).await.map(|_| ());
        self.log_failure(endpoint, &result);
        result
    }

    fn log_failure<T>(&self, endpoint: &str, result: &Result<T, ApiError>) {
        if let Err(err) = result {
            error!("API {}{}: {}", self.base_url, endpoint, err);
        }
    }

    /// List all pilot certifications, in the order the service returns them.
    pub async fn list_certifications(&self) -> Result<Vec<Certification>, ApiError> {
        self.get_json("/certifications").await
    }

    /// Create a certification record.
    pub async fn create_certification(&self, cert: &NewCertification) -> Result<(), ApiError> {
        self.post_json("/certifications", cert).await
    }

    /// Delete a certification by id.
    pub async fn delete_certification(&self, id: i64) -> Result<(), ApiError> {
        let endpoint = format!("/certifications/{id}");
        let request = self
            .http
            .delete(self.url(&endpoint))
            .header(CONTENT_TYPE, "application/json");

        let result = self.send(request).await.map(|_| ());
        self.log_failure(&endpoint, &result);
        result
    }

    /// Submit a contact / quote request.
    pub async fn create_contact(&self, contact: &ContactRequest) -> Result<(), ApiError> {
        self.post_json("/contacts", contact).await
    }

    /// List the drone fleet.
    pub async fn list_drones(&self) -> Result<Vec<Drone>, ApiError> {
        self.get_json("/drones").await
    }

    /// List service statistics.
    pub async fn list_statistics(&self) -> Result<Vec<StatisticMetric>, ApiError> {
        self.get_json("/statistics").await
    }

    /// Upload a file as a multipart body (single `file` field).
    ///
    /// Unlike the JSON endpoints, no content-type header is forced here; the
    /// multipart boundary header is set by the HTTP layer. Failures keep
    /// their underlying classification wrapped in [`ApiError::Upload`].
    pub async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let request = self.http.post(self.url("/upload")).multipart(form);

        let result = match self.send(request).await {
            Ok(response) => response
                .json::<UploadResponse>()
                .await
                .map_err(ApiError::Decode),
            Err(err) => Err(err),
        }
        .map_err(|err| ApiError::Upload(Box::new(err)));

        self.log_failure("/upload", &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = Client::new("http://localhost:3000/api/");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url("/drones"), "http://localhost:3000/api/drones");
    }

    #[test]
    fn test_url_keeps_resource_path() {
        let client = Client::new("https://pulvetech.example/api");
        assert_eq!(
            client.url("/certifications/42"),
            "https://pulvetech.example/api/certifications/42"
        );
    }
}
