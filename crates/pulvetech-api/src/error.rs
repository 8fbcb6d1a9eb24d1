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

//! Error taxonomy for API calls.

use thiserror::Error;

/// Errors produced by [`crate::Client`] operations.
///
/// A non-2xx response status is classified as [`ApiError::Status`] before the
/// body is read. Transport-level failures (DNS, connect, timeout) become
/// [`ApiError::Network`]. Upload failures keep their underlying
/// classification but are wrapped so callers can distinguish them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("falha de rede: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-2xx status code.
    #[error("o servidor respondeu HTTP {status}")]
    Status { status: u16 },

    /// The response body could not be deserialized.
    #[error("resposta inválida do servidor: {0}")]
    Decode(#[source] reqwest::Error),

    /// A local file could not be read before upload.
    #[error("falha ao ler o arquivo: {0}")]
    Io(#[source] std::io::Error),

    /// A file upload failed; the source carries the underlying class.
    #[error("falha no upload do arquivo: {0}")]
    Upload(#[source] Box<ApiError>),
}

impl ApiError {
    /// HTTP status code, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Upload(inner) => inner.status(),
            Self::Network(_) | Self::Decode(_) | Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_is_localized() {
        let err = ApiError::Status { status: 503 };
        assert_eq!(err.to_string(), "o servidor respondeu HTTP 503");
    }

    #[test]
    fn test_upload_preserves_inner_status() {
        let err = ApiError::Upload(Box::new(ApiError::Status { status: 413 }));
        assert_eq!(err.status(), Some(413));
        assert!(err.to_string().starts_with("falha no upload"));
    }
}
