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

//! Client library for the DronesPulvetech service API.
//!
//! This library provides a typed, reusable wrapper around the service's REST
//! endpoints. It is organized in two layers that can be used independently:
//!
//! - **Model layer**: serde types for every record exchanged with the service
//!   (certifications, drones, statistics, contact requests)
//! - **Client layer**: async HTTP client with uniform error classification
//!   and one thin method per resource operation
//!
//! The client performs no caching and no retries; every call maps onto
//! exactly one HTTP request, and failures are surfaced unchanged as
//! [`ApiError`] values.
//!
//! # Quick Start
//!
//! ```no_run
//! use pulvetech_api::{ApiError, Client};
//!
//! async fn list_pilots() -> Result<(), ApiError> {
//!     let client = Client::new("http://localhost:3000/api");
//!
//!     for cert in client.list_certifications().await? {
//!         println!("{}: {}", cert.pilot_name, cert.cert_type);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;

pub use client::Client;
pub use error::ApiError;
pub use models::{
    Certification, ContactRequest, Drone, NewCertification, StatisticMetric, UploadResponse,
    ValidationStatus,
};
