// Copyright 2025 Lablup Inc. and Jeongkyu Shin
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

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::metrics::device::DeviceMetricExporter;
use crate::api::metrics::MetricExporter;
use crate::collector::Collector;
use crate::common::config::AppConfig;
use crate::error::Error;

pub type SharedState = Arc<Collector>;

/// Scrape-level failure, rendered as a 500 for the scraping client.
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("scrape failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("scrape failed: {}\n", self.0),
        )
            .into_response()
    }
}

/// Runs a fresh scrape pass per request; nothing is cached between requests.
pub async fn metrics_handler(
    State(collector): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let samples = collector.collect().await?;
    let body = DeviceMetricExporter::new(&samples).export_metrics();

    Ok((
        [(header::CONTENT_TYPE, AppConfig::PROMETHEUS_CONTENT_TYPE)],
        body,
    ))
}
