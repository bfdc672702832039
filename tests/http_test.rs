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

use bcachefs_exporter::api::router;
use bcachefs_exporter::collector::{Collector, ScrapeConfig};
use bcachefs_exporter::utils::SysfsFixture;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn get_metrics(root: &std::path::Path) -> String {
    let collector = Arc::new(Collector::new(ScrapeConfig {
        root: root.to_path_buf(),
        ..Default::default()
    }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, router(collector)).await.unwrap();
    });

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    server.abort();
    response
}

#[tokio::test]
async fn test_metrics_endpoint_serves_exposition() {
    let dir = tempfile::tempdir().unwrap();
    let sysfs = SysfsFixture::new(dir.path());
    sysfs.write("fs-a", "dev-0", "usage", "btree: 1 MiB\n");
    sysfs.write("fs-a", "dev-0", "capacity", "total=2000000000000 avail=450000000000\n");

    let response = get_metrics(dir.path()).await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("text/plain; version=0.0.4"));
    assert!(response.contains("# TYPE bcachefs_device_usage_bytes gauge\n"));
    assert!(response.contains(
        "bcachefs_device_usage_bytes{filesystem=\"fs-a\",device=\"dev-0\",category=\"btree\"} 1048576\n"
    ));
    assert!(response.contains(
        "bcachefs_device_capacity_total_bytes{filesystem=\"fs-a\",device=\"dev-0\"} 2000000000000\n"
    ));
    assert!(response.contains(
        "bcachefs_device_capacity_available_bytes{filesystem=\"fs-a\",device=\"dev-0\"} 450000000000\n"
    ));
}

#[tokio::test]
async fn test_metrics_endpoint_reports_unreachable_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("not-a-directory");
    std::fs::write(&root, "").unwrap();

    let response = get_metrics(&root).await;

    assert!(response.starts_with("HTTP/1.1 500"));
}
