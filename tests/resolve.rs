use std::collections::HashMap;

use assert_matches::assert_matches;
use serde_json::{Value, json};

use pixiv_downloader::domain::ArtworkId;
use pixiv_downloader::error::DownloadError;
use pixiv_downloader::pixiv::{AssetStream, Fetcher};
use pixiv_downloader::resolve::{illust_url, pages_url, resolve};

#[derive(Default)]
struct MockFetcher {
    metadata: HashMap<String, Value>,
}

impl MockFetcher {
    fn with(mut self, url: String, payload: Value) -> Self {
        self.metadata.insert(url, payload);
        self
    }
}

impl Fetcher for MockFetcher {
    fn get_json(&self, url: &str) -> Result<Value, DownloadError> {
        self.metadata
            .get(url)
            .cloned()
            .ok_or_else(|| DownloadError::MetadataStatus {
                status: 404,
                message: "not found".to_string(),
            })
    }

    fn get_stream(&self, _url: &str) -> Result<AssetStream, DownloadError> {
        Err(DownloadError::Transport("not a stream test".to_string()))
    }
}

fn illust_payload(original: &str, page_count: i64) -> Value {
    json!({
        "error": false,
        "body": {
            "urls": { "original": original },
            "pageCount": page_count
        }
    })
}

#[test]
fn single_page_yields_one_descriptor() {
    let id: ArtworkId = "42".parse().unwrap();
    let fetcher = MockFetcher::default().with(
        illust_url(&id),
        illust_payload("https://cdn.test/img/42_p0.png", 1),
    );

    let assets = resolve(&fetcher, &id, false).unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].source_url, "https://cdn.test/img/42_p0.png");
    assert_eq!(assets[0].file_name, "42_p0.png");
}

#[test]
fn multi_page_replaces_single_url_in_order() {
    let id: ArtworkId = "42".parse().unwrap();
    let fetcher = MockFetcher::default()
        .with(
            illust_url(&id),
            illust_payload("https://cdn.test/img/42_p0.png", 3),
        )
        .with(
            pages_url(&id),
            json!({
                "error": false,
                "body": [
                    { "urls": { "original": "https://cdn.test/img/42_p0.png" } },
                    { "urls": { "original": "https://cdn.test/img/42_p1.png" } },
                    { "urls": { "original": "https://cdn.test/img/42_p2.png" } }
                ]
            }),
        );

    let assets = resolve(&fetcher, &id, false).unwrap();
    let urls: Vec<&str> = assets.iter().map(|a| a.source_url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://cdn.test/img/42_p0.png",
            "https://cdn.test/img/42_p1.png",
            "https://cdn.test/img/42_p2.png",
        ]
    );
}

#[test]
fn failing_pages_request_falls_back_to_single_url() {
    let id: ArtworkId = "42".parse().unwrap();
    // pageCount says 2 but the pages endpoint is not answering.
    let fetcher = MockFetcher::default().with(
        illust_url(&id),
        illust_payload("https://cdn.test/img/42_p0.png", 2),
    );

    let assets = resolve(&fetcher, &id, false).unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].source_url, "https://cdn.test/img/42_p0.png");
}

#[test]
fn strict_pages_propagates_the_pages_error() {
    let id: ArtworkId = "42".parse().unwrap();
    let fetcher = MockFetcher::default().with(
        illust_url(&id),
        illust_payload("https://cdn.test/img/42_p0.png", 2),
    );

    let err = resolve(&fetcher, &id, true).unwrap_err();
    assert_matches!(err, DownloadError::MetadataStatus { status: 404, .. });
}

#[test]
fn api_error_flag_is_malformed_metadata() {
    let id: ArtworkId = "42".parse().unwrap();
    let fetcher = MockFetcher::default().with(
        illust_url(&id),
        json!({ "error": true, "message": "work deleted" }),
    );

    let err = resolve(&fetcher, &id, false).unwrap_err();
    assert_matches!(err, DownloadError::MalformedMetadata { .. });
}

#[test]
fn missing_original_url_is_malformed_metadata() {
    let id: ArtworkId = "42".parse().unwrap();
    let fetcher = MockFetcher::default().with(
        illust_url(&id),
        json!({ "error": false, "body": { "pageCount": 1 } }),
    );

    let err = resolve(&fetcher, &id, false).unwrap_err();
    assert_matches!(err, DownloadError::MalformedMetadata { .. });
}

#[test]
fn unreachable_metadata_endpoint_is_unavailable() {
    let id: ArtworkId = "42".parse().unwrap();
    let fetcher = MockFetcher::default();

    let err = resolve(&fetcher, &id, false).unwrap_err();
    assert_matches!(err, DownloadError::MetadataStatus { status: 404, .. });
}
