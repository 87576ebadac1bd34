use std::io::Read;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use serde_json::Value;

use crate::error::DownloadError;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const PIXIV_REFERER: &str = "https://www.pixiv.net/";

pub struct AssetStream {
    pub reader: Box<dyn Read>,
    pub content_length: Option<u64>,
}

pub trait Fetcher: Send + Sync {
    fn get_json(&self, url: &str) -> Result<Value, DownloadError>;
    fn get_stream(&self, url: &str) -> Result<AssetStream, DownloadError>;
}

#[derive(Clone)]
pub struct PixivHttpClient {
    client: Client,
}

impl PixivHttpClient {
    pub fn new(cookie_header: &str) -> Result<Self, DownloadError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(BROWSER_USER_AGENT),
        );
        headers.insert(REFERER, HeaderValue::from_static(PIXIV_REFERER));
        headers.insert(
            COOKIE,
            HeaderValue::from_str(cookie_header)
                .map_err(|err| DownloadError::MetadataHttp(err.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| DownloadError::MetadataHttp(err.to_string()))?;

        Ok(Self { client })
    }

    fn send_with_retries(
        &self,
        url: &str,
        on_error: fn(String) -> DownloadError,
    ) -> Result<reqwest::blocking::Response, DownloadError> {
        const MAX_RETRIES: usize = 3;
        const BASE_DELAY_MS: u64 = 200;
        let mut attempt = 0usize;
        loop {
            let response = self.client.get(url).send();
            match response {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if attempt < MAX_RETRIES && is_retryable_status(status) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    if attempt < MAX_RETRIES && is_retryable_error(&err) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Err(on_error(err.to_string()));
                }
            }
        }
    }
}

impl Fetcher for PixivHttpClient {
    fn get_json(&self, url: &str) -> Result<Value, DownloadError> {
        let response = self.send_with_retries(url, DownloadError::MetadataHttp)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "metadata request failed".to_string());
            return Err(DownloadError::MetadataStatus { status, message });
        }
        response
            .json()
            .map_err(|err| DownloadError::MetadataHttp(err.to_string()))
    }

    fn get_stream(&self, url: &str) -> Result<AssetStream, DownloadError> {
        let response = self.send_with_retries(url, DownloadError::Transport)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "asset request failed".to_string());
            return Err(DownloadError::TransportStatus { status, message });
        }
        let content_length = response.content_length();
        Ok(AssetStream {
            reader: Box::new(response),
            content_length,
        })
    }
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
