use serde_json::Value;

use crate::domain::{ArtworkId, AssetDescriptor};
use crate::error::DownloadError;
use crate::pixiv::Fetcher;

const API_ROOT: &str = "https://www.pixiv.net/ajax";

pub fn illust_url(id: &ArtworkId) -> String {
    format!("{API_ROOT}/illust/{}", id.as_str())
}

pub fn pages_url(id: &ArtworkId) -> String {
    format!("{API_ROOT}/illust/{}/pages", id.as_str())
}

pub fn resolve(
    fetcher: &dyn Fetcher,
    id: &ArtworkId,
    strict_pages: bool,
) -> Result<Vec<AssetDescriptor>, DownloadError> {
    let payload = fetcher.get_json(&illust_url(id))?;
    check_error_flag(id, &payload)?;

    let body = payload
        .get("body")
        .ok_or_else(|| malformed(id, "missing 'body' field"))?;
    let original = body
        .get("urls")
        .and_then(|urls| urls.get("original"))
        .and_then(|url| url.as_str())
        .ok_or_else(|| malformed(id, "missing 'urls.original' field"))?;

    let mut assets = vec![descriptor(id, 0, original)];

    let page_count = body.get("pageCount").and_then(|v| v.as_i64()).unwrap_or(1);
    if page_count > 1 {
        match resolve_pages(fetcher, id) {
            Ok(pages) if !pages.is_empty() => assets = pages,
            Ok(_) => {
                tracing::warn!(artwork = %id, "pages endpoint listed no entries, keeping single URL");
            }
            Err(err) if strict_pages => return Err(err),
            Err(err) => {
                tracing::warn!(artwork = %id, error = %err, "pages request failed, keeping single URL");
            }
        }
    }

    if assets.is_empty() {
        return Err(DownloadError::NoAssets(id.as_str().to_string()));
    }
    Ok(assets)
}

fn resolve_pages(
    fetcher: &dyn Fetcher,
    id: &ArtworkId,
) -> Result<Vec<AssetDescriptor>, DownloadError> {
    let payload = fetcher.get_json(&pages_url(id))?;
    check_error_flag(id, &payload)?;

    let entries = payload
        .get("body")
        .and_then(|body| body.as_array())
        .ok_or_else(|| malformed(id, "pages response 'body' is not an array"))?;

    let mut assets = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if let Some(url) = entry
            .get("urls")
            .and_then(|urls| urls.get("original"))
            .and_then(|url| url.as_str())
        {
            assets.push(descriptor(id, index, url));
        }
    }
    Ok(assets)
}

fn check_error_flag(id: &ArtworkId, payload: &Value) -> Result<(), DownloadError> {
    if payload.get("error").and_then(|v| v.as_bool()) == Some(true) {
        let message = payload
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown API error")
            .to_string();
        return Err(malformed(id, &message));
    }
    Ok(())
}

fn malformed(id: &ArtworkId, reason: &str) -> DownloadError {
    DownloadError::MalformedMetadata {
        id: id.as_str().to_string(),
        reason: reason.to_string(),
    }
}

fn descriptor(id: &ArtworkId, index: usize, url: &str) -> AssetDescriptor {
    let basename = url.rsplit('/').next().filter(|name| !name.is_empty());
    let file_name = match basename {
        Some(name) => name.to_string(),
        None => format!("{}_{}.jpg", id.as_str(), index),
    };
    AssetDescriptor {
        source_url: url.to_string(),
        file_name,
    }
}
