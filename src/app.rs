use std::thread;

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::asset;
use crate::config::RunOptions;
use crate::domain::{ArtworkId, AssetDescriptor, extract_artwork_id};
use crate::fs_util;
use crate::pixiv::Fetcher;
use crate::resolve;
use crate::store::CompletionStore;

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Message(String),
    Bytes { done: u64, total: Option<u64> },
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    InvalidUrl,
    Skipped,
    ResolveFailed,
    PartialFailure,
    RecordFailed,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub url: String,
    pub artwork_id: Option<String>,
    pub status: ItemStatus,
    pub assets_total: usize,
    pub assets_fetched: usize,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunTally {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub items: Vec<ItemReport>,
    pub tally: RunTally,
    pub store_total: usize,
}

pub struct App<F: Fetcher> {
    store: CompletionStore,
    fetcher: F,
    options: RunOptions,
}

impl<F: Fetcher> App<F> {
    pub fn new(store: CompletionStore, fetcher: F, options: RunOptions) -> Self {
        Self {
            store,
            fetcher,
            options,
        }
    }

    pub fn run(&mut self, urls: &[String], sink: &dyn ProgressSink) -> RunReport {
        let mut items = Vec::with_capacity(urls.len());
        let mut tally = RunTally {
            total: urls.len(),
            ..RunTally::default()
        };

        for (index, url) in urls.iter().enumerate() {
            sink.event(ProgressEvent::Message(format!(
                "[{}/{}] {url}",
                index + 1,
                urls.len()
            )));

            let item = self.process_item(url, sink);
            match item.status {
                ItemStatus::Completed => tally.succeeded += 1,
                ItemStatus::Skipped => tally.skipped += 1,
                _ => tally.failed += 1,
            }
            items.push(item);

            // rate-limit pause, not applied after the last item
            if index + 1 < urls.len() && !self.options.delay.is_zero() {
                thread::sleep(self.options.delay);
            }
        }

        RunReport {
            items,
            tally,
            store_total: self.store.count(),
        }
    }

    fn process_item(&mut self, url: &str, sink: &dyn ProgressSink) -> ItemReport {
        let Some(id) = extract_artwork_id(url) else {
            sink.event(ProgressEvent::Message(format!("invalid artwork URL: {url}")));
            return ItemReport {
                url: url.to_string(),
                artwork_id: None,
                status: ItemStatus::InvalidUrl,
                assets_total: 0,
                assets_fetched: 0,
                file_path: None,
            };
        };

        if !self.options.force && self.store.is_complete(&id) {
            sink.event(ProgressEvent::Message(format!(
                "skipping artwork {id} (already downloaded)"
            )));
            return self.report(url, &id, ItemStatus::Skipped, 0, 0, None);
        }

        sink.event(ProgressEvent::Message(format!(
            "fetching metadata for artwork {id}"
        )));
        let assets = match resolve::resolve(&self.fetcher, &id, self.options.strict_pages) {
            Ok(assets) => assets,
            Err(err) => {
                sink.event(ProgressEvent::Message(format!("artwork {id}: {err}")));
                tracing::error!(artwork = %id, error = %err, "metadata resolution failed");
                return self.report(url, &id, ItemStatus::ResolveFailed, 0, 0, None);
            }
        };

        sink.event(ProgressEvent::Message(format!(
            "artwork {id}: {} asset(s)",
            assets.len()
        )));

        let mut fetched = 0usize;
        let mut first_path: Option<Utf8PathBuf> = None;
        for (index, asset) in assets.iter().enumerate() {
            let dest = self.destination(asset);
            sink.event(ProgressEvent::Message(format!(
                "downloading {}/{}: {}",
                index + 1,
                assets.len(),
                dest.file_name().unwrap_or(asset.file_name.as_str())
            )));
            match asset::fetch_to_file(&self.fetcher, &asset.source_url, dest.as_std_path(), sink)
            {
                Ok(()) => {
                    fetched += 1;
                    if first_path.is_none() {
                        first_path = Some(dest);
                    }
                }
                Err(err) => {
                    sink.event(ProgressEvent::Message(format!(
                        "asset {}/{} failed: {err}",
                        index + 1,
                        assets.len()
                    )));
                    tracing::error!(artwork = %id, url = %asset.source_url, error = %err, "asset download failed");
                }
            }
        }

        if fetched < assets.len() {
            return self.report(
                url,
                &id,
                ItemStatus::PartialFailure,
                assets.len(),
                fetched,
                first_path.map(|p| p.to_string()),
            );
        }

        // the first asset's path represents the whole artwork in the store
        let representative = self.destination(&assets[0]);
        if let Err(err) = self.store.mark_complete(&id, representative.as_str()) {
            sink.event(ProgressEvent::Message(format!("artwork {id}: {err}")));
            tracing::error!(artwork = %id, error = %err, "failed to record completion");
            return self.report(
                url,
                &id,
                ItemStatus::RecordFailed,
                assets.len(),
                fetched,
                Some(representative.to_string()),
            );
        }

        sink.event(ProgressEvent::Message(format!(
            "artwork {id} downloaded successfully"
        )));
        self.report(
            url,
            &id,
            ItemStatus::Completed,
            assets.len(),
            fetched,
            Some(representative.to_string()),
        )
    }

    fn destination(&self, asset: &AssetDescriptor) -> Utf8PathBuf {
        self.options
            .download_dir
            .join(fs_util::sanitize_filename(&asset.file_name))
    }

    fn report(
        &self,
        url: &str,
        id: &ArtworkId,
        status: ItemStatus,
        assets_total: usize,
        assets_fetched: usize,
        file_path: Option<String>,
    ) -> ItemReport {
        ItemReport {
            url: url.to_string(),
            artwork_id: Some(id.as_str().to_string()),
            status,
            assets_total,
            assets_fetched,
            file_path,
        }
    }

    pub fn store(&self) -> &CompletionStore {
        &self.store
    }
}
