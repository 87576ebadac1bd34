use std::fs;
use std::path::Path;
use std::time::Duration;

use camino::Utf8PathBuf;

use crate::error::DownloadError;

pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";
pub const DEFAULT_COOKIE_FILE: &str = "cookie";
pub const DEFAULT_DELAY_SECS: u64 = 2;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub download_dir: Utf8PathBuf,
    pub force: bool,
    pub strict_pages: bool,
    pub delay: Duration,
}

impl RunOptions {
    pub fn new(download_dir: Utf8PathBuf) -> Self {
        Self {
            download_dir,
            force: false,
            strict_pages: false,
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
        }
    }
}

pub fn read_url_file(path: &Path) -> Result<Vec<String>, DownloadError> {
    let content =
        fs::read_to_string(path).map_err(|_| DownloadError::InputRead(path.to_path_buf()))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| line.contains("pixiv.net"))
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        return Err(DownloadError::NoUrls(path.to_path_buf()));
    }
    Ok(urls)
}

pub fn load_cookie_header(path: &Path) -> Result<String, DownloadError> {
    let content =
        fs::read_to_string(path).map_err(|_| DownloadError::CookieRead(path.to_path_buf()))?;

    let mut header = String::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !header.is_empty() {
            header.push_str("; ");
        }
        header.push_str(line.trim_end_matches(';'));
    }

    if header.is_empty() {
        return Err(DownloadError::CookieEmpty(path.to_path_buf()));
    }
    Ok(header)
}

pub fn store_path(download_dir: &Utf8PathBuf) -> Utf8PathBuf {
    download_dir.join("downloaded.json")
}
