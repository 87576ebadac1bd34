use std::fs;
use std::path::Path;

use crate::error::DownloadError;

pub fn sanitize_filename(name: &str) -> String {
    const INVALID: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
    name.chars()
        .map(|ch| if INVALID.contains(&ch) { '_' } else { ch })
        .collect()
}

pub fn ensure_dir(path: &Path) -> Result<(), DownloadError> {
    fs::create_dir_all(path).map_err(|err| {
        DownloadError::Filesystem(format!("create directory {}: {err}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_invalid_chars() {
        assert_eq!(sanitize_filename("a<b>:c?.png"), "a_b__c_.png");
        assert_eq!(sanitize_filename("42_p0.png"), "42_p0.png");
    }
}
