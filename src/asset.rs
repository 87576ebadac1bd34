use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::app::{ProgressEvent, ProgressSink};
use crate::error::DownloadError;
use crate::pixiv::Fetcher;

const CHUNK_SIZE: usize = 64 * 1024;

pub fn fetch_to_file(
    fetcher: &dyn Fetcher,
    url: &str,
    dest: &Path,
    sink: &dyn ProgressSink,
) -> Result<(), DownloadError> {
    let mut file = File::create(dest)
        .map_err(|err| DownloadError::CannotOpenOutput(format!("{}: {err}", dest.display())))?;

    let stream = match fetcher.get_stream(url) {
        Ok(stream) => stream,
        Err(err) => {
            drop(file);
            remove_partial(dest);
            return Err(err);
        }
    };

    let copied = copy_stream(stream.reader, &mut file, stream.content_length, sink)
        .and_then(|()| {
            file.flush()
                .map_err(|err| DownloadError::Transport(err.to_string()))
        });
    match copied {
        Ok(()) => Ok(()),
        Err(err) => {
            drop(file);
            remove_partial(dest);
            Err(err)
        }
    }
}

fn copy_stream(
    mut reader: Box<dyn Read>,
    file: &mut File,
    total: Option<u64>,
    sink: &dyn ProgressSink,
) -> Result<(), DownloadError> {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut done: u64 = 0;
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|err| DownloadError::Transport(err.to_string()))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .map_err(|err| DownloadError::Transport(err.to_string()))?;
        done += n as u64;
        sink.event(ProgressEvent::Bytes { done, total });
    }
    Ok(())
}

// cleanup must not mask the transfer error that triggered it
fn remove_partial(dest: &Path) {
    if let Err(err) = fs::remove_file(dest) {
        tracing::warn!(path = %dest.display(), error = %err, "failed to remove partial download");
    }
}
