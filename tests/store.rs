use camino::Utf8PathBuf;

use pixiv_downloader::domain::ArtworkId;
use pixiv_downloader::store::CompletionStore;

fn store_path(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().join("downloaded.json")).unwrap()
}

#[test]
fn mark_complete_is_visible_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let id: ArtworkId = "123456".parse().unwrap();

    let mut store = CompletionStore::open(store_path(&dir)).unwrap();
    assert!(!store.is_complete(&id));
    store.mark_complete(&id, "/downloads/123456_p0.png").unwrap();
    assert!(store.is_complete(&id));

    let reopened = CompletionStore::open(store_path(&dir)).unwrap();
    assert!(reopened.is_complete(&id));
    assert_eq!(reopened.count(), 1);
    let record = reopened.get(&id).unwrap();
    assert_eq!(record.file_path, "/downloads/123456_p0.png");
    assert!(!record.download_time.is_empty());
}

#[test]
fn count_grows_only_for_new_ids() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CompletionStore::open(store_path(&dir)).unwrap();

    let first: ArtworkId = "1".parse().unwrap();
    let second: ArtworkId = "2".parse().unwrap();

    store.mark_complete(&first, "/d/1.png").unwrap();
    assert_eq!(store.count(), 1);
    store.mark_complete(&second, "/d/2.png").unwrap();
    assert_eq!(store.count(), 2);
    store.mark_complete(&first, "/d/1-again.png").unwrap();
    assert_eq!(store.count(), 2);
    assert_eq!(store.get(&first).unwrap().file_path, "/d/1-again.png");
}
