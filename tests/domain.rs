use pixiv_downloader::domain::{ArtworkId, extract_artwork_id};

#[test]
fn extract_returns_digits_for_artwork_urls() {
    let cases = [
        ("https://www.pixiv.net/artworks/123456", "123456"),
        ("https://www.pixiv.net/en/artworks/7", "7"),
        ("https://example.test/artworks/42", "42"),
        ("  https://www.pixiv.net/artworks/999?lang=ja  ", "999"),
    ];
    for (line, expected) in cases {
        let id = extract_artwork_id(line).unwrap();
        assert_eq!(id.as_str(), expected, "line: {line}");
    }
}

#[test]
fn extract_returns_none_for_everything_else() {
    let cases = [
        "",
        "   ",
        "# https://www.pixiv.net/artworks/123456",
        "https://www.pixiv.net/users/123456",
        "https://www.pixiv.net/artworks/abc",
        "not a url at all",
    ];
    for line in cases {
        assert!(extract_artwork_id(line).is_none(), "line: {line}");
    }
}

#[test]
fn artwork_id_parses_digits_only() {
    let id: ArtworkId = "123456".parse().unwrap();
    assert_eq!(id.as_str(), "123456");
    assert!("12a".parse::<ArtworkId>().is_err());
    assert!("".parse::<ArtworkId>().is_err());
}
