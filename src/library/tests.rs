use super::*;
use crate::config::TrackDisplayField;

fn track(title: &str, artist: &str, album: &str) -> Track {
    Track {
        title: title.into(),
        artist: artist.into(),
        album: album.into(),
        duration: None,
    }
}

#[test]
fn parse_listing_keeps_server_order() {
    let body = br#"[
        {"title": "B", "artist": "Two", "album": "Second", "duration": 200},
        {"title": "A", "artist": "One", "album": "First", "duration": 125}
    ]"#;

    let tracks = parse_listing(body).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].title, "B");
    assert_eq!(tracks[1].title, "A");
    assert_eq!(tracks[1].duration, Some(125.0));
}

#[test]
fn parse_listing_tolerates_missing_and_null_fields() {
    let body = br#"[{"title": "Lonely", "artist": null}]"#;

    let tracks = parse_listing(body).unwrap();
    assert_eq!(tracks[0].artist, "");
    assert_eq!(tracks[0].album, "");
    assert_eq!(tracks[0].duration, None);
}

#[test]
fn parse_listing_accepts_fractional_and_null_durations() {
    let body = br#"[
        {"title": "Short", "duration": 61.75},
        {"title": "Unknown", "duration": null}
    ]"#;

    let tracks = parse_listing(body).unwrap();
    assert_eq!(tracks[0].duration, Some(61.75));
    assert_eq!(tracks[0].duration.map(crate::ui::format_time).as_deref(), Some("1:01"));
    assert_eq!(tracks[1].duration, None);
}

#[test]
fn parse_listing_rejects_non_array_bodies() {
    assert!(matches!(
        parse_listing(br#"{"error": "nope"}"#),
        Err(FetchError::Parse(_))
    ));
    assert!(matches!(parse_listing(b"<html>"), Err(FetchError::Parse(_))));
}

#[test]
fn stream_url_uses_raw_title_by_default() {
    let e = Endpoints::new("http://host:5000/", false);
    assert_eq!(e.songs(), "http://host:5000/songs");
    assert_eq!(e.stream("My Song.mp3"), "http://host:5000/stream/My Song.mp3");
}

#[test]
fn stream_url_can_percent_encode_titles() {
    let e = Endpoints::new("http://host:5000", true);
    assert_eq!(
        e.stream("AC/DC? #1.mp3"),
        "http://host:5000/stream/AC%2FDC%3F%20%231.mp3"
    );
}

#[test]
fn display_from_fields_skips_blank_parts() {
    let t = track("Song", "  ", "Album");
    assert_eq!(
        display_from_fields(
            &t,
            &[TrackDisplayField::Artist, TrackDisplayField::Title, TrackDisplayField::Album],
            " - "
        ),
        "Song - Album"
    );
}

#[test]
fn row_format_defaults_to_title_over_artist_album() {
    let fmt = RowFormat::default();
    let t = track("Song", "Artist", "Album");
    assert_eq!(fmt.headline(&t), "Song");
    assert_eq!(fmt.detail(&t), "Artist - Album");
}

#[test]
fn row_format_headline_falls_back_to_title() {
    let fmt = RowFormat {
        headline: vec![TrackDisplayField::Artist],
        detail: vec![],
        separator: " / ".into(),
    };
    let t = track("Only Title", "", "");
    assert_eq!(fmt.headline(&t), "Only Title");
    assert_eq!(fmt.detail(&t), "");
}
