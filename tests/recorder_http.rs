// Recorder tests against a local HTTP server

use radiorec::ogg::{OggPage, VorbisComment, OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_EOS};
use radiorec::{ConfigError, Error, Recorder, RecorderConfig, TrackName};

const METAINT: usize = 16;

/// One ICY unit: METAINT audio bytes plus an optional StreamTitle block
fn icy_unit(fill: u8, title: Option<&str>) -> Vec<u8> {
    let mut bytes = vec![fill; METAINT];
    match title {
        Some(title) => {
            let text = format!("StreamTitle='{}';", title);
            let blocks = text.len().div_ceil(16);
            bytes.push(blocks as u8);
            bytes.extend_from_slice(text.as_bytes());
            bytes.resize(METAINT + 1 + blocks * 16, 0);
        }
        None => bytes.push(0),
    }
    bytes
}

fn icy_body() -> Vec<u8> {
    let mut body = icy_unit(0, Some("Partial"));
    body.extend(icy_unit(0, None));
    body.extend(icy_unit(1, Some("Song A")));
    body.extend(icy_unit(2, None));
    body.extend(icy_unit(3, Some("Song B")));
    body.extend(icy_unit(3, None));
    body
}

fn ogg_track(serial: u32, artist: &str, title: &str) -> Vec<u8> {
    let comment = VorbisComment {
        vendor_string: "test".to_string(),
        comments: vec![
            ("ARTIST".to_string(), artist.to_string()),
            ("TITLE".to_string(), title.to_string()),
        ],
    };
    let mut bytes = OggPage::new(OGG_HEADER_TYPE_BOS, 0, serial, 0, vec![comment.to_packet()]).to_bytes();
    bytes.extend(OggPage::new(OGG_HEADER_TYPE_EOS, 1024, serial, 1, vec![vec![7; 100]]).to_bytes());
    bytes
}

fn recorder(url: String, track_limit: Option<usize>) -> Recorder {
    Recorder::new(RecorderConfig {
        url,
        track_limit,
        retry_delay_ms: 0,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn records_icy_track() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/stream")
        .match_header("icy-metadata", "1")
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_header("icy-metaint", &METAINT.to_string())
        .with_body(icy_body())
        .create();

    let mut tracks: Vec<(TrackName, Vec<u8>)> = Vec::new();
    let saved = recorder(format!("{}/stream", server.url()), Some(1))
        .run(&mut tracks)
        .unwrap();

    mock.assert();
    assert_eq!(saved, 1);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].0.file_name(), "Song A.mp3");
    let mut expected = vec![1u8; METAINT];
    expected.extend(vec![2u8; METAINT]);
    assert_eq!(tracks[0].1, expected);
}

#[test]
fn reconnects_after_stream_ends() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/stream")
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_header("icy-metaint", &METAINT.to_string())
        .with_body(icy_body())
        .expect(2)
        .create();

    let mut tracks: Vec<(TrackName, Vec<u8>)> = Vec::new();
    let saved = recorder(format!("{}/stream", server.url()), Some(2))
        .run(&mut tracks)
        .unwrap();

    mock.assert();
    assert_eq!(saved, 2);
    // Each connection starts over and discards its first track again
    assert!(tracks.iter().all(|(name, _)| name.file_name() == "Song A.mp3"));
}

#[test]
fn records_ogg_track() {
    let second = ogg_track(2, "Artist", "Title");
    let mut body = ogg_track(1, "Someone", "Half a song");
    body.extend(&second);
    body.extend(ogg_track(3, "Next", "One"));

    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/live.ogg")
        .with_status(200)
        .with_header("content-type", "application/ogg")
        .with_body(body)
        .create();

    let mut tracks: Vec<(TrackName, Vec<u8>)> = Vec::new();
    let saved = recorder(format!("{}/live.ogg", server.url()), Some(1))
        .run(&mut tracks)
        .unwrap();

    assert_eq!(saved, 1);
    assert_eq!(tracks[0].0.file_name(), "Artist -- Title.ogg");
    assert_eq!(tracks[0].1, second);
}

#[test]
fn missing_metaint_aborts() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/stream")
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(icy_body())
        .create();

    let mut tracks: Vec<(TrackName, Vec<u8>)> = Vec::new();
    let err = recorder(format!("{}/stream", server.url()), None)
        .run(&mut tracks)
        .unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::MissingMetaint)));
    assert!(tracks.is_empty());
}

#[test]
fn unsupported_content_type_aborts() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html></html>")
        .create();

    let mut tracks: Vec<(TrackName, Vec<u8>)> = Vec::new();
    let err = recorder(server.url(), None).run(&mut tracks).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::UnsupportedContentType(_))));
}
