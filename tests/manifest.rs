//! HLS parsing and duration resolution tests.

mod common;

use common::{FakeManifests, MASTER_URL, STREAM_ID, VARIANT_URL, media_playlist};
use stream_thumbs::manifest::{MasterPlaylist, MediaPlaylist};
use stream_thumbs::{DeliveryEndpoint, ThumbsError, resolve_duration};

// ── Master playlists ───────────────────────────────────────────────

#[test]
fn master_lists_variants_in_order() {
    let master = MasterPlaylist::parse(common::MASTER_PLAYLIST).unwrap();

    assert_eq!(master.variants.len(), 2);
    assert_eq!(master.variants[0].uri, "stream_360.m3u8");
    assert_eq!(master.variants[0].bandwidth, Some(800_000));
    assert_eq!(master.variants[0].resolution, Some((640, 360)));
    assert_eq!(master.variants[1].uri, "stream_720.m3u8");
    assert_eq!(master.first_variant().unwrap().uri, "stream_360.m3u8");
}

#[test]
fn master_quoted_attribute_with_commas() {
    let text = "#EXTM3U\n#EXT-X-STREAM-INF:CODECS=\"avc1,mp4a\",BANDWIDTH=5\nv.m3u8\n";
    let master = MasterPlaylist::parse(text).unwrap();
    assert_eq!(master.variants[0].bandwidth, Some(5));
}

#[test]
fn master_without_variants() {
    let master = MasterPlaylist::parse("#EXTM3U\n#EXT-X-VERSION:3\n").unwrap();
    assert!(master.variants.is_empty());
    assert!(matches!(
        master.first_variant(),
        Err(ThumbsError::ManifestParse(_))
    ));
}

#[test]
fn master_requires_header() {
    let result = MasterPlaylist::parse("<html>not found</html>");
    assert!(matches!(result, Err(ThumbsError::ManifestParse(_))));
}

#[test]
fn master_dangling_stream_inf() {
    let result = MasterPlaylist::parse("#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1\n");
    assert!(matches!(result, Err(ThumbsError::ManifestParse(_))));
}

// ── Media playlists ────────────────────────────────────────────────

#[test]
fn media_sums_segments() {
    let media = MediaPlaylist::parse(&media_playlist(&[10.0, 10.0, 4.5])).unwrap();
    assert_eq!(media.segments.len(), 3);
    assert_eq!(media.target_duration, Some(25.0));
    assert_eq!(media.total_duration(), 24.5);
    assert_eq!(media.segments[2].uri, "seg2.ts");
}

#[test]
fn media_extinf_with_title() {
    let text = "#EXTM3U\n#EXTINF:6.006,Opening titles\nintro.ts\n#EXTINF:3\nnext.ts\n";
    let media = MediaPlaylist::parse(text).unwrap();
    assert!((media.total_duration() - 9.006).abs() < 1e-9);
}

#[test]
fn media_empty_playlist_has_zero_duration() {
    let media = MediaPlaylist::parse("#EXTM3U\n#EXT-X-ENDLIST\n").unwrap();
    assert_eq!(media.total_duration(), 0.0);
}

#[test]
fn media_rejects_bad_extinf() {
    let result = MediaPlaylist::parse("#EXTM3U\n#EXTINF:abc,\nseg.ts\n");
    assert!(matches!(result, Err(ThumbsError::ManifestParse(_))));

    let negative = MediaPlaylist::parse("#EXTM3U\n#EXTINF:-2,\nseg.ts\n");
    assert!(negative.is_err());
}

// ── Duration resolution ────────────────────────────────────────────

#[tokio::test]
async fn resolves_through_first_variant() {
    let manifests = FakeManifests::for_stream(&[25.0, 25.0, 25.0, 25.0, 25.0]);
    let seconds = resolve_duration(&manifests, &DeliveryEndpoint::default(), STREAM_ID)
        .await
        .unwrap();

    assert_eq!(seconds, 125.0);
    let requests = manifests.requests.lock().unwrap().clone();
    assert_eq!(requests, vec![MASTER_URL.to_string(), VARIANT_URL.to_string()]);
}

#[tokio::test]
async fn custom_endpoint_is_used() {
    let manifests = FakeManifests::new()
        .with_document(
            "http://mirror.local/abc/manifest/video.m3u8",
            common::MASTER_PLAYLIST,
        )
        .with_document(
            "http://mirror.local/abc/manifest/stream_360.m3u8",
            media_playlist(&[3.0]),
        );
    let endpoint = DeliveryEndpoint::new("http://mirror.local/");
    let seconds = resolve_duration(&manifests, &endpoint, STREAM_ID).await.unwrap();
    assert_eq!(seconds, 3.0);
}

#[tokio::test]
async fn master_status_is_surfaced() {
    let manifests = FakeManifests::new();
    let error = resolve_duration(&manifests, &DeliveryEndpoint::default(), STREAM_ID)
        .await
        .unwrap_err();

    match error {
        ThumbsError::ManifestFetch { url, status } => {
            assert_eq!(url, MASTER_URL);
            assert_eq!(status, 404);
        }
        other => panic!("Expected ManifestFetch, got: {other}"),
    }
    assert_eq!(manifests.request_count(), 1);
}

#[tokio::test]
async fn variant_status_is_surfaced() {
    let manifests = FakeManifests::new().with_document(MASTER_URL, common::MASTER_PLAYLIST);
    let error = resolve_duration(&manifests, &DeliveryEndpoint::default(), STREAM_ID)
        .await
        .unwrap_err();
    assert!(matches!(error, ThumbsError::ManifestFetch { status: 404, .. }));
    assert_eq!(manifests.request_count(), 2);
}

#[tokio::test]
async fn missing_variant_is_parse_error() {
    let manifests = FakeManifests::new().with_document(MASTER_URL, "#EXTM3U\n");
    let error = resolve_duration(&manifests, &DeliveryEndpoint::default(), STREAM_ID)
        .await
        .unwrap_err();
    assert!(matches!(error, ThumbsError::ManifestParse(_)));
    assert_eq!(manifests.request_count(), 1);
}

#[tokio::test]
async fn empty_stream_id_makes_no_requests() {
    let manifests = FakeManifests::for_stream(&[1.0]);
    let error = resolve_duration(&manifests, &DeliveryEndpoint::default(), "")
        .await
        .unwrap_err();
    assert!(matches!(error, ThumbsError::Configuration(_)));
    assert_eq!(manifests.request_count(), 0);
}
