//! Delivery URL tests.

use stream_thumbs::{DeliveryEndpoint, ThumbnailFit, ThumbnailRequest};

// ── Manifests ──────────────────────────────────────────────────────

#[test]
fn default_manifest_urls() {
    let endpoint = DeliveryEndpoint::default();
    assert_eq!(endpoint.base(), "https://videodelivery.net");
    assert_eq!(
        endpoint.master_manifest_url("abc"),
        "https://videodelivery.net/abc/manifest/video.m3u8"
    );
    assert_eq!(
        endpoint.manifest_url("abc", "stream_1.m3u8?clientBandwidthHint=1"),
        "https://videodelivery.net/abc/manifest/stream_1.m3u8?clientBandwidthHint=1"
    );
}

#[test]
fn trailing_slash_is_dropped() {
    let endpoint = DeliveryEndpoint::new("http://127.0.0.1:8080/");
    assert_eq!(endpoint.base(), "http://127.0.0.1:8080");
    assert_eq!(
        endpoint.master_manifest_url("id"),
        "http://127.0.0.1:8080/id/manifest/video.m3u8"
    );
}

// ── Thumbnails ─────────────────────────────────────────────────────

#[test]
fn still_url_for_frame_sampling() {
    let url = ThumbnailRequest::at_seconds(25.0)
        .with_height(180)
        .url(&DeliveryEndpoint::default(), "abc");
    assert_eq!(
        url,
        "https://videodelivery.net/abc/thumbnails/thumbnail.jpg?time=25s&height=180"
    );
}

#[test]
fn fractional_seconds() {
    let url = ThumbnailRequest::at_seconds(0.75).url(&DeliveryEndpoint::default(), "abc");
    assert!(url.ends_with("thumbnail.jpg?time=0.75s"));
}

#[test]
fn unset_parameters_are_omitted() {
    let url = ThumbnailRequest::new().url(&DeliveryEndpoint::default(), "abc");
    assert_eq!(url, "https://videodelivery.net/abc/thumbnails/thumbnail.jpg");
}

#[test]
fn all_parameters_in_order() {
    let request = ThumbnailRequest::new()
        .with_time("1m2s")
        .with_height(120)
        .with_width(144)
        .with_fit(ThumbnailFit::Scale)
        .with_duration("5s")
        .with_fps(8);
    assert!(request.is_animated());
    assert_eq!(
        request.url(&DeliveryEndpoint::default(), "abc"),
        "https://videodelivery.net/abc/thumbnails/thumbnail.gif?time=1m2s&height=120&width=144&fit=scale&duration=5s&fps=8"
    );
}

#[test]
fn fit_names() {
    assert_eq!(ThumbnailFit::Crop.to_string(), "crop");
    assert_eq!(ThumbnailFit::Clip.to_string(), "clip");
    assert_eq!(ThumbnailFit::Scale.to_string(), "scale");
    assert_eq!(ThumbnailFit::Fill.to_string(), "fill");
}
