//! End-to-end pipeline tests over in-memory collaborators.

mod common;

use common::{FakeFrames, FakeManifests, STREAM_ID, generator};
use stream_thumbs::{
    CancellationToken, FormatSpec, OutputMode, PreviewOptions, PreviewOutput, ThumbsError,
};

fn five_segments() -> FakeManifests {
    // 125 seconds.
    FakeManifests::for_stream(&[25.0; 5])
}

// ── Output shape ───────────────────────────────────────────────────

#[tokio::test]
async fn single_format_is_unwrapped() {
    let frames = FakeFrames::new(640, 360);
    let generator = generator(five_segments(), frames.clone());
    let options = PreviewOptions::new()
        .with_size(320, 180)
        .with_seconds_per_frame(50.0);

    let output = generator.generate(STREAM_ID, &options).await.unwrap();
    let PreviewOutput::Single(result) = output else {
        panic!("expected a single result");
    };

    assert_eq!(result.duration, 125.0);
    assert_eq!(result.stream_id, STREAM_ID);
    assert_eq!(result.plan.frame_count, 2);

    let names: Vec<_> = result.content.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["abc.vtt", "abc-00001.jpg"]);
    assert_eq!(result.content[0].page_index, None);
    assert_eq!(result.pages().count(), 1);

    let vtt = result.vtt().unwrap().data.as_text().unwrap();
    assert!(vtt.starts_with("WEBVTT\n\n1\n00:00:00.000 --> 00:00:50.000\n"));
}

#[tokio::test]
async fn default_formats_return_multiple() {
    let frames = FakeFrames::new(640, 360);
    let generator = generator(five_segments(), frames.clone());
    let options = PreviewOptions::new().with_seconds_per_frame(50.0);

    let output = generator.generate(STREAM_ID, &options).await.unwrap();
    assert!(output.single().is_none());
    assert_eq!(output.len(), 2);

    let results = output.into_vec();
    assert_eq!(results[0].vtt().unwrap().name, "abc@2x.vtt");
    assert_eq!(results[0].pages().next().unwrap().name, "abc@2x-00001.jpg");
    assert_eq!(results[1].vtt().unwrap().name, "abc.vtt");
    assert_eq!(results[1].pages().next().unwrap().name, "abc-00001.jpg");
}

#[tokio::test]
async fn frames_are_fetched_once_per_request() {
    let frames = FakeFrames::new(640, 360);
    let generator = generator(five_segments(), frames.clone());
    let options = PreviewOptions::new().with_seconds_per_frame(50.0);

    generator.generate(STREAM_ID, &options).await.unwrap();

    // Two formats, two frames each, shared.
    let mut urls = frames.urls();
    urls.sort();
    assert_eq!(
        urls,
        [
            "https://videodelivery.net/abc/thumbnails/thumbnail.jpg?time=25s&height=180",
            "https://videodelivery.net/abc/thumbnails/thumbnail.jpg?time=75s&height=180",
        ]
    );
}

#[tokio::test]
async fn decoded_pages_match_grid() {
    let frames = FakeFrames::new(640, 480);
    let generator = generator(five_segments(), frames);
    let options = PreviewOptions::new()
        .with_size(320, 180)
        .with_max_square(800)
        .with_seconds_per_frame(10.0);

    let output = generator.generate_preview(STREAM_ID, &options).await.unwrap();
    let result = output.single().unwrap();

    // 12 frames on a 2x4 grid.
    assert_eq!(result.plan.frame_count, 12);
    assert_eq!(result.plan.page_count, 2);
    for page in result.pages() {
        let decoded = image::load_from_memory(page.data.as_bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 720));
    }
}

// ── Modes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn vtt_mode_fetches_no_frames() {
    let frames = FakeFrames::new(640, 360);
    let generator = generator(five_segments(), frames.clone());
    let options = PreviewOptions::new()
        .with_size(320, 180)
        .with_seconds_per_frame(50.0);

    let output = generator.generate_vtt(STREAM_ID, &options).await.unwrap();
    let result = output.single().unwrap();

    assert_eq!(result.content.len(), 1);
    assert!(result.vtt().is_some());
    assert_eq!(frames.request_count(), 0);
}

#[tokio::test]
async fn preview_mode_has_no_vtt() {
    let frames = FakeFrames::new(640, 360);
    let generator = generator(five_segments(), frames.clone());
    let options = PreviewOptions::new()
        .with_size(320, 180)
        .with_seconds_per_frame(50.0);

    let output = generator.generate_preview(STREAM_ID, &options).await.unwrap();
    let result = output.single().unwrap();

    assert!(result.vtt().is_none());
    assert_eq!(result.pages().count(), 1);
    assert_eq!(frames.request_count(), 2);
}

#[tokio::test]
async fn render_with_known_duration_skips_manifests() {
    let manifests = FakeManifests::new();
    let generator = generator(manifests.clone(), FakeFrames::new(320, 180));
    let options = PreviewOptions::new().with_size(160, 90);

    let output = generator
        .render(STREAM_ID, 30.0, &options, OutputMode::Both)
        .await
        .unwrap();

    assert_eq!(manifests.request_count(), 0);
    // 30 s derives a 2 s interval.
    assert_eq!(output.single().unwrap().plan.frame_count, 15);
}

#[tokio::test]
async fn zero_duration_yields_header_only_vtt() {
    let frames = FakeFrames::new(640, 360);
    let generator = generator(FakeManifests::for_stream(&[]), frames.clone());
    let options = PreviewOptions::new().with_size(320, 180);

    let output = generator.generate(STREAM_ID, &options).await.unwrap();
    let result = output.single().unwrap();

    assert_eq!(result.plan.page_count, 0);
    assert_eq!(result.pages().count(), 0);
    assert_eq!(result.vtt().unwrap().data.as_text(), Some("WEBVTT"));
    assert_eq!(frames.request_count(), 0);
}

// ── Failures ───────────────────────────────────────────────────────

#[tokio::test]
async fn empty_stream_id_is_rejected() {
    let manifests = five_segments();
    let generator = generator(manifests.clone(), FakeFrames::new(640, 360));

    let error = generator
        .generate("  ", &PreviewOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(error, ThumbsError::Configuration(_)));
    assert_eq!(manifests.request_count(), 0);
}

#[tokio::test]
async fn manifest_status_propagates() {
    let frames = FakeFrames::new(640, 360);
    let generator = generator(FakeManifests::new(), frames.clone());

    let error = generator
        .generate(STREAM_ID, &PreviewOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(error, ThumbsError::ManifestFetch { status: 404, .. }));
    assert_eq!(frames.request_count(), 0);
}

#[tokio::test]
async fn frame_failure_fails_request() {
    let frames = FakeFrames::new(640, 360).failing_on("time=75s");
    let generator = generator(five_segments(), frames);
    let options = PreviewOptions::new()
        .with_size(320, 180)
        .with_seconds_per_frame(50.0);

    let error = generator.generate(STREAM_ID, &options).await.unwrap_err();
    match error {
        ThumbsError::FrameFetch { time, reason } => {
            assert_eq!(time, 75.0);
            assert!(reason.contains("thumbnail service said no"));
        }
        other => panic!("Expected FrameFetch, got: {other}"),
    }
}

#[tokio::test]
async fn oversized_format_is_rejected_before_fetching_frames() {
    let frames = FakeFrames::new(640, 360);
    let generator = generator(five_segments(), frames.clone());
    let options = PreviewOptions::new()
        .with_max_square(200)
        .with_format(FormatSpec::new(320, 180));

    let error = generator.generate(STREAM_ID, &options).await.unwrap_err();
    assert!(matches!(error, ThumbsError::Configuration(_)));
    assert_eq!(frames.request_count(), 0);
}

#[tokio::test]
async fn cancelled_request_stops() {
    let token = CancellationToken::new();
    token.cancel();
    let frames = FakeFrames::new(640, 360);
    let generator = generator(five_segments(), frames.clone());
    let options = PreviewOptions::new()
        .with_size(320, 180)
        .with_seconds_per_frame(50.0)
        .with_cancellation(token);

    let error = generator.generate(STREAM_ID, &options).await.unwrap_err();
    assert!(matches!(error, ThumbsError::Cancelled));
    assert_eq!(frames.request_count(), 0);
}
