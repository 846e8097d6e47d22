//! Stream duration resolution.
//!
//! A stream's duration is not published directly; it is the sum of the
//! segment durations of its first variant playlist. Resolving it takes two
//! sequential manifest requests: master playlist, then variant playlist.

use crate::delivery::DeliveryEndpoint;
use crate::error::ThumbsError;
use crate::manifest::{MasterPlaylist, MediaPlaylist};
use crate::remote::ManifestFetcher;

/// Resolve the total duration of `stream_id`, in seconds.
///
/// Failures are returned to the caller as-is. There is no retry.
///
/// # Errors
///
/// - [`ThumbsError::Configuration`] if `stream_id` is empty.
/// - [`ThumbsError::ManifestFetch`] if either manifest request returns a
///   non-200 status.
/// - [`ThumbsError::ManifestParse`] if the master playlist lists no variant
///   or either playlist is malformed.
///
/// # Example
///
/// ```no_run
/// use stream_thumbs::{DeliveryEndpoint, RemoteClient, ThumbsError, resolve_duration};
///
/// # async fn example() -> Result<(), ThumbsError> {
/// let client = RemoteClient::new();
/// let seconds = resolve_duration(&client, &DeliveryEndpoint::default(), "abc123").await?;
/// println!("{seconds:.1}s");
/// # Ok(())
/// # }
/// ```
pub async fn resolve_duration<F>(
    fetcher: &F,
    endpoint: &DeliveryEndpoint,
    stream_id: &str,
) -> Result<f64, ThumbsError>
where
    F: ManifestFetcher + ?Sized,
{
    if stream_id.trim().is_empty() {
        return Err(ThumbsError::Configuration("stream id required".into()));
    }
    log::debug!("Resolving duration of stream {stream_id}");

    let master_text = fetcher
        .fetch_text(&endpoint.master_manifest_url(stream_id))
        .await?;
    let master = MasterPlaylist::parse(&master_text)?;
    let variant = master.first_variant()?;

    let media_text = fetcher
        .fetch_text(&endpoint.manifest_url(stream_id, &variant.uri))
        .await?;
    let media = MediaPlaylist::parse(&media_text)?;

    let duration = media.total_duration();
    log::debug!(
        "Stream {stream_id}: {} segments, {duration:.3}s",
        media.segments.len()
    );
    Ok(duration)
}
