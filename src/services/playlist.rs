use crate::error::Result;
use crate::models::track::TrackRecord;
use crate::spotify::{PlaylistSource, TrackObject};

/// The fixed page size for playlist item requests.
pub const PAGE_SIZE: u32 = 100;

/// Extracts the playlist id from a shareable link.
///
/// Takes the path segment after the last `/` and strips a trailing query
/// string. A bare id passes through unchanged; a malformed link yields
/// something the remote call will reject.
///
/// # Example
///
/// ```
/// use tracklist::services::playlist::extract_playlist_id;
///
/// let id = extract_playlist_id("https://open.spotify.com/playlist/ABC123?si=xyz");
/// assert_eq!(id, "ABC123");
/// ```
pub fn extract_playlist_id(link: &str) -> &str {
    let last = link.rsplit('/').next().unwrap_or(link);
    last.split('?').next().unwrap_or(last)
}

fn flatten(track: TrackObject) -> TrackRecord {
    let artist = track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    // Spotify orders album images large to small; the frontend renders the
    // medium (second) one. Albums with fewer images get no cover.
    let image = track
        .album
        .images
        .get(1)
        .map(|i| i.url.clone())
        .unwrap_or_default();

    TrackRecord {
        name: track.name,
        artist,
        album: track.album.name,
        image,
    }
}

/// Fetches every page of a playlist and flattens it into track records.
///
/// Pages are requested sequentially at offsets 0, 100, 200, ... until a page
/// comes back with fewer than [`PAGE_SIZE`] items. Provider order is
/// preserved; entries with a null track are skipped. Any page failure aborts
/// the whole fetch and nothing partial is returned.
pub async fn fetch_flattened<S: PlaylistSource>(
    source: &S,
    token: &str,
    playlist_id: &str,
) -> Result<Vec<TrackRecord>> {
    let mut records = Vec::new();
    let mut offset = 0;

    loop {
        let items = source
            .playlist_items(token, playlist_id, offset, PAGE_SIZE)
            .await?;
        let page_len = items.len();

        for item in items {
            if let Some(track) = item.track {
                records.push(flatten(track));
            }
        }

        if (page_len as u32) < PAGE_SIZE {
            break;
        }

        offset += PAGE_SIZE;
    }

    Ok(records)
}
