use serde::Serialize;

/// The flattened track shape returned to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    /// The track name.
    pub name: String,
    /// All artist names, joined with `", "`.
    pub artist: String,
    /// The album name.
    pub album: String,
    /// Cover image URL, empty when the album has no usable image.
    pub image: String,
}
