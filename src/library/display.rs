use crate::config::{TrackDisplayField, UiSettings};

use super::model::Track;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// Blank fields are skipped. Returns an empty string when nothing was produced.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for f in fields {
        let value = match f {
            TrackDisplayField::Title => track.title.trim(),
            TrackDisplayField::Artist => track.artist.trim(),
            TrackDisplayField::Album => track.album.trim(),
        };
        if !value.is_empty() {
            parts.push(value);
        }
    }

    parts.join(sep)
}

/// How a track is turned into the two lines shown for it: a headline
/// (list row / now-playing title) and a detail line underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFormat {
    pub headline: Vec<TrackDisplayField>,
    pub detail: Vec<TrackDisplayField>,
    pub separator: String,
}

impl Default for RowFormat {
    fn default() -> Self {
        Self {
            headline: vec![TrackDisplayField::Title],
            detail: vec![TrackDisplayField::Artist, TrackDisplayField::Album],
            separator: " - ".to_string(),
        }
    }
}

impl RowFormat {
    pub fn from_settings(ui: &UiSettings) -> Self {
        Self {
            headline: ui.headline_fields.clone(),
            detail: ui.detail_fields.clone(),
            separator: ui.field_separator.clone(),
        }
    }

    /// Headline text; falls back to the raw title so a row is never blank.
    pub fn headline(&self, track: &Track) -> String {
        let text = display_from_fields(track, &self.headline, &self.separator);
        if text.is_empty() {
            track.title.clone()
        } else {
            text
        }
    }

    pub fn detail(&self, track: &Track) -> String {
        display_from_fields(track, &self.detail, &self.separator)
    }
}
