use serde::{Deserialize, Deserializer};

/// A playable song as listed by the server.
///
/// Tracks have no stable id: they are addressed by their position in the
/// listing, and `title` doubles as the key of the streaming resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artist: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub album: String,
    /// Length in seconds, when the server knows it.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Track {
    #[cfg(test)]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: String::new(),
            album: String::new(),
            duration: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
