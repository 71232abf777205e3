use std::sync::mpsc;
use std::thread;

use crate::config::ServerSettings;
use crate::library::{FetchError, HttpLibrary, SongService, Track};

pub type ListingResult = Result<Vec<Track>, FetchError>;

/// Fetch the song listing on a background thread.
///
/// The result arrives once on the returned channel. If the thread cannot be
/// spawned the failure is logged and the channel simply never yields.
pub fn spawn_listing_fetch(server: ServerSettings) -> mpsc::Receiver<ListingResult> {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("cadenza-listing".into())
        .spawn(move || {
            let result = HttpLibrary::new(&server).and_then(|library| library.list_songs());
            let _ = tx.send(result);
        });
    if let Err(e) = spawned {
        tracing::error!(error = %e, "could not start listing fetch");
    }

    rx
}
