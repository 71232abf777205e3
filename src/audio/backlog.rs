//! Planning over the commands that piled up while the audio thread was busy.
//!
//! A download can block the thread for a while. Whatever the facade sent in
//! the meantime is collected and collapsed here before anything runs, so a
//! burst of track changes fetches only the last track and a pause beats a
//! play it overtook.

use super::types::{AudioCmd, PlayRequest};

/// One thing the audio thread should do after planning.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Step {
    Run(AudioCmd),
    /// Answer the request with `PlayFailed(Aborted)` without playing.
    Abort(PlayRequest),
}

/// Collapse a backlog into the steps that still matter, in order.
///
/// - `Quit` anywhere wins; nothing else runs.
/// - The last `Load` makes earlier commands moot. Their play requests are
///   aborted and only the latest volume survives.
/// - After that `Load`, a `Play` followed by a `Pause` is aborted. The pause
///   still runs.
pub(super) fn coalesce(mut backlog: Vec<AudioCmd>) -> Vec<Step> {
    if backlog.iter().any(|c| matches!(c, AudioCmd::Quit)) {
        return vec![Step::Run(AudioCmd::Quit)];
    }

    let mut steps = Vec::with_capacity(backlog.len());

    if let Some(at) = backlog.iter().rposition(|c| matches!(c, AudioCmd::Load { .. })) {
        let current = backlog.split_off(at);
        let mut volume = None;
        for cmd in backlog {
            match cmd {
                AudioCmd::Play(request) => steps.push(Step::Abort(request)),
                AudioCmd::SetVolume(level) => volume = Some(level),
                _ => {}
            }
        }
        if let Some(level) = volume {
            steps.push(Step::Run(AudioCmd::SetVolume(level)));
        }
        backlog = current;
    }

    let last_pause = backlog.iter().rposition(|c| matches!(c, AudioCmd::Pause));
    for (at, cmd) in backlog.into_iter().enumerate() {
        match cmd {
            AudioCmd::Play(request) if last_pause.is_some_and(|p| p > at) => {
                steps.push(Step::Abort(request))
            }
            cmd => steps.push(Step::Run(cmd)),
        }
    }
    steps
}
