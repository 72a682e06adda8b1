use std::fmt::Write;
use tunepeek_engine::{ControllerSnapshot, Presentation};

pub fn render(snap: &ControllerSnapshot) -> String {
    let mut out = String::new();
    match snap.presentation() {
        Presentation::Welcome => {
            out.push_str("Type an artist or song name to search.\n");
        }
        Presentation::Loading => {
            let _ = writeln!(out, "Searching for {:?}...", snap.query.trim());
        }
        Presentation::NoSongsFound => {
            out.push_str("No songs found. Please try a different search.\n");
        }
        Presentation::Results => {
            let current = snap.current_index();
            for (idx, track) in snap.tracks.iter().enumerate() {
                let marker = match (current == Some(idx), snap.playback.is_playing) {
                    (true, true) => '>',
                    (true, false) => '=',
                    _ => ' ',
                };
                let _ = writeln!(out, "{marker} {:>3}. {}", idx + 1, track.display_line());
            }
        }
    }

    if let Some(track) = &snap.playback.current_track {
        let label = if snap.playback.is_playing {
            "Now playing"
        } else {
            "Paused"
        };
        let _ = writeln!(
            out,
            "{label}: {} - {}",
            track.artist_name, track.track_name
        );
    }
    out
}
