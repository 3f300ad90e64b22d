use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Player binaries and theme sounds to try, in order.
const SOUND_CANDIDATES: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
    ("aplay", "/usr/share/sounds/generic.wav"),
];

/// Plays the interval-boundary alert sound. The player/sound pair is probed
/// on first use only and cached for the rest of the session, including the
/// no-player-found outcome.
#[derive(Debug, Default)]
pub struct AlertPlayer {
    resolved: Option<Option<(String, PathBuf)>>,
}

impl AlertPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn probe() -> Option<(String, PathBuf)> {
        SOUND_CANDIDATES
            .iter()
            .find(|(_, sound_file)| Path::new(sound_file).exists())
            .map(|(cmd, sound_file)| (cmd.to_string(), PathBuf::from(sound_file)))
    }

    pub fn play(&mut self) {
        let resolved = self.resolved.get_or_insert_with(Self::probe);

        if let Some((cmd, sound_file)) = resolved {
            let _ = Command::new(cmd.as_str())
                .arg(sound_file.as_path())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
        }
    }
}
