use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    DeviceUnavailable(String),
    #[error("ringtone not found: {0}")]
    FileNotFound(String),
    #[error("cannot decode ringtone: {0}")]
    Decode(String),
    #[error("audio stream error: {0}")]
    Stream(String),
}

/// Plays ringtone files. The output stream is opened lazily on the
/// first play so headless machines still run the rest of the app.
const VOLUME_STEP: f32 = 0.1;
const VOLUME_MAX: f32 = 2.0;

pub struct RingtonePlayer {
    // Dropping the stream kills playback, so it lives here unused
    stream: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
    volume: f32,
}

impl RingtonePlayer {
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            volume: 1.0,
        }
    }

    fn handle(&mut self) -> Result<&OutputStreamHandle, AudioError> {
        if self.stream.is_none() {
            let pair = OutputStream::try_default()
                .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;
            self.stream = Some(pair);
        }
        match &self.stream {
            Some((_, handle)) => Ok(handle),
            None => Err(AudioError::DeviceUnavailable("stream init failed".into())),
        }
    }

    fn open(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
        let file = File::open(path)
            .map_err(|e| AudioError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode(e.to_string()))
    }

    /// Loop a ringtone until `stop` is called. Used for ringing alarms
    /// and the timer chime.
    pub fn play_looping(&mut self, path: &Path) -> Result<(), AudioError> {
        let decoder = Self::open(path)?;
        let volume = self.volume;
        let handle = self.handle()?;
        let sink = Sink::try_new(handle).map_err(|e| AudioError::Stream(e.to_string()))?;
        sink.set_volume(volume);
        sink.append(decoder.repeat_infinite());
        // Replacing the old sink drops it and silences its playback
        self.sink = Some(sink);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    /// Nudge the volume up or down one step, applied to the live sink
    pub fn adjust_volume(&mut self, up: bool) {
        let delta = if up { VOLUME_STEP } else { -VOLUME_STEP };
        self.volume = (self.volume + delta).clamp(0.0, VOLUME_MAX);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl Default for RingtonePlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_steps_and_clamps() {
        let mut player = RingtonePlayer::new();
        assert_eq!(player.volume(), 1.0);

        for _ in 0..30 {
            player.adjust_volume(true);
        }
        assert_eq!(player.volume(), VOLUME_MAX);

        for _ in 0..30 {
            player.adjust_volume(false);
        }
        assert_eq!(player.volume(), 0.0);
    }
}
