use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::{
    io::Cursor,
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};
use tracing::{debug, warn};

/// Cadence of position reports while the sink is playing.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

const ASSET_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Play,
    Pause,
    /// Absolute target position in seconds.
    Seek(f64),
    SetVolume(f32),
    Shutdown,
}

/// Confirmations emitted by the audio worker. The model never changes
/// playback state without one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    LoadedMetadata { duration: f64 },
    Playing,
    Paused,
    Ended,
    TimeUpdate { position: f64 },
    PlayFailed { reason: String },
}

#[derive(Debug, Clone)]
pub struct PlayerModel {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f32,
    pub is_minimized: bool,
}

impl PlayerModel {
    pub fn new(volume: f32) -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: volume.clamp(0.0, 1.0),
            is_minimized: false,
        }
    }

    /// The command a transport toggle should send given the current state.
    /// State itself only changes once the worker confirms with an event.
    pub fn toggle_command(&self) -> PlayerCommand {
        if self.is_playing {
            PlayerCommand::Pause
        } else {
            PlayerCommand::Play
        }
    }

    /// Translate a progress-bar fraction into an absolute seek. Ignored while
    /// the duration is still unknown.
    pub fn seek_command(&self, fraction: f64) -> Option<PlayerCommand> {
        if self.duration <= 0.0 {
            return None;
        }
        let target = fraction.clamp(0.0, 1.0) * self.duration;
        Some(PlayerCommand::Seek(target))
    }

    /// Volume applies immediately on the model; the returned command keeps
    /// the sink in sync.
    pub fn set_volume(&mut self, fraction: f32) -> PlayerCommand {
        self.volume = fraction.clamp(0.0, 1.0);
        PlayerCommand::SetVolume(self.volume)
    }

    pub fn toggle_minimize(&mut self) {
        self.is_minimized = !self.is_minimized;
    }

    pub fn apply_event(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::LoadedMetadata { duration } => {
                self.duration = duration.max(0.0);
            }
            PlayerEvent::Playing => {
                self.is_playing = true;
            }
            PlayerEvent::Paused => {
                self.is_playing = false;
            }
            PlayerEvent::Ended => {
                self.is_playing = false;
                self.current_time = 0.0;
            }
            PlayerEvent::TimeUpdate { position } => {
                self.current_time = position.max(0.0);
            }
            PlayerEvent::PlayFailed { .. } => {
                self.is_playing = false;
            }
        }
    }

    pub fn progress_fraction(&self) -> f32 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }
}

pub fn format_timestamp(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

// ---------------------------------------------------------------------------
// Audio worker
// ---------------------------------------------------------------------------

/// Spawn the audio worker for the configured track URL. Commands in, state
/// confirmations out; the rodio stream lives and dies on the worker thread.
pub fn spawn_audio_worker(
    url: String,
    initial_volume: f32,
) -> (mpsc::Sender<PlayerCommand>, mpsc::Receiver<PlayerEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<PlayerCommand>();
    let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>();

    thread::spawn(move || {
        let bytes = match fetch_audio_bytes(&url) {
            Ok(bytes) => bytes,
            Err(reason) => {
                warn!(%url, %reason, "audio asset unavailable, transport stays inert");
                run_inert(cmd_rx, event_tx, reason);
                return;
            }
        };

        if let Some(duration) = probe_duration(&bytes) {
            let _ = event_tx.send(PlayerEvent::LoadedMetadata {
                duration: duration.as_secs_f64(),
            });
        }

        let mut worker = AudioWorker {
            bytes,
            stream: None,
            sink: None,
            seek_base: Duration::ZERO,
            volume: initial_volume.clamp(0.0, 1.0),
            playing: false,
            event_tx,
        };

        loop {
            match cmd_rx.recv_timeout(TICK_INTERVAL) {
                Ok(PlayerCommand::Play) => worker.handle_play(),
                Ok(PlayerCommand::Pause) => worker.handle_pause(),
                Ok(PlayerCommand::Seek(target)) => worker.handle_seek(target),
                Ok(PlayerCommand::SetVolume(volume)) => worker.handle_volume(volume),
                Ok(PlayerCommand::Shutdown) => break,
                Err(RecvTimeoutError::Timeout) => worker.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    });

    (cmd_tx, event_rx)
}

/// Keeps the channel protocol alive when the asset never loaded: every play
/// request is answered with a rejection so the model stays paused.
fn run_inert(
    cmd_rx: mpsc::Receiver<PlayerCommand>,
    event_tx: mpsc::Sender<PlayerEvent>,
    reason: String,
) {
    while let Ok(command) = cmd_rx.recv() {
        match command {
            PlayerCommand::Play => {
                let _ = event_tx.send(PlayerEvent::PlayFailed {
                    reason: reason.clone(),
                });
            }
            PlayerCommand::Shutdown => break,
            _ => {}
        }
    }
}

struct AudioWorker {
    bytes: Vec<u8>,
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    seek_base: Duration,
    volume: f32,
    playing: bool,
    event_tx: mpsc::Sender<PlayerEvent>,
}

impl AudioWorker {
    fn handle_play(&mut self) {
        if self.stream.is_none() {
            match open_output_stream() {
                Ok(stream) => self.stream = Some(stream),
                Err(reason) => {
                    warn!(%reason, "play request rejected");
                    let _ = self.event_tx.send(PlayerEvent::PlayFailed { reason });
                    return;
                }
            }
        }

        if self.sink.is_none() {
            match self.build_sink(self.seek_base) {
                Ok(sink) => self.sink = Some(sink),
                Err(reason) => {
                    warn!(%reason, "play request rejected");
                    let _ = self.event_tx.send(PlayerEvent::PlayFailed { reason });
                    return;
                }
            }
        }

        if let Some(sink) = &self.sink {
            sink.play();
            self.playing = true;
            let _ = self.event_tx.send(PlayerEvent::Playing);
            self.send_position();
        }
    }

    fn handle_pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        self.playing = false;
        let _ = self.event_tx.send(PlayerEvent::Paused);
    }

    fn handle_seek(&mut self, target_secs: f64) {
        let target = Duration::from_secs_f64(target_secs.max(0.0));

        // rodio sinks report positions relative to the appended source, so a
        // seek rebuilds the sink around a freshly seeked decoder.
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        match self.build_sink(target) {
            Ok(sink) => {
                if !self.playing {
                    sink.pause();
                }
                self.sink = Some(sink);
                self.seek_base = target;
                self.send_position();
            }
            Err(reason) => {
                warn!(%reason, "seek failed");
                self.playing = false;
                let _ = self.event_tx.send(PlayerEvent::Paused);
            }
        }
    }

    fn handle_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let Some(sink) = &self.sink else {
            return;
        };

        if sink.empty() {
            self.playing = false;
            self.sink = None;
            self.seek_base = Duration::ZERO;
            let _ = self.event_tx.send(PlayerEvent::Ended);
            return;
        }

        self.send_position();
    }

    fn send_position(&self) {
        let position = match &self.sink {
            Some(sink) => self.seek_base + sink.get_pos(),
            None => self.seek_base,
        };
        let _ = self.event_tx.send(PlayerEvent::TimeUpdate {
            position: position.as_secs_f64(),
        });
    }

    fn build_sink(&self, start_at: Duration) -> Result<Sink, String> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| "output stream not open".to_string())?;

        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(self.volume);

        let mut source = Decoder::new(Cursor::new(self.bytes.clone()))
            .map_err(|e| format!("audio decode failed: {e}"))?;
        if start_at > Duration::ZERO {
            if let Err(e) = source.try_seek(start_at) {
                debug!("decoder seek unsupported: {e}");
            }
        }
        sink.append(source);
        Ok(sink)
    }
}

fn open_output_stream() -> Result<OutputStream, String> {
    OutputStreamBuilder::from_default_device()
        .map_err(|e| format!("no audio device: {e}"))?
        .open_stream_or_fallback()
        .map_err(|e| format!("audio stream refused: {e}"))
}

fn probe_duration(bytes: &[u8]) -> Option<Duration> {
    let decoder = Decoder::new(Cursor::new(bytes.to_vec())).ok()?;
    decoder.total_duration()
}

fn fetch_audio_bytes(url: &str) -> Result<Vec<u8>, String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("discord_profile_gui/", env!("CARGO_PKG_VERSION")))
        .timeout(ASSET_FETCH_TIMEOUT)
        .build()
        .map_err(|e| format!("http client init failed: {e}"))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| format!("audio request failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("audio request returned {}", response.status()));
    }

    response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(|e| format!("audio body unreadable: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_from_paused_requests_play_and_waits_for_confirmation() {
        let mut model = PlayerModel::new(0.3);
        assert_eq!(model.toggle_command(), PlayerCommand::Play);
        // Nothing moved yet: the request is asynchronous.
        assert!(!model.is_playing);

        model.apply_event(&PlayerEvent::Playing);
        assert!(model.is_playing);
        assert_eq!(model.toggle_command(), PlayerCommand::Pause);
    }

    #[test]
    fn rejected_play_leaves_model_paused() {
        let mut model = PlayerModel::new(0.3);
        assert_eq!(model.toggle_command(), PlayerCommand::Play);
        model.apply_event(&PlayerEvent::PlayFailed {
            reason: "no audio device".to_string(),
        });
        assert!(!model.is_playing);
        assert_eq!(model.toggle_command(), PlayerCommand::Play);
    }

    #[test]
    fn pause_event_flips_state_back() {
        let mut model = PlayerModel::new(0.3);
        model.apply_event(&PlayerEvent::Playing);
        model.apply_event(&PlayerEvent::Paused);
        assert!(!model.is_playing);
    }

    #[test]
    fn ended_resets_the_now_playing_affordance() {
        let mut model = PlayerModel::new(0.3);
        model.apply_event(&PlayerEvent::LoadedMetadata { duration: 200.0 });
        model.apply_event(&PlayerEvent::Playing);
        model.apply_event(&PlayerEvent::TimeUpdate { position: 199.8 });
        model.apply_event(&PlayerEvent::Ended);

        assert!(!model.is_playing);
        assert_eq!(model.current_time, 0.0);
        assert_eq!(model.progress_fraction(), 0.0);
    }

    #[test]
    fn seek_maps_fraction_onto_known_duration() {
        let mut model = PlayerModel::new(0.3);
        model.apply_event(&PlayerEvent::LoadedMetadata { duration: 200.0 });
        assert_eq!(model.seek_command(0.5), Some(PlayerCommand::Seek(100.0)));
    }

    #[test]
    fn seek_is_a_no_op_while_duration_unknown() {
        let model = PlayerModel::new(0.3);
        assert_eq!(model.duration, 0.0);
        assert_eq!(model.seek_command(0.5), None);
    }

    #[test]
    fn seek_fraction_is_clamped() {
        let mut model = PlayerModel::new(0.3);
        model.apply_event(&PlayerEvent::LoadedMetadata { duration: 100.0 });
        assert_eq!(model.seek_command(1.7), Some(PlayerCommand::Seek(100.0)));
        assert_eq!(model.seek_command(-0.2), Some(PlayerCommand::Seek(0.0)));
    }

    #[test]
    fn progress_never_divides_by_zero() {
        let mut model = PlayerModel::new(0.3);
        model.apply_event(&PlayerEvent::TimeUpdate { position: 42.0 });
        assert_eq!(model.progress_fraction(), 0.0);

        model.apply_event(&PlayerEvent::LoadedMetadata { duration: 84.0 });
        assert!((model.progress_fraction() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn volume_applies_immediately_and_clamps() {
        let mut model = PlayerModel::new(0.3);
        let command = model.set_volume(1.4);
        assert_eq!(model.volume, 1.0);
        assert_eq!(command, PlayerCommand::SetVolume(1.0));

        model.set_volume(-0.5);
        assert_eq!(model.volume, 0.0);
    }

    #[test]
    fn minimize_is_orthogonal_to_playback() {
        let mut model = PlayerModel::new(0.3);
        model.apply_event(&PlayerEvent::Playing);
        model.toggle_minimize();
        assert!(model.is_minimized);
        assert!(model.is_playing);
        model.toggle_minimize();
        assert!(!model.is_minimized);
    }

    #[test]
    fn timestamps_format_as_minutes_and_padded_seconds() {
        assert_eq!(format_timestamp(0.0), "0:00");
        assert_eq!(format_timestamp(9.9), "0:09");
        assert_eq!(format_timestamp(75.0), "1:15");
        assert_eq!(format_timestamp(600.0), "10:00");
        assert_eq!(format_timestamp(f64::NAN), "0:00");
    }
}
