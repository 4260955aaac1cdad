use discord_profile_gui::player::{format_timestamp, PlayerCommand, PlayerEvent, PlayerModel};

/// Walks the transport through a realistic session: load, play, scrub,
/// adjust volume, run to the end. State only ever moves on worker events.
#[test]
fn full_transport_session() {
    let mut model = PlayerModel::new(0.3);

    // Metadata arrives before anything is audible.
    model.apply_event(&PlayerEvent::LoadedMetadata { duration: 200.0 });
    assert_eq!(model.duration, 200.0);
    assert!(!model.is_playing);

    // User presses play; the worker confirms.
    assert_eq!(model.toggle_command(), PlayerCommand::Play);
    model.apply_event(&PlayerEvent::Playing);
    assert!(model.is_playing);

    // Position reports drive the progress display.
    model.apply_event(&PlayerEvent::TimeUpdate { position: 50.0 });
    assert!((model.progress_fraction() - 0.25).abs() < 1e-6);
    assert_eq!(format_timestamp(model.current_time), "0:50");

    // Scrub to the middle.
    assert_eq!(model.seek_command(0.5), Some(PlayerCommand::Seek(100.0)));
    model.apply_event(&PlayerEvent::TimeUpdate { position: 100.0 });
    assert_eq!(format_timestamp(model.current_time), "1:40");

    // Volume changes apply immediately and stay clamped.
    let command = model.set_volume(0.8);
    assert_eq!(command, PlayerCommand::SetVolume(0.8));

    // Minimizing does not interrupt playback.
    model.toggle_minimize();
    assert!(model.is_minimized && model.is_playing);

    // The track runs out.
    model.apply_event(&PlayerEvent::Ended);
    assert!(!model.is_playing);
    assert_eq!(model.current_time, 0.0);
    assert_eq!(model.progress_fraction(), 0.0);
}

/// An autoplay rejection leaves the transport in a state where manual
/// control still works.
#[test]
fn rejected_autoplay_keeps_manual_control_working() {
    let mut model = PlayerModel::new(0.3);
    model.apply_event(&PlayerEvent::LoadedMetadata { duration: 180.0 });

    model.apply_event(&PlayerEvent::PlayFailed {
        reason: "audio stream refused".to_string(),
    });
    assert!(!model.is_playing);

    // The next manual toggle still requests playback, and a confirmation
    // moves the state this time.
    assert_eq!(model.toggle_command(), PlayerCommand::Play);
    model.apply_event(&PlayerEvent::Playing);
    assert!(model.is_playing);
}

/// Background music and the on-screen transport share one model: an event
/// produced by either path is observable through both.
#[test]
fn shared_media_element_semantics() {
    let mut model = PlayerModel::new(0.3);

    // Autoplay path starts playback...
    model.apply_event(&PlayerEvent::Playing);
    // ...so the transport toggle now offers pause.
    assert_eq!(model.toggle_command(), PlayerCommand::Pause);
    model.apply_event(&PlayerEvent::Paused);
    assert_eq!(model.toggle_command(), PlayerCommand::Play);
}

#[test]
fn seeking_before_metadata_is_ignored() {
    let model = PlayerModel::new(0.3);
    assert_eq!(model.seek_command(0.9), None);
    assert_eq!(model.progress_fraction(), 0.0);
}
