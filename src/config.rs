use anyhow::Context;
use serde::Deserialize;
use std::{env, fs};

/// Placeholder user id shipped in the default config. While the id equals
/// this sentinel the widget stays in demo mode and never touches the network.
pub const PLACEHOLDER_USER_ID: &str = "YOUR_DISCORD_USER_ID";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub profile: ProfileConfig,
    pub media: MediaConfig,
    pub ui: UiConfig,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = env::current_dir() {
            candidates.push(current_dir.join("config.toml"));
            candidates.push(current_dir.join("config").join("config.toml"));
            candidates.push(current_dir.join("config").join("profile.toml"));
        }

        if let Ok(exe) = env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("config.toml"));
                candidates.push(dir.join("config").join("config.toml"));
                candidates.push(dir.join("config").join("profile.toml"));
            }
        }

        for path in candidates {
            if path.exists() {
                let data = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                let doc: ConfigDocument = toml::from_str(&data)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))?;
                return Ok(doc.into());
            }
        }

        Ok(Config::default())
    }
}

#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub user_id: String,
    pub intro_title: String,
    pub intro_subtitle: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user_id: PLACEHOLDER_USER_ID.to_string(),
            intro_title: "KIDD".to_string(),
            intro_subtitle: "FROM HERMANO SYN".to_string(),
        }
    }
}

impl ProfileConfig {
    /// True when no real user id is configured; the poller skips the network
    /// and reconciles the demo snapshot instead.
    pub fn is_placeholder(&self) -> bool {
        self.user_id.is_empty() || self.user_id == PLACEHOLDER_USER_ID
    }
}

#[derive(Debug, Clone, Default)]
pub struct MediaConfig {
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub cover_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub track_title: String,
    pub track_artist: String,
}

impl MediaConfig {
    pub fn has_audio(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn has_video(&self) -> bool {
        self.video_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub volume: f32,
    pub particles_enabled: bool,
    pub always_on_top: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            volume: 0.3,
            particles_enabled: true,
            always_on_top: false,
        }
    }
}

impl UiConfig {
    pub fn volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    profile: ProfileSection,
    #[serde(default)]
    media: MediaSection,
    #[serde(default)]
    ui: UiSection,
}

impl From<ConfigDocument> for Config {
    fn from(value: ConfigDocument) -> Self {
        let profile_defaults = ProfileConfig::default();
        let profile = ProfileConfig {
            user_id: value.profile.user_id.unwrap_or(profile_defaults.user_id),
            intro_title: value
                .profile
                .intro_title
                .unwrap_or(profile_defaults.intro_title),
            intro_subtitle: value
                .profile
                .intro_subtitle
                .unwrap_or(profile_defaults.intro_subtitle),
        };

        let media = MediaConfig {
            audio_url: value.media.audio_url,
            video_url: value.media.video_url,
            cover_url: value.media.cover_url,
            gallery_urls: value.media.gallery_urls.unwrap_or_default(),
            track_title: value.media.track_title.unwrap_or_default(),
            track_artist: value.media.track_artist.unwrap_or_default(),
        };

        let ui_defaults = UiConfig::default();
        let ui = UiConfig {
            volume: value.ui.volume.unwrap_or(ui_defaults.volume),
            particles_enabled: value
                .ui
                .particles_enabled
                .unwrap_or(ui_defaults.particles_enabled),
            always_on_top: value.ui.always_on_top.unwrap_or(ui_defaults.always_on_top),
        };

        Config { profile, media, ui }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProfileSection {
    user_id: Option<String>,
    intro_title: Option<String>,
    intro_subtitle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MediaSection {
    audio_url: Option<String>,
    video_url: Option<String>,
    cover_url: Option<String>,
    gallery_urls: Option<Vec<String>>,
    track_title: Option<String>,
    track_artist: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UiSection {
    volume: Option<f32>,
    particles_enabled: Option<bool>,
    always_on_top: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_demo_mode() {
        let config = Config::default();
        assert!(config.profile.is_placeholder());
        assert!(!config.media.has_audio());
        assert!(!config.media.has_video());
        assert!((config.ui.volume() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn document_fold_keeps_defaults_for_missing_fields() {
        let doc: ConfigDocument = toml::from_str(
            r#"
            [profile]
            user_id = "720887495923073044"

            [media]
            audio_url = "https://example.com/track.mp3"
            track_title = "DANTAY"
            "#,
        )
        .unwrap();
        let config: Config = doc.into();

        assert_eq!(config.profile.user_id, "720887495923073044");
        assert!(!config.profile.is_placeholder());
        assert_eq!(config.profile.intro_title, "KIDD");
        assert!(config.media.has_audio());
        assert_eq!(config.media.track_title, "DANTAY");
        assert!(config.media.track_artist.is_empty());
        assert!(config.ui.particles_enabled);
    }

    #[test]
    fn volume_is_clamped() {
        let ui = UiConfig {
            volume: 4.0,
            ..UiConfig::default()
        };
        assert_eq!(ui.volume(), 1.0);
    }

    #[test]
    fn empty_user_id_counts_as_placeholder() {
        let profile = ProfileConfig {
            user_id: String::new(),
            ..ProfileConfig::default()
        };
        assert!(profile.is_placeholder());
    }
}
