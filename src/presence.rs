use serde::Deserialize;
use std::time::Duration;

pub const PRESENCE_API_BASE: &str = "https://api.lanyard.rest/v1/users";
pub const AVATAR_CDN_BASE: &str = "https://cdn.discordapp.com/avatars";
pub const DEFAULT_AVATAR_CDN_BASE: &str = "https://cdn.discordapp.com/embed/avatars";
pub const PROFILE_LINK_BASE: &str = "https://discord.com/users";

/// Activity type tag Discord uses for a custom status entry.
pub const CUSTOM_STATUS_KIND: u8 = 4;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceStatus {
    Online,
    Idle,
    Dnd,
    #[default]
    Offline,
}

impl PresenceStatus {
    fn parse(raw: &str) -> Self {
        match raw {
            "online" => PresenceStatus::Online,
            "idle" => PresenceStatus::Idle,
            "dnd" => PresenceStatus::Dnd,
            _ => PresenceStatus::Offline,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "online",
            PresenceStatus::Idle => "idle",
            PresenceStatus::Dnd => "dnd",
            PresenceStatus::Offline => "offline",
        }
    }

    pub fn label(&self) -> String {
        capitalize_first(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresenceUser {
    pub username: String,
    pub discriminator: String,
    pub avatar_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub kind: u8,
    pub name: String,
    pub details: Option<String>,
    pub state: Option<String>,
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresenceSnapshot {
    pub user: PresenceUser,
    pub status: PresenceStatus,
    pub activities: Vec<Activity>,
}

impl PresenceSnapshot {
    /// Snapshot rendered while no real user id is configured.
    pub fn demo() -> Self {
        Self {
            user: PresenceUser {
                username: "KIDD".to_string(),
                discriminator: "0001".to_string(),
                avatar_hash: None,
            },
            status: PresenceStatus::Online,
            activities: Vec::new(),
        }
    }

    /// Snapshot substituted when a fetch fails for any reason.
    pub fn fallback() -> Self {
        Self {
            user: PresenceUser {
                username: "KIDD".to_string(),
                discriminator: "0000".to_string(),
                avatar_hash: None,
            },
            status: PresenceStatus::Offline,
            activities: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shape (Lanyard envelope, snake_cased)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    success: bool,
    data: Option<PresencePayload>,
}

#[derive(Debug, Deserialize)]
struct PresencePayload {
    discord_user: WireUser,
    discord_status: String,
    #[serde(default)]
    activities: Vec<WireActivity>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    username: String,
    #[serde(default)]
    discriminator: String,
    avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireActivity {
    #[serde(rename = "type")]
    kind: u8,
    name: String,
    details: Option<String>,
    state: Option<String>,
    emoji: Option<WireEmoji>,
}

#[derive(Debug, Deserialize)]
struct WireEmoji {
    name: String,
}

impl From<PresencePayload> for PresenceSnapshot {
    fn from(payload: PresencePayload) -> Self {
        let activities = payload
            .activities
            .into_iter()
            .map(|activity| Activity {
                kind: activity.kind,
                name: activity.name,
                details: activity.details,
                state: activity.state,
                emoji: activity.emoji.map(|emoji| emoji.name),
            })
            .collect();

        Self {
            user: PresenceUser {
                username: payload.discord_user.username,
                discriminator: payload.discord_user.discriminator,
                avatar_hash: payload.discord_user.avatar,
            },
            status: PresenceStatus::parse(&payload.discord_status),
            activities,
        }
    }
}

/// One blocking GET against the presence API. Runs on the poller worker
/// thread; every failure collapses to a `String` for the channel.
pub fn fetch_presence_snapshot(
    client: &reqwest::blocking::Client,
    user_id: &str,
) -> Result<PresenceSnapshot, String> {
    let url = format!("{PRESENCE_API_BASE}/{user_id}");
    let response = client
        .get(&url)
        .timeout(FETCH_TIMEOUT)
        .send()
        .map_err(|e| format!("presence request failed: {e}"))?;

    let envelope: ApiEnvelope = response
        .json()
        .map_err(|e| format!("presence payload malformed: {e}"))?;

    if !envelope.success {
        return Err("presence API reported failure".to_string());
    }

    let payload = envelope
        .data
        .ok_or_else(|| "presence payload missing data".to_string())?;

    Ok(payload.into())
}

pub fn build_presence_client() -> Result<reqwest::blocking::Client, String> {
    reqwest::blocking::Client::builder()
        .user_agent(concat!("discord_profile_gui/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| format!("http client init failed: {e}"))
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CustomStatus {
    pub emoji: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCard {
    pub name: String,
    pub details: Option<String>,
    pub state: Option<String>,
}

/// The full set of UI field assignments one snapshot reconciles into.
/// Replaced wholesale on every applied poll result.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub avatar_url: String,
    pub username: String,
    pub discriminator_tag: String,
    pub status: PresenceStatus,
    pub status_label: String,
    pub custom_status: Option<CustomStatus>,
    pub activities: Vec<ActivityCard>,
    pub profile_url: String,
}

/// Deterministic pure mapping from a presence snapshot to the view fields.
pub fn reconcile(user_id: &str, snapshot: &PresenceSnapshot) -> ProfileView {
    let custom_status = snapshot
        .activities
        .iter()
        .find(|activity| activity.kind == CUSTOM_STATUS_KIND)
        .map(|activity| CustomStatus {
            emoji: activity.emoji.clone().unwrap_or_default(),
            message: activity.state.clone().unwrap_or_default(),
        });

    let activities = snapshot
        .activities
        .iter()
        .filter(|activity| activity.kind != CUSTOM_STATUS_KIND)
        .map(|activity| ActivityCard {
            name: activity.name.clone(),
            details: activity
                .details
                .clone()
                .filter(|details| !details.is_empty()),
            state: activity.state.clone().filter(|state| !state.is_empty()),
        })
        .collect();

    ProfileView {
        avatar_url: avatar_url(user_id, &snapshot.user),
        username: snapshot.user.username.clone(),
        discriminator_tag: format!("#{}", snapshot.user.discriminator),
        status: snapshot.status,
        status_label: snapshot.status.label(),
        custom_status,
        activities,
        profile_url: format!("{PROFILE_LINK_BASE}/{user_id}"),
    }
}

pub fn avatar_url(user_id: &str, user: &PresenceUser) -> String {
    match &user.avatar_hash {
        Some(hash) => format!("{AVATAR_CDN_BASE}/{user_id}/{hash}.png?size=256"),
        None => format!(
            "{DEFAULT_AVATAR_CDN_BASE}/{}.png",
            default_avatar_index(&user.discriminator)
        ),
    }
}

/// Default avatar slot, `discriminator mod 5`. Non-numeric discriminators
/// index slot 0.
pub fn default_avatar_index(discriminator: &str) -> u64 {
    discriminator.parse::<u64>().map(|d| d % 5).unwrap_or(0)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
