use discord_profile_gui::presence::{
    reconcile, Activity, PresenceSnapshot, PresenceStatus, PresenceUser, CUSTOM_STATUS_KIND,
};

const USER_ID: &str = "720887495923073044";

fn snapshot_with(activities: Vec<Activity>) -> PresenceSnapshot {
    PresenceSnapshot {
        user: PresenceUser {
            username: "kidd".to_string(),
            discriminator: "0001".to_string(),
            avatar_hash: Some("deadbeef".to_string()),
        },
        status: PresenceStatus::Dnd,
        activities,
    }
}

#[test]
fn reconciliation_replaces_the_full_view() {
    let first = snapshot_with(vec![Activity {
        kind: 0,
        name: "osu!".to_string(),
        details: Some("multiplayer".to_string()),
        state: None,
        emoji: None,
    }]);
    let view = reconcile(USER_ID, &first);
    assert_eq!(view.username, "kidd");
    assert_eq!(view.status_label, "Dnd");
    assert_eq!(view.activities.len(), 1);
    assert_eq!(
        view.avatar_url,
        format!("https://cdn.discordapp.com/avatars/{USER_ID}/deadbeef.png?size=256")
    );

    // A later snapshot with nothing going on wipes the previous fields.
    let second = PresenceSnapshot::fallback();
    let view = reconcile(USER_ID, &second);
    assert_eq!(view.username, "KIDD");
    assert_eq!(view.status, PresenceStatus::Offline);
    assert!(view.activities.is_empty());
    assert!(view.custom_status.is_none());
    assert_eq!(
        view.avatar_url,
        "https://cdn.discordapp.com/embed/avatars/0.png"
    );
}

#[test]
fn custom_status_is_split_out_of_the_activity_list() {
    let snapshot = snapshot_with(vec![
        Activity {
            kind: CUSTOM_STATUS_KIND,
            name: "Custom Status".to_string(),
            details: None,
            state: Some("grinding".to_string()),
            emoji: Some("🎧".to_string()),
        },
        Activity {
            kind: 2,
            name: "Spotify".to_string(),
            details: Some("Dantay".to_string()),
            state: Some("kiyo".to_string()),
            emoji: None,
        },
    ]);

    let view = reconcile(USER_ID, &snapshot);
    let custom = view.custom_status.expect("custom status present");
    assert_eq!(custom.emoji, "🎧");
    assert_eq!(custom.message, "grinding");

    assert_eq!(view.activities.len(), 1);
    assert_eq!(view.activities[0].name, "Spotify");
    assert_eq!(view.activities[0].details.as_deref(), Some("Dantay"));
    assert_eq!(view.activities[0].state.as_deref(), Some("kiyo"));
}

#[test]
fn activity_order_is_preserved() {
    let names = ["one", "two", "three"];
    let snapshot = snapshot_with(
        names
            .iter()
            .map(|name| Activity {
                kind: 0,
                name: name.to_string(),
                details: None,
                state: None,
                emoji: None,
            })
            .collect(),
    );
    let view = reconcile(USER_ID, &snapshot);
    let rendered: Vec<&str> = view.activities.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(rendered, names);
}

#[test]
fn demo_and_fallback_snapshots_differ_in_tag_and_status() {
    let demo = reconcile(USER_ID, &PresenceSnapshot::demo());
    let fallback = reconcile(USER_ID, &PresenceSnapshot::fallback());

    assert_eq!(demo.username, fallback.username);
    assert_eq!(demo.discriminator_tag, "#0001");
    assert_eq!(fallback.discriminator_tag, "#0000");
    assert_eq!(demo.status, PresenceStatus::Online);
    assert_eq!(fallback.status, PresenceStatus::Offline);

    // 0001 mod 5 = 1, 0000 mod 5 = 0.
    assert!(demo.avatar_url.ends_with("/1.png"));
    assert!(fallback.avatar_url.ends_with("/0.png"));
}

#[test]
fn profile_deep_link_uses_the_configured_id() {
    let view = reconcile(USER_ID, &PresenceSnapshot::demo());
    assert_eq!(view.profile_url, format!("https://discord.com/users/{USER_ID}"));
}
