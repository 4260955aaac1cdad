use discord_profile_gui::{
    config::Config,
    effects::{CursorGlow, ParticleField, TypingCursor, TypingIntro},
    player::{self, PlayerCommand, PlayerEvent, PlayerModel},
    presence::{self, PresenceSnapshot, ProfileView},
    theme::{self, AreaBackground, Palette},
};
use eframe::egui::{
    self, Align, Align2, Color32, ColorImage, CornerRadius, CursorIcon, LayerId, RichText, Sense,
    TextureHandle, TextureOptions, ViewportBuilder, ViewportCommand, WindowLevel,
};
use std::{
    sync::mpsc::{self, TryRecvError},
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

const PRESENCE_POLL_PERIOD: Duration = Duration::from_secs(30);
const PRESENCE_INFLIGHT_TIMEOUT: Duration = Duration::from_secs(25);
const ENTER_TRANSITION: Duration = Duration::from_millis(500);

const AVATAR_SIZE: f32 = 120.0;
const COVER_SIZE: f32 = 56.0;
const GALLERY_IMAGE_HEIGHT: f32 = 120.0;
const PROFILE_PANEL_MAX_WIDTH: f32 = 460.0;

const ASSET_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

enum PresenceCommand {
    Fetch { seq: u64 },
    Shutdown,
}

struct PresenceReply {
    seq: u64,
    outcome: Result<PresenceSnapshot, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageSlot {
    Avatar,
    Cover,
    Gallery(usize),
}

struct ImageRequest {
    id: u64,
    slot: ImageSlot,
    url: String,
}

struct ImageReply {
    id: u64,
    slot: ImageSlot,
    result: Result<ColorImage, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Intro,
    Entering { since: Instant },
    Main,
}

fn spawn_presence_worker(
    user_id: String,
) -> (mpsc::Sender<PresenceCommand>, mpsc::Receiver<PresenceReply>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<PresenceCommand>();
    let (reply_tx, reply_rx) = mpsc::channel::<PresenceReply>();

    thread::spawn(move || {
        let client = presence::build_presence_client();
        if let Err(reason) = &client {
            warn!(%reason, "presence client unavailable, every poll will fall back");
        }

        while let Ok(command) = cmd_rx.recv() {
            match command {
                PresenceCommand::Fetch { seq } => {
                    let outcome = match &client {
                        Ok(client) => presence::fetch_presence_snapshot(client, &user_id),
                        Err(reason) => Err(reason.clone()),
                    };
                    let _ = reply_tx.send(PresenceReply { seq, outcome });
                }
                PresenceCommand::Shutdown => break,
            }
        }
    });

    (cmd_tx, reply_rx)
}

fn spawn_image_worker() -> (mpsc::Sender<ImageRequest>, mpsc::Receiver<ImageReply>) {
    let (request_tx, request_rx) = mpsc::channel::<ImageRequest>();
    let (reply_tx, reply_rx) = mpsc::channel::<ImageReply>();

    thread::spawn(move || {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("discord_profile_gui/", env!("CARGO_PKG_VERSION")))
            .timeout(ASSET_FETCH_TIMEOUT)
            .build();
        let client = match client {
            Ok(client) => client,
            Err(e) => {
                warn!("image client init failed: {e}");
                return;
            }
        };

        while let Ok(request) = request_rx.recv() {
            let result = fetch_image(&client, &request.url);
            let _ = reply_tx.send(ImageReply {
                id: request.id,
                slot: request.slot,
                result,
            });
        }
    });

    (request_tx, reply_rx)
}

fn fetch_image(client: &reqwest::blocking::Client, url: &str) -> Result<ColorImage, String> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| format!("image request failed: {e}"))?;
    if !response.status().is_success() {
        return Err(format!("image request returned {}", response.status()));
    }
    let bytes = response
        .bytes()
        .map_err(|e| format!("image body unreadable: {e}"))?;
    decode_image(&bytes)
}

fn decode_image(bytes: &[u8]) -> std::result::Result<ColorImage, String> {
    let image = image::load_from_memory(bytes).map_err(|e| format!("Failed to decode image: {e}"))?;
    let image = image.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    let pixels = image.into_raw();
    Ok(ColorImage::from_rgba_unmultiplied(size, &pixels))
}

struct App {
    config: Config,
    palette: Palette,
    stage: Stage,
    started_at: Instant,
    entered_at: Option<Instant>,

    typing: TypingIntro,
    particles: ParticleField,
    cursor: CursorGlow,
    hovering_interactive: bool,

    view: ProfileView,
    presence_tx: Option<mpsc::Sender<PresenceCommand>>,
    presence_rx: Option<mpsc::Receiver<PresenceReply>>,
    presence_inflight: bool,
    last_presence_request: Option<Instant>,
    last_poll: Option<Instant>,
    next_seq: u64,
    last_applied_seq: u64,

    image_tx: Option<mpsc::Sender<ImageRequest>>,
    image_rx: Option<mpsc::Receiver<ImageReply>>,
    next_image_id: u64,
    avatar_texture: Option<TextureHandle>,
    avatar_loaded_url: Option<String>,
    avatar_inflight: Option<(u64, String)>,
    cover_texture: Option<TextureHandle>,
    gallery_textures: Vec<Option<TextureHandle>>,

    player: PlayerModel,
    player_tx: Option<mpsc::Sender<PlayerCommand>>,
    player_rx: Option<mpsc::Receiver<PlayerEvent>>,
    autoplay_requested: bool,
    seek_drag: Option<f64>,

    last_window_level: Option<WindowLevel>,
}

impl Default for App {
    fn default() -> Self {
        let config = Config::load().unwrap_or_else(|e| {
            warn!("config load failed, using defaults: {e:#}");
            Config::default()
        });
        let palette = Palette::default();
        let now = Instant::now();

        let typing = TypingIntro::begin(
            config.profile.intro_title.clone(),
            config.profile.intro_subtitle.clone(),
            now,
        );

        let (presence_tx, presence_rx) = if config.profile.is_placeholder() {
            info!("no user id configured, presence stays in demo mode");
            (None, None)
        } else {
            let (tx, rx) = spawn_presence_worker(config.profile.user_id.clone());
            (Some(tx), Some(rx))
        };

        let (image_tx, image_rx) = spawn_image_worker();

        let (player_tx, player_rx) = if let Some(url) = config.media.audio_url.clone() {
            let (tx, rx) = player::spawn_audio_worker(url, config.ui.volume());
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };

        let view = presence::reconcile(&config.profile.user_id, &PresenceSnapshot::demo());
        let gallery_textures = vec![None; config.media.gallery_urls.len()];

        let mut app = Self {
            player: PlayerModel::new(config.ui.volume()),
            config,
            palette,
            stage: Stage::Intro,
            started_at: now,
            entered_at: None,
            typing,
            particles: ParticleField::default(),
            cursor: CursorGlow::default(),
            hovering_interactive: false,
            view,
            presence_tx,
            presence_rx,
            presence_inflight: false,
            last_presence_request: None,
            last_poll: None,
            next_seq: 1,
            last_applied_seq: 0,
            image_tx: Some(image_tx),
            image_rx: Some(image_rx),
            next_image_id: 1,
            avatar_texture: None,
            avatar_loaded_url: None,
            avatar_inflight: None,
            cover_texture: None,
            gallery_textures,
            player_tx,
            player_rx,
            autoplay_requested: false,
            seek_drag: None,
            last_window_level: None,
        };

        app.request_startup_images();
        app.maybe_request_presence(Instant::now());
        app
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.palette.apply_style(ctx);
        self.update_window_level(ctx);

        self.drain_presence_replies();
        self.drain_player_events();
        self.drain_image_replies(ctx);

        if let Stage::Entering { since } = self.stage {
            if now.duration_since(since) >= ENTER_TRANSITION {
                self.finish_enter(ctx, now);
            }
        }

        self.maybe_request_avatar();
        self.maybe_request_presence(now);

        let root_rect = ctx.screen_rect();
        let background_painter = ctx.layer_painter(LayerId::background());
        theme::paint_area_background(
            &background_painter,
            root_rect,
            CornerRadius::ZERO,
            &self.palette.window,
        );

        if self.stage == Stage::Main {
            if self.config.media.has_video() {
                let elapsed = now.duration_since(self.started_at).as_secs_f64();
                theme::paint_area_background(
                    &background_painter,
                    root_rect,
                    CornerRadius::ZERO,
                    &AreaBackground::Gradient(theme::backdrop_gradient(elapsed)),
                );
            }
            if self.config.ui.particles_enabled {
                self.particles.handle_resize(root_rect);
                let clock = self
                    .entered_at
                    .map(|at| now.duration_since(at).as_secs_f64())
                    .unwrap_or(0.0);
                self.particles.paint(&background_painter, root_rect, clock);
            }
        }

        self.hovering_interactive = false;

        let mut panel_frame = egui::Frame::central_panel(&ctx.style());
        panel_frame.fill = Color32::TRANSPARENT;
        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| match self.stage {
                Stage::Intro | Stage::Entering { .. } => self.render_intro(ui, now),
                Stage::Main => self.render_main(ui),
            });

        self.update_cursor_glow(ctx);
        ctx.request_repaint_after(self.desired_repaint_interval());
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(tx) = self.presence_tx.take() {
            let _ = tx.send(PresenceCommand::Shutdown);
        }
        if let Some(tx) = self.player_tx.take() {
            let _ = tx.send(PlayerCommand::Shutdown);
        }
    }
}

impl App {
    fn desired_repaint_interval(&self) -> Duration {
        match self.stage {
            // Typing reveal runs on a 100-150 ms character cadence.
            Stage::Intro => Duration::from_millis(50),
            Stage::Entering { .. } => Duration::from_millis(16),
            // Particles, backdrop and the cursor glow all animate.
            Stage::Main => Duration::from_millis(33),
        }
    }

    fn update_window_level(&mut self, ctx: &egui::Context) {
        let desired = if self.config.ui.always_on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };
        if self.last_window_level != Some(desired) {
            ctx.send_viewport_cmd(ViewportCommand::WindowLevel(desired));
            self.last_window_level = Some(desired);
        }
    }

    // -----------------------------------------------------------------------
    // Enter gesture
    // -----------------------------------------------------------------------

    fn trigger_enter(&mut self, now: Instant) {
        if self.stage == Stage::Intro {
            self.stage = Stage::Entering { since: now };
        }
    }

    fn finish_enter(&mut self, ctx: &egui::Context, now: Instant) {
        self.stage = Stage::Main;
        self.entered_at = Some(now);
        self.particles.handle_resize(ctx.screen_rect());

        // One-time autoplay of the background track; a rejection is logged
        // by the event drain and never retried automatically.
        if !self.autoplay_requested {
            self.autoplay_requested = true;
            if self.player_tx.is_some() {
                info!("starting background music");
                self.send_player_command(PlayerCommand::Play);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Presence
    // -----------------------------------------------------------------------

    fn drain_presence_replies(&mut self) {
        let mut replies = Vec::new();
        if let Some(rx) = self.presence_rx.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(reply) => replies.push(reply),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.presence_rx = None;
                        self.presence_tx = None;
                        self.presence_inflight = false;
                        self.last_presence_request = None;
                        break;
                    }
                }
            }
        }

        for reply in replies {
            self.handle_presence_reply(reply);
        }
    }

    fn handle_presence_reply(&mut self, reply: PresenceReply) {
        self.presence_inflight = false;
        self.last_presence_request = None;

        // Completions are applied newest-first only; a slow fetch overtaken
        // by a later one must not overwrite fresher state.
        if reply.seq <= self.last_applied_seq {
            debug!(seq = reply.seq, "discarding stale presence completion");
            return;
        }
        self.last_applied_seq = reply.seq;

        match reply.outcome {
            Ok(snapshot) => self.apply_snapshot(&snapshot),
            Err(reason) => {
                warn!(%reason, "presence fetch failed, rendering fallback");
                self.apply_snapshot(&PresenceSnapshot::fallback());
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: &PresenceSnapshot) {
        self.view = presence::reconcile(&self.config.profile.user_id, snapshot);
    }

    fn maybe_request_presence(&mut self, now: Instant) {
        if let Some(last) = self.last_poll {
            if now.duration_since(last) < PRESENCE_POLL_PERIOD {
                return;
            }
        }

        if self.config.profile.is_placeholder() {
            // Demo mode reconciles the static snapshot on the same period,
            // with no network involved.
            self.last_poll = Some(now);
            self.apply_snapshot(&PresenceSnapshot::demo());
            return;
        }

        if self.presence_inflight {
            match self.last_presence_request {
                Some(sent_at) if now.duration_since(sent_at) > PRESENCE_INFLIGHT_TIMEOUT => {
                    self.presence_inflight = false;
                    self.last_presence_request = None;
                }
                Some(_) => return,
                None => self.presence_inflight = false,
            }
        }

        if let Some(tx) = self.presence_tx.as_ref() {
            let seq = self.next_seq;
            match tx.send(PresenceCommand::Fetch { seq }) {
                Ok(()) => {
                    self.next_seq += 1;
                    self.presence_inflight = true;
                    self.last_presence_request = Some(now);
                    self.last_poll = Some(now);
                }
                Err(_) => {
                    self.presence_tx = None;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    fn request_startup_images(&mut self) {
        if let Some(url) = self.config.media.cover_url.clone() {
            self.request_image(ImageSlot::Cover, url);
        }
        for (index, url) in self.config.media.gallery_urls.clone().into_iter().enumerate() {
            self.request_image(ImageSlot::Gallery(index), url);
        }
    }

    fn request_image(&mut self, slot: ImageSlot, url: String) -> u64 {
        let id = self.next_image_id;
        self.next_image_id += 1;
        if let Some(tx) = self.image_tx.as_ref() {
            if tx.send(ImageRequest { id, slot, url }).is_err() {
                self.image_tx = None;
            }
        }
        id
    }

    fn maybe_request_avatar(&mut self) {
        let wanted = self.view.avatar_url.clone();
        if self.avatar_loaded_url.as_deref() == Some(wanted.as_str()) {
            return;
        }
        if let Some((_, inflight_url)) = &self.avatar_inflight {
            if inflight_url == &wanted {
                return;
            }
        }
        let id = self.request_image(ImageSlot::Avatar, wanted.clone());
        self.avatar_inflight = Some((id, wanted));
    }

    fn drain_image_replies(&mut self, ctx: &egui::Context) {
        let mut replies = Vec::new();
        if let Some(rx) = self.image_rx.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(reply) => replies.push(reply),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.image_rx = None;
                        self.image_tx = None;
                        break;
                    }
                }
            }
        }

        for reply in replies {
            self.handle_image_reply(ctx, reply);
        }
    }

    fn handle_image_reply(&mut self, ctx: &egui::Context, reply: ImageReply) {
        match reply.slot {
            ImageSlot::Avatar => {
                let Some((expected_id, url)) = self.avatar_inflight.clone() else {
                    return;
                };
                if reply.id != expected_id {
                    debug!("discarding stale avatar reply");
                    return;
                }
                self.avatar_inflight = None;
                // Either way the URL counts as handled; a failure keeps the
                // placeholder rather than refetching every frame.
                self.avatar_loaded_url = Some(url);
                match reply.result {
                    Ok(image) => {
                        self.avatar_texture = Some(ctx.load_texture(
                            "profile.avatar",
                            image,
                            TextureOptions::LINEAR,
                        ));
                    }
                    Err(reason) => warn!(%reason, "avatar image unavailable"),
                }
            }
            ImageSlot::Cover => match reply.result {
                Ok(image) => {
                    self.cover_texture =
                        Some(ctx.load_texture("player.cover", image, TextureOptions::LINEAR));
                }
                Err(reason) => warn!(%reason, "cover image unavailable"),
            },
            ImageSlot::Gallery(index) => match reply.result {
                Ok(image) => {
                    if let Some(slot) = self.gallery_textures.get_mut(index) {
                        *slot = Some(ctx.load_texture(
                            format!("profile.gallery.{index}"),
                            image,
                            TextureOptions::LINEAR,
                        ));
                    }
                }
                Err(reason) => warn!(%reason, index, "gallery image unavailable"),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Player
    // -----------------------------------------------------------------------

    fn drain_player_events(&mut self) {
        let mut events = Vec::new();
        if let Some(rx) = self.player_rx.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.player_rx = None;
                        self.player_tx = None;
                        break;
                    }
                }
            }
        }

        for event in events {
            if let PlayerEvent::PlayFailed { reason } = &event {
                warn!(%reason, "play request rejected, staying paused");
            }
            self.player.apply_event(&event);
        }
    }

    fn send_player_command(&self, command: PlayerCommand) {
        if let Some(tx) = self.player_tx.as_ref() {
            let _ = tx.send(command);
        }
    }

    // -----------------------------------------------------------------------
    // Intro screen
    // -----------------------------------------------------------------------

    fn render_intro(&mut self, ui: &mut egui::Ui, now: Instant) {
        let frame = self.typing.frame(now);
        let spacer = ui.available_height() * 0.30;
        ui.add_space(spacer);

        ui.vertical_centered(|ui| {
            let title = if frame.cursor == TypingCursor::Title {
                format!("{}▌", frame.title)
            } else {
                frame.title.clone()
            };
            ui.label(
                RichText::new(title)
                    .font(self.palette.title_font())
                    .color(self.palette.text_primary),
            );

            let subtitle = if frame.cursor == TypingCursor::Subtitle {
                format!("{}▌", frame.subtitle)
            } else {
                frame.subtitle.clone()
            };
            ui.label(
                RichText::new(subtitle)
                    .font(self.palette.body_font())
                    .color(self.palette.text_dim),
            );

            ui.add_space(28.0);
            let entering = matches!(self.stage, Stage::Entering { .. });
            let button = egui::Button::new(
                RichText::new(if entering { "..." } else { "ENTER" })
                    .font(self.palette.heading_font()),
            )
            .min_size(egui::vec2(160.0, 44.0))
            .corner_radius(CornerRadius::same(22));
            let response = ui.add_enabled(!entering, button);
            self.note_interactive(&response);
            if response.clicked() {
                self.trigger_enter(now);
            }
        });
    }

    // -----------------------------------------------------------------------
    // Main content
    // -----------------------------------------------------------------------

    fn render_main(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.set_max_width(PROFILE_PANEL_MAX_WIDTH);
                    self.render_profile_card(ui);
                    ui.add_space(16.0);
                    self.render_gallery(ui);
                    ui.add_space(16.0);
                    self.render_audio_player(ui);
                    ui.add_space(24.0);
                });
            });
    }

    fn panel_frame(&self) -> egui::Frame {
        egui::Frame::new()
            .fill(self.palette.panel_fill)
            .stroke((1.0, self.palette.panel_stroke))
            .corner_radius(CornerRadius::same(16))
            .inner_margin(20)
    }

    fn render_profile_card(&mut self, ui: &mut egui::Ui) {
        let frame = self.panel_frame();
        frame.show(ui, |ui| {
            ui.vertical_centered(|ui| {
                self.render_avatar(ui);
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    ui.add_space(ui.available_width() / 2.0 - 80.0);
                    ui.label(
                        RichText::new(&self.view.username)
                            .font(self.palette.heading_font())
                            .color(self.palette.text_primary),
                    );
                    ui.label(
                        RichText::new(&self.view.discriminator_tag)
                            .font(self.palette.body_font())
                            .color(self.palette.text_faint),
                    );
                });

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.add_space(ui.available_width() / 2.0 - 40.0);
                    let (dot, _) =
                        ui.allocate_exact_size(egui::vec2(10.0, 10.0), Sense::hover());
                    ui.painter()
                        .circle_filled(dot.center(), 5.0, theme::status_color(self.view.status));
                    ui.label(
                        RichText::new(&self.view.status_label)
                            .font(self.palette.body_font())
                            .color(self.palette.text_dim),
                    );
                });

                if let Some(custom) = self.view.custom_status.clone() {
                    ui.add_space(8.0);
                    let text = if custom.emoji.is_empty() {
                        custom.message.clone()
                    } else if custom.message.is_empty() {
                        custom.emoji.clone()
                    } else {
                        format!("{} {}", custom.emoji, custom.message)
                    };
                    ui.label(
                        RichText::new(text)
                            .font(self.palette.body_font())
                            .color(self.palette.text_primary)
                            .italics(),
                    );
                }

                if !self.view.activities.is_empty() {
                    ui.add_space(12.0);
                    self.render_activities(ui);
                }

                ui.add_space(12.0);
                let link = ui.hyperlink_to(
                    RichText::new("View on Discord").color(self.palette.accent),
                    self.view.profile_url.clone(),
                );
                self.note_interactive(&link);
            });
        });
    }

    fn render_avatar(&mut self, ui: &mut egui::Ui) {
        let size = egui::vec2(AVATAR_SIZE, AVATAR_SIZE);
        let response = match &self.avatar_texture {
            Some(texture) => ui.add(
                egui::Image::new(texture)
                    .fit_to_exact_size(size)
                    .corner_radius(CornerRadius::same((AVATAR_SIZE / 2.0) as u8))
                    .sense(Sense::hover()),
            ),
            None => {
                let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
                let painter = ui.painter();
                painter.circle_filled(rect.center(), AVATAR_SIZE / 2.0, self.palette.panel_stroke);
                let initial = self
                    .view
                    .username
                    .chars()
                    .next()
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    initial,
                    self.palette.title_font(),
                    self.palette.text_primary,
                );
                response
            }
        };
        self.note_interactive(&response);
    }

    fn render_activities(&mut self, ui: &mut egui::Ui) {
        for activity in self.view.activities.clone() {
            let frame = egui::Frame::new()
                .fill(self.palette.panel_fill.linear_multiply(0.6))
                .corner_radius(CornerRadius::same(10))
                .inner_margin(10);
            frame.show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(&activity.name)
                        .font(self.palette.body_font())
                        .strong()
                        .color(self.palette.text_primary),
                );
                if let Some(details) = &activity.details {
                    ui.label(
                        RichText::new(details)
                            .font(self.palette.small_font())
                            .color(self.palette.text_dim),
                    );
                }
                if let Some(state) = &activity.state {
                    ui.label(
                        RichText::new(state)
                            .font(self.palette.small_font())
                            .color(self.palette.text_faint),
                    );
                }
            });
            ui.add_space(6.0);
        }
    }

    fn render_gallery(&mut self, ui: &mut egui::Ui) {
        let textures: Vec<TextureHandle> = self
            .gallery_textures
            .iter()
            .flatten()
            .cloned()
            .collect();
        if textures.is_empty() {
            return;
        }
        ui.horizontal(|ui| {
            for texture in &textures {
                ui.add(
                    egui::Image::new(texture)
                        .fit_to_exact_size(egui::vec2(GALLERY_IMAGE_HEIGHT, GALLERY_IMAGE_HEIGHT))
                        .corner_radius(CornerRadius::same(12)),
                );
            }
        });
    }

    // -----------------------------------------------------------------------
    // Audio player panel
    // -----------------------------------------------------------------------

    fn render_audio_player(&mut self, ui: &mut egui::Ui) {
        let frame = self.panel_frame();
        frame.show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                if !self.player.is_minimized {
                    self.render_cover(ui);
                    ui.vertical(|ui| {
                        let title = if self.config.media.track_title.is_empty() {
                            "Untitled"
                        } else {
                            self.config.media.track_title.as_str()
                        };
                        ui.label(
                            RichText::new(title)
                                .font(self.palette.body_font())
                                .strong()
                                .color(self.palette.text_primary),
                        );
                        if !self.config.media.track_artist.is_empty() {
                            ui.label(
                                RichText::new(&self.config.media.track_artist)
                                    .font(self.palette.small_font())
                                    .color(self.palette.text_dim),
                            );
                        }
                    });
                } else {
                    let glyph = if self.player.is_playing { "⏸" } else { "▶" };
                    ui.label(
                        RichText::new(format!("{glyph} {}", self.config.media.track_title))
                            .font(self.palette.small_font())
                            .color(self.palette.text_dim),
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    let glyph = if self.player.is_minimized { "⏶" } else { "⏷" };
                    let hint = if self.player.is_minimized {
                        "Restore player"
                    } else {
                        "Minimize player"
                    };
                    let response = ui.button(glyph).on_hover_text(hint);
                    self.note_interactive(&response);
                    if response.clicked() {
                        self.player.toggle_minimize();
                    }
                });
            });

            if self.player.is_minimized {
                return;
            }

            ui.add_space(8.0);
            self.render_transport_row(ui);
            ui.add_space(6.0);
            self.render_progress_row(ui);
            ui.add_space(4.0);
            self.render_volume_row(ui);
        });
    }

    fn render_cover(&mut self, ui: &mut egui::Ui) {
        let size = egui::vec2(COVER_SIZE, COVER_SIZE);
        match &self.cover_texture {
            Some(texture) => {
                ui.add(
                    egui::Image::new(texture)
                        .fit_to_exact_size(size)
                        .corner_radius(CornerRadius::same(8)),
                );
            }
            None => {
                let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
                ui.painter().rect_filled(
                    rect,
                    CornerRadius::same(8),
                    self.palette.panel_stroke.linear_multiply(0.6),
                );
                ui.painter().text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "♪",
                    self.palette.heading_font(),
                    self.palette.text_dim,
                );
            }
        }
    }

    fn render_transport_row(&mut self, ui: &mut egui::Ui) {
        let has_audio = self.player_tx.is_some();
        ui.horizontal(|ui| {
            ui.add_space(ui.available_width() / 2.0 - 70.0);

            // Single-track player: previous/next are affordances only.
            let previous = ui
                .add_enabled(has_audio, egui::Button::new("⏮"))
                .on_hover_text("Previous track");
            self.note_interactive(&previous);
            if previous.clicked() {
                debug!("previous track requested (single-track player)");
            }

            let glyph = if self.player.is_playing { "⏸" } else { "▶" };
            let hint = if self.player.is_playing { "Pause" } else { "Play" };
            let toggle = ui
                .add_enabled(has_audio, egui::Button::new(glyph).min_size(egui::vec2(44.0, 28.0)))
                .on_hover_text(hint);
            self.note_interactive(&toggle);
            if toggle.clicked() {
                self.send_player_command(self.player.toggle_command());
            }

            let next = ui
                .add_enabled(has_audio, egui::Button::new("⏭"))
                .on_hover_text("Next track");
            self.note_interactive(&next);
            if next.clicked() {
                debug!("next track requested (single-track player)");
            }
        });
    }

    fn render_progress_row(&mut self, ui: &mut egui::Ui) {
        let has_audio = self.player_tx.is_some();
        let seekable = has_audio && self.player.duration > 0.0;

        let mut fraction = self
            .seek_drag
            .unwrap_or_else(|| self.player.progress_fraction() as f64);

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(player::format_timestamp(self.player.current_time))
                    .font(self.palette.small_font())
                    .color(self.palette.text_dim),
            );

            let slider_width = (ui.available_width() - 48.0).max(40.0);
            ui.spacing_mut().slider_width = slider_width;
            let response = ui.add_enabled(
                seekable,
                egui::Slider::new(&mut fraction, 0.0..=1.0).show_value(false),
            );
            self.note_interactive(&response);

            if response.dragged() {
                self.seek_drag = Some(fraction);
            }
            if response.drag_stopped() || (response.changed() && !response.dragged()) {
                self.seek_drag = None;
                if let Some(command) = self.player.seek_command(fraction) {
                    self.send_player_command(command);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                ui.label(
                    RichText::new(player::format_timestamp(self.player.duration))
                        .font(self.palette.small_font())
                        .color(self.palette.text_faint),
                );
            });
        });
    }

    fn render_volume_row(&mut self, ui: &mut egui::Ui) {
        let has_audio = self.player_tx.is_some();
        let mut volume = self.player.volume;
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("🔊")
                    .font(self.palette.small_font())
                    .color(self.palette.text_dim),
            );
            ui.spacing_mut().slider_width = (ui.available_width() - 16.0).max(40.0);
            let response = ui.add_enabled(
                has_audio,
                egui::Slider::new(&mut volume, 0.0..=1.0).show_value(false),
            );
            self.note_interactive(&response);
            if response.changed() {
                let command = self.player.set_volume(volume);
                self.send_player_command(command);
            }
        });
    }

    // -----------------------------------------------------------------------
    // Cursor glow
    // -----------------------------------------------------------------------

    fn note_interactive(&mut self, response: &egui::Response) {
        if response.hovered() {
            self.hovering_interactive = true;
        }
    }

    fn update_cursor_glow(&mut self, ctx: &egui::Context) {
        let pointer = ctx.input(|input| input.pointer.latest_pos());
        self.cursor.update(pointer, self.hovering_interactive);

        if pointer.is_some() {
            ctx.set_cursor_icon(CursorIcon::None);
            let painter = ctx.layer_painter(LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("cursor-glow"),
            ));
            self.cursor.paint(&painter, self.palette.accent);
        }
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title("Profile"),
        ..Default::default()
    };
    let run_res = eframe::run_native(
        "Profile",
        native_options,
        Box::new(
            |_cc| -> std::result::Result<
                Box<dyn eframe::App>,
                Box<dyn std::error::Error + Send + Sync>,
            > { Ok(Box::new(App::default())) },
        ),
    );
    if let Err(e) = run_res {
        return Err(Box::new(e));
    }

    Ok(())
}
