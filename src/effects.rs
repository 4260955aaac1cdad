use eframe::egui::{Color32, Painter, Pos2, Rect, Vec2};
use rand::Rng;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Typing intro
// ---------------------------------------------------------------------------

const TYPING_START_DELAY: Duration = Duration::from_millis(1000);
const TITLE_CHAR_DELAY: Duration = Duration::from_millis(150);
const TITLE_SUBTITLE_GAP: Duration = Duration::from_millis(500);
const SUBTITLE_CHAR_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingCursor {
    None,
    Title,
    Subtitle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypingFrame {
    pub title: String,
    pub subtitle: String,
    pub cursor: TypingCursor,
    pub done: bool,
}

/// Two-phase character reveal: title, a fixed pause, then subtitle. Begun
/// once at startup and never restarted.
#[derive(Debug, Clone)]
pub struct TypingIntro {
    title: String,
    subtitle: String,
    started_at: Instant,
}

impl TypingIntro {
    pub fn begin(title: String, subtitle: String, now: Instant) -> Self {
        Self {
            title,
            subtitle,
            started_at: now,
        }
    }

    pub fn frame(&self, now: Instant) -> TypingFrame {
        let elapsed = now.saturating_duration_since(self.started_at);

        let title_len = self.title.chars().count();
        let subtitle_len = self.subtitle.chars().count();

        let title_chars = chars_revealed(elapsed, TYPING_START_DELAY, TITLE_CHAR_DELAY, title_len);
        let subtitle_start = TYPING_START_DELAY
            + TITLE_CHAR_DELAY * title_len as u32
            + TITLE_SUBTITLE_GAP;
        let subtitle_chars = if title_chars == title_len {
            chars_revealed(elapsed, subtitle_start, SUBTITLE_CHAR_DELAY, subtitle_len)
        } else {
            0
        };

        let cursor = if title_chars > 0 && title_chars < title_len {
            TypingCursor::Title
        } else if title_chars == title_len && subtitle_chars < subtitle_len {
            // The block cursor moves down during the pause and stays while
            // the subtitle types out.
            if elapsed >= subtitle_start || subtitle_chars > 0 {
                TypingCursor::Subtitle
            } else {
                TypingCursor::None
            }
        } else {
            TypingCursor::None
        };

        TypingFrame {
            title: self.title.chars().take(title_chars).collect(),
            subtitle: self.subtitle.chars().take(subtitle_chars).collect(),
            cursor,
            done: title_chars == title_len && subtitle_chars == subtitle_len,
        }
    }
}

fn chars_revealed(elapsed: Duration, start: Duration, per_char: Duration, len: usize) -> usize {
    if len == 0 || elapsed < start {
        return 0;
    }
    let typing_for = elapsed - start;
    let shown = typing_for.as_millis() / per_char.as_millis().max(1) + 1;
    (shown as usize).min(len)
}

// ---------------------------------------------------------------------------
// Particle field
// ---------------------------------------------------------------------------

pub const PARTICLE_COUNT: usize = 30;
/// Viewport widths at or below this skip regeneration on resize.
pub const PARTICLE_REGEN_MIN_WIDTH: f32 = 480.0;

const PARTICLE_MIN_SIZE: f32 = 2.0;
const PARTICLE_MAX_SIZE: f32 = 6.0;
const PARTICLE_MIN_ALPHA: f32 = 0.1;
const PARTICLE_MAX_ALPHA: f32 = 0.4;
const PARTICLE_MAX_DELAY: f32 = 8.0;
const PARTICLE_DRIFT_PER_SEC: f32 = 12.0;

#[derive(Debug, Clone)]
pub struct Particle {
    pub origin: Pos2,
    pub radius: f32,
    pub alpha: f32,
    pub delay: f32,
}

/// Decorative white dots; no persistent identity, regenerated wholesale.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    seeded_size: Vec2,
}

impl ParticleField {
    pub fn regenerate(&mut self, area: Rect) {
        let mut rng = rand::rng();
        self.particles = (0..PARTICLE_COUNT)
            .map(|_| {
                let size = rng.random_range(PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE);
                Particle {
                    origin: Pos2::new(
                        area.min.x + rng.random_range(0.0..area.width().max(1.0)),
                        area.min.y + rng.random_range(0.0..area.height().max(1.0)),
                    ),
                    radius: size / 2.0,
                    alpha: rng.random_range(PARTICLE_MIN_ALPHA..PARTICLE_MAX_ALPHA),
                    delay: rng.random_range(0.0..PARTICLE_MAX_DELAY),
                }
            })
            .collect();
        self.seeded_size = area.size();
    }

    /// Regenerates on a size change, but only when the viewport is wide
    /// enough to be worth the churn.
    pub fn handle_resize(&mut self, area: Rect) {
        let size = area.size();
        if self.particles.is_empty()
            || (size != self.seeded_size && size.x > PARTICLE_REGEN_MIN_WIDTH)
        {
            self.regenerate(area);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn paint(&self, painter: &Painter, area: Rect, time_secs: f64) {
        for particle in &self.particles {
            let local_time = time_secs as f32 - particle.delay;
            if local_time < 0.0 {
                continue;
            }

            // Slow upward drift with wrap-around, plus a twinkle.
            let height = area.height().max(1.0);
            let drift = (local_time * PARTICLE_DRIFT_PER_SEC) % height;
            let mut y = particle.origin.y - drift;
            if y < area.min.y {
                y += height;
            }

            let twinkle = 0.75 + 0.25 * (local_time * 1.3).sin();
            let alpha = (particle.alpha * twinkle * 255.0) as u8;
            painter.circle_filled(
                Pos2::new(particle.origin.x, y),
                particle.radius,
                Color32::from_white_alpha(alpha),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Cursor glow
// ---------------------------------------------------------------------------

const CURSOR_RADIUS: f32 = 8.0;
const CURSOR_ACTIVE_RADIUS: f32 = 14.0;

/// Replacement pointer: a glowing ring that follows the mouse and grows
/// while an interactive element is hovered.
#[derive(Debug, Clone, Default)]
pub struct CursorGlow {
    pos: Option<Pos2>,
    active: bool,
}

impl CursorGlow {
    pub fn update(&mut self, pos: Option<Pos2>, hovering_interactive: bool) {
        if let Some(pos) = pos {
            self.pos = Some(pos);
        }
        self.active = hovering_interactive;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn paint(&self, painter: &Painter, accent: Color32) {
        let Some(pos) = self.pos else {
            return;
        };
        let radius = if self.active {
            CURSOR_ACTIVE_RADIUS
        } else {
            CURSOR_RADIUS
        };
        painter.circle_filled(pos, radius * 0.35, accent);
        painter.circle_stroke(pos, radius, (1.5, accent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intro() -> (TypingIntro, Instant) {
        let t0 = Instant::now();
        (
            TypingIntro::begin("KIDD".to_string(), "FROM HERMANO SYN".to_string(), t0),
            t0,
        )
    }

    #[test]
    fn nothing_is_typed_during_the_lead_in() {
        let (intro, t0) = intro();
        let frame = intro.frame(t0 + Duration::from_millis(900));
        assert_eq!(frame.title, "");
        assert_eq!(frame.subtitle, "");
        assert_eq!(frame.cursor, TypingCursor::None);
    }

    #[test]
    fn title_types_one_char_per_delay() {
        let (intro, t0) = intro();
        let frame = intro.frame(t0 + Duration::from_millis(1000));
        assert_eq!(frame.title, "K");
        assert_eq!(frame.cursor, TypingCursor::Title);

        let frame = intro.frame(t0 + Duration::from_millis(1310));
        assert_eq!(frame.title, "KID");
        assert_eq!(frame.cursor, TypingCursor::Title);
    }

    #[test]
    fn subtitle_waits_for_title_plus_gap() {
        let (intro, t0) = intro();
        // Title (4 chars) finishes at 1000 + 4*150 = 1600; gap ends at 2100.
        let frame = intro.frame(t0 + Duration::from_millis(2050));
        assert_eq!(frame.title, "KIDD");
        assert_eq!(frame.subtitle, "");
        assert!(!frame.done);

        let frame = intro.frame(t0 + Duration::from_millis(2100));
        assert_eq!(frame.subtitle, "F");
        assert_eq!(frame.cursor, TypingCursor::Subtitle);
    }

    #[test]
    fn intro_completes_and_parks_the_cursor() {
        let (intro, t0) = intro();
        let frame = intro.frame(t0 + Duration::from_secs(30));
        assert_eq!(frame.title, "KIDD");
        assert_eq!(frame.subtitle, "FROM HERMANO SYN");
        assert_eq!(frame.cursor, TypingCursor::None);
        assert!(frame.done);
    }

    #[test]
    fn particles_regenerate_to_fixed_count_within_bounds() {
        let mut field = ParticleField::default();
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(1280.0, 720.0));
        field.regenerate(area);

        assert_eq!(field.len(), PARTICLE_COUNT);
        for particle in field.particles() {
            assert!(area.contains(particle.origin));
            assert!(particle.radius >= PARTICLE_MIN_SIZE / 2.0);
            assert!(particle.radius <= PARTICLE_MAX_SIZE / 2.0);
            assert!(particle.alpha >= PARTICLE_MIN_ALPHA && particle.alpha <= PARTICLE_MAX_ALPHA);
            assert!(particle.delay >= 0.0 && particle.delay < PARTICLE_MAX_DELAY);
        }
    }

    #[test]
    fn narrow_resizes_keep_the_existing_field() {
        let mut field = ParticleField::default();
        let wide = Rect::from_min_size(Pos2::ZERO, Vec2::new(1280.0, 720.0));
        field.handle_resize(wide);
        let before: Vec<Pos2> = field.particles().iter().map(|p| p.origin).collect();

        let narrow = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 720.0));
        field.handle_resize(narrow);
        let after: Vec<Pos2> = field.particles().iter().map(|p| p.origin).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn wide_resizes_regenerate_wholesale() {
        let mut field = ParticleField::default();
        let first = Rect::from_min_size(Pos2::ZERO, Vec2::new(1280.0, 720.0));
        field.handle_resize(first);

        let second = Rect::from_min_size(Pos2::ZERO, Vec2::new(1920.0, 1080.0));
        field.handle_resize(second);
        assert_eq!(field.len(), PARTICLE_COUNT);
        for particle in field.particles() {
            assert!(second.contains(particle.origin));
        }
    }

    #[test]
    fn cursor_glow_tracks_position_and_hover() {
        let mut glow = CursorGlow::default();
        glow.update(Some(Pos2::new(10.0, 20.0)), false);
        assert!(!glow.is_active());

        // Position is retained when the pointer briefly reports nothing.
        glow.update(None, true);
        assert!(glow.is_active());
        assert_eq!(glow.pos, Some(Pos2::new(10.0, 20.0)));
    }
}
