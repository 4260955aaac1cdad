use eframe::egui::{
    self, Color32, CornerRadius, FontId, Mesh, Painter, Pos2, Rect, epaint::Vertex,
};

use crate::presence::PresenceStatus;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaBackground {
    Solid(Color32),
    Gradient(GradientSpec),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientSpec {
    pub start: Color32,
    pub end: Color32,
    pub direction: GradientDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    Vertical,
    Horizontal,
}

/// Fixed dark palette for the whole widget.
#[derive(Debug, Clone)]
pub struct Palette {
    pub window: AreaBackground,
    pub panel_fill: Color32,
    pub panel_stroke: Color32,
    pub accent: Color32,
    pub text_primary: Color32,
    pub text_dim: Color32,
    pub text_faint: Color32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            window: AreaBackground::Gradient(GradientSpec {
                start: Color32::from_rgb(18, 14, 28),
                end: Color32::from_rgb(8, 8, 12),
                direction: GradientDirection::Vertical,
            }),
            panel_fill: Color32::from_rgba_unmultiplied(28, 26, 40, 230),
            panel_stroke: Color32::from_rgba_unmultiplied(120, 90, 220, 90),
            accent: Color32::from_rgb(155, 120, 255),
            text_primary: Color32::from_rgb(235, 233, 245),
            text_dim: Color32::from_rgb(165, 160, 185),
            text_faint: Color32::from_rgb(110, 106, 130),
        }
    }
}

impl Palette {
    pub fn apply_style(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        style.visuals = egui::Visuals::dark();
        style.visuals.override_text_color = Some(self.text_primary);
        style.visuals.widgets.inactive.bg_fill = self.panel_fill;
        style.visuals.widgets.hovered.bg_fill = self.accent.linear_multiply(0.35);
        style.visuals.widgets.active.bg_fill = self.accent.linear_multiply(0.55);
        style.visuals.selection.bg_fill = self.accent.linear_multiply(0.6);
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        ctx.set_style(style);
    }

    pub fn title_font(&self) -> FontId {
        FontId::proportional(34.0)
    }

    pub fn heading_font(&self) -> FontId {
        FontId::proportional(22.0)
    }

    pub fn body_font(&self) -> FontId {
        FontId::proportional(14.0)
    }

    pub fn small_font(&self) -> FontId {
        FontId::proportional(12.0)
    }
}

pub fn status_color(status: PresenceStatus) -> Color32 {
    match status {
        PresenceStatus::Online => Color32::from_rgb(0x43, 0xb5, 0x81),
        PresenceStatus::Idle => Color32::from_rgb(0xfa, 0xa6, 0x1a),
        PresenceStatus::Dnd => Color32::from_rgb(0xf0, 0x47, 0x47),
        PresenceStatus::Offline => Color32::from_rgb(0x74, 0x7f, 0x8d),
    }
}

/// Slowly sweeping gradient shown behind the main content once the video
/// backdrop is revealed.
pub fn backdrop_gradient(time_secs: f64) -> GradientSpec {
    let phase = (time_secs * 0.08).sin() as f32 * 0.5 + 0.5;
    let start = lerp_color(
        Color32::from_rgb(30, 16, 52),
        Color32::from_rgb(14, 26, 48),
        phase,
    );
    let end = lerp_color(
        Color32::from_rgb(6, 6, 10),
        Color32::from_rgb(16, 8, 22),
        phase,
    );
    GradientSpec {
        start,
        end,
        direction: GradientDirection::Vertical,
    }
}

pub fn paint_area_background(
    painter: &Painter,
    rect: Rect,
    rounding: CornerRadius,
    background: &AreaBackground,
) {
    match background {
        AreaBackground::Solid(color) => {
            painter.rect_filled(rect, rounding, *color);
        }
        AreaBackground::Gradient(gradient) => {
            paint_gradient_rect(painter, rect, gradient);
        }
    }
}

fn paint_gradient_rect(painter: &Painter, rect: Rect, gradient: &GradientSpec) {
    if rect.width() <= f32::EPSILON
        || rect.height() <= f32::EPSILON
        || gradient.start == gradient.end
    {
        painter.rect_filled(rect, CornerRadius::ZERO, gradient.start);
        return;
    }

    let mut mesh = Mesh::default();
    let steps = 24usize;

    for i in 0..steps {
        let t0 = i as f32 / steps as f32;
        let t1 = (i + 1) as f32 / steps as f32;
        let color0 = lerp_color(gradient.start, gradient.end, t0);
        let color1 = lerp_color(gradient.start, gradient.end, t1);

        let (a, b, c, d) = match gradient.direction {
            GradientDirection::Vertical => {
                let y0 = rect.min.y + rect.height() * t0;
                let y1 = rect.min.y + rect.height() * t1;
                (
                    Pos2::new(rect.min.x, y0),
                    Pos2::new(rect.max.x, y0),
                    Pos2::new(rect.min.x, y1),
                    Pos2::new(rect.max.x, y1),
                )
            }
            GradientDirection::Horizontal => {
                let x0 = rect.min.x + rect.width() * t0;
                let x1 = rect.min.x + rect.width() * t1;
                (
                    Pos2::new(x0, rect.min.y),
                    Pos2::new(x0, rect.max.y),
                    Pos2::new(x1, rect.min.y),
                    Pos2::new(x1, rect.max.y),
                )
            }
        };

        let base = mesh.vertices.len() as u32;
        for (pos, color) in [(a, color0), (b, color0), (c, color1), (d, color1)] {
            mesh.vertices.push(Vertex {
                pos,
                uv: egui::epaint::WHITE_UV,
                color,
            });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
    }

    painter.add(egui::Shape::mesh(mesh));
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| -> u8 { (x as f32 + (y as f32 - x as f32) * t).round() as u8 };
    Color32::from_rgba_unmultiplied(
        lerp(a.r(), b.r()),
        lerp(a.g(), b.g()),
        lerp(a.b(), b.b()),
        lerp(a.a(), b.a()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_colors_are_distinct() {
        let colors = [
            status_color(PresenceStatus::Online),
            status_color(PresenceStatus::Idle),
            status_color(PresenceStatus::Dnd),
            status_color(PresenceStatus::Offline),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn color_lerp_hits_both_endpoints() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(200, 100, 50);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
    }

    #[test]
    fn backdrop_gradient_stays_in_range_over_time() {
        for t in 0..120 {
            let spec = backdrop_gradient(t as f64);
            assert_ne!(spec.start, spec.end);
        }
    }
}
