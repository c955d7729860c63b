//! Sky, stars, and city skyline
//!
//! Layout is rolled once per session; only window lighting is re-rolled per
//! frame, which gives the skyline its flicker.

use glam::Vec2;
use rand::Rng;

use super::canvas::Frame;
use super::color::{Rgba, WHITE, rgba, with_alpha};
use super::shapes;
use crate::assets::SpriteHandle;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, HORIZON_Y};
use crate::theme::Theme;

const STAR_COUNT: usize = 60;
/// Buildings span past both canvas edges so parallax never shows a gap
const CITY_MARGIN: f32 = 200.0;

const STAR_PARALLAX: f32 = 0.05;
const BACK_PARALLAX: f32 = 0.02;
const FRONT_PARALLAX: f32 = 0.1;
const UFO_PARALLAX: f32 = 0.02;
const UFO_SIZE: Vec2 = Vec2::new(60.0, 40.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    pub x: f32,
    pub w: f32,
    pub h: f32,
}

/// Per-frame inputs
#[derive(Debug, Clone, Copy)]
pub struct BackdropView<'a> {
    pub theme: &'a Theme,
    /// Milliseconds, any epoch
    pub time_ms: f64,
    pub player_x: f32,
    pub ufo: Option<SpriteHandle>,
    pub starfield: bool,
    pub twinkle: bool,
}

#[derive(Debug, Clone)]
pub struct Backdrop {
    pub stars: Vec<Star>,
    pub back_city: Vec<Building>,
    pub front_city: Vec<Building>,
}

fn skyline(
    rng: &mut impl Rng,
    widths: std::ops::Range<f32>,
    heights: std::ops::Range<f32>,
    overlap: f32,
) -> Vec<Building> {
    let mut buildings = Vec::new();
    let mut x = -CITY_MARGIN;
    while x < CANVAS_WIDTH + CITY_MARGIN {
        let w = rng.random_range(widths.clone());
        let h = rng.random_range(heights.clone());
        buildings.push(Building { x, w, h });
        x += w - overlap;
    }
    buildings
}

impl Backdrop {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0.0..CANVAS_WIDTH),
                    rng.random_range(0.0..HORIZON_Y * 0.8),
                ),
                size: rng.random_range(0.5..2.5),
                opacity: rng.random_range(0.2..1.0),
            })
            .collect();

        Self {
            stars,
            back_city: skyline(rng, 30.0..80.0, 30.0..90.0, 5.0),
            front_city: skyline(rng, 20.0..60.0, 20.0..60.0, 0.0),
        }
    }

    pub fn draw(&self, frame: &mut Frame, view: &BackdropView<'_>, rng: &mut impl Rng) {
        let theme = view.theme;
        frame.fill(shapes::vertical_gradient(
            0.0,
            0.0,
            CANVAS_WIDTH,
            HORIZON_Y,
            &[
                (0.0, theme.sky_top),
                (0.6, theme.sky_middle),
                (1.0, theme.sky_bottom),
            ],
        ));

        if view.starfield && theme.stars_opacity > 0.0 {
            self.draw_stars(frame, view);
        }
        if let Some(ufo) = view.ufo {
            draw_ufo(frame, ufo, view);
        }
        self.draw_back_city(frame, view);
        self.draw_front_city(frame, view, rng);
    }

    fn draw_stars(&self, frame: &mut Frame, view: &BackdropView<'_>) {
        let offset = -view.player_x * STAR_PARALLAX;
        for (i, star) in self.stars.iter().enumerate() {
            let x = (star.pos.x + offset).rem_euclid(CANVAS_WIDTH);
            let twinkle = if view.twinkle {
                ((view.time_ms * 0.003 + i as f64).sin() * 0.3 + 0.7) as f32
            } else {
                1.0
            };
            let alpha = star.opacity * twinkle * view.theme.stars_opacity;
            frame.fill(shapes::circle(
                Vec2::new(x, star.pos.y),
                star.size,
                with_alpha(WHITE, alpha),
                8,
            ));
        }
    }

    fn draw_back_city(&self, frame: &mut Frame, view: &BackdropView<'_>) {
        let offset = -view.player_x * BACK_PARALLAX;
        for (idx, b) in self.back_city.iter().enumerate() {
            let px = b.x + offset;
            let top = HORIZON_Y - b.h;
            frame.fill(shapes::rect(px, top, b.w, b.h, view.theme.city_back));

            // Edge trim and roof line
            let trim = rgba(0x000000, 0.3);
            frame.fill(shapes::rect(px, top, 2.0, b.h, trim));
            frame.fill(shapes::rect(px + b.w - 2.0, top, 2.0, b.h, trim));
            frame.fill(shapes::rect(px, top, b.w, 3.0, rgba(0xffffff, 0.1)));

            if idx % 3 == 0 && b.w > 40.0 {
                let at = Vec2::new(px + 5.0, HORIZON_Y - b.h / 2.0);
                frame.fill(shapes::polyline(
                    &[at, at + Vec2::new(15.0, -8.0), at + Vec2::new(25.0, 0.0)],
                    1.5,
                    rgba(0xff00ff, 0.4),
                ));
            }
        }
    }

    fn draw_front_city(&self, frame: &mut Frame, view: &BackdropView<'_>, rng: &mut impl Rng) {
        let theme = view.theme;
        let offset = -view.player_x * FRONT_PARALLAX;
        for (idx, b) in self.front_city.iter().enumerate() {
            let px = b.x + offset;
            let top = HORIZON_Y - b.h;
            frame.fill(shapes::rect(px, top, b.w, b.h, theme.city_front));

            frame.fill(shapes::rect(px, top, 2.0, b.h, rgba(0xffffff, 0.15)));
            frame.fill(shapes::rect(px + b.w - 3.0, top, 3.0, b.h, rgba(0x000000, 0.4)));
            frame.fill(shapes::vertical_gradient(
                px,
                top,
                b.w,
                5.0,
                &[(0.0, rgba(0xffffff, 0.2)), (1.0, rgba(0x000000, 0.1))],
            ));

            if b.w > 30.0 && b.h > 25.0 {
                let rows = (b.h / 15.0) as usize;
                let cols = (b.w / 12.0) as usize;
                for r in 0..rows {
                    for c in 0..cols {
                        let lit = rng.random::<f32>() > 0.7;
                        let color = if lit {
                            theme.window_warm
                        } else {
                            theme.window_cool
                        };
                        let wx = px + 4.0 + c as f32 * 12.0;
                        let wy = top + 8.0 + r as f32 * 15.0;
                        frame.fill(shapes::rect(wx, wy, 6.0, 8.0, color));
                    }
                }
            }

            if b.w > 35.0 {
                let at = Vec2::new(px + b.w / 2.0, HORIZON_Y - b.h * 0.6);
                graffiti(frame, idx % 5, at);
            }

            if idx % 4 == 0 && b.w > 30.0 {
                // Rooftop AC unit
                frame.fill(shapes::rect(
                    px + b.w - 15.0,
                    top - 5.0,
                    12.0,
                    5.0,
                    rgba(0x646464, 0.8),
                ));
            }
        }
    }
}

/// One of five wall motifs, centred on `at`
fn graffiti(frame: &mut Frame, motif: usize, at: Vec2) {
    const ALPHA: f32 = 0.7;
    let c = |hex: u32| rgba(hex, ALPHA);
    let p = |x: f32, y: f32| at + Vec2::new(x, y);

    match motif {
        0 => {
            // Bubble letters
            for dx in [-8.0, 0.0, 8.0] {
                frame.fill(shapes::circle(p(dx, -4.0), 5.0, c(0xffffff), 10));
                frame.fill(shapes::circle(p(dx, -4.0), 3.5, c(0xff1493), 10));
            }
        }
        1 => {
            // Drip tag
            frame.fill(shapes::line(p(-10.0, 0.0), p(10.0, 0.0), 3.0, c(0x00ff00)));
            frame.fill(shapes::line(p(-5.0, 0.0), p(-5.0, 12.0), 1.5, c(0x00ff00)));
            frame.fill(shapes::line(p(5.0, 0.0), p(5.0, 8.0), 1.5, c(0x00ff00)));
        }
        2 => {
            // Stencil face
            frame.fill(shapes::circle(at, 6.0, c(0xffff00), 12));
            frame.fill(shapes::circle(p(-2.0, -1.0), 1.5, c(0x000000), 6));
            frame.fill(shapes::circle(p(2.0, -1.0), 1.5, c(0x000000), 6));
        }
        3 => {
            // Throw-up
            let outline = [
                p(-12.0, 0.0),
                p(-8.0, -8.0),
                p(0.0, -6.0),
                p(8.0, -8.0),
                p(12.0, 0.0),
            ];
            frame.fill(shapes::polygon(&outline, rgba(0xff6600, 0.3 * ALPHA)));
            frame.fill(shapes::polyline(&outline, 2.5, c(0xff6600)));
        }
        _ => {
            // Wild style
            let zigzag = [
                p(-18.0, 0.0),
                p(-12.0, -10.0),
                p(-6.0, 0.0),
                p(0.0, -10.0),
                p(6.0, 0.0),
                p(12.0, -10.0),
                p(18.0, 0.0),
            ];
            frame.fill(shapes::polyline(&zigzag, 3.0, c(0x00ffff)));
            frame.fill(shapes::polyline(&zigzag, 1.5, c(0xff00ff)));
        }
    }
}

fn draw_ufo(frame: &mut Frame, ufo: SpriteHandle, view: &BackdropView<'_>) {
    let t = view.time_ms;
    let anchor = Vec2::new(
        ((t / 50.0) % (CANVAS_WIDTH as f64 + 400.0) - 200.0) as f32,
        HORIZON_Y - 150.0 + ((t / 500.0).sin() * 20.0) as f32,
    );
    let tilt = ((t / 300.0).sin() * 0.1) as f32;
    // The sprite hangs off the anchor by its parallax shift, then tilts about it
    let local = Vec2::new(-view.player_x * UFO_PARALLAX, 0.0) + UFO_SIZE / 2.0;
    let center = anchor + Vec2::from_angle(tilt).rotate(local);
    frame.sprite_rotated(ufo, center, UFO_SIZE, tilt, WHITE);
}

/// Clear colour that matches the horizon
pub fn horizon_color(theme: &Theme) -> Rgba {
    theme.sky_bottom
}

/// Flat ground below the horizon
pub fn draw_ground(frame: &mut Frame, theme: &Theme) {
    frame.fill(shapes::rect(
        0.0,
        HORIZON_Y,
        CANVAS_WIDTH,
        CANVAS_HEIGHT - HORIZON_Y,
        theme.ground,
    ));
}
