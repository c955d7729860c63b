//! Scene composition
//!
//! Reads a [`GameState`] and paints one [`Frame`]: backdrop, road, every
//! entity and the truck in painter's order, particles, then mode overlays.
//! All world-to-screen mapping goes through [`Camera::project`].

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::backdrop::{self, Backdrop, BackdropView};
use super::canvas::{Blend, Frame, Overlays};
use super::color::{Rgba, WHITE, darken, fogged, lighten, rgb, rgba, with_alpha};
use super::shapes;
use crate::assets::{AssetSnapshot, SpriteHandle, SpriteKey};
use crate::consts::{CAMERA_DISTANCE, CANVAS_WIDTH};
use crate::sim::{
    Camera, CollectibleKind, Entity, EntityKind, GameState, LaneMode, Particle, ParticleKind,
    Player, PowerupKind,
};
use crate::theme::{Theme, TimeOfDay};
use crate::tuning::*;

const GRIT_FLECKS: usize = 20;
const FLAME_PUFFS: usize = 15;

/// Lane divider x positions per layout
const DIVIDERS_3: [f32; 2] = [
    LANE_X_POSITIONS[0] + LANE_WIDTH / 2.0,
    LANE_X_POSITIONS[1] + LANE_WIDTH / 2.0,
];
const DIVIDERS_2: [f32; 1] = [0.0];

/// Everything besides the simulation that shapes a frame
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub time_of_day: TimeOfDay,
    pub assets: &'a AssetSnapshot,
    /// Milliseconds, any epoch; drives twinkle, grit, UFO, and wheel hubs
    pub time_ms: f64,
    /// Shake enabled in settings
    pub shake: bool,
    pub starfield: bool,
    pub twinkle: bool,
}

/// Colors of a shaded box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeColors {
    pub front: Rgba,
    pub top: Rgba,
    pub side: Rgba,
}

impl CubeColors {
    pub const fn new(front: Rgba, top: Rgba, side: Rgba) -> Self {
        Self { front, top, side }
    }

    /// Lighter top, darker side
    pub fn shaded(base: Rgba) -> Self {
        Self::new(base, lighten(base, 0.2), darken(base, 0.2))
    }
}

/// Flat color used when an entity has no sprite
pub fn fallback_color(kind: EntityKind) -> Rgba {
    match kind {
        EntityKind::Obstacle(_) => rgb(0x444444),
        EntityKind::Collectible(c) => match c {
            CollectibleKind::Coin => rgb(0xffd700),
            CollectibleKind::Banana => rgb(0xffc107),
            CollectibleKind::StickerPill => rgb(0xff69b4),
            CollectibleKind::Sticker3 => rgb(0x00ced1),
            CollectibleKind::Wallet => rgb(0x795548),
        },
        EntityKind::Powerup(p) => match p {
            PowerupKind::Incinerator => rgb(0xff5722),
            PowerupKind::Jump => rgb(0x8bc34a),
            PowerupKind::Health => rgb(0xe91e63),
        },
    }
}

enum Drawable<'a> {
    Entity(&'a Entity),
    Player(&'a Player),
}

impl Drawable<'_> {
    fn z(&self) -> f32 {
        match self {
            Drawable::Entity(e) => e.pos.z,
            Drawable::Player(p) => p.pos.z,
        }
    }
}

/// Builds frames. Owns the session backdrop and the cosmetic RNG.
pub struct SceneRenderer {
    camera: Camera,
    backdrop: Backdrop,
    /// Cosmetic randomness only; never touches the simulation RNG
    rng: Pcg32,
}

impl SceneRenderer {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let backdrop = Backdrop::generate(&mut rng);
        Self {
            camera: Camera::default(),
            backdrop,
            rng,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn build(&mut self, state: &GameState, view: &SceneView<'_>) -> Frame {
        let theme = view.time_of_day.theme();
        let mut frame = Frame::new();
        frame.clear = backdrop::horizon_color(theme);

        self.backdrop.draw(
            &mut frame,
            &BackdropView {
                theme,
                time_ms: view.time_ms,
                player_x: state.player.pos.x,
                ufo: view.assets.get(SpriteKey::Ufo),
                starfield: view.starfield,
                twinkle: view.twinkle,
            },
            &mut self.rng,
        );
        backdrop::draw_ground(&mut frame, theme);

        if view.shake && state.timers.shake > 0 {
            let mag = state.timers.shake as f32 * 0.5;
            let jitter = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * mag,
                (self.rng.random::<f32>() - 0.5) * mag,
            );
            frame.set_offset(jitter);
        }

        let mode = state.lane_mode();
        self.draw_road(&mut frame, state, theme, mode, view.time_ms);
        self.draw_lane_markers(&mut frame, state, theme, mode);

        let mut list: Vec<Drawable<'_>> = state
            .entities
            .iter()
            .filter(|e| !e.collected)
            .map(Drawable::Entity)
            .collect();
        list.push(Drawable::Player(&state.player));
        // Far to near
        list.sort_by(|a, b| b.z().total_cmp(&a.z()));

        for item in &list {
            match item {
                Drawable::Entity(e) => self.draw_entity(&mut frame, e, theme, view.assets),
                Drawable::Player(p) => self.draw_player(&mut frame, p, theme, view),
            }
        }

        for p in &state.particles {
            self.draw_particle(&mut frame, p);
        }
        frame.set_offset(Vec2::ZERO);

        let overlays = Overlays {
            incinerator: state.timers.incinerator > 0,
            jump: state.timers.jump_powerup > 0,
            two_lane: state.timers.two_lane > 0,
        };
        if overlays.incinerator {
            self.draw_flames(&mut frame, &state.player);
        }
        draw_banners(&mut frame, overlays);
        frame.overlays = overlays;

        frame
    }

    fn draw_road(
        &self,
        frame: &mut Frame,
        state: &GameState,
        theme: &Theme,
        mode: LaneMode,
        time_ms: f64,
    ) {
        let half = match mode {
            LaneMode::Three => ROAD_HALF_WIDTH_3,
            LaneMode::Two => ROAD_HALF_WIDTH_2,
        };
        // Just inside the projection guard so the road reaches the bottom edge
        let near = self.camera.near_z() + 1.0;
        let far = SPAWN_DISTANCE;

        let nl = self.camera.project(-half, 0.0, near);
        let nr = self.camera.project(half, 0.0, near);
        let fl = self.camera.project(-half, 0.0, far);
        let fr = self.camera.project(half, 0.0, far);
        if !(nl.visible && nr.visible) {
            return;
        }
        frame.fill(shapes::quad([nl.pos, nr.pos, fr.pos, fl.pos], theme.road));

        let travel = time_ms * state.speed as f64 * 0.1;
        for i in 0..GRIT_FLECKS {
            let along = ((travel + i as f64 * 500.0) % SPAWN_DISTANCE as f64) as f32;
            let z = SPAWN_DISTANCE - along;
            let x = (i as f32 * 132.1).sin() * LANE_WIDTH * 1.5;
            let p = self.camera.project(x, 0.0, z);
            if p.visible {
                let size = 20.0 * p.scale;
                frame.fill(shapes::rect(
                    p.pos.x,
                    p.pos.y,
                    size,
                    size * 0.2,
                    theme.road_texture,
                ));
            }
        }
    }

    fn draw_lane_markers(
        &self,
        frame: &mut Frame,
        state: &GameState,
        theme: &Theme,
        mode: LaneMode,
    ) {
        let dividers: &[f32] = match mode {
            LaneMode::Two => &DIVIDERS_2,
            LaneMode::Three => &DIVIDERS_3,
        };

        for &dx in dividers {
            let mut z = -200.0;
            while z < SPAWN_DISTANCE {
                let start = z - state.road_offset;
                z += ROAD_MARKER_PERIOD;
                if start < -CAMERA_DISTANCE + 50.0 {
                    continue;
                }
                let p1 = self.camera.project(dx, 0.0, start);
                let p2 = self.camera.project(dx, 0.0, start + ROAD_MARKER_LENGTH);
                if !(p1.visible && p2.visible) {
                    continue;
                }
                let width = (6.0 * p1.scale).max(2.0);
                if theme.lane_marker_glow[3] > 0.0 {
                    frame.fill(shapes::line(p1.pos, p2.pos, width * 3.0, theme.lane_marker_glow));
                }
                frame.fill(shapes::line(
                    p1.pos,
                    p2.pos,
                    width,
                    fogged(theme.lane_marker, theme.fog, start),
                ));
            }
        }
    }

    /// Box with its base at `pos.y`, centred on x and z
    fn draw_cube(&self, frame: &mut Frame, pos: Vec3, size: Dims, colors: CubeColors, fog: Rgba) {
        let (hw, hd) = (size.w / 2.0, size.d / 2.0);
        let cam = &self.camera;
        let (x, y, z) = (pos.x, pos.y, pos.z);

        let f_bl = cam.project(x - hw, y, z - hd);
        if !f_bl.visible {
            return;
        }
        let f_br = cam.project(x + hw, y, z - hd).pos;
        let f_tl = cam.project(x - hw, y + size.h, z - hd).pos;
        let f_tr = cam.project(x + hw, y + size.h, z - hd).pos;
        let b_bl = cam.project(x - hw, y, z + hd).pos;
        let b_br = cam.project(x + hw, y, z + hd).pos;
        let b_tl = cam.project(x - hw, y + size.h, z + hd).pos;
        let b_tr = cam.project(x + hw, y + size.h, z + hd).pos;
        let f_bl = f_bl.pos;

        frame.fill(shapes::quad(
            [f_tl, f_tr, b_tr, b_tl],
            fogged(colors.top, fog, z),
        ));
        // Only the face turned toward the road centre shows
        let side = fogged(colors.side, fog, z);
        if x < 0.0 {
            frame.fill(shapes::quad([f_tr, f_br, b_br, b_tr], side));
        } else if x > 0.0 {
            frame.fill(shapes::quad([f_tl, f_bl, b_bl, b_tl], side));
        }
        frame.fill(shapes::quad(
            [f_bl, f_br, f_tr, f_tl],
            fogged(colors.front, fog, z),
        ));
    }

    /// Billboard standing on the road with a ground shadow
    fn draw_billboard(&self, frame: &mut Frame, handle: SpriteHandle, pos: Vec3, w: f32, h: f32) {
        let p = self.camera.project(pos.x, pos.y + h / 2.0, pos.z);
        if !p.visible {
            return;
        }
        let draw = Vec2::new(w, h) * p.scale;

        let shadow = self.camera.project(pos.x, 0.0, pos.z);
        if shadow.visible {
            frame.fill(shapes::ellipse(
                shadow.pos,
                draw.x / 2.0,
                draw.x / 5.0,
                rgba(0x000000, 0.4),
                20,
            ));
        }
        frame.sprite(handle, p.pos, draw, WHITE);
    }

    fn draw_entity(&self, frame: &mut Frame, e: &Entity, theme: &Theme, assets: &AssetSnapshot) {
        match assets.get(SpriteKey::from(e.kind)) {
            Some(handle) => self.draw_billboard(frame, handle, e.pos, e.size.w, e.size.h),
            None => self.draw_cube(
                frame,
                e.pos,
                e.size,
                CubeColors::shaded(fallback_color(e.kind)),
                theme.fog,
            ),
        }
    }

    fn draw_player(&self, frame: &mut Frame, p: &Player, theme: &Theme, view: &SceneView<'_>) {
        let shadow = self.camera.project(p.pos.x, 0.0, p.pos.z);
        if shadow.visible {
            frame.fill(shapes::ellipse(
                shadow.pos,
                p.size.w * shadow.scale,
                p.size.w * 0.4 * shadow.scale,
                rgba(0x000000, 0.5),
                24,
            ));
        }

        match view.assets.get(SpriteKey::Truck) {
            Some(truck) => {
                let height = p.size.h * 1.2;
                let c = self.camera.project(p.pos.x, p.pos.y + height / 2.0, p.pos.z);
                if c.visible {
                    let size = Vec2::new(p.size.w, height) * c.scale * 1.3;
                    frame.sprite(truck, c.pos, size, WHITE);
                }
            }
            None => self.draw_truck(frame, p, theme.fog, view.time_ms),
        }

        if view.time_of_day.headlights() {
            self.draw_headlights(frame, p);
        }
    }

    /// Procedural truck for when the sprite is missing
    fn draw_truck(&self, frame: &mut Frame, p: &Player, fog: Rgba, time_ms: f64) {
        let Vec3 { x, y, z } = p.pos;
        let Dims { w, h, d } = p.size;
        let body_z = z - 20.0;
        let cabin_z = z + 35.0;
        let at = |dy: f32, z: f32| Vec3::new(x, y + dy, z);

        // Chassis
        self.draw_cube(
            frame,
            at(15.0, z),
            Dims::new(w * 0.8, 10.0, d),
            CubeColors::new(rgb(0x333333), rgb(0x444444), rgb(0x222222)),
            fog,
        );
        // Container body and stripe
        self.draw_cube(
            frame,
            at(45.0, body_z),
            Dims::new(w, h * 0.6, d * 0.8),
            CubeColors::new(rgb(0x14f195), rgb(0x10c479), rgb(0x0b8c56)),
            fog,
        );
        self.draw_cube(
            frame,
            at(45.0, body_z),
            Dims::new(w + 2.0, 10.0, d * 0.8 + 2.0),
            CubeColors::new(rgb(0xffffff), rgb(0xdddddd), rgb(0xcccccc)),
            fog,
        );
        // Cabin and windshield
        self.draw_cube(
            frame,
            at(35.0, cabin_z),
            Dims::new(w * 0.9, 30.0, 30.0),
            CubeColors::new(rgb(0x9945ff), rgb(0x7c3aed), rgb(0x6d28d9)),
            fog,
        );
        self.draw_cube(
            frame,
            at(45.0, cabin_z + 16.0),
            Dims::new(w * 0.8, 12.0, 2.0),
            CubeColors::new(rgb(0x60a5fa), rgb(0x93c5fd), rgb(0x3b82f6)),
            fog,
        );

        // Hubs alternate every 50 ms to fake rotation
        let hub = if (time_ms / 50.0).floor() as i64 % 2 == 0 {
            rgb(0x555555)
        } else {
            rgb(0x888888)
        };
        let wx = w / 2.0 + 5.0;
        for (wheel_x, wheel_z) in [
            (x - wx, z - 25.0),
            (x + wx, z - 25.0),
            (x - wx, z + 25.0),
            (x + wx, z + 25.0),
        ] {
            self.draw_cube(
                frame,
                Vec3::new(wheel_x, y + 12.0, wheel_z),
                Dims::new(12.0, 24.0, 24.0),
                CubeColors::new(rgb(0x111111), rgb(0x222222), rgb(0x000000)),
                fog,
            );
            let hub_x = if wheel_x > x {
                wheel_x + 6.0
            } else {
                wheel_x - 6.0
            };
            self.draw_cube(
                frame,
                Vec3::new(hub_x, y + 12.0, wheel_z),
                Dims::new(2.0, 10.0, 10.0),
                CubeColors::new(hub, hub, hub),
                fog,
            );
        }
    }

    fn draw_headlights(&self, frame: &mut Frame, p: &Player) {
        const BEAM_ALPHA: f32 = 0.6;
        let lamp_z = p.pos.z + 35.0 + 18.0;
        let lamp_y = 25.0 + p.pos.y;
        let reach = lamp_z + 600.0;

        // (lamp x, beam edge x, beam edge x) relative to the truck
        for (lamp, edge_a, edge_b) in [(-25.0, -80.0, 30.0), (25.0, -30.0, 80.0)] {
            let x = p.pos.x;
            let start = self.camera.project(x + lamp, lamp_y, lamp_z);
            if !start.visible {
                continue;
            }
            let a = self.camera.project(x + edge_a, lamp_y, reach).pos;
            let b = self.camera.project(x + edge_b, lamp_y, reach).pos;

            let hot = [1.0, 1.0, 220.0 / 255.0, BEAM_ALPHA];
            let mid = [1.0, 1.0, 200.0 / 255.0, 0.3 * BEAM_ALPHA];
            let end = [1.0, 1.0, 200.0 / 255.0, 0.0];
            let a7 = start.pos.lerp(a, 0.7);
            let b7 = start.pos.lerp(b, 0.7);
            frame.fill(shapes::shaded_triangle([
                (start.pos, hot),
                (a7, mid),
                (b7, mid),
            ]));
            frame.fill(shapes::shaded_triangle([(a7, mid), (a, end), (b, end)]));
            frame.fill(shapes::shaded_triangle([(a7, mid), (b, end), (b7, mid)]));

            // Lamp glare
            let r = 10.0 * start.scale;
            frame.set_blend(Blend::Additive);
            frame.fill(shapes::radial_gradient(
                start.pos,
                r * 2.5,
                &[(0.0, rgba(0xffff00, 0.6)), (1.0, rgba(0xffff00, 0.0))],
                16,
            ));
            frame.set_blend(Blend::Alpha);
            frame.fill(shapes::circle(start.pos, r, WHITE, 16));
        }
    }

    fn draw_particle(&self, frame: &mut Frame, p: &Particle) {
        let pos = self.camera.project_point(p.pos);
        if !pos.visible {
            return;
        }
        let angle = p.rotation.to_radians();
        let size = p.size * pos.scale;
        let alpha = p.life
            * match p.kind {
                ParticleKind::Exhaust => 0.4,
                _ => 1.0,
            };
        let center = pos.pos;

        match p.kind {
            ParticleKind::Sparkle => {
                frame.fill(shapes::sparkle(center, size, angle, with_alpha(p.color, alpha)));
            }
            ParticleKind::DollarBill => {
                let ink = rgba(0x2d5016, alpha);
                frame.fill(shapes::rotated_rect(
                    center,
                    size * 2.0,
                    size,
                    angle,
                    rgba(0x85bb65, alpha),
                ));
                frame.fill(shapes::rotated_frame(
                    center,
                    size * 2.0,
                    size,
                    angle,
                    (size * 0.15).max(1.0),
                    ink,
                ));
                // Dollar mark
                frame.fill(shapes::rotated_rect(center, size * 0.15, size * 0.7, angle, ink));
            }
            ParticleKind::Debris | ParticleKind::Exhaust => {
                frame.fill(shapes::rotated_rect(
                    center,
                    size,
                    size,
                    angle,
                    with_alpha(p.color, alpha),
                ));
            }
        }
    }

    /// Flame stream ahead of the truck
    fn draw_flames(&mut self, frame: &mut Frame, p: &Player) {
        frame.set_blend(Blend::Additive);
        for i in 0..FLAME_PUFFS {
            let z = p.pos.z + 100.0 + i as f32 * 60.0;
            let x = p.pos.x + (self.rng.random::<f32>() - 0.5) * 40.0;
            let y = 30.0 + self.rng.random::<f32>() * 30.0;
            let proj = self.camera.project(x, y, z);
            if proj.visible {
                frame.fill(shapes::radial_gradient(
                    proj.pos,
                    80.0 * proj.scale,
                    &[
                        (0.0, [1.0, 1.0, 200.0 / 255.0, 1.0]),
                        (0.4, [1.0, 100.0 / 255.0, 0.0, 0.8]),
                        (1.0, [1.0, 0.0, 0.0, 0.0]),
                    ],
                    24,
                ));
            }
        }
        frame.set_blend(Blend::Alpha);
    }
}

/// Backing bars for the mode banners; the shell lays text over them
fn draw_banners(frame: &mut Frame, overlays: Overlays) {
    let bars = [
        (overlays.incinerator, 150.0, rgb(0xffa500)),
        (overlays.jump, 180.0, rgb(0x00ff00)),
        (overlays.two_lane, 210.0, rgb(0x14f195)),
    ];
    let width = 360.0;
    let x = (CANVAS_WIDTH - width) / 2.0;
    for (active, baseline, accent) in bars {
        if !active {
            continue;
        }
        frame.fill(shapes::rect(x, baseline - 22.0, width, 28.0, rgba(0x000000, 0.45)));
        frame.fill(shapes::rect(x, baseline + 4.0, width, 2.0, accent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::canvas::Batch;
    use crate::sim::{GamePhase, ObstacleKind};

    fn playing() -> GameState {
        let mut state = GameState::new(9);
        state.phase = GamePhase::Playing;
        state
    }

    fn view(assets: &AssetSnapshot, tod: TimeOfDay) -> SceneView<'_> {
        SceneView {
            time_of_day: tod,
            assets,
            time_ms: 1000.0,
            shake: true,
            starfield: true,
            twinkle: true,
        }
    }

    fn entity(state: &mut GameState, kind: EntityKind, lane: usize, z: f32) -> u32 {
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            kind,
            lane,
            pos: Vec3::new(LANE_X_POSITIONS[lane], 0.0, z),
            size: kind.dims(),
            collected: false,
        });
        id
    }

    #[test]
    fn test_shake_stays_on_world_layer() {
        let mut state = playing();
        state.timers.shake = SHAKE_TICKS;
        state.timers.two_lane = TWO_LANE_TICKS;
        let assets = AssetSnapshot::empty();
        let mut scene = SceneRenderer::new(3);
        let frame = scene.build(&state, &view(&assets, TimeOfDay::Day));

        assert_eq!(frame.offset(), Vec2::ZERO);
        // Two-lane accent bar is the last thing painted
        let x = (CANVAS_WIDTH - 360.0) / 2.0;
        let bar = shapes::rect(x, 214.0, 360.0, 2.0, rgb(0x14f195));
        let tail = &frame.vertices[frame.vertices.len() - bar.len()..];
        for (got, want) in tail.iter().zip(&bar) {
            assert_eq!(got.position, want.position);
        }
    }

    #[test]
    fn test_no_assets_still_paints() {
        let mut state = playing();
        entity(&mut state, EntityKind::Obstacle(ObstacleKind::TrashBag), 0, 800.0);
        let assets = AssetSnapshot::empty();
        let mut scene = SceneRenderer::new(1);
        let frame = scene.build(&state, &view(&assets, TimeOfDay::Night));
        assert!(!frame.vertices.is_empty());
        assert!(frame.sprite_vertices.is_empty());
        assert!(frame
            .batches
            .iter()
            .all(|b| matches!(b, Batch::Shapes { .. })));
    }

    #[test]
    fn test_sprites_used_when_ready() {
        let mut state = playing();
        entity(
            &mut state,
            EntityKind::Collectible(CollectibleKind::Coin),
            2,
            900.0,
        );

        let mut table = crate::assets::AssetTable::new();
        let coin = SpriteHandle {
            id: 7,
            width: 64,
            height: 64,
        };
        table.mark_ready(SpriteKey::Coin, coin);
        let assets = table.snapshot();

        let mut scene = SceneRenderer::new(1);
        let frame = scene.build(&state, &view(&assets, TimeOfDay::Day));
        let sprites: Vec<_> = frame
            .batches
            .iter()
            .filter_map(|b| match b {
                Batch::Sprite { handle, .. } => Some(*handle),
                _ => None,
            })
            .collect();
        assert_eq!(sprites, vec![coin]);
    }

    #[test]
    fn test_painters_order_far_to_near() {
        let mut state = playing();
        entity(&mut state, EntityKind::Powerup(PowerupKind::Health), 0, 400.0);
        entity(&mut state, EntityKind::Powerup(PowerupKind::Jump), 2, 2000.0);

        let mut table = crate::assets::AssetTable::new();
        let near = SpriteHandle {
            id: 1,
            width: 1,
            height: 1,
        };
        let far = SpriteHandle { id: 2, ..near };
        let truck = SpriteHandle { id: 3, ..near };
        table.mark_ready(SpriteKey::Health, near);
        table.mark_ready(SpriteKey::JumpConsole, far);
        table.mark_ready(SpriteKey::Truck, truck);
        let assets = table.snapshot();

        let mut scene = SceneRenderer::new(1);
        let frame = scene.build(&state, &view(&assets, TimeOfDay::Day));
        let order: Vec<u32> = frame
            .batches
            .iter()
            .filter_map(|b| match b {
                Batch::Sprite { handle, .. } => Some(handle.id),
                _ => None,
            })
            .collect();
        // Player sits at z = 100, nearest of all
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn test_collected_entities_not_drawn() {
        let mut state = playing();
        entity(&mut state, EntityKind::Collectible(CollectibleKind::Coin), 1, 900.0);
        state.entities[0].collected = true;

        let mut table = crate::assets::AssetTable::new();
        table.mark_ready(
            SpriteKey::Coin,
            SpriteHandle {
                id: 0,
                width: 1,
                height: 1,
            },
        );
        let assets = table.snapshot();
        let mut scene = SceneRenderer::new(1);
        let frame = scene.build(&state, &view(&assets, TimeOfDay::Day));
        assert!(frame.sprite_vertices.is_empty());
    }

    #[test]
    fn test_overlays_follow_timers() {
        let mut state = playing();
        state.timers.incinerator = 10;
        state.timers.two_lane = 5;
        let assets = AssetSnapshot::empty();
        let mut scene = SceneRenderer::new(1);
        let frame = scene.build(&state, &view(&assets, TimeOfDay::Day));
        assert_eq!(
            frame.overlays,
            Overlays {
                incinerator: true,
                jump: false,
                two_lane: true
            }
        );
        assert!(frame.batches.iter().any(|b| matches!(
            b,
            Batch::Shapes {
                blend: Blend::Additive,
                ..
            }
        )));
    }

    #[test]
    fn test_shake_only_when_enabled() {
        let mut state = playing();
        state.timers.shake = SHAKE_TICKS;
        let assets = AssetSnapshot::empty();

        let mut a = SceneRenderer::new(5);
        let mut b = SceneRenderer::new(5);
        let still = a.build(&state, &SceneView {
            shake: false,
            ..view(&assets, TimeOfDay::Day)
        });
        let shaken = b.build(&state, &view(&assets, TimeOfDay::Day));

        // Backdrop matches; the first shifted vertex is the road
        let (calm, moved) = still
            .vertices
            .iter()
            .zip(&shaken.vertices)
            .find(|(a, b)| a.position != b.position)
            .expect("world layer shaken");
        let off = Vec2::new(
            moved.position[0] - calm.position[0],
            moved.position[1] - calm.position[1],
        );
        let mag = SHAKE_TICKS as f32 * 0.5;
        assert!(off.x.abs() <= mag / 2.0 + 1e-3 && off.y.abs() <= mag / 2.0 + 1e-3);
    }

    #[test]
    fn test_headlights_only_after_dark() {
        let assets = AssetSnapshot::empty();
        let scene = SceneRenderer::new(3);
        let player = Player::default();
        let count = |tod: TimeOfDay| {
            let mut frame = Frame::new();
            scene.draw_player(&mut frame, &player, tod.theme(), &view(&assets, tod));
            frame.vertices.len()
        };
        assert!(count(TimeOfDay::Night) > count(TimeOfDay::Day));
        assert_eq!(count(TimeOfDay::Night), count(TimeOfDay::Twilight));
    }

    #[test]
    fn test_cube_side_faces() {
        let scene = SceneRenderer::new(1);
        let fog = WHITE;
        let colors = CubeColors::shaded(rgb(0x808080));
        let faces = |x: f32| {
            let mut frame = Frame::new();
            scene.draw_cube(&mut frame, Vec3::new(x, 0.0, 500.0), OBSTACLE_SIZE, colors, fog);
            frame.vertices.len() / 6
        };
        assert_eq!(faces(0.0), 2);
        assert_eq!(faces(-150.0), 3);
        assert_eq!(faces(150.0), 3);

        let mut frame = Frame::new();
        scene.draw_cube(&mut frame, Vec3::new(0.0, 0.0, -200.0), OBSTACLE_SIZE, colors, fog);
        assert!(frame.vertices.is_empty());
    }
}
