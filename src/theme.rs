//! Time-of-day palettes
//!
//! Picked once when the session starts and never changed during play.

use serde::{Deserialize, Serialize};

use crate::renderer::color::{Rgba, rgb, rgba};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Day,
    Twilight,
    Night,
}

impl TimeOfDay {
    /// Day 07-19, twilight 05-07 and 19-20, night otherwise
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            7..=18 => TimeOfDay::Day,
            5..=6 | 19 => TimeOfDay::Twilight,
            _ => TimeOfDay::Night,
        }
    }

    /// Whether the truck runs with its headlights on
    pub fn headlights(self) -> bool {
        !matches!(self, TimeOfDay::Day)
    }

    pub fn theme(self) -> &'static Theme {
        match self {
            TimeOfDay::Day => &DAY,
            TimeOfDay::Twilight => &TWILIGHT,
            TimeOfDay::Night => &NIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub sky_top: Rgba,
    pub sky_middle: Rgba,
    pub sky_bottom: Rgba,
    /// 0 hides the starfield
    pub stars_opacity: f32,
    pub road: Rgba,
    pub road_texture: Rgba,
    pub ground: Rgba,
    pub lane_marker: Rgba,
    pub lane_marker_glow: Rgba,
    pub city_back: Rgba,
    pub city_front: Rgba,
    pub window_warm: Rgba,
    pub window_cool: Rgba,
    pub fog: Rgba,
}

pub const DAY: Theme = Theme {
    sky_top: rgb(0x4a90d9),
    sky_middle: rgb(0x87ceeb),
    sky_bottom: rgb(0xf0e6d2),
    stars_opacity: 0.0,
    road: rgb(0x4a4a4a),
    road_texture: rgb(0x5c5c5c),
    ground: rgb(0x7a8b5a),
    lane_marker: rgb(0xffffff),
    lane_marker_glow: rgba(0xffffff, 0.0),
    city_back: rgb(0x8fa3b8),
    city_front: rgb(0x6b7b8c),
    window_warm: rgb(0xfff0b3),
    window_cool: rgb(0xc4e8ff),
    fog: rgb(0xd8e4ec),
};

pub const TWILIGHT: Theme = Theme {
    sky_top: rgb(0x2c1e4a),
    sky_middle: rgb(0xc2577a),
    sky_bottom: rgb(0xffb46b),
    stars_opacity: 0.4,
    road: rgb(0x3a3440),
    road_texture: rgb(0x4a4350),
    ground: rgb(0x3d2f3f),
    lane_marker: rgb(0xffd27f),
    lane_marker_glow: rgba(0xff9f43, 0.25),
    city_back: rgb(0x4a3558),
    city_front: rgb(0x2e2238),
    window_warm: rgb(0xffb347),
    window_cool: rgb(0x9fd8ff),
    fog: rgb(0x8e5a78),
};

pub const NIGHT: Theme = Theme {
    sky_top: rgb(0x05050f),
    sky_middle: rgb(0x0d1030),
    sky_bottom: rgb(0x2a1b4d),
    stars_opacity: 1.0,
    road: rgb(0x1e1e24),
    road_texture: rgb(0x2a2a33),
    ground: rgb(0x101018),
    lane_marker: rgb(0x00f0ff),
    lane_marker_glow: rgba(0x00f0ff, 0.35),
    city_back: rgb(0x151530),
    city_front: rgb(0x0b0b1e),
    window_warm: rgb(0xffc46b),
    window_cool: rgb(0x66e0ff),
    fog: rgb(0x120e24),
};
