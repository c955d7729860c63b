//! Input mapping
//!
//! Turns keys, taps, and swipes into lane/jump intents. Events arrive between
//! ticks and only ever overwrite the pending [`TickInput`]; the next tick
//! consumes it once.

use glam::Vec2;

use crate::sim::{GameState, TickInput};
use crate::tuning::SWIPE_THRESHOLD;

/// Discrete player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    LaneLeft,
    LaneRight,
    Jump,
}

impl Command {
    /// Map a `KeyboardEvent.code`
    pub fn from_key(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Command::LaneLeft),
            "ArrowRight" | "KeyD" => Some(Command::LaneRight),
            "Space" | "ArrowUp" | "KeyW" => Some(Command::Jump),
            _ => None,
        }
    }
}

/// Commands for a finished touch gesture.
///
/// Horizontal travel past the threshold is a lane change; upward travel past
/// it is a jump. A diagonal swipe can produce both.
pub fn swipe_commands(start: Vec2, end: Vec2) -> Vec<Command> {
    let dx = end.x - start.x;
    // Screen y grows downward
    let rise = start.y - end.y;

    let mut commands = Vec::with_capacity(2);
    if dx.abs() > SWIPE_THRESHOLD {
        commands.push(if dx > 0.0 {
            Command::LaneRight
        } else {
            Command::LaneLeft
        });
    }
    if rise > SWIPE_THRESHOLD {
        commands.push(Command::Jump);
    }
    commands
}

#[derive(Debug, Default)]
pub struct InputMapper {
    touch_start: Option<Vec2>,
    pending: TickInput,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `cmd` into the pending intents. Ignored outside a run.
    pub fn apply(&mut self, cmd: Command, state: &GameState) {
        if !state.is_playing() {
            return;
        }
        let mode = state.lane_mode();
        match cmd {
            Command::LaneLeft | Command::LaneRight => {
                // Relative to any target already queued this frame
                let from = mode.clamp_lane(self.pending.lane_target.unwrap_or(state.player.lane));
                let to = match cmd {
                    Command::LaneLeft => from.saturating_sub(1),
                    _ => mode.clamp_lane(from + 1),
                };
                self.pending.lane_target = (to != state.player.lane).then_some(to);
            }
            Command::Jump => self.pending.jump = true,
        }
    }

    /// Returns true when the key was one of ours
    pub fn key_down(&mut self, code: &str, state: &GameState) -> bool {
        match Command::from_key(code) {
            Some(cmd) => {
                self.apply(cmd, state);
                true
            }
            None => false,
        }
    }

    pub fn touch_start(&mut self, pos: Vec2, state: &GameState) {
        if state.is_playing() {
            self.touch_start = Some(pos);
        }
    }

    pub fn touch_end(&mut self, pos: Vec2, state: &GameState) {
        let Some(start) = self.touch_start.take() else {
            return;
        };
        for cmd in swipe_commands(start, pos) {
            self.apply(cmd, state);
        }
    }

    /// Hand the pending intents to a tick and clear them
    pub fn take(&mut self) -> TickInput {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.touch_start = None;
        self.pending = TickInput::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GamePhase, LaneMode, tick};
    use proptest::prelude::*;

    fn playing() -> GameState {
        let mut state = GameState::new(3);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Command::from_key("ArrowLeft"), Some(Command::LaneLeft));
        assert_eq!(Command::from_key("ArrowRight"), Some(Command::LaneRight));
        assert_eq!(Command::from_key("Space"), Some(Command::Jump));
        assert_eq!(Command::from_key("Enter"), None);
    }

    #[test]
    fn test_swipe_thresholds() {
        let o = Vec2::new(100.0, 100.0);
        assert!(swipe_commands(o, o + Vec2::new(50.0, 0.0)).is_empty());
        assert_eq!(
            swipe_commands(o, o + Vec2::new(51.0, 0.0)),
            vec![Command::LaneRight]
        );
        assert_eq!(
            swipe_commands(o, o - Vec2::new(80.0, 0.0)),
            vec![Command::LaneLeft]
        );
        assert_eq!(
            swipe_commands(o, o - Vec2::new(0.0, 60.0)),
            vec![Command::Jump]
        );
        // Downward swipe is not a jump
        assert!(swipe_commands(o, o + Vec2::new(0.0, 200.0)).is_empty());
        assert_eq!(
            swipe_commands(o, o + Vec2::new(-70.0, -70.0)),
            vec![Command::LaneLeft, Command::Jump]
        );
    }

    #[test]
    fn test_boundary_is_a_no_op() {
        let mut state = playing();
        state.player.snap_to_lane(0, LaneMode::Three);
        let mut input = InputMapper::new();
        input.apply(Command::LaneLeft, &state);
        assert_eq!(input.take(), TickInput::default());
    }

    #[test]
    fn test_two_presses_before_a_tick_move_two_lanes() {
        let mut state = playing();
        state.player.snap_to_lane(0, LaneMode::Three);
        let mut input = InputMapper::new();
        input.apply(Command::LaneRight, &state);
        input.apply(Command::LaneRight, &state);
        input.apply(Command::LaneRight, &state);
        assert_eq!(input.take().lane_target, Some(2));
    }

    #[test]
    fn test_right_is_clamped_in_two_lane_mode() {
        let mut state = playing();
        state.timers.two_lane = 10;
        state.player.snap_to_lane(1, LaneMode::Two);
        let mut input = InputMapper::new();
        input.apply(Command::LaneRight, &state);
        assert_eq!(input.take().lane_target, None);
    }

    #[test]
    fn test_ignored_outside_a_run() {
        let state = GameState::new(1);
        let mut input = InputMapper::new();
        assert!(input.key_down("Space", &state));
        input.touch_start(Vec2::ZERO, &state);
        input.touch_end(Vec2::new(200.0, 0.0), &state);
        assert_eq!(input.take(), TickInput::default());
    }

    #[test]
    fn test_take_clears_intents() {
        let state = playing();
        let mut input = InputMapper::new();
        input.apply(Command::Jump, &state);
        assert!(input.take().jump);
        assert!(!input.take().jump);
    }

    fn command() -> impl Strategy<Value = Option<Command>> {
        prop_oneof![
            Just(None),
            Just(Some(Command::LaneLeft)),
            Just(Some(Command::LaneRight)),
            Just(Some(Command::Jump)),
        ]
    }

    proptest! {
        #[test]
        fn prop_lane_always_valid_for_mode(
            commands in prop::collection::vec(command(), 1..400),
            two_lane_at in 0usize..400,
        ) {
            let mut state = playing();
            let mut input = InputMapper::new();
            for (i, cmd) in commands.into_iter().enumerate() {
                if i == two_lane_at {
                    crate::sim::difficulty::start_two_lane_mode(&mut state);
                }
                if let Some(cmd) = cmd {
                    input.apply(cmd, &state);
                }
                let intents = input.take();
                tick(&mut state, &intents);
                let mode = state.lane_mode();
                prop_assert!(state.player.lane < mode.count());
                prop_assert_eq!(state.player.pos.x, mode.lane_x(state.player.lane));
            }
        }
    }
}
