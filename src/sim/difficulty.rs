//! Speed ramp, milestones and timed modes

use super::state::{GameEvent, GameState, LaneMode};
use crate::audio::SoundEffect;
use crate::tuning::*;

/// Raise speed by one tick's increment, cueing a milestone every
/// `SPEED_MILESTONE_STEP` gained.
pub fn advance_speed(state: &mut GameState) {
    state.speed = (state.speed + SPEED_INCREMENT).min(MAX_SPEED);
    if state.speed >= state.speed_milestone + SPEED_MILESTONE_STEP {
        state.speed_milestone = state.speed;
        log::debug!("speed milestone {:.1}", state.speed);
        state.emit(GameEvent::Sound(SoundEffect::SpeedUp));
    }
}

/// Count every active timer down by one; run the expiry hooks on the tick a
/// timer reaches zero.
pub fn advance_timers(state: &mut GameState) {
    let timers = &mut state.timers;
    timers.incinerator = timers.incinerator.saturating_sub(1);
    timers.jump_powerup = timers.jump_powerup.saturating_sub(1);
    timers.shake = timers.shake.saturating_sub(1);

    if timers.two_lane > 0 {
        timers.two_lane -= 1;
        if timers.two_lane == 0 {
            end_two_lane_mode(state);
        }
    }
}

/// Back to three lanes. Out-of-range lanes snap to the centre.
fn end_two_lane_mode(state: &mut GameState) {
    let lane = if state.player.lane >= LaneMode::Three.count() {
        1
    } else {
        state.player.lane
    };
    state.player.snap_to_lane(lane, LaneMode::Three);
}

/// Enter (or extend) two-lane mode, pulling the player into lane 0 or 1
pub fn start_two_lane_mode(state: &mut GameState) {
    state.timers.two_lane = TWO_LANE_TICKS;
    let lane = state.player.lane.min(1);
    state.player.snap_to_lane(lane, LaneMode::Two);
}

pub fn advance(state: &mut GameState) {
    advance_speed(state);
    advance_timers(state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_ramps_and_clamps() {
        let mut state = GameState::new(1);
        advance_speed(&mut state);
        assert!((state.speed - (INITIAL_SPEED + SPEED_INCREMENT)).abs() < 1e-6);

        state.speed = MAX_SPEED - SPEED_INCREMENT / 2.0;
        advance_speed(&mut state);
        assert_eq!(state.speed, MAX_SPEED);
        advance_speed(&mut state);
        assert_eq!(state.speed, MAX_SPEED);
    }

    #[test]
    fn test_milestone_cue_fires_once_per_step() {
        let mut state = GameState::new(1);
        let ticks = ((SPEED_MILESTONE_STEP / SPEED_INCREMENT) as usize) + 5;
        for _ in 0..ticks {
            advance_speed(&mut state);
        }
        let cues = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::Sound(SoundEffect::SpeedUp))
            .count();
        assert_eq!(cues, 1);
        assert!(state.speed_milestone >= INITIAL_SPEED + SPEED_MILESTONE_STEP);
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut state = GameState::new(1);
        state.timers.incinerator = 2;
        state.timers.shake = 1;
        advance_timers(&mut state);
        advance_timers(&mut state);
        advance_timers(&mut state);
        assert_eq!(state.timers.incinerator, 0);
        assert_eq!(state.timers.shake, 0);
    }

    #[test]
    fn test_two_lane_entry_clamps_lane() {
        let mut state = GameState::new(1);
        state.player.snap_to_lane(2, LaneMode::Three);
        start_two_lane_mode(&mut state);
        assert_eq!(state.player.lane, 1);
        assert_eq!(state.player.pos.x, LANE_X_POSITIONS_2[1]);
        assert_eq!(state.timers.two_lane, TWO_LANE_TICKS);
    }

    #[test]
    fn test_two_lane_expiry_restores_three_lane_positions() {
        let mut state = GameState::new(1);
        start_two_lane_mode(&mut state);
        state.player.snap_to_lane(0, LaneMode::Two);
        state.timers.two_lane = 1;
        advance_timers(&mut state);
        assert_eq!(state.lane_mode(), LaneMode::Three);
        assert_eq!(state.player.lane, 0);
        assert_eq!(state.player.pos.x, LANE_X_POSITIONS[0]);
    }

    #[test]
    fn test_two_lane_expiry_snaps_out_of_range_lane_to_centre() {
        let mut state = GameState::new(1);
        state.timers.two_lane = 1;
        state.player.lane = 5;
        advance_timers(&mut state);
        assert_eq!(state.player.lane, 1);
        assert_eq!(state.player.pos.x, LANE_X_POSITIONS[1]);
    }
}
