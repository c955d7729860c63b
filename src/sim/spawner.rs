//! Procedural entity spawning
//!
//! Entities appear at `SPAWN_DISTANCE` in a random lane. Category and subtype
//! come from two independent uniform draws against fixed cumulative tables.

use glam::Vec3;
use rand::Rng;

use super::state::{
    CollectibleKind, Entity, EntityKind, GameState, ObstacleKind, PowerupKind,
};
use crate::tuning::*;

/// Entity category from a uniform draw in [0, 1)
///
/// 60% obstacle, 35% collectible, 5% powerup.
pub fn pick_category(roll: f32) -> Category {
    if roll > 0.95 {
        Category::Powerup
    } else if roll > 0.60 {
        Category::Collectible
    } else {
        Category::Obstacle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Obstacle,
    Collectible,
    Powerup,
}

/// Coin 50%, banana 20%, sticker-pill 10%, sticker-3 10%, wallet 5%,
/// and the bottom 5% falls back to coin.
pub fn pick_collectible(roll: f32) -> CollectibleKind {
    if roll > 0.5 {
        CollectibleKind::Coin
    } else if roll > 0.3 {
        CollectibleKind::Banana
    } else if roll > 0.2 {
        CollectibleKind::StickerPill
    } else if roll > 0.1 {
        CollectibleKind::Sticker3
    } else if roll > 0.05 {
        CollectibleKind::Wallet
    } else {
        CollectibleKind::Coin
    }
}

/// Health 34%, incinerator 33%, jump 33%
pub fn pick_powerup(roll: f32) -> PowerupKind {
    if roll > 0.66 {
        PowerupKind::Health
    } else if roll > 0.33 {
        PowerupKind::Incinerator
    } else {
        PowerupKind::Jump
    }
}

pub fn pick_kind(category_roll: f32, subtype_roll: f32) -> EntityKind {
    match pick_category(category_roll) {
        Category::Obstacle => EntityKind::Obstacle(ObstacleKind::TrashBag),
        Category::Collectible => EntityKind::Collectible(pick_collectible(subtype_roll)),
        Category::Powerup => EntityKind::Powerup(pick_powerup(subtype_roll)),
    }
}

/// Ticks between spawn attempts at `speed`, never below `MIN_SPAWN_RATE`
pub fn spawn_rate(speed: f32) -> f32 {
    (SPAWN_RATE_INITIAL - (speed - INITIAL_SPEED) * SPAWN_RATE_PER_SPEED).max(MIN_SPAWN_RATE)
}

/// True when a live entity already sits near the spawn point for `lane_x`
pub fn spawn_blocked(entities: &[Entity], lane_x: f32) -> bool {
    entities.iter().any(|e| {
        !e.collected
            && (e.pos.x - lane_x).abs() < SPAWN_LATERAL_CLEARANCE
            && (e.pos.z - SPAWN_DISTANCE).abs() < SPAWN_DEPTH_CLEARANCE
    })
}

/// Try to place one entity. Returns its id, or `None` when the spacing
/// guard rejected the attempt (no retry).
pub fn spawn_entity(state: &mut GameState) -> Option<u32> {
    let mode = state.lane_mode();
    let lane = state.rng.random_range(0..mode.count());
    let lane_x = mode.lane_x(lane);

    let category_roll: f32 = state.rng.random();
    let subtype_roll: f32 = state.rng.random();
    let kind = pick_kind(category_roll, subtype_roll);

    if spawn_blocked(&state.entities, lane_x) {
        log::trace!("spawn skipped: lane {} crowded", lane);
        return None;
    }

    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        kind,
        lane,
        pos: Vec3::new(lane_x, 0.0, SPAWN_DISTANCE),
        size: kind.dims(),
        collected: false,
    });
    Some(id)
}

/// Advance the spawn cadence by one tick, spawning when due
pub fn update_spawner(state: &mut GameState) {
    state.spawn_timer += 1;
    if state.spawn_timer as f32 >= spawn_rate(state.speed) {
        spawn_entity(state);
        state.spawn_timer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::LaneMode;

    #[test]
    fn test_category_thresholds() {
        assert_eq!(pick_category(0.0), Category::Obstacle);
        assert_eq!(pick_category(0.60), Category::Obstacle);
        assert_eq!(pick_category(0.61), Category::Collectible);
        assert_eq!(pick_category(0.95), Category::Collectible);
        assert_eq!(pick_category(0.951), Category::Powerup);
    }

    #[test]
    fn test_collectible_thresholds() {
        assert_eq!(pick_collectible(0.9), CollectibleKind::Coin);
        assert_eq!(pick_collectible(0.4), CollectibleKind::Banana);
        assert_eq!(pick_collectible(0.25), CollectibleKind::StickerPill);
        assert_eq!(pick_collectible(0.15), CollectibleKind::Sticker3);
        assert_eq!(pick_collectible(0.07), CollectibleKind::Wallet);
        assert_eq!(pick_collectible(0.01), CollectibleKind::Coin);
    }

    #[test]
    fn test_powerup_thresholds() {
        assert_eq!(pick_powerup(0.9), PowerupKind::Health);
        assert_eq!(pick_powerup(0.5), PowerupKind::Incinerator);
        assert_eq!(pick_powerup(0.1), PowerupKind::Jump);
    }

    #[test]
    fn test_spawn_rate_shrinks_and_clamps() {
        assert_eq!(spawn_rate(INITIAL_SPEED), SPAWN_RATE_INITIAL);
        assert!(spawn_rate(INITIAL_SPEED + 5.0) < SPAWN_RATE_INITIAL);
        assert_eq!(spawn_rate(20.0), 45.0);
        assert_eq!(spawn_rate(MAX_SPEED), 40.0);
        assert_eq!(spawn_rate(1000.0), MIN_SPAWN_RATE);
    }

    #[test]
    fn test_spawned_entity_at_spawn_depth_in_valid_lane() {
        let mut state = GameState::new(7);
        for _ in 0..50 {
            state.entities.clear();
            let id = spawn_entity(&mut state).expect("empty road never blocks");
            let e = state.entities.iter().find(|e| e.id == id).unwrap();
            assert_eq!(e.pos.z, SPAWN_DISTANCE);
            assert!(e.lane < 3);
            assert_eq!(e.pos.x, LANE_X_POSITIONS[e.lane]);
            assert_eq!(e.size, e.kind.dims());
        }
    }

    #[test]
    fn test_two_lane_mode_spawns_in_two_lanes() {
        let mut state = GameState::new(11);
        state.timers.two_lane = 100;
        for _ in 0..50 {
            state.entities.clear();
            spawn_entity(&mut state);
            let e = &state.entities[0];
            assert!(e.lane < 2);
            assert_eq!(e.pos.x, LaneMode::Two.lane_x(e.lane));
        }
    }

    #[test]
    fn test_spacing_guard_rejects_crowded_spawn() {
        let mut state = GameState::new(3);
        // Block every lane near the spawn point
        for (i, &x) in LANE_X_POSITIONS.iter().enumerate() {
            let id = state.next_entity_id();
            state.entities.push(Entity {
                id,
                kind: EntityKind::Obstacle(ObstacleKind::TrashBag),
                lane: i,
                pos: Vec3::new(x, 0.0, SPAWN_DISTANCE - 100.0),
                size: OBSTACLE_SIZE,
                collected: false,
            });
        }
        assert_eq!(spawn_entity(&mut state), None);
        assert_eq!(state.entities.len(), 3);
    }

    #[test]
    fn test_spacing_guard_ignores_collected_and_distant() {
        let mut entities = vec![Entity {
            id: 1,
            kind: EntityKind::Obstacle(ObstacleKind::TrashBag),
            lane: 1,
            pos: Vec3::new(0.0, 0.0, SPAWN_DISTANCE),
            size: OBSTACLE_SIZE,
            collected: true,
        }];
        assert!(!spawn_blocked(&entities, 0.0));

        entities[0].collected = false;
        assert!(spawn_blocked(&entities, 0.0));
        assert!(!spawn_blocked(&entities, 150.0));

        entities[0].pos.z = SPAWN_DISTANCE - SPAWN_DEPTH_CLEARANCE;
        assert!(!spawn_blocked(&entities, 0.0));
    }

    #[test]
    fn test_cadence_spawns_when_due() {
        let mut state = GameState::new(5);
        let rate = spawn_rate(state.speed) as u32;
        for _ in 0..rate - 1 {
            update_spawner(&mut state);
        }
        assert!(state.entities.is_empty());
        update_spawner(&mut state);
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.spawn_timer, 0);
    }
}
