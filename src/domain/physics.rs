/// Motion constants and vertical integration — single source of truth.
///
/// ## Units
///
/// Distances are in tiles, time in seconds. `GRAVITY` is negative because
/// `height` grows upward and clamps at 0 (the strip surface). A full jump
/// lasts `2·JUMP_VELOCITY/|GRAVITY|` = 0.4 s and covers 4 tiles of run,
/// which bounds how wide a hole can be and still be clearable.
///
/// ## Frame clamp
///
/// `MAX_TICK` caps the simulated step for one frame. A stalled frame then
/// produces several short ticks' worth of lost time instead of one huge
/// step that could carry the player across a hole or through an enemy
/// without either check firing.

/// Player run speed, tiles per second.
pub const RUN_SPEED: f32 = 10.0;
/// Vertical acceleration, tiles per second squared.
pub const GRAVITY: f32 = -30.0;
/// Takeoff velocity.
pub const JUMP_VELOCITY: f32 = 6.0;
/// Fraction of `JUMP_VELOCITY` applied upward after stomping an enemy.
pub const STOMP_BOUNCE: f32 = 0.6;
/// Upward velocity multiplier after collecting a coin, shortening the arc.
pub const COIN_DAMPEN: f32 = 0.4;
/// Patrol agent speed, tiles per second.
pub const ENEMY_SPEED: f32 = 2.0;
/// Longest simulated step for a single frame, seconds.
pub const MAX_TICK: f32 = 0.05;
/// Countdown at the start of a round, seconds.
pub const LEVEL_TIME: f32 = 99.0;
/// Coins gained per second of countdown remaining after clearing the level.
pub const TIME_DRAIN_RATE: f32 = 20.0;

/// One Euler step of the fall: accelerate, move, clamp to the surface.
/// The clamp makes `height == 0.0` the exact grounded test everywhere.
#[inline]
pub fn integrate_fall(height: &mut f32, vy: &mut f32, dt: f32) {
    *vy += GRAVITY * dt;
    *height += *vy * dt;
    if *height < 0.0 {
        *height = 0.0;
    }
}

/// Did this tick touch down? True only on the transition out of the air.
#[inline]
pub fn landed(prev_height: f32, height: f32) -> bool {
    prev_height > 0.0 && height == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_arc_returns_to_exactly_zero() {
        let mut h = 0.0;
        let mut vy = JUMP_VELOCITY;
        let mut peak = 0.0_f32;
        for _ in 0..200 {
            integrate_fall(&mut h, &mut vy, 0.016);
            peak = peak.max(h);
        }
        assert_eq!(h, 0.0);
        assert!(peak > 0.4, "jump should leave the ground, peak {peak}");
    }

    #[test]
    fn velocity_decreases_monotonically_in_flight() {
        let mut h = 0.0;
        let mut vy = JUMP_VELOCITY;
        let mut prev_vy = vy;
        integrate_fall(&mut h, &mut vy, 0.016);
        while h > 0.0 {
            assert!(vy < prev_vy);
            prev_vy = vy;
            integrate_fall(&mut h, &mut vy, 0.016);
        }
    }

    #[test]
    fn landing_is_edge_triggered() {
        assert!(landed(0.3, 0.0));
        assert!(!landed(0.0, 0.0));
        assert!(!landed(0.3, 0.1));
    }
}
