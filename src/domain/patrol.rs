/// Enemy patrol — fixed-rate walkers that bounce between obstacles.
///
/// Enemies are not part of the tile strip. They are discovered by
/// scanning a freshly installed strip for marker tiles, then live as
/// independent agents that walk at a constant rate, reversing whenever
/// the tile ahead is a pipe, a hole, or the end of the strip.
///
/// Movement accumulates fractionally and commits one whole tile at a
/// time, so walkers stay tile-aligned no matter the tick length.

use super::entity::Enemy;
use super::physics::ENEMY_SPEED;
use super::rules::{patrol_blocked, StripView};
use super::tile::Tile;

/// Upper bound on whole-tile steps committed per agent per tick. With
/// the tick clamp this is never reached; it bounds the loop if an
/// oversized dt slips through.
const PATROL_STEP_CAP: u32 = 4;

/// Extract patrol agents from a freshly installed strip. Marker tiles
/// are consumed: the agent starts there and the tile reverts to ground.
pub fn scan(tiles: &mut [Tile]) -> Vec<Enemy> {
    let mut enemies = Vec::new();
    for (idx, tile) in tiles.iter_mut().enumerate() {
        if *tile == Tile::EnemyMarker {
            *tile = Tile::Ground;
            enemies.push(Enemy::new(idx));
        }
    }
    enemies
}

// ── Per-tick stepping ──

/// Advance every patrol agent by `dt` seconds.
///
/// Each whole step: if the tile ahead is blocked, reverse once; commit
/// the step only if the (possibly reversed) destination is clear. A
/// walker pinned between two obstacles burns its accumulator in place.
pub fn advance(enemies: &mut [Enemy], view: &StripView, dt: f32) {
    for enemy in enemies.iter_mut() {
        enemy.acc += ENEMY_SPEED * dt;
        let mut guard = 0;
        while enemy.acc >= 1.0 && guard < PATROL_STEP_CAP {
            guard += 1;
            let mut desired = enemy.idx as i64 + enemy.dir as i64;
            if patrol_blocked(view, desired) {
                enemy.dir = -enemy.dir;
                desired = enemy.idx as i64 + enemy.dir as i64;
            }
            if !patrol_blocked(view, desired) {
                enemy.idx = desired as usize;
            }
            enemy.acc -= 1.0;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_from(s: &str) -> Vec<Tile> {
        s.chars().map(Tile::from_char).collect()
    }

    fn view(tiles: &[Tile]) -> StripView {
        StripView { tiles, underground: false, forward_cap: None }
    }

    #[test]
    fn scan_extracts_and_clears_markers() {
        let mut tiles = strip_from("⠤o⠤⠥o⠤");
        let enemies = scan(&mut tiles);
        assert_eq!(enemies.len(), 2);
        assert_eq!(enemies[0].idx, 1);
        assert_eq!(enemies[1].idx, 4);
        assert!(enemies.iter().all(|e| e.dir == -1));
        // Markers are gone; the coin survives.
        assert!(!tiles.contains(&Tile::EnemyMarker));
        assert_eq!(tiles[3], Tile::Coin);
        assert_eq!(tiles[1], Tile::Ground);
    }

    #[test]
    fn sub_tile_accumulation_carries_over() {
        let tiles = strip_from("⠤⠤⠤⠤");
        let mut enemies = vec![Enemy::new(2)];
        // 0.25 s at 2 tiles/s = half a tile: no visible movement yet.
        advance(&mut enemies, &view(&tiles), 0.25);
        assert_eq!(enemies[0].idx, 2);
        // Second quarter second completes the tile.
        advance(&mut enemies, &view(&tiles), 0.25);
        assert_eq!(enemies[0].idx, 1);
    }

    #[test]
    fn walker_reverses_at_pipe() {
        let tiles = strip_from("⠶⠤⠤⠶");
        let mut enemies = vec![Enemy::new(1)];
        advance(&mut enemies, &view(&tiles), 0.5);
        assert_eq!(enemies[0].idx, 2);
        assert_eq!(enemies[0].dir, 1);
    }

    #[test]
    fn walker_reverses_at_hole_and_strip_edge() {
        let tiles = strip_from("⠤_⠤⠤");
        let mut enemies = vec![Enemy::new(2)];
        advance(&mut enemies, &view(&tiles), 0.5);
        assert_eq!(enemies[0].idx, 3);
        // Next step hits the strip edge and bounces back.
        advance(&mut enemies, &view(&tiles), 0.5);
        assert_eq!(enemies[0].idx, 2);
        assert_eq!(enemies[0].dir, -1);
    }

    #[test]
    fn pinned_walker_burns_its_accumulator() {
        let tiles = strip_from("⠶⠤⠶");
        let mut enemies = vec![Enemy::new(1)];
        advance(&mut enemies, &view(&tiles), 1.0);
        assert_eq!(enemies[0].idx, 1);
        assert!(enemies[0].acc < 1.0);
    }

    #[test]
    fn step_cap_bounds_runaway_ticks() {
        let tiles = strip_from("⠤⠤⠤⠤⠤⠤⠤⠤⠤⠤");
        let mut enemies = vec![Enemy::new(9)];
        // 10 s would be 20 tiles; the cap commits at most 4.
        advance(&mut enemies, &view(&tiles), 10.0);
        assert_eq!(enemies[0].idx, 5);
    }
}
