/// Entities: Player, Enemy, and the per-frame input bundle.
///
/// Positions are one-dimensional. The player's world index is split into a
/// continuous camera offset plus an on-screen column; the column is pinned
/// to `ANCHOR_COL` except near the strip's left edge, where the player may
/// slide across the first few columns before the camera starts moving.

/// On-screen column the player occupies once the camera scrolls.
pub const ANCHOR_COL: usize = 3;

#[derive(Clone, Debug)]
pub struct Player {
    /// World index of the leftmost visible column (continuous).
    pub offset: f32,
    /// On-screen column, 0..=ANCHOR_COL (continuous while sliding).
    pub screen_col: f32,
    /// Height above the strip; 0 = grounded (clamped, never negative).
    pub height: f32,
    /// Vertical velocity, positive = upward.
    pub vy: f32,
    /// World index recorded at takeoff; gates coin collection.
    pub jump_origin: Option<usize>,
}

impl Player {
    pub fn new() -> Self {
        Player {
            offset: 0.0,
            screen_col: ANCHOR_COL as f32,
            height: 0.0,
            vy: 0.0,
            jump_origin: None,
        }
    }

    /// World tile index currently occupied.
    #[inline]
    pub fn world_index(&self) -> usize {
        self.offset.floor() as usize + self.screen_col.floor() as usize
    }

    /// Height clamps to exactly 0.0 on landing, so equality is exact.
    #[inline]
    pub fn grounded(&self) -> bool {
        self.height == 0.0
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}

/// A patrol agent. Occupies exactly one tile; kept out of the tile strip so
/// tile semantics stay simple. Multiple enemies may coincide on one tile.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Enemy {
    pub idx: usize,
    /// Patrol direction, -1 or 1. Fresh spawns walk toward lower indices.
    pub dir: i8,
    /// Fractional movement budget; whole units convert to tile steps.
    pub acc: f32,
}

impl Enemy {
    pub fn new(idx: usize) -> Self {
        Enemy { idx, dir: -1, acc: 0.0 }
    }
}

/// Frame input: continuous horizontal intent plus edge-triggered actions.
/// All actions may be set in the same frame; the stepper applies them in a
/// fixed order (restart, start, jump, descend).
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// -1, 0 or 1.
    pub intent: i8,
    pub jump: bool,
    pub descend: bool,
    pub restart: bool,
    pub start: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_index_combines_offset_and_column() {
        let mut p = Player::new();
        assert_eq!(p.world_index(), ANCHOR_COL);

        p.offset = 12.7;
        assert_eq!(p.world_index(), 12 + ANCHOR_COL);

        // During the near-origin slide the column is fractional.
        p.offset = 0.0;
        p.screen_col = 1.9;
        assert_eq!(p.world_index(), 1);
    }

    #[test]
    fn grounded_is_exact_zero() {
        let mut p = Player::new();
        assert!(p.grounded());
        p.height = 0.001;
        assert!(!p.grounded());
    }

    #[test]
    fn fresh_enemy_walks_left() {
        let e = Enemy::new(40);
        assert_eq!(e.dir, -1);
        assert_eq!(e.acc, 0.0);
    }
}
