/// Movement rules — truth-table driven.
///
/// Pure functions operating on a strip view — no side effects.
/// These encode "what is legal" without performing the move.
///
/// ## Grounded Horizontal Entry
///
/// Evaluated against the tile being entered (`next`) and the tile being
/// stood on (`curr`). If ANY deny row matches, the move is blocked and the
/// player keeps the previous offset.
///
/// ┌────────────────────────────────────┬───────┬──────────────────────┐
/// │ Condition                          │ Move? │ Notes                │
/// ├────────────────────────────────────┼───────┼──────────────────────┤
/// │ next = Pipe, curr not pipe-like    │ DENY  │ pipe face blocks     │
/// │ next = Pipe, curr pipe-like        │ ALLOW │ stepping off a pipe  │
/// │ next = inverted pipe mouth         │ ALLOW │ walk-through         │
/// │ next = Wall (underground)          │ DENY  │ sealed chamber ends  │
/// │ next beyond forward cap (undergnd) │ DENY  │ past the last pipe   │
/// │ otherwise                          │ ALLOW │                      │
/// └────────────────────────────────────┴───────┴──────────────────────┘
///
/// ## Airborne Horizontal Entry
///
/// ┌────────────────────────────────────┬───────┬──────────────────────┐
/// │ Condition                          │ Move? │ Notes                │
/// ├────────────────────────────────────┼───────┼──────────────────────┤
/// │ next = Coin, not the jump origin   │ DENY  │ no sideways grazing  │
/// │ next = Coin, is the jump origin    │ ALLOW │ land back under it   │
/// │ otherwise                          │ ALLOW │ pipes don't block    │
/// └────────────────────────────────────┴───────┴──────────────────────┘
///
/// ## Patrol Entry (enemies)
///
/// ┌────────────────────────────────────┬───────┐
/// │ Condition                          │ Move? │
/// ├────────────────────────────────────┼───────┤
/// │ destination out of bounds          │ DENY  │
/// │ destination pipe-like              │ DENY  │
/// │ destination = Hole                 │ DENY  │
/// │ otherwise (incl. Coin, Wall, Flag) │ ALLOW │
/// └────────────────────────────────────┴───────┘
///
/// Walls read as walkable floor to patrol agents; level layouts keep
/// enemies fenced between pipes and holes so the distinction never shows.

use super::tile::Tile;

/// Immutable view of the active strip for rule queries.
pub struct StripView<'a> {
    pub tiles: &'a [Tile],
    pub underground: bool,
    /// Underground only: index of the fifth pipe; grounded movement may
    /// not pass it.
    pub forward_cap: Option<usize>,
}

impl<'a> StripView<'a> {
    /// Total function: any index outside the strip reads as Ground.
    #[inline]
    pub fn tile_at(&self, idx: i64) -> Tile {
        if idx < 0 || idx as usize >= self.tiles.len() {
            return Tile::Ground;
        }
        self.tiles[idx as usize]
    }

    #[inline]
    pub fn in_bounds(&self, idx: i64) -> bool {
        idx >= 0 && (idx as usize) < self.tiles.len()
    }
}

// ── Player movement ──

/// Grounded entry check. See truth table above.
pub fn grounded_move_blocked(view: &StripView, curr_idx: usize, next_idx: usize) -> bool {
    let next = view.tile_at(next_idx as i64);
    let curr = view.tile_at(curr_idx as i64);
    if next == Tile::Pipe && !curr.is_pipe_like() {
        return true;
    }
    if view.underground {
        if next == Tile::Wall {
            return true;
        }
        if let Some(cap) = view.forward_cap {
            if next_idx > cap {
                return true;
            }
        }
    }
    false
}

/// Airborne entry check: only coins obstruct, and only coins the current
/// jump did not start under.
pub fn airborne_move_blocked(view: &StripView, next_idx: usize, jump_origin: Option<usize>) -> bool {
    view.tile_at(next_idx as i64) == Tile::Coin && jump_origin != Some(next_idx)
}

// ── Patrol movement ──

/// Would a patrol step into `desired` be blocked? Out-of-bounds is a turn
/// signal even though `tile_at` reads Ground there.
pub fn patrol_blocked(view: &StripView, desired: i64) -> bool {
    if !view.in_bounds(desired) {
        return true;
    }
    let t = view.tile_at(desired);
    t.is_pipe_like() || t == Tile::Hole
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build a tile strip from its glyph string.
    fn strip_from(s: &str) -> Vec<Tile> {
        s.chars().map(Tile::from_char).collect()
    }

    fn over(tiles: &[Tile]) -> StripView {
        StripView { tiles, underground: false, forward_cap: None }
    }

    fn under(tiles: &[Tile], cap: Option<usize>) -> StripView {
        StripView { tiles, underground: true, forward_cap: cap }
    }

    // ── Totality ──

    #[test]
    fn out_of_bounds_reads_ground() {
        let t = strip_from("⠶_⠥");
        let v = over(&t);
        assert_eq!(v.tile_at(-1), Tile::Ground);
        assert_eq!(v.tile_at(-1000), Tile::Ground);
        assert_eq!(v.tile_at(3), Tile::Ground);
        assert_eq!(v.tile_at(1_000_000), Tile::Ground);
        assert_eq!(v.tile_at(0), Tile::Pipe);
    }

    // ── Grounded entry ──

    #[test]
    fn pipe_face_blocks_grounded_entry() {
        let t = strip_from("⠤⠤⠶⠤");
        let v = over(&t);
        assert!(grounded_move_blocked(&v, 1, 2)); // walking into the pipe
        assert!(!grounded_move_blocked(&v, 1, 1)); // staying put
        assert!(!grounded_move_blocked(&v, 1, 0)); // walking away
    }

    #[test]
    fn standing_on_pipe_allows_stepping_off() {
        let t = strip_from("⠤⠶⠶⠤");
        let v = over(&t);
        // From one pipe onto the next: allowed.
        assert!(!grounded_move_blocked(&v, 1, 2));
        // Off the pipe onto ground: allowed.
        assert!(!grounded_move_blocked(&v, 2, 3));
    }

    #[test]
    fn inverted_mouths_are_walk_through() {
        let t = strip_from("⠤⠭⠤⠯⠤");
        let v = under(&t, None);
        assert!(!grounded_move_blocked(&v, 0, 1));
        assert!(!grounded_move_blocked(&v, 2, 3));
    }

    #[test]
    fn standing_on_inverted_mouth_counts_as_pipe() {
        // From a mouth straight into an upright pipe: the pipe-face rule
        // does not apply because curr is pipe-like.
        let t = strip_from("⠭⠶⠤");
        let v = under(&t, None);
        assert!(!grounded_move_blocked(&v, 0, 1));
    }

    #[test]
    fn walls_block_underground_only() {
        let t = strip_from("⠤⠿⠤");
        assert!(grounded_move_blocked(&under(&t, None), 0, 1));
        // The same glyph would never appear overworld, but the rule is
        // region-scoped regardless.
        assert!(!grounded_move_blocked(&over(&t), 0, 1));
    }

    #[test]
    fn forward_cap_stops_at_fifth_pipe() {
        let t = strip_from("⠤⠤⠤⠭⠤⠤");
        let v = under(&t, Some(3));
        assert!(!grounded_move_blocked(&v, 2, 3)); // onto the cap tile
        assert!(grounded_move_blocked(&v, 3, 4)); // one past it
        assert!(grounded_move_blocked(&v, 3, 5));
    }

    #[test]
    fn coins_and_holes_do_not_block_grounded_movement() {
        let t = strip_from("⠤⠥_⠤");
        let v = over(&t);
        assert!(!grounded_move_blocked(&v, 0, 1)); // onto the coin tile
        assert!(!grounded_move_blocked(&v, 1, 2)); // onto the hole (fatal, but legal)
    }

    // ── Airborne entry ──

    #[test]
    fn airborne_coin_blocks_unless_jump_origin() {
        let t = strip_from("⠤⠤⠥⠤");
        let v = over(&t);
        assert!(airborne_move_blocked(&v, 2, None));
        assert!(airborne_move_blocked(&v, 2, Some(1)));
        assert!(!airborne_move_blocked(&v, 2, Some(2)));
        assert!(!airborne_move_blocked(&v, 1, None)); // plain ground
    }

    #[test]
    fn airborne_passes_over_pipes() {
        let t = strip_from("⠤⠶⠤");
        let v = over(&t);
        assert!(!airborne_move_blocked(&v, 1, None));
    }

    // ── Patrol ──

    #[test]
    fn patrol_turns_at_obstacles_and_edges() {
        let t = strip_from("⠤⠶⠤_⠤");
        let v = over(&t);
        assert!(patrol_blocked(&v, -1)); // strip edge
        assert!(patrol_blocked(&v, 5)); // strip edge
        assert!(patrol_blocked(&v, 1)); // pipe
        assert!(patrol_blocked(&v, 3)); // hole
        assert!(!patrol_blocked(&v, 2));
    }

    #[test]
    fn patrol_walks_over_coins_flags_and_walls() {
        let t = strip_from("⠥⚑⠿⠭");
        let v = under(&t, None);
        assert!(!patrol_blocked(&v, 0));
        assert!(!patrol_blocked(&v, 1));
        assert!(!patrol_blocked(&v, 2));
        assert!(patrol_blocked(&v, 3)); // inverted mouth is still a pipe
    }
}
