/// WorldState: the complete snapshot of a running game.
///
/// ## Strip architecture
///
/// Each region keeps two tile layers, composed at swap time:
///   - `pristine` — the strip as parsed. **Never mutated** after load.
///   - `tiles`    — the live terrain (coins collected, markers cleared).
///
/// Entering a region reinstalls its `pristine` strip wholesale and
/// rescans patrol agents, so coins and enemies respawn on every visit.
/// `reset` does the same for both regions at once.
///
/// ## Pipe landmarks
///
/// Pipe roles are positional and cached once from the pristine strips:
///   - `entry_pipe`   — 4th plain pipe of the overworld (descend point)
///   - `return_pipe`  — 5th plain pipe of the overworld (exit landing)
///   - `under_target` — 4th pipe underground (first-visit spawn area)
///   - `under_cap`    — 5th pipe underground (forward movement limit)
///   - `exit_pipe`    — last inverted mouth underground (jump to leave)

use crate::domain::entity::{Enemy, Player};
use crate::domain::patrol;
use crate::domain::physics::LEVEL_TIME;
use crate::domain::rules::StripView;
use crate::domain::tile::Tile;

use super::level::Level;
use super::transition::Transition;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Region {
    Overworld,
    Underground,
}

/// One region's terrain: the live strip plus its pristine parse-time copy.
#[derive(Clone, Debug)]
pub struct Strip {
    /// Live terrain. Mutated by coin pickup and marker clearing.
    pub tiles: Vec<Tile>,
    /// The strip as parsed. Never mutated after load.
    pub pristine: Vec<Tile>,
}

impl Strip {
    pub fn parse(text: &str) -> Self {
        let pristine: Vec<Tile> = text.chars().map(Tile::from_char).collect();
        Strip { tiles: pristine.clone(), pristine }
    }

    /// Query the live strip. Any index outside it reads as Ground.
    #[inline]
    pub fn tile_at(&self, idx: i64) -> Tile {
        if idx < 0 || idx as usize >= self.tiles.len() {
            return Tile::Ground;
        }
        self.tiles[idx as usize]
    }

    /// Set a live tile; out-of-range writes are ignored.
    #[inline]
    pub fn set_tile(&mut self, idx: i64, tile: Tile) {
        if idx >= 0 && (idx as usize) < self.tiles.len() {
            self.tiles[idx as usize] = tile;
        }
    }

    /// Reinstall the parse-time strip.
    pub fn restore(&mut self) {
        self.tiles = self.pristine.clone();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }
}

/// Round-scoped scoring and lifecycle flags. `best` survives resets.
#[derive(Clone, Copy, Debug)]
pub struct Session {
    pub coins: u32,
    pub time_left: f32,
    pub best: u32,
    /// False until the first input of the round.
    pub started: bool,
    pub game_over: bool,
    /// Set alongside `game_over` when the clock ran out.
    pub timed_out: bool,
    pub win: bool,
}

impl Session {
    fn new(best: u32) -> Self {
        Session {
            coins: 0,
            time_left: LEVEL_TIME,
            best,
            started: false,
            game_over: false,
            timed_out: false,
            win: false,
        }
    }

    /// Is the simulation live? (Transitions are handled separately.)
    #[inline]
    pub fn playing(&self) -> bool {
        self.started && !self.game_over && !self.win
    }

    fn reset_round(&mut self) {
        self.coins = 0;
        self.time_left = LEVEL_TIME;
        self.started = false;
        self.game_over = false;
        self.timed_out = false;
        self.win = false;
    }
}

pub struct WorldState {
    pub level_name: String,

    // ── Strips ──
    pub overworld: Strip,
    pub underground: Option<Strip>,
    pub region: Region,

    // ── Entities ──
    pub player: Player,
    pub enemies: Vec<Enemy>,

    // ── Session ──
    pub session: Session,

    // ── Pipe transit ──
    pub transition: Option<Transition>,
    pub visited_underground: bool,
    /// Overworld scroll offset captured when descending, for the exit
    /// fallback landing.
    pub prev_over_offset: f32,

    // ── Pipe landmarks (positions in the pristine strips) ──
    pub entry_pipe: Option<usize>,
    pub return_pipe: Option<usize>,
    pub under_target: Option<usize>,
    pub under_cap: Option<usize>,
    pub exit_pipe: Option<usize>,
}

// ── Construction ──

impl WorldState {
    pub fn new(level: &Level, best: u32) -> Self {
        let overworld = Strip::parse(&level.overworld);
        let underground = level.underground.as_deref().map(Strip::parse);

        let over_pipes = plain_pipe_indices(&overworld.pristine);
        let (under_target, under_cap, exit_pipe) = match &underground {
            Some(strip) => {
                let pipes = pipe_like_indices(&strip.pristine);
                (
                    pipes.get(3).copied(),
                    pipes.get(4).copied(),
                    last_inverted_index(&strip.pristine),
                )
            }
            None => (None, None, None),
        };

        let mut world = WorldState {
            level_name: level.name.clone(),
            overworld,
            underground,
            region: Region::Overworld,
            player: Player::new(),
            enemies: Vec::new(),
            session: Session::new(best),
            transition: None,
            visited_underground: false,
            prev_over_offset: 0.0,
            entry_pipe: over_pipes.get(3).copied(),
            return_pipe: over_pipes.get(4).copied(),
            under_target,
            under_cap,
            exit_pipe,
        };
        world.enemies = patrol::scan(&mut world.overworld.tiles);
        world
    }
}

// ── Strip access ──

impl WorldState {
    /// The strip the player currently occupies. Underground region
    /// implies the strip exists; stays total regardless.
    #[inline]
    pub fn active_strip(&self) -> &Strip {
        match self.region {
            Region::Overworld => &self.overworld,
            Region::Underground => self.underground.as_ref().unwrap_or(&self.overworld),
        }
    }

    #[inline]
    pub fn active_strip_mut(&mut self) -> &mut Strip {
        match self.region {
            Region::Overworld => &mut self.overworld,
            Region::Underground => self.underground.as_mut().unwrap_or(&mut self.overworld),
        }
    }

    /// Rule-query view of the active strip.
    pub fn view(&self) -> StripView<'_> {
        let underground = self.region == Region::Underground;
        StripView {
            tiles: &self.active_strip().tiles,
            underground,
            forward_cap: if underground { self.under_cap } else { None },
        }
    }

    /// Strip index of the tile under the player.
    #[inline]
    pub fn player_index(&self) -> usize {
        self.player.world_index()
    }
}

// ── Region swap / reset ──

impl WorldState {
    /// Move to `dest`, reinstalling its pristine strip and rescanning
    /// patrol agents. Swapping to a region that has no strip is a no-op.
    pub fn swap_region(&mut self, dest: Region) {
        let strip = match dest {
            Region::Overworld => &mut self.overworld,
            Region::Underground => match self.underground.as_mut() {
                Some(strip) => strip,
                None => return,
            },
        };
        strip.restore();
        let enemies = patrol::scan(&mut strip.tiles);
        self.region = dest;
        self.enemies = enemies;
    }

    /// Back to the initial state: both strips pristine, player at the
    /// origin, fresh round. The best score is kept.
    pub fn reset(&mut self) {
        self.overworld.restore();
        if let Some(under) = self.underground.as_mut() {
            under.restore();
        }
        self.region = Region::Overworld;
        self.player = Player::new();
        self.enemies = patrol::scan(&mut self.overworld.tiles);
        self.session.reset_round();
        self.transition = None;
        self.visited_underground = false;
        self.prev_over_offset = 0.0;
    }
}

// ── Landmark extraction ──

fn plain_pipe_indices(tiles: &[Tile]) -> Vec<usize> {
    tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| **t == Tile::Pipe)
        .map(|(i, _)| i)
        .collect()
}

fn pipe_like_indices(tiles: &[Tile]) -> Vec<usize> {
    tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_pipe_like())
        .map(|(i, _)| i)
        .collect()
}

fn last_inverted_index(tiles: &[Tile]) -> Option<usize> {
    tiles.iter().rposition(|t| t.is_inverted_pipe())
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn two_region_level() -> Level {
        Level {
            name: String::from("test strip"),
            //         0    5    10   15
            overworld: String::from("⠤⠶⠥⠶o⠤⠶⠤⠶⠤⠶⠤⚑"),
            underground: Some(String::from("⠿⠯⠤o⠶⠥⠯⠤⠶⠤⠭⠿")),
        }
    }

    #[test]
    fn landmarks_come_from_the_pristine_strips() {
        let world = WorldState::new(&two_region_level(), 0);
        // Overworld plain pipes at 1, 3, 6, 8, 10.
        assert_eq!(world.entry_pipe, Some(8));
        assert_eq!(world.return_pipe, Some(10));
        // Underground pipe-likes at 1, 4, 6, 8, 10.
        assert_eq!(world.under_target, Some(8));
        assert_eq!(world.under_cap, Some(10));
        // Last inverted mouth.
        assert_eq!(world.exit_pipe, Some(10));
    }

    #[test]
    fn markers_leave_the_live_strip_but_not_the_pristine_one() {
        let world = WorldState::new(&two_region_level(), 0);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].idx, 4);
        assert_eq!(world.overworld.tiles[4], Tile::Ground);
        assert_eq!(world.overworld.pristine[4], Tile::EnemyMarker);
    }

    #[test]
    fn entering_a_region_respawns_coins_and_enemies() {
        let mut world = WorldState::new(&two_region_level(), 0);
        // Spend the overworld: grab the coin, clear the walker.
        world.overworld.set_tile(2, Tile::Ground);
        world.enemies.clear();

        world.swap_region(Region::Underground);
        assert_eq!(world.region, Region::Underground);
        // Underground agents scanned from its own strip.
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].idx, 3);

        world.swap_region(Region::Overworld);
        // Everything spent is back.
        assert_eq!(world.overworld.tiles[2], Tile::Coin);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].idx, 4);
    }

    #[test]
    fn swapping_to_a_missing_region_is_refused() {
        let level = Level {
            name: String::from("flat"),
            overworld: String::from("⠤⠤⠤⠤"),
            underground: None,
        };
        let mut world = WorldState::new(&level, 0);
        world.swap_region(Region::Underground);
        assert_eq!(world.region, Region::Overworld);
    }

    #[test]
    fn forward_cap_applies_only_underground() {
        let mut world = WorldState::new(&two_region_level(), 0);
        assert_eq!(world.view().forward_cap, None);
        world.swap_region(Region::Underground);
        assert!(world.view().underground);
        assert_eq!(world.view().forward_cap, Some(10));
    }

    #[test]
    fn reset_restores_everything_but_the_best_score() {
        let mut world = WorldState::new(&two_region_level(), 7);
        world.session.started = true;
        world.session.coins = 12;
        world.session.best = 12;
        world.session.time_left = 3.5;
        world.session.win = true;
        world.player.offset = 40.0;
        world.visited_underground = true;
        world.swap_region(Region::Underground);
        world.active_strip_mut().set_tile(5, Tile::Ground);

        world.reset();

        assert_eq!(world.region, Region::Overworld);
        assert_eq!(world.session.coins, 0);
        assert_eq!(world.session.best, 12);
        assert_eq!(world.session.time_left, LEVEL_TIME);
        assert!(!world.session.started);
        assert!(!world.session.win);
        assert!(!world.visited_underground);
        assert_eq!(world.player.offset, 0.0);
        // Both strips byte-identical to their pristine copies.
        assert_eq!(world.overworld.tiles, world.overworld.pristine);
        let under = world.underground.as_ref().unwrap();
        assert_eq!(under.tiles, under.pristine);
        // The registry matches a fresh load, and a second reset is a no-op.
        let fresh = WorldState::new(&two_region_level(), 12);
        assert_eq!(world.enemies, fresh.enemies);
        world.reset();
        assert_eq!(world.enemies, fresh.enemies);
        assert_eq!(world.overworld.tiles, fresh.overworld.tiles);
    }

    #[test]
    fn strip_queries_are_total() {
        let strip = Strip::parse("⠶⠥");
        assert_eq!(strip.tile_at(-1), Tile::Ground);
        assert_eq!(strip.tile_at(2), Tile::Ground);
        assert_eq!(strip.tile_at(0), Tile::Pipe);
        let mut strip = strip;
        strip.set_tile(-1, Tile::Flag);
        strip.set_tile(99, Tile::Flag);
        assert!(!strip.tiles.contains(&Tile::Flag));
    }
}
