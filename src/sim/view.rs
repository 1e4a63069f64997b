/// Frame composition: reduces the world to one row of glyphs plus HUD
/// numbers. The presentation layer draws it and rolls the marquee; no
/// simulation state lives there.
///
/// ## Player glyph
///
/// The player replaces the tile at their column:
///
///     tile under     grounded    airborne
///     ─────────────────────────────────────
///     plain pipe     ⠷ / ⠯       ⠷ / ⠯      (overworld / underground)
///     coin           ⠧           ⠥
///     hole           ⠦           ⠁
///     enemy there    ⠦           ȯ
///     anything else  ⠦           ⠥
///
/// A running pipe transition replaces the player glyph with its animation
/// frame, and a game over replaces everything with a skull.

use crate::domain::tile::Tile;
use super::world::WorldState;

// ── Glyphs ──

const PLAYER: char = '⠦';
const PLAYER_RISING: char = '⠥';
const PLAYER_OVER_HOLE: char = '⠁';
const PLAYER_ON_COIN: char = '⠧';
const PLAYER_ON_PIPE: char = '⠷';
const PLAYER_ON_PIPE_UNDER: char = '⠯';
const ENEMY: char = 'o';
const ENEMY_ON_COIN: char = 'ȯ';
const ENEMY_BELOW_PLAYER: char = 'ȯ';
const SKULL: char = '💀';
const PAD_OVER: char = '⠤';
const PAD_UNDER: char = '⠿';

/// Which standing the round is in, in priority order. Drives the marquee
/// choice and input hints.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scene {
    Title,
    Playing,
    GameOver { timed_out: bool },
    Cleared,
}

/// Everything the presentation layer needs for one frame.
pub struct Snapshot {
    /// The visible strip, already composed: tiles, enemies, player.
    pub cells: Vec<char>,
    /// Column of the player cell within `cells`.
    pub player_col: usize,
    pub coins: u32,
    pub best: u32,
    /// Whole seconds left on the countdown.
    pub time_left: u32,
    pub scene: Scene,
    pub underground: bool,
    /// Shown on the title screen.
    pub level_name: String,
}

pub fn snapshot(world: &WorldState, width: usize) -> Snapshot {
    let strip = world.active_strip();
    let underground = world.view().underground;
    let base = world.player.offset.floor().max(0.0) as usize;

    // Visible window, padded past the strip's end.
    let pad = if underground { PAD_UNDER } else { PAD_OVER };
    let mut cells: Vec<char> = (0..width)
        .map(|col| {
            let idx = base + col;
            if idx < strip.len() { strip.tiles[idx].glyph() } else { pad }
        })
        .collect();

    // Walkers sit on top of their tile.
    for enemy in &world.enemies {
        if enemy.idx >= base && enemy.idx < base + width {
            let glyph = if strip.tile_at(enemy.idx as i64) == Tile::Coin {
                ENEMY_ON_COIN
            } else {
                ENEMY
            };
            cells[enemy.idx - base] = glyph;
        }
    }

    // The player replaces whatever occupies their column.
    let player_col = (world.player.screen_col.floor() as usize).min(width.saturating_sub(1));
    let idx = base + player_col;
    cells[player_col] = player_glyph(world, idx, underground);

    if let Some(transition) = &world.transition {
        cells[player_col] = transition.glyph();
    }
    if world.session.game_over {
        cells[player_col] = SKULL;
    }

    Snapshot {
        cells,
        player_col,
        coins: world.session.coins,
        best: world.session.best,
        time_left: world.session.time_left.floor() as u32,
        scene: scene_of(world),
        underground,
        level_name: world.level_name.clone(),
    }
}

fn player_glyph(world: &WorldState, idx: usize, underground: bool) -> char {
    let tile = world.active_strip().tile_at(idx as i64);
    let on_pipe = tile == Tile::Pipe;
    let pipe_glyph = if underground { PLAYER_ON_PIPE_UNDER } else { PLAYER_ON_PIPE };

    if !world.player.grounded() {
        if on_pipe {
            pipe_glyph
        } else if world.enemies.iter().any(|e| e.idx == idx) {
            ENEMY_BELOW_PLAYER
        } else if tile == Tile::Hole {
            PLAYER_OVER_HOLE
        } else {
            PLAYER_RISING
        }
    } else if on_pipe {
        pipe_glyph
    } else if tile == Tile::Coin {
        PLAYER_ON_COIN
    } else {
        PLAYER
    }
}

fn scene_of(world: &WorldState) -> Scene {
    let s = &world.session;
    if s.win {
        Scene::Cleared
    } else if s.game_over {
        Scene::GameOver { timed_out: s.timed_out }
    } else if !s.started {
        Scene::Title
    } else {
        Scene::Playing
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Enemy;
    use crate::sim::level::Level;
    use crate::sim::transition::Transition;
    use crate::sim::world::Region;

    const WIDTH: usize = 12;

    fn world_from(over: &str, under: Option<&str>) -> WorldState {
        let level = Level {
            name: String::from("view"),
            overworld: String::from(over),
            underground: under.map(String::from),
        };
        WorldState::new(&level, 0)
    }

    #[test]
    fn the_window_follows_the_offset_and_pads_past_the_end() {
        let mut world = world_from("⠥⠤⠤⠤⠤⠤⠶⠤", None);
        world.player.offset = 2.0;

        let snap = snapshot(&world, WIDTH);
        assert_eq!(snap.cells.len(), WIDTH);
        // Window starts at the third tile; past index 7 it is all padding.
        assert_eq!(snap.cells[4], '⠶');
        assert_eq!(snap.cells[6], PAD_OVER);
        assert_eq!(snap.cells[WIDTH - 1], PAD_OVER);
    }

    #[test]
    fn the_underground_pads_with_wall_glyphs() {
        let mut world = world_from("⠤⠤⠤⠤", Some("⠿⠤⠤⠤⠤⠤"));
        world.swap_region(Region::Underground);
        let snap = snapshot(&world, WIDTH);
        assert!(snap.underground);
        assert_eq!(snap.cells[WIDTH - 1], PAD_UNDER);
    }

    #[test]
    fn the_player_glyph_tracks_the_tile_underneath() {
        // Grounded on plain ground.
        let world = world_from("⠤⠤⠤⠤⠤⠤⠤⠤", None);
        assert_eq!(snapshot(&world, WIDTH).cells[3], PLAYER);

        // Grounded on a coin.
        let world = world_from("⠤⠤⠤⠥⠤⠤⠤⠤", None);
        assert_eq!(snapshot(&world, WIDTH).cells[3], PLAYER_ON_COIN);

        // Grounded on a pipe: region picks the variant.
        let mut world = world_from("⠤⠤⠤⠶⠤⠤⠤⠤", Some("⠤⠤⠤⠶⠤⠤⠤⠤"));
        assert_eq!(snapshot(&world, WIDTH).cells[3], PLAYER_ON_PIPE);
        world.swap_region(Region::Underground);
        assert_eq!(snapshot(&world, WIDTH).cells[3], PLAYER_ON_PIPE_UNDER);

        // Airborne over ground, a hole, and a walker.
        let mut world = world_from("⠤⠤⠤⠤⠤⠤⠤⠤", None);
        world.player.height = 0.5;
        assert_eq!(snapshot(&world, WIDTH).cells[3], PLAYER_RISING);

        let mut world = world_from("⠤⠤⠤_⠤⠤⠤⠤", None);
        world.player.height = 0.5;
        assert_eq!(snapshot(&world, WIDTH).cells[3], PLAYER_OVER_HOLE);

        let mut world = world_from("⠤⠤⠤⠤⠤⠤⠤⠤", None);
        world.player.height = 0.5;
        world.enemies.push(Enemy::new(3));
        assert_eq!(snapshot(&world, WIDTH).cells[3], ENEMY_BELOW_PLAYER);
    }

    #[test]
    fn walkers_show_on_their_tiles_with_a_coin_variant() {
        let mut world = world_from("⠤⠤⠤⠤⠤⠥⠤⠤", None);
        world.enemies.push(Enemy::new(5));
        world.enemies.push(Enemy::new(7));
        let snap = snapshot(&world, WIDTH);
        assert_eq!(snap.cells[5], ENEMY_ON_COIN);
        assert_eq!(snap.cells[7], ENEMY);
    }

    #[test]
    fn a_transition_frame_replaces_the_player() {
        let mut world = world_from("⠤⠤⠤⠶⠤⠤⠤⠤", Some("⠤⠤⠤⠤"));
        world.transition = Some(Transition::enter(0.0));
        let snap = snapshot(&world, WIDTH);
        assert_eq!(snap.cells[3], '⠶');
    }

    #[test]
    fn a_game_over_is_a_skull_no_matter_what() {
        let mut world = world_from("⠤⠤⠤⠶⠤⠤⠤⠤", Some("⠤⠤⠤⠤"));
        world.transition = Some(Transition::enter(0.0));
        world.session.game_over = true;
        let snap = snapshot(&world, WIDTH);
        assert_eq!(snap.cells[3], SKULL);
    }

    #[test]
    fn scenes_rank_win_over_death_over_title() {
        let mut world = world_from("⠤⠤⠤⠤", None);
        assert_eq!(snapshot(&world, WIDTH).scene, Scene::Title);

        world.session.started = true;
        assert_eq!(snapshot(&world, WIDTH).scene, Scene::Playing);

        world.session.game_over = true;
        world.session.timed_out = true;
        assert_eq!(
            snapshot(&world, WIDTH).scene,
            Scene::GameOver { timed_out: true }
        );

        world.session.win = true;
        assert_eq!(snapshot(&world, WIDTH).scene, Scene::Cleared);
    }

    #[test]
    fn hud_numbers_floor_the_clock() {
        let mut world = world_from("⠤⠤⠤⠤", None);
        world.session.coins = 7;
        world.session.best = 41;
        world.session.time_left = 63.92;
        let snap = snapshot(&world, WIDTH);
        assert_eq!(snap.coins, 7);
        assert_eq!(snap.best, 41);
        assert_eq!(snap.time_left, 63);
        assert_eq!(snap.level_name, "view");
    }
}
