/// The step function: advances the world by one frame.
///
/// Processing order:
///   1. Action resolution (restart / start / jump / pipe descend)
///   2. Physics pass — runs only while the round is live and no pipe
///      transition is in progress:
///        a. horizontal movement (edge slide, then scroll + collision)
///        b. vertical integration
///        c. enemy patrol
///        d. underground exit trigger
///        e. flag check
///        f. enemy contact (stomp or death)
///        g. rising coin collection
///        h. hole landing
///        i. ground settle
///        j. countdown
///   3. Pipe transition animation (including one started this frame)
///   4. Post-win countdown drain (whole seconds convert to coins)
///   5. Best-score watermark
///
/// A fatal outcome (f, h, j) ends the physics pass at once. Reaching the
/// flag (e) does not, so the winning frame still lands and settles.

use crate::domain::entity::{FrameInput, ANCHOR_COL};
use crate::domain::patrol;
use crate::domain::physics::{
    self, COIN_DAMPEN, JUMP_VELOCITY, MAX_TICK, RUN_SPEED, STOMP_BOUNCE, TIME_DRAIN_RATE,
};
use crate::domain::rules;
use crate::domain::tile::Tile;
use super::event::{DeathCause, GameEvent};
use super::transition::{self, Transition};
use super::world::{Region, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn advance(world: &mut WorldState, dt: f32, input: FrameInput) -> Vec<GameEvent> {
    let dt = dt.min(MAX_TICK);
    let mut events: Vec<GameEvent> = Vec::new();

    apply_actions(world, &input, &mut events);

    // A running transition suspends the physics pass; one started by this
    // very pass (the exit trigger) still animates below.
    let suspended = world.transition.is_some();
    if !suspended && world.session.playing() {
        physics_step(world, dt, input.intent, &mut events);
    }
    if world.transition.is_some() {
        transition::tick(world, dt);
    }

    drain_win_time(world, dt, &mut events);
    note_best(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Actions
// ══════════════════════════════════════════════════════════════

fn apply_actions(world: &mut WorldState, input: &FrameInput, events: &mut Vec<GameEvent>) {
    if input.restart {
        world.reset();
    }
    if input.start && !world.session.started {
        world.session.started = true;
    }
    if input.jump {
        try_jump(world, events);
    }
    if input.descend {
        try_descend(world, events);
    }
}

/// Takeoff also records the origin tile, which gates coin collection
/// for the whole arc.
fn try_jump(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.transition.is_some() || !world.player.grounded() {
        return;
    }
    world.player.vy = JUMP_VELOCITY;
    world.player.jump_origin = Some(world.player_index());
    events.push(GameEvent::Jumped);
}

/// Descend into the underground. Only the entry mouth accepts it: the
/// fourth plain pipe of the overworld, stood on, with no transition
/// already running.
fn try_descend(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.transition.is_some() || world.region != Region::Overworld {
        return;
    }
    if world.underground.is_none() || !world.player.grounded() {
        return;
    }
    let idx = world.player_index();
    if world.entry_pipe != Some(idx) {
        return;
    }
    if world.overworld.tile_at(idx as i64) != Tile::Pipe {
        return;
    }

    world.prev_over_offset = world.player.offset;
    // First visit surfaces by the fourth underground pipe; revisits start
    // back at the shaft wall.
    let target = if world.visited_underground {
        0.0
    } else {
        world
            .under_target
            .map(|pipe| (pipe as f32 - ANCHOR_COL as f32).max(0.0))
            .unwrap_or(0.0)
    };
    world.transition = Some(Transition::enter(target));
    events.push(GameEvent::PipeEntered);
}

// ══════════════════════════════════════════════════════════════
// Physics pass
// ══════════════════════════════════════════════════════════════

fn physics_step(world: &mut WorldState, dt: f32, intent: i8, events: &mut Vec<GameEvent>) {
    let prev_height = world.player.height;

    resolve_horizontal(world, intent, dt);
    physics::integrate_fall(&mut world.player.height, &mut world.player.vy, dt);
    advance_enemies(world, dt);
    maybe_start_exit(world, events);
    check_flag(world, events);
    if resolve_enemy_contact(world, prev_height, events) {
        return;
    }
    collect_coin(world, events);
    if check_hole(world, events) {
        return;
    }
    settle_landing(world);
    tick_timer(world, dt, events);
}

/// Horizontal movement. Near the strip's origin the camera is pinned and
/// the player slides across the first columns instead; afterwards the
/// column stays anchored and the scroll offset carries all movement.
fn resolve_horizontal(world: &mut WorldState, intent: i8, dt: f32) {
    let prev_offset = world.player.offset;

    let mut slide_only = false;
    if world.region == Region::Overworld && prev_offset < 1.0 && intent != 0 {
        let col = world.player.screen_col;
        let headroom =
            (intent < 0 && col > 0.0) || (intent > 0 && col < ANCHOR_COL as f32);
        if headroom {
            world.player.screen_col =
                (col + intent as f32 * RUN_SPEED * dt).clamp(0.0, ANCHOR_COL as f32);
            slide_only = true;
        }
    }

    let step = if slide_only { 0.0 } else { intent as f32 * RUN_SPEED * dt };
    let mut intended = (prev_offset + step).max(0.0);

    let col = world.player.screen_col.floor() as usize;
    let next_idx = intended.floor() as usize + col;
    let curr_idx = prev_offset.floor() as usize + col;

    let blocked = {
        let view = world.view();
        if world.player.grounded() {
            rules::grounded_move_blocked(&view, curr_idx, next_idx)
        } else {
            rules::airborne_move_blocked(&view, next_idx, world.player.jump_origin)
        }
    };
    if blocked {
        intended = prev_offset;
    }
    world.player.offset = intended;

    if world.player.offset >= 1.0 || world.region == Region::Underground {
        world.player.screen_col = ANCHOR_COL as f32;
    }
}

fn advance_enemies(world: &mut WorldState, dt: f32) {
    let mut enemies = std::mem::take(&mut world.enemies);
    patrol::advance(&mut enemies, &world.view(), dt);
    world.enemies = enemies;
}

/// Rising into the last inverted mouth underground starts the exit
/// animation. Requires being airborne; walking under it does nothing.
fn maybe_start_exit(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.region != Region::Underground || world.transition.is_some() {
        return;
    }
    if world.player.grounded() {
        return;
    }
    let idx = world.player_index();
    if world.exit_pipe != Some(idx) {
        return;
    }
    if !world.active_strip().tile_at(idx as i64).is_pipe_like() {
        return;
    }
    world.transition = Some(Transition::exit());
    events.push(GameEvent::PipeExited);
}

fn check_flag(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let idx = world.player_index();
    if world.active_strip().tile_at(idx as i64) != Tile::Flag {
        return;
    }
    if !world.session.win {
        world.session.win = true;
        world.player.vy = 0.0;
        events.push(GameEvent::StageCleared);
    }
}

// ── Fatal and scoring contacts ──

/// Landing on a walker pops it; sharing its tile on the ground is fatal.
/// Returns true when the pass must stop. Mid-air overlap is harmless.
fn resolve_enemy_contact(
    world: &mut WorldState,
    prev_height: f32,
    events: &mut Vec<GameEvent>,
) -> bool {
    let idx = world.player_index();
    let slot = match world.enemies.iter().position(|e| e.idx == idx) {
        Some(slot) => slot,
        None => return false,
    };

    if physics::landed(prev_height, world.player.height) {
        world.enemies.remove(slot);
        world.session.coins += 1;
        world.player.vy = JUMP_VELOCITY * STOMP_BOUNCE;
        events.push(GameEvent::EnemyStomped { idx });
        false
    } else if world.player.grounded() {
        kill(world, DeathCause::Enemy, events);
        true
    } else {
        false
    }
}

/// A coin is collected only while rising through it, and only from the
/// tile the jump started on. Collection dampens the rest of the arc.
fn collect_coin(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.player.grounded() || world.player.vy <= 0.0 {
        return;
    }
    let idx = world.player_index();
    if world.player.jump_origin != Some(idx) {
        return;
    }
    if world.active_strip().tile_at(idx as i64) != Tile::Coin {
        return;
    }

    world.active_strip_mut().set_tile(idx as i64, Tile::Ground);
    world.session.coins += 1;
    world.player.vy *= COIN_DAMPEN;
    world.player.jump_origin = None;
    events.push(GameEvent::CoinCollected);
}

fn check_hole(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    if !world.player.grounded() {
        return false;
    }
    if world.active_strip().tile_at(world.player_index() as i64) != Tile::Hole {
        return false;
    }
    kill(world, DeathCause::Hole, events);
    true
}

/// Every grounded tick on solid footing zeroes the vertical state and
/// disarms the jump origin. This also swallows a stomp rebound set
/// earlier in the same tick.
fn settle_landing(world: &mut WorldState) {
    if !world.player.grounded() {
        return;
    }
    if world.active_strip().tile_at(world.player_index() as i64) == Tile::Hole {
        return;
    }
    world.player.vy = 0.0;
    world.player.jump_origin = None;
}

fn tick_timer(world: &mut WorldState, dt: f32, events: &mut Vec<GameEvent>) {
    if !world.session.playing() || world.session.time_left <= 0.0 {
        return;
    }
    world.session.time_left = (world.session.time_left - dt).max(0.0);
    if world.session.time_left == 0.0 {
        world.session.timed_out = true;
        kill(world, DeathCause::TimeUp, events);
    }
}

fn kill(world: &mut WorldState, cause: DeathCause, events: &mut Vec<GameEvent>) {
    world.session.game_over = true;
    world.player.vy = 0.0;
    events.push(GameEvent::PlayerDied { cause });
}

// ══════════════════════════════════════════════════════════════
// Post-round bookkeeping
// ══════════════════════════════════════════════════════════════

/// After a win, the countdown drains fast and every whole second it
/// crosses becomes a coin.
fn drain_win_time(world: &mut WorldState, dt: f32, events: &mut Vec<GameEvent>) {
    if !world.session.win || world.session.time_left <= 0.0 {
        return;
    }
    let before = world.session.time_left.floor();
    world.session.time_left = (world.session.time_left - TIME_DRAIN_RATE * dt).max(0.0);
    let gained = (before - world.session.time_left.floor()) as u32;
    world.session.coins += gained;
    for _ in 0..gained {
        events.push(GameEvent::CoinCollected);
    }
}

fn note_best(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.session.coins > world.session.best {
        world.session.best = world.session.coins;
        events.push(GameEvent::NewHighScore { coins: world.session.coins });
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
