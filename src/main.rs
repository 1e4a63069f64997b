/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::FrameInput;
use sim::event::GameEvent;
use sim::level;
use sim::step;
use sim::view;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::score;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let level = level::load(&config.level_file);
    let mut world = WorldState::new(&level, score::load_best());

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Pipeline Panic!");
    println!("Coins: {}   Best: {}", world.session.coins, world.session.best);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let frame_budget = config.frame_budget();
    let mut last_frame = Instant::now();
    let mut pending = PendingActions::default();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }

        // The input pump runs faster than the frame rate; presses are
        // collected here so none slip between two frames.
        collect_presses(&mut pending, &kb, &gp);

        if last_frame.elapsed() >= frame_budget {
            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;

            let input = FrameInput {
                intent: current_intent(&kb, &gp),
                jump: pending.jump,
                descend: pending.descend,
                restart: pending.restart,
                start: pending.start,
            };
            pending = PendingActions::default();

            let events = step::advance(world, dt, input);

            if let Some(sfx) = sound {
                sfx.process_events(&events);
            }
            for event in &events {
                if let GameEvent::NewHighScore { coins } = event {
                    score::save_best(*coins);
                }
            }

            renderer.render(&view::snapshot(world, config.scene_width), dt)?;
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_JUMP: &[KeyCode] = &[
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
    KeyCode::Char(' '),
];
const KEYS_DESCEND: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

/// Edge-triggered actions buffered between frames.
#[derive(Default)]
struct PendingActions {
    jump: bool,
    descend: bool,
    restart: bool,
    start: bool,
}

fn collect_presses(pending: &mut PendingActions, kb: &InputState, gp: &GamepadState) {
    if kb.any_pressed(KEYS_JUMP) || gp.jump_pressed() {
        pending.jump = true;
        pending.start = true;
    }
    if kb.any_pressed(KEYS_DESCEND) || gp.descend_pressed() {
        pending.descend = true;
        pending.start = true;
    }
    if kb.any_pressed(KEYS_RESTART) || gp.restart_pressed() {
        pending.restart = true;
        pending.start = true;
    }
    // Running also wakes the title screen.
    if kb.any_pressed(KEYS_LEFT)
        || kb.any_pressed(KEYS_RIGHT)
        || gp.left_pressed()
        || gp.right_pressed()
        || gp.start_pressed()
    {
        pending.start = true;
    }
}

/// Keyboard wins over the pad; opposing pad directions cancel out.
fn current_intent(kb: &InputState, gp: &GamepadState) -> i8 {
    let intent = kb.horizontal_intent(KEYS_LEFT, KEYS_RIGHT);
    if intent != 0 {
        return intent;
    }
    match (gp.left_held(), gp.right_held()) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    }
}
