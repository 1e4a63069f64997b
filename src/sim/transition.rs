/// Pipe transitions — the paired sink/surface animation.
///
/// Entering or leaving the underground plays two three-frame phases:
/// one on the strip being left, one on the strip being entered. The
/// region swap happens exactly at the phase boundary, so the world is
/// never visible half-switched. While a transition runs, the physics
/// step is suspended entirely; the player's height and velocity are
/// frozen and resume untouched afterwards.

use crate::domain::entity::ANCHOR_COL;

use super::world::{Region, WorldState};

/// Seconds each animation frame stays on screen.
pub const PIPE_FRAME_SECS: f32 = 0.12;
const FRAMES_PER_PHASE: u32 = 3;

const ENTER_OVER_FRAMES: [char; 3] = ['⠶', '⠴', '⠲'];
const ENTER_UNDER_FRAMES: [char; 3] = ['⠭', '⠬', '⠯'];
const EXIT_UNDER_FRAMES: [char; 3] = ['⠯', '⠬', '⠭'];
const EXIT_OVER_FRAMES: [char; 3] = ['⠲', '⠴', '⠶'];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Enter,
    Exit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Playing on the overworld strip.
    Over,
    /// Playing on the underground strip.
    Under,
}

#[derive(Clone, Copy, Debug)]
pub struct Transition {
    pub mode: Mode,
    pub phase: Phase,
    pub frame: u32,
    elapsed: f32,
    /// Enter only: scroll offset installed when the underground loads.
    under_start_offset: f32,
}

impl Transition {
    pub fn enter(under_start_offset: f32) -> Self {
        Transition {
            mode: Mode::Enter,
            phase: Phase::Over,
            frame: 0,
            elapsed: 0.0,
            under_start_offset,
        }
    }

    pub fn exit() -> Self {
        Transition {
            mode: Mode::Exit,
            phase: Phase::Under,
            frame: 0,
            elapsed: 0.0,
            under_start_offset: 0.0,
        }
    }

    /// Glyph drawn in place of the player for the current frame.
    pub fn glyph(&self) -> char {
        let frames = match (self.mode, self.phase) {
            (Mode::Enter, Phase::Over) => &ENTER_OVER_FRAMES,
            (Mode::Enter, Phase::Under) => &ENTER_UNDER_FRAMES,
            (Mode::Exit, Phase::Under) => &EXIT_UNDER_FRAMES,
            (Mode::Exit, Phase::Over) => &EXIT_OVER_FRAMES,
        };
        frames[(self.frame as usize).min(frames.len() - 1)]
    }
}

/// Advance the animation clock and handle phase boundaries.
///
/// With the tick clamp below the frame duration, one call advances at
/// most one frame. Leftover time past a frame boundary is discarded,
/// keeping every frame on screen for its full duration.
pub fn tick(world: &mut WorldState, dt: f32) {
    let mut tr = match world.transition.take() {
        Some(tr) => tr,
        None => return,
    };

    tr.elapsed += dt;
    if tr.elapsed < PIPE_FRAME_SECS {
        world.transition = Some(tr);
        return;
    }
    tr.elapsed = 0.0;
    tr.frame += 1;

    match (tr.mode, tr.phase) {
        (Mode::Enter, Phase::Over) => {
            if tr.frame >= FRAMES_PER_PHASE {
                world.swap_region(Region::Underground);
                world.player.offset = tr.under_start_offset;
                world.visited_underground = true;
                tr.phase = Phase::Under;
                tr.frame = 0;
            }
        }
        (Mode::Enter, Phase::Under) => {
            if tr.frame >= FRAMES_PER_PHASE {
                return; // complete; transition stays cleared
            }
        }
        (Mode::Exit, Phase::Under) => {
            if tr.frame >= FRAMES_PER_PHASE {
                world.swap_region(Region::Overworld);
                world.player.offset = match world.return_pipe {
                    Some(pipe) => (pipe as f32 - ANCHOR_COL as f32).max(0.0),
                    None => world.prev_over_offset + 1.0,
                };
                tr.phase = Phase::Over;
                tr.frame = 0;
            }
        }
        (Mode::Exit, Phase::Over) => {
            if tr.frame >= FRAMES_PER_PHASE {
                return;
            }
        }
    }

    world.transition = Some(tr);
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Level;

    fn world_with_underground() -> WorldState {
        let level = Level {
            name: String::from("transit"),
            overworld: String::from("⠤⠶⠥⠶o⠤⠶⠤⠶⠤⠶⠤⚑"),
            underground: Some(String::from("⠿⠯⠤o⠶⠥⠯⠤⠶⠤⠭⠿")),
        };
        WorldState::new(&level, 0)
    }

    /// Drive the clock through `n` whole animation frames at a
    /// realistic tick length.
    fn run_frames(world: &mut WorldState, n: usize) {
        // 0.05 per call: three calls cross the 0.12 frame boundary.
        for _ in 0..n * 3 {
            tick(world, 0.05);
        }
    }

    #[test]
    fn enter_swaps_region_between_the_phases() {
        let mut world = world_with_underground();
        world.transition = Some(Transition::enter(5.0));

        run_frames(&mut world, 2);
        assert_eq!(world.region, Region::Overworld); // still sinking

        run_frames(&mut world, 1);
        assert_eq!(world.region, Region::Underground);
        assert_eq!(world.player.offset, 5.0);
        assert!(world.visited_underground);
        let tr = world.transition.unwrap();
        assert_eq!(tr.phase, Phase::Under);
        assert_eq!(tr.frame, 0);

        run_frames(&mut world, 3);
        assert!(world.transition.is_none());
        assert_eq!(world.region, Region::Underground);
    }

    #[test]
    fn exit_lands_before_the_return_pipe() {
        let mut world = world_with_underground();
        world.swap_region(Region::Underground);
        world.transition = Some(Transition::exit());

        run_frames(&mut world, 3);
        assert_eq!(world.region, Region::Overworld);
        // Return pipe at 10, anchor column 3.
        assert_eq!(world.player.offset, 7.0);

        run_frames(&mut world, 3);
        assert!(world.transition.is_none());
    }

    #[test]
    fn exit_without_a_return_pipe_falls_back_to_the_entry_point() {
        let mut world = world_with_underground();
        world.return_pipe = None;
        world.prev_over_offset = 12.0;
        world.swap_region(Region::Underground);
        world.transition = Some(Transition::exit());

        run_frames(&mut world, 3);
        assert_eq!(world.player.offset, 13.0);
    }

    #[test]
    fn exit_keeps_the_player_airborne_through_the_swap() {
        let mut world = world_with_underground();
        world.swap_region(Region::Underground);
        world.player.height = 0.8;
        world.player.vy = 2.0;
        world.transition = Some(Transition::exit());

        run_frames(&mut world, 6);
        // Gravity resumes after the animation; nothing here touched it.
        assert_eq!(world.player.height, 0.8);
        assert_eq!(world.player.vy, 2.0);
    }

    #[test]
    fn oversized_tick_still_advances_one_frame() {
        let mut world = world_with_underground();
        world.transition = Some(Transition::enter(0.0));
        tick(&mut world, 10.0);
        let tr = world.transition.unwrap();
        assert_eq!(tr.frame, 1);
        assert_eq!(world.region, Region::Overworld);
    }

    #[test]
    fn frame_glyphs_follow_the_phase() {
        let enter = Transition::enter(0.0);
        assert_eq!(enter.glyph(), '⠶');
        let mut exit = Transition::exit();
        assert_eq!(exit.glyph(), '⠯');
        exit.frame = 2;
        assert_eq!(exit.glyph(), '⠭');
        exit.frame = 9; // clamped to the last frame
        assert_eq!(exit.glyph(), '⠭');
    }
}
