pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod score;
pub mod sound;
