pub mod event;
pub mod level;
pub mod step;
pub mod transition;
pub mod view;
pub mod world;
