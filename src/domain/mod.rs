pub mod entity;
pub mod patrol;
pub mod physics;
pub mod rules;
pub mod tile;
