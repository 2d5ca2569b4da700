pub mod ai;
pub mod animation;
pub mod catalog;
pub mod combat;
pub mod input;
pub mod roster;
pub mod scene;
pub mod sim;
pub mod types;
