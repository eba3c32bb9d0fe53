mod animation;
mod audio;
mod controller;
pub mod input;
mod ledge;
mod machine;
mod movement;
mod plugin;
mod setup;
mod state;

pub use animation::AnimationParams;
pub use audio::*;
pub use controller::*;
pub use input::{ControlInput, LookSource};
pub use ledge::{LedgeDetector, LedgeHit};
pub use machine::*;
pub use movement::*;
pub use plugin::{PlayerPlugin, spawn_player};
pub use setup::SetupError;
pub use state::*;
