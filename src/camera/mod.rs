mod look;
mod plugin;

pub use look::*;
pub use plugin::CameraPlugin;
