mod ground;
mod layers;
mod plugin;
mod query;

pub use ground::*;
pub use layers::GameLayer;
pub use plugin::PhysicsPlugin;
pub use query::*;
