//! Per-frame systems over the entity world.

mod sprites;

pub use sprites::*;
