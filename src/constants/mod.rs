//! Tuning constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.

mod camera;
mod projection;
mod sprites;
mod ui;

pub use camera::*;
pub use projection::*;
pub use sprites::*;
pub use ui::*;
