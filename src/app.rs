//! Application module: the player state and the controller driving it.
//!
//! `PlayerState` lives in `app::model`; `Controller` in `app::controller`
//! binds it to a media element and to the screen.

mod controller;
mod model;

pub use controller::*;
pub use model::*;
