//! Song library: the track model served by `/songs`, the HTTP client that
//! fetches it and helpers to turn tracks into display text.

mod client;
mod display;
mod model;

pub use client::*;
pub use display::*;
pub use model::*;

#[cfg(test)]
mod tests;
