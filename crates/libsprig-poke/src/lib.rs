//! PokeAPI integration for sprig
//!
//! The content source behind every published commit: a pseudo-random national
//! dex id in [1, 807] picks the resource, and the response carries a display
//! name plus an optional front sprite URL.

mod client;
mod error;

pub use client::{random_id, PokeClient, Pokemon, Sprites, MAX_ID, MIN_ID};
pub use error::PokeError;
