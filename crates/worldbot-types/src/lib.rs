//! Shared type definitions for the warband worldbot.
//!
//! Every crate in the workspace speaks in these types: the parser produces
//! [`WorldUpdate`]s, the registry stores [`World`]s, and the renderer reads
//! them back out together with [`WbsTime`] remaining-time arithmetic.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper identifying a running bot instance
//! - [`enums`] -- [`Location`] and [`WorldState`]
//! - [`time`] -- Hour-ignorant minute/second clock arithmetic
//! - [`structs`] -- [`Tents`], [`World`], and [`WorldUpdate`]

pub mod enums;
pub mod ids;
pub mod structs;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use enums::{Location, WorldState};
pub use ids::InstanceId;
pub use structs::{TENT_CODES, Tents, World, WorldUpdate};
pub use time::{SECONDS_PER_MINUTE, WbsTime};
