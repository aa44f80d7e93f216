//! Collection aggregation and pack generation. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod events;
pub mod filter;
pub mod group;
pub mod opener;
pub mod pack;
pub mod provenance;
pub mod rng;
pub mod stack;

pub use cards::*;
pub use catalog::*;
pub use collection::*;
pub use config::*;
pub use events::*;
pub use filter::*;
pub use group::*;
pub use opener::*;
pub use pack::*;
pub use provenance::*;
pub use rng::*;
pub use stack::*;
