//! Loading of card catalogs, pack rules and vault snapshots.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
