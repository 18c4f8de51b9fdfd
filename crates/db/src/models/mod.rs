//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where the API creates rows
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod item;
pub mod listing;
pub mod privacy;
pub mod trade;
pub mod user;
pub mod wallet;
