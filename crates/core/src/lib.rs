//! Domain core for the Tradepost marketplace and trading engine.
//!
//! This crate holds the pure, I/O-free parts of the system: the error
//! taxonomy, money arithmetic, policy ceilings, the privacy access-control
//! evaluator, and the listing/trade status vocabularies. Everything here is
//! usable from both the repository/engine layer and any future CLI or
//! worker tooling.

pub mod error;
pub mod market;
pub mod money;
pub mod policy;
pub mod privacy;
pub mod trading;
pub mod types;
