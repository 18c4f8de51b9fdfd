//! Authentication plumbing.
//!
//! Token issuance belongs to the surrounding storefront; this module only
//! validates incoming HS256 bearer tokens and exposes a generator for
//! tests and tooling.

pub mod jwt;
