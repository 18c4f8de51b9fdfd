//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Aggregate and predicate
//! helpers accept `impl PgExecutor` instead, so the engine can repeat the
//! same queries inside its transactions as the authoritative re-check.

pub mod friendship_repo;
pub mod item_repo;
pub mod listing_repo;
pub mod offer_repo;
pub mod privacy_repo;
pub mod trade_repo;
pub mod user_repo;
pub mod wallet_repo;

pub use friendship_repo::FriendshipRepo;
pub use item_repo::ItemRepo;
pub use listing_repo::ListingRepo;
pub use offer_repo::OfferRepo;
pub use privacy_repo::PrivacyRepo;
pub use trade_repo::TradeRepo;
pub use user_repo::UserRepo;
pub use wallet_repo::WalletRepo;
