//! Integration tests for the trade negotiation engine: posting trades and
//! offers, the accept swap, sibling disposal, and cancellation cascades.

use assert_matches::assert_matches;
use sqlx::PgPool;
use tradepost_core::error::{CoreError, QuotaKind};
use tradepost_core::policy::MarketPolicy;
use tradepost_core::privacy::PrivacyLevel;
use tradepost_core::trading::{offer_status, trade_status};
use tradepost_core::types::DbId;
use tradepost_db::engine::{trading, EngineError};
use tradepost_db::models::item::{CreateItem, Item};
use tradepost_db::models::privacy::UpdatePrivacySettings;
use tradepost_db::models::user::{CreateUser, User};
use tradepost_db::repositories::{FriendshipRepo, ItemRepo, OfferRepo, PrivacyRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, name: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            balance_cents: None,
        },
    )
    .await
    .unwrap()
}

async fn seed_item(pool: &PgPool, owner_id: DbId, name: &str) -> Item {
    ItemRepo::create(
        pool,
        &CreateItem {
            owner_id,
            name: name.to_string(),
            tradeable: None,
            marketable: None,
        },
    )
    .await
    .unwrap()
}

async fn item_state(pool: &PgPool, id: DbId) -> Item {
    ItemRepo::find_by_id(pool, id).await.unwrap().unwrap()
}

fn policy() -> MarketPolicy {
    MarketPolicy::default()
}

// ---------------------------------------------------------------------------
// Posting trades
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_trade_locks_item(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let item = seed_item(&pool, user.id, "ion blade").await;

    let trade = trading::post_trade(&pool, user.id, item.id, &policy())
        .await
        .unwrap();

    assert_eq!(trade.status, trade_status::PENDING);
    assert!(item_state(&pool, item.id).await.locked);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_tradeable_item_rejected(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let item = ItemRepo::create(
        &pool,
        &CreateItem {
            owner_id: user.id,
            name: "account badge".to_string(),
            tradeable: Some(false),
            marketable: Some(true),
        },
    )
    .await
    .unwrap();

    let err = trading::post_trade(&pool, user.id, item.id, &policy())
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Domain(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trade_quota_reports_true_count(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;
    let policy = MarketPolicy {
        max_active_trades: 2,
        ..MarketPolicy::default()
    };

    for i in 0..2 {
        let item = seed_item(&pool, user.id, &format!("item-{i}")).await;
        trading::post_trade(&pool, user.id, item.id, &policy)
            .await
            .unwrap();
    }

    let third = seed_item(&pool, user.id, "item-2").await;
    let err = trading::post_trade(&pool, user.id, third.id, &policy)
        .await
        .unwrap_err();

    assert_matches!(
        err,
        EngineError::Domain(CoreError::QuotaExceeded {
            quota: QuotaKind::ActiveTrades,
            current: 2,
            limit: 2,
        })
    );
}

// ---------------------------------------------------------------------------
// Posting offers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_offer_locks_offered_item(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;
    let ben_item = seed_item(&pool, ben.id, "pulse bow").await;

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy())
        .await
        .unwrap();
    let offer = trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap();

    assert_eq!(offer.status, offer_status::PENDING);
    assert!(item_state(&pool, ben_item.id).await.locked);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cannot_offer_on_own_trade(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let first = seed_item(&pool, ana.id, "ion blade").await;
    let second = seed_item(&pool, ana.id, "pulse bow").await;

    let trade = trading::post_trade(&pool, ana.id, first.id, &policy())
        .await
        .unwrap();
    let err = trading::post_offer(&pool, ana.id, trade.id, second.id, &policy())
        .await
        .unwrap_err();

    assert_matches!(err, EngineError::Domain(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_pending_offer_rejected(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;
    let ben_item = seed_item(&pool, ben.id, "pulse bow").await;

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy())
        .await
        .unwrap();
    trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap();

    let err = trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Domain(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn offers_per_trade_cap_enforced(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;
    let policy = MarketPolicy {
        max_offers_per_trade: 2,
        ..MarketPolicy::default()
    };

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy)
        .await
        .unwrap();

    for i in 0..2 {
        let item = seed_item(&pool, ben.id, &format!("offer-item-{i}")).await;
        trading::post_offer(&pool, ben.id, trade.id, item.id, &policy)
            .await
            .unwrap();
    }

    let third = seed_item(&pool, ben.id, "offer-item-2").await;
    let err = trading::post_offer(&pool, ben.id, trade.id, third.id, &policy)
        .await
        .unwrap_err();

    assert_matches!(
        err,
        EngineError::Domain(CoreError::QuotaExceeded {
            quota: QuotaKind::OffersPerTrade,
            current: 2,
            limit: 2,
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trade_privacy_gates_offers(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let cara = seed_user(&pool, "cara").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;

    PrivacyRepo::update(
        &pool,
        ana.id,
        &UpdatePrivacySettings {
            inventory: None,
            trade: Some(PrivacyLevel::Friends),
            marketplace: None,
        },
    )
    .await
    .unwrap();
    FriendshipRepo::create(&pool, ana.id, ben.id, "accepted")
        .await
        .unwrap();

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy())
        .await
        .unwrap();

    // A friend may offer.
    let ben_item = seed_item(&pool, ben.id, "pulse bow").await;
    trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap();

    // A stranger may not.
    let cara_item = seed_item(&pool, cara.id, "rail pistol").await;
    let err = trading::post_offer(&pool, cara.id, trade.id, cara_item.id, &policy())
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Domain(CoreError::PrivacyRestricted(_)));
}

// ---------------------------------------------------------------------------
// Accepting offers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn accept_swaps_owners_and_rejects_siblings(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let cara = seed_user(&pool, "cara").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;
    let ben_item = seed_item(&pool, ben.id, "pulse bow").await;
    let cara_item = seed_item(&pool, cara.id, "rail pistol").await;

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy())
        .await
        .unwrap();
    let ben_offer = trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap();
    let cara_offer = trading::post_offer(&pool, cara.id, trade.id, cara_item.id, &policy())
        .await
        .unwrap();

    let accepted = trading::accept_offer(&pool, ana.id, ben_offer.id)
        .await
        .unwrap();

    assert_eq!(accepted.trade.status, trade_status::COMPLETED);
    assert_eq!(accepted.offer.status, offer_status::ACCEPTED);

    // Two-way swap, both items unlocked.
    let traded = item_state(&pool, ana_item.id).await;
    let offered = item_state(&pool, ben_item.id).await;
    assert_eq!(traded.owner_id, ben.id);
    assert_eq!(offered.owner_id, ana.id);
    assert!(!traded.locked);
    assert!(!offered.locked);

    // The sibling offer is rejected and its item released, untouched in
    // ownership.
    let sibling = OfferRepo::find_by_id(&pool, cara_offer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sibling.status, offer_status::REJECTED);
    let sibling_item = item_state(&pool, cara_item.id).await;
    assert_eq!(sibling_item.owner_id, cara.id);
    assert!(!sibling_item.locked);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_trade_owner_can_accept(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;
    let ben_item = seed_item(&pool, ben.id, "pulse bow").await;

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy())
        .await
        .unwrap();
    let offer = trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap();

    let err = trading::accept_offer(&pool, ben.id, offer.id)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Domain(CoreError::Forbidden(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn accept_twice_conflicts(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;
    let ben_item = seed_item(&pool, ben.id, "pulse bow").await;

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy())
        .await
        .unwrap();
    let offer = trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap();

    trading::accept_offer(&pool, ana.id, offer.id).await.unwrap();
    let err = trading::accept_offer(&pool, ana.id, offer.id)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Domain(CoreError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Rejecting / cancelling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reject_offer_unlocks_item_and_keeps_trade_open(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;
    let ben_item = seed_item(&pool, ben.id, "pulse bow").await;

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy())
        .await
        .unwrap();
    let offer = trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap();

    let rejected = trading::reject_offer(&pool, ana.id, offer.id).await.unwrap();

    assert_eq!(rejected.status, offer_status::REJECTED);
    assert!(!item_state(&pool, ben_item.id).await.locked);
    // The parent trade is untouched and its item is still locked.
    let trade_after = tradepost_db::repositories::TradeRepo::find_by_id(&pool, trade.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(trade_after.status, trade_status::PENDING);
    assert!(item_state(&pool, ana_item.id).await.locked);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn offerer_can_withdraw_own_offer(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;
    let ben_item = seed_item(&pool, ben.id, "pulse bow").await;

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy())
        .await
        .unwrap();
    let offer = trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap();

    // The trade owner may not withdraw someone else's offer.
    let err = trading::cancel_offer(&pool, ana.id, offer.id).await.unwrap_err();
    assert_matches!(err, EngineError::Domain(CoreError::Forbidden(_)));

    let cancelled = trading::cancel_offer(&pool, ben.id, offer.id).await.unwrap();
    assert_eq!(cancelled.status, offer_status::CANCELLED);
    assert!(!item_state(&pool, ben_item.id).await.locked);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_trade_releases_all_pending_offers(pool: PgPool) {
    let ana = seed_user(&pool, "ana").await;
    let ben = seed_user(&pool, "ben").await;
    let cara = seed_user(&pool, "cara").await;
    let ana_item = seed_item(&pool, ana.id, "ion blade").await;
    let ben_item = seed_item(&pool, ben.id, "pulse bow").await;
    let cara_item = seed_item(&pool, cara.id, "rail pistol").await;

    let trade = trading::post_trade(&pool, ana.id, ana_item.id, &policy())
        .await
        .unwrap();
    let ben_offer = trading::post_offer(&pool, ben.id, trade.id, ben_item.id, &policy())
        .await
        .unwrap();
    let cara_offer = trading::post_offer(&pool, cara.id, trade.id, cara_item.id, &policy())
        .await
        .unwrap();

    let cancelled = trading::cancel_trade(&pool, ana.id, trade.id).await.unwrap();
    assert_eq!(cancelled.status, trade_status::CANCELLED);

    // The trade item and every offered item are unlocked; pending offers
    // are cancelled.
    assert!(!item_state(&pool, ana_item.id).await.locked);
    assert!(!item_state(&pool, ben_item.id).await.locked);
    assert!(!item_state(&pool, cara_item.id).await.locked);
    for offer_id in [ben_offer.id, cara_offer.id] {
        let offer = OfferRepo::find_by_id(&pool, offer_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(offer.status, offer_status::CANCELLED);
    }
}
