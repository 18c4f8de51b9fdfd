//! Integration tests for the privacy access check against real settings
//! and friendship rows.

use sqlx::PgPool;
use tradepost_core::privacy::{PrivacyLevel, ResourceClass};
use tradepost_core::types::DbId;
use tradepost_db::models::privacy::UpdatePrivacySettings;
use tradepost_db::models::user::{CreateUser, User};
use tradepost_db::repositories::{FriendshipRepo, PrivacyRepo, UserRepo};

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

async fn set_level(pool: &PgPool, user_id: DbId, class: ResourceClass, level: PrivacyLevel) {
    let mut patch = UpdatePrivacySettings {
        inventory: None,
        trade: None,
        marketplace: None,
    };
    match class {
        ResourceClass::Inventory => patch.inventory = Some(level),
        ResourceClass::Trade => patch.trade = Some(level),
        ResourceClass::Marketplace => patch.marketplace = Some(level),
    }
    PrivacyRepo::update(pool, user_id, &patch).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn defaults_allow_everyone(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let viewer = seed_user(&pool, "viewer").await;

    for class in [
        ResourceClass::Inventory,
        ResourceClass::Trade,
        ResourceClass::Marketplace,
    ] {
        let decision = PrivacyRepo::check_access(&pool, owner.id, Some(viewer.id), class)
            .await
            .unwrap();
        assert!(decision.allowed, "{} should default open", class.as_str());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_settings_row_evaluates_as_public(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let viewer = seed_user(&pool, "viewer").await;

    // Simulate a legacy account created before lazy settings rows.
    sqlx::query("DELETE FROM privacy_settings WHERE user_id = $1")
        .bind(owner.id)
        .execute(&pool)
        .await
        .unwrap();

    let decision =
        PrivacyRepo::check_access(&pool, owner.id, Some(viewer.id), ResourceClass::Inventory)
            .await
            .unwrap();
    assert!(decision.allowed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_denies_other_viewers_but_not_owner(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let viewer = seed_user(&pool, "viewer").await;
    set_level(&pool, owner.id, ResourceClass::Inventory, PrivacyLevel::Private).await;

    let denied =
        PrivacyRepo::check_access(&pool, owner.id, Some(viewer.id), ResourceClass::Inventory)
            .await
            .unwrap();
    assert!(!denied.allowed);
    assert!(denied.reason.is_some());

    let own = PrivacyRepo::check_access(&pool, owner.id, Some(owner.id), ResourceClass::Inventory)
        .await
        .unwrap();
    assert!(own.allowed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn friends_level_follows_friendship_both_directions(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let friend = seed_user(&pool, "friend").await;
    let stranger = seed_user(&pool, "stranger").await;
    set_level(&pool, owner.id, ResourceClass::Trade, PrivacyLevel::Friends).await;

    // Friendship row points friend -> owner; the predicate is symmetric.
    FriendshipRepo::create(&pool, friend.id, owner.id, "accepted")
        .await
        .unwrap();

    let friendly = PrivacyRepo::check_access(&pool, owner.id, Some(friend.id), ResourceClass::Trade)
        .await
        .unwrap();
    assert!(friendly.allowed);

    let blocked =
        PrivacyRepo::check_access(&pool, owner.id, Some(stranger.id), ResourceClass::Trade)
            .await
            .unwrap();
    assert!(!blocked.allowed);

    let anonymous = PrivacyRepo::check_access(&pool, owner.id, None, ResourceClass::Trade)
        .await
        .unwrap();
    assert!(!anonymous.allowed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_friendship_does_not_count(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let viewer = seed_user(&pool, "viewer").await;
    set_level(&pool, owner.id, ResourceClass::Trade, PrivacyLevel::Friends).await;
    FriendshipRepo::create(&pool, viewer.id, owner.id, "pending")
        .await
        .unwrap();

    let decision = PrivacyRepo::check_access(&pool, owner.id, Some(viewer.id), ResourceClass::Trade)
        .await
        .unwrap();
    assert!(!decision.allowed);
}
