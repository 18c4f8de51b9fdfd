//! Privacy settings and friendship models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tradepost_core::privacy::PrivacyLevel;
use tradepost_core::types::{DbId, Timestamp};

/// A row from the `privacy_settings` table.
///
/// Levels are stored as text; [`PrivacySettings::level_for`] parses them
/// and lets the evaluator fail closed on anything unexpected.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PrivacySettings {
    pub id: DbId,
    pub user_id: DbId,
    pub inventory: String,
    pub trade: String,
    pub marketplace: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PrivacySettings {
    /// The stored level string for a resource class.
    pub fn raw_level(&self, class: tradepost_core::privacy::ResourceClass) -> &str {
        use tradepost_core::privacy::ResourceClass;
        match class {
            ResourceClass::Inventory => &self.inventory,
            ResourceClass::Trade => &self.trade,
            ResourceClass::Marketplace => &self.marketplace,
        }
    }

    /// Parsed level for a resource class; `None` for corrupt data.
    pub fn level_for(
        &self,
        class: tradepost_core::privacy::ResourceClass,
    ) -> Option<PrivacyLevel> {
        PrivacyLevel::parse(self.raw_level(class))
    }
}

/// Patch DTO for updating one's own privacy settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePrivacySettings {
    pub inventory: Option<PrivacyLevel>,
    pub trade: Option<PrivacyLevel>,
    pub marketplace: Option<PrivacyLevel>,
}

/// A row from the `friendships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Friendship {
    pub id: DbId,
    pub user_id: DbId,
    pub friend_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
