//! Privacy access-control evaluator.
//!
//! Pure decision logic: given an owner, an (optionally anonymous) viewer,
//! a resource class, the owner's configured visibility level, and the
//! friendship predicate, decide whether access is allowed. No I/O happens
//! here; the repository layer fetches the inputs and the same function is
//! safe to call from advisory pre-checks and from inside transactions.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Per-class visibility level a user can configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    Public,
    Friends,
    Private,
}

impl PrivacyLevel {
    /// Parse a stored level string. Unknown values return `None` so the
    /// evaluator can fail closed on corrupt data.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(PrivacyLevel::Public),
            "friends" => Some(PrivacyLevel::Friends),
            "private" => Some(PrivacyLevel::Private),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyLevel::Public => "public",
            PrivacyLevel::Friends => "friends",
            PrivacyLevel::Private => "private",
        }
    }
}

/// The three independently configurable resource classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    Inventory,
    Trade,
    Marketplace,
}

impl ResourceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceClass::Inventory => "inventory",
            ResourceClass::Trade => "trade",
            ResourceClass::Marketplace => "marketplace",
        }
    }

    /// Class-specific denial message for a `private` setting.
    fn private_reason(&self) -> &'static str {
        match self {
            ResourceClass::Inventory => "This user's inventory is private",
            ResourceClass::Trade => "This user is not accepting trade offers",
            ResourceClass::Marketplace => "This user's marketplace is private",
        }
    }
}

/// The outcome of an access evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    /// Present only on denial.
    pub reason: Option<String>,
}

impl AccessDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }

    /// Convert a denial into the domain error the engine surfaces.
    pub fn into_result(self) -> Result<(), crate::error::CoreError> {
        if self.allowed {
            Ok(())
        } else {
            Err(crate::error::CoreError::PrivacyRestricted(
                self.reason
                    .unwrap_or_else(|| "Access is restricted".to_string()),
            ))
        }
    }
}

/// Evaluate whether `viewer` may access `owner`'s resource of `class`.
///
/// `level` is the owner's stored setting for the class, already parsed;
/// pass `None` for an unparseable stored value, which denies (fail
/// closed). `are_friends` is the symmetric friendship predicate; it is
/// only consulted for the `friends` level. A user is always allowed to
/// access their own resources regardless of settings.
pub fn evaluate(
    owner_id: DbId,
    viewer_id: Option<DbId>,
    class: ResourceClass,
    level: Option<PrivacyLevel>,
    are_friends: bool,
) -> AccessDecision {
    if viewer_id == Some(owner_id) {
        return AccessDecision::allow();
    }

    match level {
        Some(PrivacyLevel::Public) => AccessDecision::allow(),
        Some(PrivacyLevel::Private) => AccessDecision::deny(class.private_reason()),
        Some(PrivacyLevel::Friends) => match viewer_id {
            None => AccessDecision::deny(format!(
                "Only friends may access this user's {}",
                class.as_str()
            )),
            Some(_) if are_friends => AccessDecision::allow(),
            Some(_) => AccessDecision::deny(format!(
                "Only friends may access this user's {}",
                class.as_str()
            )),
        },
        // Unparseable stored level: deny with a generic reason.
        None => AccessDecision::deny("Access is restricted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: DbId = 1;
    const VIEWER: DbId = 2;

    #[test]
    fn owner_always_allowed() {
        for level in [
            Some(PrivacyLevel::Public),
            Some(PrivacyLevel::Friends),
            Some(PrivacyLevel::Private),
            None,
        ] {
            let decision = evaluate(OWNER, Some(OWNER), ResourceClass::Inventory, level, false);
            assert!(decision.allowed);
        }
    }

    #[test]
    fn public_allows_anyone() {
        let decision = evaluate(
            OWNER,
            Some(VIEWER),
            ResourceClass::Marketplace,
            Some(PrivacyLevel::Public),
            false,
        );
        assert!(decision.allowed);

        let anonymous = evaluate(
            OWNER,
            None,
            ResourceClass::Marketplace,
            Some(PrivacyLevel::Public),
            false,
        );
        assert!(anonymous.allowed);
    }

    #[test]
    fn private_denies_everyone_else() {
        for class in [
            ResourceClass::Inventory,
            ResourceClass::Trade,
            ResourceClass::Marketplace,
        ] {
            let decision = evaluate(
                OWNER,
                Some(VIEWER),
                class,
                Some(PrivacyLevel::Private),
                true,
            );
            assert!(!decision.allowed);
            assert!(decision.reason.is_some());
        }
    }

    #[test]
    fn friends_level_requires_friendship() {
        let stranger = evaluate(
            OWNER,
            Some(VIEWER),
            ResourceClass::Trade,
            Some(PrivacyLevel::Friends),
            false,
        );
        assert!(!stranger.allowed);

        let friend = evaluate(
            OWNER,
            Some(VIEWER),
            ResourceClass::Trade,
            Some(PrivacyLevel::Friends),
            true,
        );
        assert!(friend.allowed);
    }

    #[test]
    fn friends_level_denies_anonymous_viewers() {
        let decision = evaluate(
            OWNER,
            None,
            ResourceClass::Inventory,
            Some(PrivacyLevel::Friends),
            // An anonymous viewer can never satisfy the predicate; the flag
            // must be ignored.
            true,
        );
        assert!(!decision.allowed);
    }

    #[test]
    fn unparseable_level_fails_closed() {
        let decision = evaluate(OWNER, Some(VIEWER), ResourceClass::Inventory, None, true);
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("Access is restricted"));
    }

    #[test]
    fn level_round_trips_through_strings() {
        for level in [
            PrivacyLevel::Public,
            PrivacyLevel::Friends,
            PrivacyLevel::Private,
        ] {
            assert_eq!(PrivacyLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(PrivacyLevel::parse("everyone"), None);
    }
}
