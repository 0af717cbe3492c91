//! Ownership checks for owned resources.
//!
//! Two shapes, deliberately different:
//!
//! - **Read by id** is scoped at the data layer
//!   ([`BookmarkStore::get_by_id_and_owner`](crate::db::store::BookmarkStore::get_by_id_and_owner)).
//!   Someone else's resource looks exactly like a missing one, and [`found`] turns both into 404.
//! - **Update and delete** load by id alone and compare owners with [`authorize`]. A mismatch,
//!   or a resource that does not exist, is a 403.
//!
//! Both are pure functions of their inputs.

use crate::{
    db::models::bookmarks::BookmarkDBResponse,
    errors::{Error, Result},
    types::{Operation, Resource, UserId},
};

/// A resource that records the user who owns it.
pub trait Owned {
    const RESOURCE: Resource;

    fn owner_id(&self) -> UserId;
}

impl Owned for BookmarkDBResponse {
    const RESOURCE: Resource = Resource::Bookmarks;

    fn owner_id(&self) -> UserId {
        self.user_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Deny,
}

/// Permit only when the resource exists and belongs to `user`.
pub fn decide<R: Owned>(user: UserId, resource: Option<&R>) -> Decision {
    match resource {
        Some(resource) if resource.owner_id() == user => Decision::Permit,
        _ => Decision::Deny,
    }
}

/// Load-then-check for mutating operations. Hands the resource back when permitted.
pub fn authorize<R: Owned>(user: UserId, resource: Option<R>, action: Operation, id: impl ToString) -> Result<R> {
    match (decide(user, resource.as_ref()), resource) {
        (Decision::Permit, Some(resource)) => Ok(resource),
        _ => Err(Error::Forbidden {
            action,
            resource: R::RESOURCE,
            id: id.to_string(),
        }),
    }
}

/// Result of an owner-scoped read: absent means 404, whoever actually owns it.
pub fn found<R: Owned>(resource: Option<R>, id: impl ToString) -> Result<R> {
    resource.ok_or_else(|| Error::NotFound {
        resource: R::RESOURCE.to_string(),
        id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bookmark(id: i64, owner: UserId) -> BookmarkDBResponse {
        BookmarkDBResponse {
            id,
            user_id: owner,
            title: "t".to_string(),
            description: None,
            link: "https://x.com".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_decide() {
        let owned_by_a = bookmark(1, 1);
        assert_eq!(decide(1, Some(&owned_by_a)), Decision::Permit);
        assert_eq!(decide(2, Some(&owned_by_a)), Decision::Deny);
        assert_eq!(decide::<BookmarkDBResponse>(1, None), Decision::Deny);
    }

    #[test]
    fn test_authorize_mismatch_is_forbidden() {
        let result = authorize(2, Some(bookmark(1, 1)), Operation::Update, 1);
        match result {
            Err(Error::Forbidden { action, resource, id }) => {
                assert_eq!(action, Operation::Update);
                assert_eq!(resource, Resource::Bookmarks);
                assert_eq!(id, "1");
            }
            other => panic!("expected forbidden, got {other:?}"),
        }
    }

    #[test]
    fn test_authorize_absent_is_forbidden() {
        let result = authorize::<BookmarkDBResponse>(1, None, Operation::Delete, 5);
        assert!(matches!(result, Err(Error::Forbidden { .. })));
    }

    #[test]
    fn test_authorize_owner_gets_resource_back() {
        let result = authorize(1, Some(bookmark(3, 1)), Operation::Delete, 3).unwrap();
        assert_eq!(result.id, 3);
    }

    #[test]
    fn test_found_absent_is_not_found() {
        let result = found::<BookmarkDBResponse>(None, 1);
        assert!(matches!(result, Err(Error::NotFound { resource, id }) if resource == "Bookmark" && id == "1"));
    }

    #[test]
    fn test_decisions_are_stable() {
        let owned_by_a = bookmark(1, 1);
        let first = decide(2, Some(&owned_by_a));
        for _ in 0..10 {
            assert_eq!(decide(2, Some(&owned_by_a)), first);
        }
    }
}
