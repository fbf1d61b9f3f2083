use chrono::{DateTime, Utc};

use crate::models::Article;

/// Auditable
///
/// Capability implemented by entities that carry creation/update timestamps.
/// The setters are only ever called by [`stamp`]; domain and handler code
/// must not touch these fields directly.
pub trait Auditable {
    fn set_created_at(&mut self, at: DateTime<Utc>);
    fn set_updated_at(&mut self, at: Option<DateTime<Utc>>);
}

impl Auditable for Article {
    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_updated_at(&mut self, at: Option<DateTime<Utc>>) {
        self.updated_at = at;
    }
}

/// Tracked state of an entity inside a unit of work, mirroring what the
/// store is about to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Added,
    Modified,
    Unchanged,
}

/// stamp
///
/// The pre-commit audit hook. Every repository write path calls this exactly
/// once, inside its open transaction, immediately before the change is made
/// durable, so a failed commit never leaves a stamped row behind.
///
/// A newly added entity gets `created_at = now` and its `updated_at`
/// cleared; a modified one gets `updated_at = Some(now)`. Caller-supplied
/// timestamp values are overwritten unconditionally.
pub fn stamp<E: Auditable>(state: EntityState, entity: &mut E) {
    let now = Utc::now();
    match state {
        EntityState::Added => {
            entity.set_created_at(now);
            entity.set_updated_at(None);
        }
        EntityState::Modified => {
            entity.set_updated_at(Some(now));
        }
        EntityState::Unchanged => {}
    }
}
