//! Core toggle implementation

use crate::{ToggleError, ToggleMetrics};
use colloquy_domain::traits::RelationshipStore;
use colloquy_domain::{EntityId, EntityKind, RelatedEntity, RelationshipSet, User};
use std::fmt::Display;

/// What a toggle did to the actor's set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Target was appended to the set
    Added,
    /// Target was taken out of the set
    Removed,
    /// Set already had the requested membership
    Unchanged,
}

/// Relationship toggle engine
///
/// The only code path allowed to change relationship-set membership, and
/// therefore the only one that touches the counters derived from it:
/// - Add and remove are idempotent; a repeated toggle is `Unchanged`
/// - Membership changes on a counted set adjust the target's counter by
///   ±1 in the same call; when that adjustment fails the membership change
///   is undone before the error is returned
/// - [`add_exclusive`](Self::add_exclusive) pairs an add with the removal
///   of the opposite set and rolls the add back if the removal fails
///
/// The engine holds no per-request state, so one instance is shared by all
/// handlers.
///
/// # Examples
///
/// ```no_run
/// use colloquy_domain::{EntityId, RelationshipSet};
/// use colloquy_social::{RelationshipEngine, ToggleOutcome};
/// use colloquy_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new("colloquy.db")?;
/// let engine = RelationshipEngine::new();
/// # let (actor, answer) = (EntityId::new(), EntityId::new());
///
/// let outcome = engine.add_exclusive(&mut store, actor, RelationshipSet::LikingAnswers, answer)?;
/// assert_eq!(outcome, ToggleOutcome::Added);
/// println!("{}", engine.metrics().summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RelationshipEngine {
    metrics: ToggleMetrics,
}

impl RelationshipEngine {
    /// Create a new engine with empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &ToggleMetrics {
        &self.metrics
    }

    /// Add `target` to the actor's `set`
    ///
    /// Fails with `NotFound` when the actor or the target is missing. Adding
    /// to a counted set increments the target's counter by one.
    pub fn add<S: RelationshipStore>(
        &self,
        store: &mut S,
        actor: EntityId,
        set: RelationshipSet,
        target: EntityId,
    ) -> Result<ToggleOutcome, ToggleError>
    where
        S::Error: Display,
    {
        ensure_exists(store, EntityKind::User, actor)?;
        ensure_exists(store, set.target_kind(), target)?;

        let added = store
            .insert_member(actor, set, target)
            .map_err(ToggleError::store)?;
        if !added {
            tracing::debug!("{} already in {} of user {}", target, set, actor);
            self.metrics.record_unchanged();
            return Ok(ToggleOutcome::Unchanged);
        }

        if let Some(counter) = set.counter() {
            if let Err(e) = store.increment_counter(target, counter, 1) {
                tracing::warn!(
                    "Incrementing {} of {} failed, rolling back {} add: {}",
                    counter.as_str(),
                    target,
                    set,
                    e
                );
                return match store.remove_member(actor, set, target) {
                    Ok(_) => {
                        self.metrics.record_compensation();
                        Err(ToggleError::store(e))
                    }
                    Err(undo) => Err(self.inconsistency(format!(
                        "{} of user {} holds {} but {} was not incremented ({}); rollback failed: {}",
                        set,
                        actor,
                        target,
                        counter.as_str(),
                        e,
                        undo
                    ))),
                };
            }
            self.metrics.record_counter_adjustment();
        }

        tracing::debug!("Added {} to {} of user {}", target, set, actor);
        self.metrics.record_added();
        Ok(ToggleOutcome::Added)
    }

    /// Remove `target` from the actor's `set`
    ///
    /// Removing something that was never added is `Unchanged`, not an error.
    /// The target does not need to exist any more.
    pub fn remove<S: RelationshipStore>(
        &self,
        store: &mut S,
        actor: EntityId,
        set: RelationshipSet,
        target: EntityId,
    ) -> Result<ToggleOutcome, ToggleError>
    where
        S::Error: Display,
    {
        ensure_exists(store, EntityKind::User, actor)?;

        let removed = store
            .remove_member(actor, set, target)
            .map_err(ToggleError::store)?;
        if !removed {
            tracing::debug!("{} not in {} of user {}", target, set, actor);
            self.metrics.record_unchanged();
            return Ok(ToggleOutcome::Unchanged);
        }

        if let Some(counter) = set.counter() {
            if let Err(e) = store.increment_counter(target, counter, -1) {
                tracing::warn!(
                    "Decrementing {} of {} failed, restoring {} membership: {}",
                    counter.as_str(),
                    target,
                    set,
                    e
                );
                return match store.insert_member(actor, set, target) {
                    Ok(_) => {
                        self.metrics.record_compensation();
                        Err(ToggleError::store(e))
                    }
                    Err(undo) => Err(self.inconsistency(format!(
                        "{} of user {} lost {} but {} was not decremented ({}); restore failed: {}",
                        set,
                        actor,
                        target,
                        counter.as_str(),
                        e,
                        undo
                    ))),
                };
            }
            self.metrics.record_counter_adjustment();
        }

        tracing::debug!("Removed {} from {} of user {}", target, set, actor);
        self.metrics.record_removed();
        Ok(ToggleOutcome::Removed)
    }

    /// Add `target` to `set` and take it out of the opposite set
    ///
    /// Runs as two ordered steps. If the second step fails after the first
    /// one added the target, the add is reverted and the original error is
    /// returned. For sets without an opposite this is plain [`add`](Self::add).
    /// The outcome reports the first step.
    pub fn add_exclusive<S: RelationshipStore>(
        &self,
        store: &mut S,
        actor: EntityId,
        set: RelationshipSet,
        target: EntityId,
    ) -> Result<ToggleOutcome, ToggleError>
    where
        S::Error: Display,
    {
        let outcome = self.add(store, actor, set, target)?;
        let Some(opposite) = set.opposite() else {
            return Ok(outcome);
        };

        let err = match self.remove(store, actor, opposite, target) {
            Ok(_) => return Ok(outcome),
            Err(err) => err,
        };
        if outcome != ToggleOutcome::Added {
            return Err(err);
        }

        tracing::warn!(
            "Removing {} from {} of user {} failed, reverting {} add: {}",
            target,
            opposite,
            actor,
            set,
            err
        );
        match self.remove(store, actor, set, target) {
            Ok(_) => {
                self.metrics.record_compensation();
                Err(err)
            }
            Err(undo) => Err(self.inconsistency(format!(
                "{} of user {} may hold {} in both {} and {} ({}); revert failed: {}",
                target, actor, target, set, opposite, err, undo
            ))),
        }
    }

    /// Expanded members of the subject's `set`, in insertion order
    ///
    /// Members whose target no longer exists are skipped.
    pub fn list<S: RelationshipStore>(
        &self,
        store: &S,
        subject: EntityId,
        set: RelationshipSet,
    ) -> Result<Vec<RelatedEntity>, ToggleError>
    where
        S::Error: Display,
    {
        let members = store
            .members(subject, set)
            .map_err(ToggleError::store)?
            .ok_or(ToggleError::NotFound {
                kind: EntityKind::User,
                id: subject,
            })?;
        store
            .populate(set.target_kind(), &members)
            .map_err(ToggleError::store)
    }

    /// Users whose `set` holds `target`, e.g. the followers of a user or topic
    pub fn subjects<S: RelationshipStore>(
        &self,
        store: &S,
        set: RelationshipSet,
        target: EntityId,
    ) -> Result<Vec<User>, ToggleError>
    where
        S::Error: Display,
    {
        ensure_exists(store, set.target_kind(), target)?;
        store.subjects(set, target).map_err(ToggleError::store)
    }

    /// Empty every set the actor owns, keeping counters in step
    ///
    /// Returns the number of memberships removed.
    pub fn purge_actor<S: RelationshipStore>(
        &self,
        store: &mut S,
        actor: EntityId,
    ) -> Result<usize, ToggleError>
    where
        S::Error: Display,
    {
        let mut removed = 0;
        for set in RelationshipSet::ALL {
            let members = store
                .members(actor, set)
                .map_err(ToggleError::store)?
                .ok_or(ToggleError::NotFound {
                    kind: EntityKind::User,
                    id: actor,
                })?;
            for target in members {
                if self.remove(store, actor, set, target)? == ToggleOutcome::Removed {
                    removed += 1;
                }
            }
        }
        tracing::info!("Purged {} relationships of user {}", removed, actor);
        Ok(removed)
    }

    /// Drop every reference to a target that is about to be deleted
    ///
    /// Counters live on the target itself, so none are adjusted here.
    pub fn purge_target<S: RelationshipStore>(
        &self,
        store: &mut S,
        kind: EntityKind,
        target: EntityId,
    ) -> Result<usize, ToggleError>
    where
        S::Error: Display,
    {
        let removed = store
            .remove_references_to(kind, target)
            .map_err(ToggleError::store)?;
        if removed > 0 {
            tracing::info!("Removed {} references to {} {}", removed, kind, target);
        }
        Ok(removed)
    }

    fn inconsistency(&self, message: String) -> ToggleError {
        tracing::error!("{}", message);
        self.metrics.record_inconsistency();
        ToggleError::Inconsistency(message)
    }
}

fn ensure_exists<S: RelationshipStore>(
    store: &S,
    kind: EntityKind,
    id: EntityId,
) -> Result<(), ToggleError>
where
    S::Error: Display,
{
    if store.exists(kind, id).map_err(ToggleError::store)? {
        Ok(())
    } else {
        Err(ToggleError::NotFound { kind, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_domain::{Answer, CounterField, Gender, Topic};
    use std::collections::HashMap;

    /// In-memory store with switchable failures
    #[derive(Default)]
    struct FakeStore {
        entities: HashMap<EntityId, EntityKind>,
        sets: HashMap<(EntityId, RelationshipSet), Vec<EntityId>>,
        votes: HashMap<EntityId, i64>,
        fail_counter: bool,
        fail_remove: bool,
        fail_remove_in: Option<RelationshipSet>,
    }

    impl FakeStore {
        fn spawn(&mut self, kind: EntityKind) -> EntityId {
            let id = EntityId::new();
            self.entities.insert(id, kind);
            if kind == EntityKind::Answer {
                self.votes.insert(id, 0);
            }
            id
        }

        fn set(&self, actor: EntityId, set: RelationshipSet) -> Vec<EntityId> {
            self.sets.get(&(actor, set)).cloned().unwrap_or_default()
        }
    }

    impl RelationshipStore for FakeStore {
        type Error = String;

        fn exists(&self, kind: EntityKind, id: EntityId) -> Result<bool, String> {
            Ok(self.entities.get(&id) == Some(&kind))
        }

        fn members(&self, actor: EntityId, set: RelationshipSet) -> Result<Option<Vec<EntityId>>, String> {
            if self.entities.get(&actor) != Some(&EntityKind::User) {
                return Ok(None);
            }
            Ok(Some(self.set(actor, set)))
        }

        fn insert_member(&mut self, actor: EntityId, set: RelationshipSet, target: EntityId) -> Result<bool, String> {
            let members = self.sets.entry((actor, set)).or_default();
            if members.contains(&target) {
                return Ok(false);
            }
            members.push(target);
            Ok(true)
        }

        fn remove_member(&mut self, actor: EntityId, set: RelationshipSet, target: EntityId) -> Result<bool, String> {
            if self.fail_remove || self.fail_remove_in == Some(set) {
                return Err("remove refused".to_string());
            }
            let members = self.sets.entry((actor, set)).or_default();
            match members.iter().position(|m| *m == target) {
                Some(index) => {
                    members.remove(index);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        fn increment_counter(&mut self, target: EntityId, _counter: CounterField, delta: i64) -> Result<(), String> {
            if self.fail_counter {
                return Err("counter unavailable".to_string());
            }
            let votes = self.votes.get_mut(&target).ok_or("no such answer")?;
            *votes += delta;
            Ok(())
        }

        fn counter_value(&self, target: EntityId, _counter: CounterField) -> Result<Option<i64>, String> {
            Ok(self.votes.get(&target).copied())
        }

        fn populate(&self, kind: EntityKind, ids: &[EntityId]) -> Result<Vec<RelatedEntity>, String> {
            Ok(ids
                .iter()
                .filter(|id| self.entities.get(id) == Some(&kind))
                .map(|id| match kind {
                    EntityKind::User => RelatedEntity::User(User {
                        id: *id,
                        name: id.to_string(),
                        avatar_url: None,
                        gender: Gender::Male,
                        headline: None,
                        locations: None,
                        business: None,
                        employments: None,
                        educations: None,
                    }),
                    EntityKind::Answer => RelatedEntity::Answer(Answer {
                        id: *id,
                        content: String::new(),
                        answerer: *id,
                        question_id: *id,
                        vote_count: self.votes[id],
                        created_at: 0,
                        updated_at: 0,
                    }),
                    _ => RelatedEntity::Topic(Topic {
                        id: *id,
                        name: id.to_string(),
                        avatar_url: None,
                        introduction: None,
                    }),
                })
                .collect())
        }

        fn subjects(&self, _set: RelationshipSet, _target: EntityId) -> Result<Vec<User>, String> {
            Ok(Vec::new())
        }

        fn remove_references_to(&mut self, kind: EntityKind, target: EntityId) -> Result<usize, String> {
            let mut removed = 0;
            for ((_, set), members) in self.sets.iter_mut() {
                if set.target_kind() == kind {
                    let before = members.len();
                    members.retain(|m| *m != target);
                    removed += before - members.len();
                }
            }
            Ok(removed)
        }
    }

    fn votes(store: &FakeStore, answer: EntityId) -> i64 {
        store.votes[&answer]
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let topic = store.spawn(EntityKind::Topic);

        let set = RelationshipSet::FollowingTopics;
        assert_eq!(engine.add(&mut store, actor, set, topic).unwrap(), ToggleOutcome::Added);
        assert_eq!(engine.add(&mut store, actor, set, topic).unwrap(), ToggleOutcome::Unchanged);
        assert_eq!(store.set(actor, set), vec![topic]);

        let snapshot = engine.metrics().snapshot();
        assert_eq!(snapshot.added, 1);
        assert_eq!(snapshot.unchanged, 1);
        assert_eq!(snapshot.counter_adjustments, 0);
    }

    #[test]
    fn test_add_requires_actor_and_target() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let topic = store.spawn(EntityKind::Topic);
        let ghost = EntityId::new();

        let err = engine
            .add(&mut store, ghost, RelationshipSet::FollowingTopics, topic)
            .unwrap_err();
        assert!(matches!(err, ToggleError::NotFound { kind: EntityKind::User, id } if id == ghost));

        let err = engine
            .add(&mut store, actor, RelationshipSet::FollowingTopics, ghost)
            .unwrap_err();
        assert!(matches!(err, ToggleError::NotFound { kind: EntityKind::Topic, .. }));
    }

    #[test]
    fn test_add_rejects_target_of_wrong_kind() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let topic = store.spawn(EntityKind::Topic);

        let err = engine
            .add(&mut store, actor, RelationshipSet::LikingAnswers, topic)
            .unwrap_err();
        assert!(matches!(err, ToggleError::NotFound { kind: EntityKind::Answer, .. }));
        assert!(store.set(actor, RelationshipSet::LikingAnswers).is_empty());
    }

    #[test]
    fn test_self_follow_is_allowed() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);

        let outcome = engine
            .add(&mut store, actor, RelationshipSet::Following, actor)
            .unwrap();
        assert_eq!(outcome, ToggleOutcome::Added);
    }

    #[test]
    fn test_like_and_unlike_move_vote_count() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let answer = store.spawn(EntityKind::Answer);

        engine.add(&mut store, actor, RelationshipSet::LikingAnswers, answer).unwrap();
        assert_eq!(votes(&store, answer), 1);
        engine.add(&mut store, actor, RelationshipSet::LikingAnswers, answer).unwrap();
        assert_eq!(votes(&store, answer), 1);
        engine.remove(&mut store, actor, RelationshipSet::LikingAnswers, answer).unwrap();
        assert_eq!(votes(&store, answer), 0);
        engine.remove(&mut store, actor, RelationshipSet::LikingAnswers, answer).unwrap();
        assert_eq!(votes(&store, answer), 0);
    }

    #[test]
    fn test_dislike_and_collect_leave_vote_count_alone() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let answer = store.spawn(EntityKind::Answer);

        engine.add(&mut store, actor, RelationshipSet::DislikingAnswers, answer).unwrap();
        engine.add(&mut store, actor, RelationshipSet::CollectingAnswers, answer).unwrap();
        assert_eq!(votes(&store, answer), 0);
        assert_eq!(engine.metrics().snapshot().counter_adjustments, 0);
    }

    #[test]
    fn test_remove_absent_is_unchanged() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);

        let outcome = engine
            .remove(&mut store, actor, RelationshipSet::Following, EntityId::new())
            .unwrap();
        assert_eq!(outcome, ToggleOutcome::Unchanged);
    }

    #[test]
    fn test_counter_failure_rolls_back_add() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let answer = store.spawn(EntityKind::Answer);
        store.fail_counter = true;

        let err = engine
            .add(&mut store, actor, RelationshipSet::LikingAnswers, answer)
            .unwrap_err();
        assert!(matches!(err, ToggleError::Store(_)));
        assert!(store.set(actor, RelationshipSet::LikingAnswers).is_empty());
        assert_eq!(engine.metrics().snapshot().compensations, 1);
    }

    #[test]
    fn test_counter_failure_restores_removed_member() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let answer = store.spawn(EntityKind::Answer);
        engine.add(&mut store, actor, RelationshipSet::LikingAnswers, answer).unwrap();
        store.fail_counter = true;

        let err = engine
            .remove(&mut store, actor, RelationshipSet::LikingAnswers, answer)
            .unwrap_err();
        assert!(matches!(err, ToggleError::Store(_)));
        assert_eq!(store.set(actor, RelationshipSet::LikingAnswers), vec![answer]);
        assert_eq!(votes(&store, answer), 1);
    }

    #[test]
    fn test_failed_rollback_is_inconsistency() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let answer = store.spawn(EntityKind::Answer);
        store.fail_counter = true;
        store.fail_remove = true;

        let err = engine
            .add(&mut store, actor, RelationshipSet::LikingAnswers, answer)
            .unwrap_err();
        assert!(matches!(err, ToggleError::Inconsistency(_)));
        assert_eq!(engine.metrics().snapshot().inconsistencies, 1);
    }

    #[test]
    fn test_add_exclusive_switches_like_to_dislike() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let answer = store.spawn(EntityKind::Answer);

        engine
            .add_exclusive(&mut store, actor, RelationshipSet::LikingAnswers, answer)
            .unwrap();
        assert_eq!(votes(&store, answer), 1);

        engine
            .add_exclusive(&mut store, actor, RelationshipSet::DislikingAnswers, answer)
            .unwrap();
        assert!(store.set(actor, RelationshipSet::LikingAnswers).is_empty());
        assert_eq!(store.set(actor, RelationshipSet::DislikingAnswers), vec![answer]);
        assert_eq!(votes(&store, answer), 0);

        engine
            .add_exclusive(&mut store, actor, RelationshipSet::LikingAnswers, answer)
            .unwrap();
        assert!(store.set(actor, RelationshipSet::DislikingAnswers).is_empty());
        assert_eq!(votes(&store, answer), 1);
    }

    #[test]
    fn test_add_exclusive_reverts_when_second_step_fails() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let answer = store.spawn(EntityKind::Answer);
        engine.add(&mut store, actor, RelationshipSet::DislikingAnswers, answer).unwrap();
        store.fail_remove_in = Some(RelationshipSet::DislikingAnswers);

        let err = engine
            .add_exclusive(&mut store, actor, RelationshipSet::LikingAnswers, answer)
            .unwrap_err();
        assert!(matches!(err, ToggleError::Store(_)));
        assert!(store.set(actor, RelationshipSet::LikingAnswers).is_empty());
        assert_eq!(store.set(actor, RelationshipSet::DislikingAnswers), vec![answer]);
        assert_eq!(votes(&store, answer), 0);
        assert_eq!(engine.metrics().snapshot().compensations, 1);
    }

    #[test]
    fn test_add_exclusive_without_opposite_is_add() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let other = store.spawn(EntityKind::User);
        store.fail_remove = true;

        let outcome = engine
            .add_exclusive(&mut store, actor, RelationshipSet::Following, other)
            .unwrap();
        assert_eq!(outcome, ToggleOutcome::Added);
    }

    #[test]
    fn test_list_round_trip() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let first = store.spawn(EntityKind::User);
        let second = store.spawn(EntityKind::User);

        let set = RelationshipSet::Following;
        engine.add(&mut store, actor, set, first).unwrap();
        engine.add(&mut store, actor, set, second).unwrap();
        engine.remove(&mut store, actor, set, first).unwrap();

        let listed = engine.list(&store, actor, set).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), second);
        assert_eq!(listed[0].kind(), EntityKind::User);
    }

    #[test]
    fn test_list_missing_subject() {
        let store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let err = engine
            .list(&store, EntityId::new(), RelationshipSet::Following)
            .unwrap_err();
        assert!(matches!(err, ToggleError::NotFound { kind: EntityKind::User, .. }));
    }

    #[test]
    fn test_purge_actor_releases_votes() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let answer = store.spawn(EntityKind::Answer);
        let topic = store.spawn(EntityKind::Topic);

        engine.add(&mut store, actor, RelationshipSet::LikingAnswers, answer).unwrap();
        engine.add(&mut store, actor, RelationshipSet::CollectingAnswers, answer).unwrap();
        engine.add(&mut store, actor, RelationshipSet::FollowingTopics, topic).unwrap();

        assert_eq!(engine.purge_actor(&mut store, actor).unwrap(), 3);
        assert_eq!(votes(&store, answer), 0);
        for set in RelationshipSet::ALL {
            assert!(store.set(actor, set).is_empty());
        }
    }

    #[test]
    fn test_purge_target_only_touches_matching_sets() {
        let mut store = FakeStore::default();
        let engine = RelationshipEngine::new();
        let actor = store.spawn(EntityKind::User);
        let answer = store.spawn(EntityKind::Answer);

        engine.add(&mut store, actor, RelationshipSet::LikingAnswers, answer).unwrap();
        engine.add(&mut store, actor, RelationshipSet::CollectingAnswers, answer).unwrap();

        assert_eq!(engine.purge_target(&mut store, EntityKind::User, answer).unwrap(), 0);
        assert_eq!(engine.purge_target(&mut store, EntityKind::Answer, answer).unwrap(), 2);
    }
}
