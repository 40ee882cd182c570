//! RelationshipStore implementation
//!
//! Every set member is a row in `relationships`. Adding is a single
//! `INSERT OR IGNORE` against the `(actor_id, set_name, target_id)` unique
//! key, removal a single `DELETE`, and counters move with
//! `vote_count = vote_count + ?`. None of these read-modify-write in Rust,
//! so concurrent toggles on the same row cannot lose updates.

use crate::answers::answer_from_row;
use crate::topics::topic_from_row;
use crate::users::{user_from_row, USER_COLUMNS};
use crate::{id_at, SqliteStore, StoreError};
use colloquy_domain::traits::RelationshipStore;
use colloquy_domain::{
    CounterField, EntityId, EntityKind, RelatedEntity, RelationshipSet, User,
};
use rusqlite::{params, OptionalExtension};

fn table_of(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::User => "users",
        EntityKind::Topic => "topics",
        EntityKind::Question => "questions",
        EntityKind::Answer => "answers",
        EntityKind::Comment => "comments",
    }
}

fn column_of(counter: CounterField) -> &'static str {
    match counter {
        CounterField::VoteCount => "vote_count",
    }
}

impl SqliteStore {
    fn populate_one(&self, kind: EntityKind, id: EntityId) -> Result<Option<RelatedEntity>, StoreError> {
        let key = id.to_string();
        let entity = match kind {
            EntityKind::User => {
                let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
                self.conn
                    .query_row(&sql, params![key], user_from_row)
                    .optional()?
                    .map(|user| RelatedEntity::User(user.summary()))
            }
            EntityKind::Topic => self
                .conn
                .query_row(
                    "SELECT id, name, avatar_url, introduction FROM topics WHERE id = ?1",
                    params![key],
                    topic_from_row,
                )
                .optional()?
                .map(RelatedEntity::Topic),
            EntityKind::Answer => self
                .conn
                .query_row(
                    "SELECT id, content, answerer_id, question_id, vote_count, created_at, updated_at
                     FROM answers WHERE id = ?1",
                    params![key],
                    answer_from_row,
                )
                .optional()?
                .map(RelatedEntity::Answer),
            EntityKind::Question | EntityKind::Comment => {
                return Err(StoreError::InvalidData(format!(
                    "{} is not a relationship target",
                    kind
                )))
            }
        };
        Ok(entity)
    }
}

impl RelationshipStore for SqliteStore {
    type Error = StoreError;

    fn exists(&self, kind: EntityKind, id: EntityId) -> Result<bool, Self::Error> {
        self.row_exists(table_of(kind), id)
    }

    fn members(&self, actor: EntityId, set: RelationshipSet) -> Result<Option<Vec<EntityId>>, Self::Error> {
        if !self.row_exists("users", actor)? {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT target_id FROM relationships
             WHERE actor_id = ?1 AND set_name = ?2
             ORDER BY seq",
        )?;
        let members = stmt
            .query_map(params![actor.to_string(), set.as_str()], |row| id_at(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(members))
    }

    fn insert_member(&mut self, actor: EntityId, set: RelationshipSet, target: EntityId) -> Result<bool, Self::Error> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO relationships (actor_id, set_name, target_id) VALUES (?1, ?2, ?3)",
            params![actor.to_string(), set.as_str(), target.to_string()],
        )?;
        Ok(inserted == 1)
    }

    fn remove_member(&mut self, actor: EntityId, set: RelationshipSet, target: EntityId) -> Result<bool, Self::Error> {
        let removed = self.conn.execute(
            "DELETE FROM relationships WHERE actor_id = ?1 AND set_name = ?2 AND target_id = ?3",
            params![actor.to_string(), set.as_str(), target.to_string()],
        )?;
        Ok(removed > 0)
    }

    fn increment_counter(&mut self, target: EntityId, counter: CounterField, delta: i64) -> Result<(), Self::Error> {
        let sql = format!(
            "UPDATE {table} SET {col} = {col} + ?2 WHERE id = ?1",
            table = table_of(counter.owner_kind()),
            col = column_of(counter)
        );
        let updated = self.conn.execute(&sql, params![target.to_string(), delta])?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!(
                "{} {}",
                counter.owner_kind(),
                target
            )));
        }
        Ok(())
    }

    fn counter_value(&self, target: EntityId, counter: CounterField) -> Result<Option<i64>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            column_of(counter),
            table_of(counter.owner_kind())
        );
        let value = self
            .conn
            .query_row(&sql, params![target.to_string()], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn populate(&self, kind: EntityKind, ids: &[EntityId]) -> Result<Vec<RelatedEntity>, Self::Error> {
        let mut entities = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entity) = self.populate_one(kind, *id)? {
                entities.push(entity);
            }
        }
        Ok(entities)
    }

    fn subjects(&self, set: RelationshipSet, target: EntityId) -> Result<Vec<User>, Self::Error> {
        let columns = USER_COLUMNS
            .split(", ")
            .map(|c| format!("u.{}", c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM relationships r
             JOIN users u ON u.id = r.actor_id
             WHERE r.set_name = ?1 AND r.target_id = ?2
             ORDER BY r.seq",
            columns
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let users = stmt
            .query_map(params![set.as_str(), target.to_string()], user_from_row)?
            .map(|user| user.map(User::summary))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn remove_references_to(&mut self, kind: EntityKind, target: EntityId) -> Result<usize, Self::Error> {
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        for set in RelationshipSet::ALL.iter().filter(|s| s.target_kind() == kind) {
            removed += tx.execute(
                "DELETE FROM relationships WHERE set_name = ?1 AND target_id = ?2",
                params![set.as_str(), target.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_domain::traits::{AnswerStore, UserStore};
    use colloquy_domain::{Gender, NewAnswer, NewUser, PasswordDigest};

    fn user(store: &mut SqliteStore, name: &str) -> EntityId {
        store
            .create_user(NewUser {
                name: name.to_string(),
                password: PasswordDigest {
                    hash: "h".to_string(),
                    salt: "s".to_string(),
                },
                avatar_url: None,
                gender: Gender::default(),
                headline: None,
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_insert_member_is_add_if_absent() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let a = user(&mut store, "a");
        let b = user(&mut store, "b");

        assert!(store.insert_member(a, RelationshipSet::Following, b).unwrap());
        assert!(!store.insert_member(a, RelationshipSet::Following, b).unwrap());
        assert_eq!(
            store.members(a, RelationshipSet::Following).unwrap(),
            Some(vec![b])
        );
    }

    #[test]
    fn test_members_of_missing_user() {
        let store = SqliteStore::new(":memory:").unwrap();
        assert_eq!(
            store.members(EntityId::new(), RelationshipSet::Following).unwrap(),
            None
        );
    }

    #[test]
    fn test_increment_counter_missing_target() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let result = store.increment_counter(EntityId::new(), CounterField::VoteCount, 1);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_increment_counter_accumulates() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let a = user(&mut store, "a");
        let answer = store
            .create_answer(NewAnswer {
                content: "42".to_string(),
                answerer: a,
                question_id: EntityId::new(),
            })
            .unwrap();

        store.increment_counter(answer.id, CounterField::VoteCount, 1).unwrap();
        store.increment_counter(answer.id, CounterField::VoteCount, 1).unwrap();
        store.increment_counter(answer.id, CounterField::VoteCount, -1).unwrap();
        assert_eq!(
            store.counter_value(answer.id, CounterField::VoteCount).unwrap(),
            Some(1)
        );
    }

    #[test]
    fn test_populate_skips_missing_and_keeps_order() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let a = user(&mut store, "a");
        let b = user(&mut store, "b");

        let populated = store
            .populate(EntityKind::User, &[b, EntityId::new(), a])
            .unwrap();
        let ids: Vec<_> = populated.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn test_populate_rejects_non_target_kind() {
        let store = SqliteStore::new(":memory:").unwrap();
        let result = store.populate(EntityKind::Comment, &[EntityId::new()]);
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_remove_references_only_touches_matching_kind() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let a = user(&mut store, "a");
        let b = user(&mut store, "b");
        let target = EntityId::new();

        store.insert_member(a, RelationshipSet::LikingAnswers, target).unwrap();
        store.insert_member(b, RelationshipSet::CollectingAnswers, target).unwrap();
        store.insert_member(a, RelationshipSet::Following, target).unwrap();

        let removed = store.remove_references_to(EntityKind::Answer, target).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(
            store.members(a, RelationshipSet::Following).unwrap(),
            Some(vec![target])
        );
    }
}
