//! TopicStore implementation

use crate::{id_at, like_pattern, sql_window, SqliteStore, StoreError};
use colloquy_domain::traits::TopicStore;
use colloquy_domain::{EntityId, NewTopic, SearchQuery, Topic, TopicPatch};
use rusqlite::{params, OptionalExtension, Row};

pub(crate) fn topic_from_row(row: &Row<'_>) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: id_at(row, 0)?,
        name: row.get(1)?,
        avatar_url: row.get(2)?,
        introduction: row.get(3)?,
    })
}

impl TopicStore for SqliteStore {
    type Error = StoreError;

    fn create_topic(&mut self, topic: NewTopic) -> Result<Topic, Self::Error> {
        let id = EntityId::new();
        self.conn.execute(
            "INSERT INTO topics (id, name, avatar_url, introduction) VALUES (?1, ?2, ?3, ?4)",
            params![id.to_string(), &topic.name, &topic.avatar_url, &topic.introduction],
        )?;

        Ok(Topic {
            id,
            name: topic.name,
            avatar_url: topic.avatar_url,
            introduction: topic.introduction,
        })
    }

    fn get_topic(&self, id: EntityId) -> Result<Option<Topic>, Self::Error> {
        let topic = self
            .conn
            .query_row(
                "SELECT id, name, avatar_url, introduction FROM topics WHERE id = ?1",
                params![id.to_string()],
                topic_from_row,
            )
            .optional()?;
        Ok(topic)
    }

    fn find_topics(&self, query: &SearchQuery) -> Result<Vec<Topic>, Self::Error> {
        let (limit, offset) = sql_window(&query.pagination);
        let mut stmt = self.conn.prepare(
            "SELECT id, name, avatar_url, introduction FROM topics
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY rowid LIMIT ?2 OFFSET ?3",
        )?;
        let topics = stmt
            .query_map(
                params![
                    like_pattern(&query.text),
                    limit,
                    offset,
                ],
                topic_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(topics)
    }

    fn update_topic(&mut self, id: EntityId, patch: TopicPatch) -> Result<Option<Topic>, Self::Error> {
        let Some(mut topic) = self.get_topic(id)? else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            topic.name = name;
        }
        if patch.avatar_url.is_some() {
            topic.avatar_url = patch.avatar_url;
        }
        if patch.introduction.is_some() {
            topic.introduction = patch.introduction;
        }

        self.conn.execute(
            "UPDATE topics SET name = ?2, avatar_url = ?3, introduction = ?4 WHERE id = ?1",
            params![id.to_string(), &topic.name, &topic.avatar_url, &topic.introduction],
        )?;

        Ok(Some(topic))
    }
}
