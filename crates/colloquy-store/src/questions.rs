//! QuestionStore implementation

use crate::{current_timestamp, id_at, like_pattern, sql_window, SqliteStore, StoreError};
use colloquy_domain::traits::QuestionStore;
use colloquy_domain::{EntityId, NewQuestion, Question, QuestionPatch, SearchQuery};
use rusqlite::{params, OptionalExtension, Row, Transaction};

const QUESTION_COLUMNS: &str =
    "q.id, q.title, q.description, q.questioner_id, q.created_at, q.updated_at";

/// Map a question row; topics are filled in separately
fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: id_at(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        questioner: id_at(row, 3)?,
        topics: Vec::new(),
        created_at: row.get::<_, i64>(4)? as u64,
        updated_at: row.get::<_, i64>(5)? as u64,
    })
}

/// Replace the topic list of a question
fn write_topics(tx: &Transaction<'_>, id: EntityId, topics: &[EntityId]) -> Result<(), StoreError> {
    tx.execute(
        "DELETE FROM question_topics WHERE question_id = ?1",
        params![id.to_string()],
    )?;
    for (position, topic) in topics.iter().enumerate() {
        tx.execute(
            "INSERT OR IGNORE INTO question_topics (question_id, topic_id, position)
             VALUES (?1, ?2, ?3)",
            params![id.to_string(), topic.to_string(), position as i64],
        )?;
    }
    Ok(())
}

impl SqliteStore {
    fn topics_of(&self, id: EntityId) -> Result<Vec<EntityId>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT topic_id FROM question_topics WHERE question_id = ?1 ORDER BY position",
        )?;
        let topics = stmt
            .query_map(params![id.to_string()], |row| id_at(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(topics)
    }

    /// Run a question query and attach each question's topics
    fn query_questions(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Question>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut questions = stmt
            .query_map(params, question_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        for question in &mut questions {
            question.topics = self.topics_of(question.id)?;
        }
        Ok(questions)
    }
}

impl QuestionStore for SqliteStore {
    type Error = StoreError;

    fn create_question(&mut self, question: NewQuestion) -> Result<Question, Self::Error> {
        let id = EntityId::new();
        let now = current_timestamp();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO questions (id, title, description, questioner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                id.to_string(),
                &question.title,
                &question.description,
                question.questioner.to_string(),
                now as i64,
            ],
        )?;
        write_topics(&tx, id, &question.topics)?;
        tx.commit()?;

        let mut topics = question.topics;
        let mut seen = std::collections::HashSet::new();
        topics.retain(|t| seen.insert(*t));

        Ok(Question {
            id,
            title: question.title,
            description: question.description,
            questioner: question.questioner,
            topics,
            created_at: now,
            updated_at: now,
        })
    }

    fn get_question(&self, id: EntityId) -> Result<Option<Question>, Self::Error> {
        let sql = format!("SELECT {} FROM questions q WHERE q.id = ?1", QUESTION_COLUMNS);
        let question = self
            .conn
            .query_row(&sql, params![id.to_string()], question_from_row)
            .optional()?;

        match question {
            Some(mut question) => {
                question.topics = self.topics_of(id)?;
                Ok(Some(question))
            }
            None => Ok(None),
        }
    }

    fn find_questions(&self, query: &SearchQuery) -> Result<Vec<Question>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM questions q
             WHERE q.title LIKE ?1 ESCAPE '\\' OR q.description LIKE ?1 ESCAPE '\\'
             ORDER BY q.rowid LIMIT ?2 OFFSET ?3",
            QUESTION_COLUMNS
        );
        let pattern = like_pattern(&query.text);
        let (limit, offset) = sql_window(&query.pagination);
        self.query_questions(&sql, &[&pattern, &limit, &offset])
    }

    fn questions_by_questioner(&self, questioner: EntityId) -> Result<Vec<Question>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM questions q WHERE q.questioner_id = ?1 ORDER BY q.rowid",
            QUESTION_COLUMNS
        );
        self.query_questions(&sql, &[&questioner.to_string()])
    }

    fn questions_by_topic(&self, topic: EntityId) -> Result<Vec<Question>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM questions q
             JOIN question_topics qt ON qt.question_id = q.id
             WHERE qt.topic_id = ?1 ORDER BY q.rowid",
            QUESTION_COLUMNS
        );
        self.query_questions(&sql, &[&topic.to_string()])
    }

    fn update_question(&mut self, id: EntityId, patch: QuestionPatch) -> Result<Option<Question>, Self::Error> {
        let Some(mut question) = self.get_question(id)? else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            question.title = title;
        }
        if patch.description.is_some() {
            question.description = patch.description;
        }
        question.updated_at = current_timestamp();

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE questions SET title = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                id.to_string(),
                &question.title,
                &question.description,
                question.updated_at as i64,
            ],
        )?;
        if let Some(topics) = &patch.topics {
            write_topics(&tx, id, topics)?;
        }
        tx.commit()?;

        if patch.topics.is_some() {
            question.topics = self.topics_of(id)?;
        }
        Ok(Some(question))
    }

    fn delete_question(&mut self, id: EntityId) -> Result<bool, Self::Error> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM question_topics WHERE question_id = ?1",
            params![id.to_string()],
        )?;
        let removed = tx.execute("DELETE FROM questions WHERE id = ?1", params![id.to_string()])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}
