//! AnswerStore implementation

use crate::{current_timestamp, id_at, like_pattern, sql_window, SqliteStore, StoreError};
use colloquy_domain::traits::AnswerStore;
use colloquy_domain::{Answer, EntityId, NewAnswer, SearchQuery};
use rusqlite::{params, OptionalExtension, Row};

const ANSWER_COLUMNS: &str =
    "id, content, answerer_id, question_id, vote_count, created_at, updated_at";

pub(crate) fn answer_from_row(row: &Row<'_>) -> rusqlite::Result<Answer> {
    Ok(Answer {
        id: id_at(row, 0)?,
        content: row.get(1)?,
        answerer: id_at(row, 2)?,
        question_id: id_at(row, 3)?,
        vote_count: row.get(4)?,
        created_at: row.get::<_, i64>(5)? as u64,
        updated_at: row.get::<_, i64>(6)? as u64,
    })
}

impl AnswerStore for SqliteStore {
    type Error = StoreError;

    fn create_answer(&mut self, answer: NewAnswer) -> Result<Answer, Self::Error> {
        let id = EntityId::new();
        let now = current_timestamp();

        self.conn.execute(
            "INSERT INTO answers (id, content, answerer_id, question_id, vote_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
            params![
                id.to_string(),
                &answer.content,
                answer.answerer.to_string(),
                answer.question_id.to_string(),
                now as i64,
            ],
        )?;

        Ok(Answer {
            id,
            content: answer.content,
            answerer: answer.answerer,
            question_id: answer.question_id,
            vote_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    fn get_answer(&self, id: EntityId) -> Result<Option<Answer>, Self::Error> {
        let sql = format!("SELECT {} FROM answers WHERE id = ?1", ANSWER_COLUMNS);
        let answer = self
            .conn
            .query_row(&sql, params![id.to_string()], answer_from_row)
            .optional()?;
        Ok(answer)
    }

    fn find_answers(&self, question_id: EntityId, query: &SearchQuery) -> Result<Vec<Answer>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM answers
             WHERE question_id = ?1 AND content LIKE ?2 ESCAPE '\\'
             ORDER BY rowid LIMIT ?3 OFFSET ?4",
            ANSWER_COLUMNS
        );
        let (limit, offset) = sql_window(&query.pagination);
        let mut stmt = self.conn.prepare(&sql)?;
        let answers = stmt
            .query_map(
                params![
                    question_id.to_string(),
                    like_pattern(&query.text),
                    limit,
                    offset,
                ],
                answer_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(answers)
    }

    fn update_answer_content(&mut self, id: EntityId, content: &str) -> Result<Option<Answer>, Self::Error> {
        let updated = self.conn.execute(
            "UPDATE answers SET content = ?2, updated_at = ?3 WHERE id = ?1",
            params![id.to_string(), content, current_timestamp() as i64],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_answer(id)
    }

    fn delete_answer(&mut self, id: EntityId) -> Result<bool, Self::Error> {
        let removed = self
            .conn
            .execute("DELETE FROM answers WHERE id = ?1", params![id.to_string()])?;
        Ok(removed > 0)
    }
}
