//! CommentStore implementation

use crate::{current_timestamp, id_at, like_pattern, opt_id_at, sql_window, SqliteStore, StoreError};
use colloquy_domain::traits::CommentStore;
use colloquy_domain::{Comment, CommentQuery, EntityId, NewComment};
use rusqlite::{params, OptionalExtension, Row};

const COMMENT_COLUMNS: &str = "id, content, commentator_id, question_id, answer_id, \
                               root_comment_id, reply_to, created_at, updated_at";

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: id_at(row, 0)?,
        content: row.get(1)?,
        commentator: id_at(row, 2)?,
        question_id: id_at(row, 3)?,
        answer_id: id_at(row, 4)?,
        root_comment_id: opt_id_at(row, 5)?,
        reply_to: opt_id_at(row, 6)?,
        created_at: row.get::<_, i64>(7)? as u64,
        updated_at: row.get::<_, i64>(8)? as u64,
    })
}

impl CommentStore for SqliteStore {
    type Error = StoreError;

    fn create_comment(&mut self, comment: NewComment) -> Result<Comment, Self::Error> {
        let id = EntityId::new();
        let now = current_timestamp();

        self.conn.execute(
            "INSERT INTO comments (id, content, commentator_id, question_id, answer_id,
                                   root_comment_id, reply_to, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                id.to_string(),
                &comment.content,
                comment.commentator.to_string(),
                comment.question_id.to_string(),
                comment.answer_id.to_string(),
                comment.root_comment_id.map(|c| c.to_string()),
                comment.reply_to.map(|u| u.to_string()),
                now as i64,
            ],
        )?;

        Ok(Comment {
            id,
            content: comment.content,
            commentator: comment.commentator,
            question_id: comment.question_id,
            answer_id: comment.answer_id,
            root_comment_id: comment.root_comment_id,
            reply_to: comment.reply_to,
            created_at: now,
            updated_at: now,
        })
    }

    fn get_comment(&self, id: EntityId) -> Result<Option<Comment>, Self::Error> {
        let sql = format!("SELECT {} FROM comments WHERE id = ?1", COMMENT_COLUMNS);
        let comment = self
            .conn
            .query_row(&sql, params![id.to_string()], comment_from_row)
            .optional()?;
        Ok(comment)
    }

    fn find_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM comments
             WHERE question_id = ?1 AND answer_id = ?2
               AND content LIKE ?3 ESCAPE '\\'
               AND (?4 IS NULL OR root_comment_id = ?4)
             ORDER BY rowid LIMIT ?5 OFFSET ?6",
            COMMENT_COLUMNS
        );
        let (limit, offset) = sql_window(&query.search.pagination);
        let mut stmt = self.conn.prepare(&sql)?;
        let comments = stmt
            .query_map(
                params![
                    query.question_id.to_string(),
                    query.answer_id.to_string(),
                    like_pattern(&query.search.text),
                    query.root_comment_id.map(|c| c.to_string()),
                    limit,
                    offset,
                ],
                comment_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    fn update_comment_content(&mut self, id: EntityId, content: &str) -> Result<Option<Comment>, Self::Error> {
        let updated = self.conn.execute(
            "UPDATE comments SET content = ?2, updated_at = ?3 WHERE id = ?1",
            params![id.to_string(), content, current_timestamp() as i64],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_comment(id)
    }

    fn delete_comment(&mut self, id: EntityId) -> Result<bool, Self::Error> {
        let removed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1", params![id.to_string()])?;
        Ok(removed > 0)
    }
}
