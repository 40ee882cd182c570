//! UserStore implementation

use crate::{
    conversion_error, id_at, json_at, like_pattern, opt_id_at, sql_window, to_json, SqliteStore, StoreError,
};
use colloquy_domain::traits::UserStore;
use colloquy_domain::{
    Credentials, EntityId, FieldSelector, Gender, NewUser, PasswordDigest, ProfileField,
    SearchQuery, User, UserPatch,
};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

pub(crate) const USER_COLUMNS: &str =
    "id, name, avatar_url, gender, headline, locations, business, employments, educations";

/// Map a row selected with [`USER_COLUMNS`] to a fully populated user
pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let gender: String = row.get(3)?;
    let gender = Gender::parse(&gender)
        .ok_or_else(|| conversion_error(3, Type::Text, format!("Unknown gender: {}", gender)))?;

    Ok(User {
        id: id_at(row, 0)?,
        name: row.get(1)?,
        avatar_url: row.get(2)?,
        gender,
        headline: row.get(4)?,
        locations: Some(json_at(row, 5)?),
        business: opt_id_at(row, 6)?,
        employments: Some(json_at(row, 7)?),
        educations: Some(json_at(row, 8)?),
    })
}

/// Blank the hidden fields that were not selected
fn apply_selector(mut user: User, fields: &FieldSelector) -> User {
    if !fields.includes(ProfileField::Locations) {
        user.locations = None;
    }
    if !fields.includes(ProfileField::Business) {
        user.business = None;
    }
    if !fields.includes(ProfileField::Employments) {
        user.employments = None;
    }
    if !fields.includes(ProfileField::Educations) {
        user.educations = None;
    }
    user
}

impl SqliteStore {
    /// Load a user with every profile field
    fn load_user(&self, id: EntityId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = self
            .conn
            .query_row(&sql, params![id.to_string()], user_from_row)
            .optional()?;
        Ok(user)
    }

    /// Id of the user holding `name`, if any
    fn user_id_by_name(&self, name: &str) -> Result<Option<EntityId>, StoreError> {
        let id = self
            .conn
            .query_row("SELECT id FROM users WHERE name = ?1", params![name], |row| id_at(row, 0))
            .optional()?;
        Ok(id)
    }
}

impl UserStore for SqliteStore {
    type Error = StoreError;

    fn create_user(&mut self, user: NewUser) -> Result<User, Self::Error> {
        if self.user_id_by_name(&user.name)?.is_some() {
            return Err(StoreError::Duplicate(format!("user name '{}'", user.name)));
        }

        let id = EntityId::new();
        self.conn.execute(
            "INSERT INTO users (id, name, password_hash, password_salt, avatar_url, gender, headline)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id.to_string(),
                &user.name,
                &user.password.hash,
                &user.password.salt,
                &user.avatar_url,
                user.gender.as_str(),
                &user.headline,
            ],
        )?;

        Ok(User {
            id,
            name: user.name,
            avatar_url: user.avatar_url,
            gender: user.gender,
            headline: user.headline,
            locations: None,
            business: None,
            employments: None,
            educations: None,
        })
    }

    fn get_user(&self, id: EntityId, fields: &FieldSelector) -> Result<Option<User>, Self::Error> {
        Ok(self.load_user(id)?.map(|user| apply_selector(user, fields)))
    }

    fn find_users(&self, query: &SearchQuery) -> Result<Vec<User>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM users WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY rowid LIMIT ?2 OFFSET ?3",
            USER_COLUMNS
        );
        let (limit, offset) = sql_window(&query.pagination);
        let mut stmt = self.conn.prepare(&sql)?;
        let users = stmt
            .query_map(
                params![
                    like_pattern(&query.text),
                    limit,
                    offset,
                ],
                user_from_row,
            )?
            .map(|user| user.map(User::summary))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn credentials_by_name(&self, name: &str) -> Result<Option<Credentials>, Self::Error> {
        let credentials = self
            .conn
            .query_row(
                "SELECT id, name, password_hash, password_salt FROM users WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Credentials {
                        user_id: id_at(row, 0)?,
                        name: row.get(1)?,
                        digest: PasswordDigest {
                            hash: row.get(2)?,
                            salt: row.get(3)?,
                        },
                    })
                },
            )
            .optional()?;
        Ok(credentials)
    }

    fn update_user(&mut self, id: EntityId, patch: UserPatch) -> Result<Option<User>, Self::Error> {
        let Some(mut user) = self.load_user(id)? else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            if name != user.name {
                if let Some(holder) = self.user_id_by_name(&name)? {
                    if holder != id {
                        return Err(StoreError::Duplicate(format!("user name '{}'", name)));
                    }
                }
            }
            user.name = name;
        }
        if patch.avatar_url.is_some() {
            user.avatar_url = patch.avatar_url;
        }
        if let Some(gender) = patch.gender {
            user.gender = gender;
        }
        if patch.headline.is_some() {
            user.headline = patch.headline;
        }
        if patch.locations.is_some() {
            user.locations = patch.locations;
        }
        if patch.business.is_some() {
            user.business = patch.business;
        }
        if patch.employments.is_some() {
            user.employments = patch.employments;
        }
        if patch.educations.is_some() {
            user.educations = patch.educations;
        }

        let locations = to_json(&user.locations.clone().unwrap_or_default())?;
        let employments = to_json(&user.employments.clone().unwrap_or_default())?;
        let educations = to_json(&user.educations.clone().unwrap_or_default())?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE users SET name = ?2, avatar_url = ?3, gender = ?4, headline = ?5,
                 locations = ?6, business = ?7, employments = ?8, educations = ?9
             WHERE id = ?1",
            params![
                id.to_string(),
                &user.name,
                &user.avatar_url,
                user.gender.as_str(),
                &user.headline,
                locations,
                user.business.map(|b| b.to_string()),
                employments,
                educations,
            ],
        )?;
        if let Some(password) = patch.password {
            tx.execute(
                "UPDATE users SET password_hash = ?2, password_salt = ?3 WHERE id = ?1",
                params![id.to_string(), password.hash, password.salt],
            )?;
        }
        tx.commit()?;

        Ok(Some(user.summary()))
    }

    fn delete_user(&mut self, id: EntityId) -> Result<bool, Self::Error> {
        let removed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;
        Ok(removed > 0)
    }
}
