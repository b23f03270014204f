use std::str::FromStr;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::UserRole;
use crate::models::*;

/// Insert a user. A duplicate email is reported as a constraint violation.
pub fn insert_user(conn: &Connection, user: &NewUser, now: &str) -> Result<i64, DatabaseError> {
    let result = conn.execute(
        "INSERT INTO users (email, password, name, phone, role, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            user.email,
            user.password,
            user.name,
            user.phone,
            user.role.as_str(),
            now,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
            Err(DatabaseError::ConstraintViolation(format!(
                "email already registered: {}",
                user.email
            )))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, email, password, name, phone, role, created_at, updated_at
             FROM users WHERE email = ?1",
            params![email],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, email, password, name, phone, role, created_at, updated_at)| {
        Ok(User {
            id,
            email,
            password,
            name,
            phone,
            role: UserRole::from_str(&role)?,
            created_at,
            updated_at,
        })
    })
    .transpose()
}
