//! Expert directory and its startup seed.

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::models::{Expert, NewExpert};

/// Demo profiles inserted into an empty directory.
pub fn seed_experts() -> Vec<NewExpert> {
    let expert = |name: &str, specialty: &str, region: &str, rating: f64, review_count: u32, is_certified: bool| NewExpert {
        name: name.into(),
        specialty: specialty.into(),
        region: region.into(),
        rating,
        review_count,
        is_certified,
        image_url: None,
    };
    vec![
        expert("Park Junhyung (Master)", "Leak repair", "Bundang-gu, Seongnam", 4.9, 128, true),
        expert("Kim Cheolsu (Engineer)", "Wiring replacement", "Sujeong-gu, Seongnam", 5.0, 85, true),
        expert("Lee Younghee (Technician)", "Lighting installation", "Jungwon-gu, Seongnam", 4.7, 42, true),
        expert("Choi Minsu (Specialist)", "Emergency call-out", "All of Pangyo", 4.8, 210, false),
    ]
}

/// Insert the demo profiles only when the directory is empty.
/// Returns how many rows were inserted.
pub fn bootstrap(conn: &Connection) -> Result<usize, DatabaseError> {
    let existing = db::count_experts(conn)?;
    if existing != 0 {
        tracing::debug!(existing, "Expert directory already populated, skipping seed");
        return Ok(0);
    }

    let now = db::now_timestamp();
    let seed = seed_experts();
    for expert in &seed {
        db::insert_expert(conn, expert, &now)?;
    }
    tracing::info!(count = seed.len(), "Seeded expert directory");
    Ok(seed.len())
}

pub fn create(conn: &Connection, input: &NewExpert) -> Result<Expert, DatabaseError> {
    let id = db::insert_expert(conn, input, &db::now_timestamp())?;
    db::get_expert(conn, id)?.ok_or_else(|| DatabaseError::not_found("expert", id))
}

pub fn find_all(conn: &Connection) -> Result<Vec<Expert>, DatabaseError> {
    db::get_all_experts(conn)
}

pub fn find_one(conn: &Connection, id: i64) -> Result<Option<Expert>, DatabaseError> {
    db::get_expert(conn, id)
}
