pub mod models;
pub mod schema;


use std::error::Error;

use diesel::prelude::*;
use diesel::result::QueryResult;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;
use rocket_sync_db_pools::database;

use models::*;
use schema::emergency_reports::dsl::{self as r_dsl};
use schema::safe_locations::dsl::{self as l_dsl};


pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Upper bound on the number of reports returned by a listing.
pub const REPORT_LIST_LIMIT: i64 = 50;

const SAMPLE_LOCATIONS: [NewSafeLocation<'static>; 4] = [
    NewSafeLocation {
        name: "Emergency Shelter Alpha",
        latitude: 37.78825,
        longitude: -122.4324,
        capacity: Some(200),
        contact: Some("+1-555-0101"),
        kind: Some("shelter"),
        description: Some("Community Center - Capacity: 200 people"),
    },
    NewSafeLocation {
        name: "Safe House Beta",
        latitude: 37.78425,
        longitude: -122.4284,
        capacity: Some(150),
        contact: Some("+1-555-0102"),
        kind: Some("safehouse"),
        description: Some("School Gymnasium - Medical facilities available"),
    },
    NewSafeLocation {
        name: "Emergency Bunker Gamma",
        latitude: 37.79225,
        longitude: -122.4364,
        capacity: Some(75),
        contact: Some("+1-555-0103"),
        kind: Some("bunker"),
        description: Some("Underground facility - Storm shelter"),
    },
    NewSafeLocation {
        name: "Rescue Station Delta",
        latitude: 37.78025,
        longitude: -122.4244,
        capacity: Some(50),
        contact: Some("+1-555-0104"),
        kind: Some("rescue"),
        description: Some("Fire Station - Emergency services"),
    },
];


#[database("disaster_db")]
pub struct DbConn(SqliteConnection);


pub type SetupError = Box<dyn Error + Send + Sync>;

/// Creates missing tables and seeds the sample safe locations.
/// Returns the number of locations that were newly inserted.
pub fn setup(conn: &mut SqliteConnection) -> Result<usize, SetupError> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in &applied {
        info!("Applied migration {}", version);
    }

    Ok(seed_safe_locations(conn)?)
}

pub fn seed_safe_locations(conn: &mut SqliteConnection) -> QueryResult<usize> {
    conn.transaction(|conn| {
        let mut inserted = 0;
        for location in SAMPLE_LOCATIONS.iter() {
            inserted += diesel::insert_or_ignore_into(schema::safe_locations::table)
                .values(location)
                .execute(conn)?;
        }
        Ok(inserted)
    })
}

pub fn get_safe_locations(conn: &mut SqliteConnection) -> QueryResult<Vec<SafeLocation>> {
    l_dsl::safe_locations
        .order(l_dsl::id.asc())
        .load::<SafeLocation>(conn)
}

pub fn insert_report(conn: &mut SqliteConnection, report: &NewEmergencyReport) -> QueryResult<usize> {
    diesel::insert_into(schema::emergency_reports::table)
        .values(report)
        .execute(conn)
}

/// Latest reports first. Timestamps share one fixed-width format, so the
/// text ordering is chronological; ties fall back to insertion order.
pub fn get_recent_reports(conn: &mut SqliteConnection) -> QueryResult<Vec<EmergencyReport>> {
    r_dsl::emergency_reports
        .order((r_dsl::timestamp.desc(), r_dsl::id.desc()))
        .limit(REPORT_LIST_LIMIT)
        .load::<EmergencyReport>(conn)
}

pub fn resolve_report(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
    diesel::update(r_dsl::emergency_reports.find(id))
        .set(r_dsl::status.eq(ReportStatus::Resolved))
        .execute(conn)
}

pub fn delete_report(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
    diesel::delete(r_dsl::emergency_reports.find(id))
        .execute(conn)
}
