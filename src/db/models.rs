use std::fmt;
use std::str::FromStr;

use diesel::prelude::*;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::Serialize;

use super::schema::{emergency_reports, safe_locations};


#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct SafeLocation {
    pub id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<i32>,
    pub contact: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = safe_locations)]
pub struct NewSafeLocation<'a> {
    pub name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<i32>,
    pub contact: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub description: Option<&'a str>,
}


/// Lifecycle of an emergency report. Reports only ever move from
/// `Active` to `Resolved` through the API.
#[derive(AsExpression, FromSqlRow, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Active,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Active => "active",
            ReportStatus::Resolved => "resolved",
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Active
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ReportStatus::Active),
            "resolved" => Ok(ReportStatus::Resolved),
            other => Err(format!("Unknown report status: {}", other)),
        }
    }
}

impl ToSql<Text, Sqlite> for ReportStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for ReportStatus {
    fn from_sql(bytes: SqliteValue<'_, '_, '_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value.parse().map_err(Into::into)
    }
}


#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct EmergencyReport {
    pub id: i32,
    pub user_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<String>,
    pub status: ReportStatus,
    pub video_path: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = emergency_reports)]
pub struct NewEmergencyReport {
    pub user_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: String,
    pub status: ReportStatus,
    pub video_path: Option<String>,
    pub description: String,
}
