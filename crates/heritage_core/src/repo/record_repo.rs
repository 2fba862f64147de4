//! Heritage record repository over SQLite.
//!
//! # Responsibility
//! - Persist catalogue rows and read them back in catalogue order.
//! - Build a [`RecordStore`] from persisted rows.
//!
//! # Invariants
//! - Writes call `Record::validate()` before any SQL runs.
//! - Reads reject unknown category or level labels instead of masking them.
//! - `position` preserves insertion order across reloads.

use crate::catalog::{CatalogError, RecordStore};
use crate::db::DbError;
use crate::model::record::{
    Category, Coordinates, ProtectionLevel, Record, RecordId, RecordValidationError,
};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    name,
    category,
    city,
    level,
    lng,
    lat,
    summary,
    status
FROM heritage_records";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    Catalog(CatalogError),
    DuplicateRecord(RecordId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::DuplicateRecord(id) => write!(f, "record already stored: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::DuplicateRecord(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<CatalogError> for RepoError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Catalogue persistence contract.
pub trait RecordRepository {
    /// Appends records after the current last position, atomically.
    fn insert_records(&self, records: &[Record]) -> RepoResult<usize>;
    fn get_record(&self, id: &str) -> RepoResult<Option<Record>>;
    /// Every stored row in catalogue order, hidden rows included.
    fn list_records(&self) -> RepoResult<Vec<Record>>;
    fn count(&self) -> RepoResult<usize>;
}

pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Loads all rows into a validated store.
    ///
    /// # Errors
    /// - `Catalog` when stored rows break catalogue integrity.
    pub fn load_store(&self) -> RepoResult<RecordStore> {
        let records = self.list_records()?;
        let store = RecordStore::new(records)?;
        info!(
            "event=catalog_load module=repo status=ok source=sqlite records={}",
            store.len()
        );
        Ok(store)
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn insert_records(&self, records: &[Record]) -> RepoResult<usize> {
        for record in records {
            record.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut next_position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), 0) FROM heritage_records;",
            [],
            |row| row.get(0),
        )?;

        for record in records {
            let exists = tx
                .query_row(
                    "SELECT 1 FROM heritage_records WHERE id = ?1;",
                    [record.id.as_str()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if exists {
                return Err(RepoError::DuplicateRecord(record.id.clone()));
            }

            next_position += 1;
            let stored = record
                .coordinates
                .filter(|position| position.lng.is_finite() && position.lat.is_finite());
            tx.execute(
                "INSERT INTO heritage_records (
                    id, position, name, category, city, level, lng, lat, summary, status
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
                params![
                    record.id.as_str(),
                    next_position,
                    record.name.as_str(),
                    record.category.label(),
                    record.city.as_str(),
                    record.level.label(),
                    stored.map(|position| position.lng),
                    stored.map(|position| position.lat),
                    record.summary.as_deref().unwrap_or_default(),
                    record.status.as_str(),
                ],
            )?;
        }
        tx.commit()?;

        info!(
            "event=records_insert module=repo status=ok count={}",
            records.len()
        );
        Ok(records.len())
    }

    fn get_record(&self, id: &str) -> RepoResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_record_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_records(&self) -> RepoResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY position ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }

    fn count(&self) -> RepoResult<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM heritage_records;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let id: String = row.get("id")?;

    let category_text: String = row.get("category")?;
    let category = Category::from_label(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "unknown category `{category_text}` for record `{id}`"
        ))
    })?;

    let level_text: String = row.get("level")?;
    let level = ProtectionLevel::from_label(&level_text).ok_or_else(|| {
        RepoError::InvalidData(format!("unknown level `{level_text}` for record `{id}`"))
    })?;

    let coordinates = match (
        row.get::<_, Option<f64>>("lng")?,
        row.get::<_, Option<f64>>("lat")?,
    ) {
        (Some(lng), Some(lat)) => Some(Coordinates::new(lng, lat)),
        _ => None,
    };

    let summary: String = row.get("summary")?;
    let record = Record {
        id: RecordId::new(id),
        name: row.get("name")?,
        category,
        city: row.get("city")?,
        level,
        coordinates,
        summary: (!summary.is_empty()).then_some(summary),
        status: row.get("status")?,
    };
    record.validate()?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::{RecordRepository, RepoError, SqliteRecordRepository};
    use crate::catalog::sample_records;
    use crate::db::open_db_in_memory;
    use std::error::Error;

    #[test]
    fn sample_round_trips_in_catalogue_order() {
        let conn = open_db_in_memory().expect("open in-memory db");
        let repo = SqliteRecordRepository::new(&conn);
        let sample = sample_records();

        assert_eq!(repo.insert_records(&sample).expect("insert sample"), 24);
        let stored = repo.list_records().expect("list records");
        assert_eq!(stored, sample);
        assert_eq!(repo.count().expect("count"), 24);
    }

    #[test]
    fn duplicate_insert_rolls_back_the_batch() {
        let conn = open_db_in_memory().expect("open in-memory db");
        let repo = SqliteRecordRepository::new(&conn);
        let sample = sample_records();
        repo.insert_records(&sample[..2]).expect("seed two records");

        let err = repo
            .insert_records(&sample[1..4])
            .expect_err("record 2 is already stored");
        assert!(matches!(err, RepoError::DuplicateRecord(id) if id.as_str() == "2"));
        assert_eq!(repo.count().expect("count"), 2);
    }

    #[test]
    fn unknown_category_label_is_rejected_on_read() {
        let conn = open_db_in_memory().expect("open in-memory db");
        conn.execute(
            "INSERT INTO heritage_records (id, position, name, category, city, level)
             VALUES ('x', 1, 'Mystery', '杂项', '西安', '国家级');",
            [],
        )
        .expect("insert raw row");

        let repo = SqliteRecordRepository::new(&conn);
        let err = repo.get_record("x").expect_err("unknown label must fail");
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn sqlite_failure_chains_to_rusqlite_error() {
        let conn = open_db_in_memory().expect("open in-memory db");
        conn.execute_batch("DROP TABLE heritage_records;").expect("drop table");

        let repo = SqliteRecordRepository::new(&conn);
        let err = repo.count().expect_err("missing table must fail");
        assert!(matches!(err, RepoError::Db(_)));

        let db_err = err.source().expect("repo error wraps a db error");
        let sqlite_err = db_err.source().expect("db error wraps a sqlite error");
        assert!(sqlite_err.downcast_ref::<rusqlite::Error>().is_some());
    }
}
