//! SQLite storage implementation

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, params_from_iter};
use serde::Serialize;

use super::schema;
use super::validate;
use crate::address::RiceAddress;
use crate::contract::{ALL_COLUMNS, TABLE_NAME, is_known_column};
use crate::field::{FieldMap, FieldValue, Selection};
use crate::rice::Cursor;
use crate::{Error, Result};

/// SQLite-backed store for the rice inventory.
///
/// Holds one connection for its whole lifetime. The connection sits behind a
/// mutex so a shared store runs one statement at a time.
pub struct RiceStore {
    conn: Mutex<Connection>,
}

impl RiceStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        tracing::info!("Opening rice database at {}", path.display());
        let conn = Connection::open(path)?;
        Self::init_with_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self> {
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create the schema on a fresh file, accept version 1, refuse anything newer
    fn initialize_schema(conn: &Connection) -> Result<()> {
        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        match version {
            0 => {
                tracing::info!("Creating rice schema version {}", schema::SCHEMA_VERSION);
                for stmt in schema::all_schema_statements() {
                    conn.execute(stmt, [])?;
                }
                conn.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
            }
            schema::SCHEMA_VERSION => {}
            newer => return Err(Error::UnsupportedSchemaVersion(newer)),
        }
        Ok(())
    }

    /// Release the connection
    pub fn close(self) -> Result<()> {
        let conn = self.conn.into_inner().map_err(|_| Error::LockPoisoned)?;
        conn.close().map_err(|(_, e)| Error::Storage(e))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Selection an operation actually runs with: item addresses always
    /// filter on their own id, whatever the caller passed
    fn resolve_selection(address: &RiceAddress, selection: &Selection) -> Selection {
        match address {
            RiceAddress::Collection => selection.clone(),
            RiceAddress::Item(id) => Selection::by_id(*id),
        }
    }

    // ========== Read ==========

    /// Run a query against `address`.
    ///
    /// `columns` of `None` selects every column in table order. Collection
    /// queries use `selection` and `sort_order` verbatim.
    pub fn query(
        &self,
        address: &RiceAddress,
        columns: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> Result<Cursor> {
        let columns = columns.unwrap_or(ALL_COLUMNS);
        if let Some(unknown) = columns.iter().find(|c| !is_known_column(c)) {
            return Err(Error::UnknownColumn(unknown.to_string()));
        }
        let projection = if columns.is_empty() {
            ALL_COLUMNS.join(", ")
        } else {
            columns.join(", ")
        };

        let selection = Self::resolve_selection(address, selection);
        let mut sql = format!("SELECT {} FROM {}", projection, TABLE_NAME);
        if let Some(clause) = selection.where_clause() {
            sql.push_str(&format!(" WHERE {}", clause));
        }
        if let Some(order) = sort_order.map(str::trim).filter(|o| !o.is_empty()) {
            sql.push_str(&format!(" ORDER BY {}", order));
        }
        tracing::debug!("query {}: {}", address, sql);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = names.len();

        let rows = stmt
            .query_map(params_from_iter(selection.args.iter()), |row| {
                (0..width)
                    .map(|i| row.get::<_, FieldValue>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Cursor::new(names, rows))
    }

    /// MIME marker for `address`
    pub fn mime_type(&self, address: &RiceAddress) -> &'static str {
        address.mime_type()
    }

    // ========== Write ==========

    /// Insert a new rice and return its id.
    ///
    /// Only the collection address accepts inserts.
    pub fn insert(&self, address: &RiceAddress, fields: &FieldMap) -> Result<i64> {
        if let RiceAddress::Item(_) = address {
            return Err(Error::UnsupportedOperation {
                operation: "insert",
                address: *address,
            });
        }

        let assignments = validate::for_insert(fields)?;
        let columns: Vec<&str> = assignments.iter().map(|(c, _)| *c).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            TABLE_NAME,
            columns.join(", "),
            placeholders
        );
        tracing::debug!("insert {}: {}", address, sql);

        let conn = self.conn()?;
        if let Err(e) = conn.execute(&sql, params_from_iter(assignments.iter().map(|(_, v)| v))) {
            tracing::error!("Failed to insert row for {}: {}", address, e);
            return Err(e.into());
        }
        Ok(conn.last_insert_rowid())
    }

    /// Update the rows `address` (and, for the collection, `selection`)
    /// points at. Returns the number of rows touched.
    pub fn update(
        &self,
        address: &RiceAddress,
        fields: &FieldMap,
        selection: &Selection,
    ) -> Result<usize> {
        let assignments = validate::for_update(fields)?;
        if assignments.is_empty() {
            return Ok(0);
        }

        let selection = Self::resolve_selection(address, selection);
        let set_list: Vec<String> = assignments.iter().map(|(c, _)| format!("{} = ?", c)).collect();
        let mut sql = format!("UPDATE {} SET {}", TABLE_NAME, set_list.join(", "));
        if let Some(clause) = selection.where_clause() {
            sql.push_str(&format!(" WHERE {}", clause));
        }
        tracing::debug!("update {}: {}", address, sql);

        let params = assignments.iter().map(|(_, v)| v).chain(selection.args.iter());
        let conn = self.conn()?;
        let updated = conn.execute(&sql, params_from_iter(params)).inspect_err(|e| {
            tracing::error!("Failed to update rows for {}: {}", address, e);
        })?;
        Ok(updated)
    }

    /// Delete the rows `address` (and, for the collection, `selection`)
    /// points at. Returns the number of rows deleted.
    pub fn delete(&self, address: &RiceAddress, selection: &Selection) -> Result<usize> {
        let selection = Self::resolve_selection(address, selection);
        let mut sql = format!("DELETE FROM {}", TABLE_NAME);
        if let Some(clause) = selection.where_clause() {
            sql.push_str(&format!(" WHERE {}", clause));
        }
        tracing::debug!("delete {}: {}", address, sql);

        let conn = self.conn()?;
        let deleted = conn.execute(&sql, params_from_iter(selection.args.iter())).inspect_err(|e| {
            tracing::error!("Failed to delete rows for {}: {}", address, e);
        })?;
        Ok(deleted)
    }

    // ========== Stats ==========

    /// Count all rices
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", TABLE_NAME), [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn()?;
        let (rices, total_price): (i64, i64) = conn.query_row(
            &format!("SELECT COUNT(*), COALESCE(SUM(price), 0) FROM {}", TABLE_NAME),
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let schema_version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(StoreStats {
            rices: rices as usize,
            total_price,
            schema_version,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub rices: usize,
    /// Sum of all prices, in cents
    pub total_price: i64,
    pub schema_version: i64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Rices: {}", self.rices)?;
        writeln!(f, "  Total price: {}", self.total_price)?;
        writeln!(f, "  Schema version: {}", self.schema_version)
    }
}
