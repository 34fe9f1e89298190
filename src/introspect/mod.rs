//! # Introspect Module
//!
//! Reads table, column and index metadata from a live MySQL or Postgres database.
//!
//! ## Connection discipline
//!
//! Every public operation opens exactly one connection, pings it, runs its catalog
//! queries and closes the connection again, on success and on failure alike.
//! Nothing is written to the database.
//!
//! ## Structure
//!
//! - [`dsn`] recognises the dialect from the DSN's shape and decodes connection options
//! - [`CatalogReader`] is the per-dialect query surface ([`mysql`], [`postgres`])
//! - [`native`] maps native column types to the logical vocabulary
//!
//! The table-walking logic ([`collect_tables`], [`collect_table_schemas`]) is written
//! against the trait so it can be exercised without a database.

pub mod dsn;
mod mysql;
pub mod native;
mod postgres;

use crate::error::{GenError, Result};
use crate::naming::mask_dsn;
use async_trait::async_trait;
use std::collections::HashMap;
use dsn::{detect_dialect, Dialect, MySqlDsn, PostgresDsn};
use tracing::{debug, info, warn};

pub use mysql::MySqlCatalog;
pub use postgres::PostgresCatalog;

/// One base table, with the counts shown by table listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub comment: String,
    pub fields_count: usize,
    pub indexes_count: usize,
}

/// A column as reported by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Bare type name, e.g. `varchar` or `character varying`.
    pub data_type: String,
    /// Full declaration, e.g. `int(10) unsigned`. Postgres reports the udt name.
    pub column_type: String,
    pub nullable: bool,
    /// `PRI`, `UNI`, `MUL` or empty.
    pub key: String,
    pub default: Option<String>,
    /// `auto_increment`, `identity`, … or empty.
    pub extra: String,
    pub comment: String,
    pub max_length: Option<i64>,
}

impl ColumnInfo {
    pub fn is_primary(&self) -> bool {
        self.key == "PRI"
    }

    pub fn is_auto_increment(&self) -> bool {
        let extra = self.extra.to_ascii_lowercase();
        extra.contains("auto_increment")
            || extra.contains("identity")
            || self
                .default
                .as_deref()
                .is_some_and(|d| d.starts_with("nextval("))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub primary: bool,
}

/// Everything needed to turn one table into a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailedTableInfo {
    pub name: String,
    pub comment: String,
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>,
}

/// Catalog queries for one open connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogReader: Send {
    /// Base tables (no views), ordered by name.
    async fn tables(&mut self) -> Result<Vec<TableInfo>>;
    /// Columns of `table` in ordinal order.
    async fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>>;
    /// Indexes of `table`, each with its columns in key order.
    async fn indexes(&mut self, table: &str) -> Result<Vec<IndexInfo>>;
}

/// List base tables with field and index counts.
pub async fn collect_tables<R>(reader: &mut R) -> Result<Vec<TableInfo>>
where
    R: CatalogReader + ?Sized,
{
    let mut tables = reader.tables().await?;
    for table in &mut tables {
        table.fields_count = reader.columns(&table.name).await?.len();
        table.indexes_count = reader.indexes(&table.name).await?.len();
    }
    Ok(tables)
}

/// Full column and index detail for one table.
///
/// `comment` comes from the table listing the caller already holds. A table with
/// no columns does not exist (or is invisible to this user).
pub async fn collect_table_schema<R>(
    reader: &mut R,
    table: &str,
    comment: &str,
) -> Result<DetailedTableInfo>
where
    R: CatalogReader + ?Sized,
{
    let columns = reader.columns(table).await?;
    if columns.is_empty() {
        return Err(GenError::Validation(format!(
            "table {table} not found or has no visible columns"
        )));
    }
    let indexes = reader.indexes(table).await?;
    debug!(
        table,
        columns = columns.len(),
        indexes = indexes.len(),
        "read table schema"
    );
    Ok(DetailedTableInfo {
        name: table.to_string(),
        comment: comment.to_string(),
        columns,
        indexes,
    })
}

/// Detail for each of `tables`, in the order given.
///
/// The catalog is listed once up front for table comments. The first failing
/// table aborts the run.
pub async fn collect_table_schemas<R>(
    reader: &mut R,
    tables: &[String],
) -> Result<Vec<DetailedTableInfo>>
where
    R: CatalogReader + ?Sized,
{
    let comments: HashMap<String, String> = reader
        .tables()
        .await?
        .into_iter()
        .map(|t| (t.name, t.comment))
        .collect();
    let mut out = Vec::with_capacity(tables.len());
    for table in tables {
        let comment = comments.get(table).map(String::as_str).unwrap_or_default();
        out.push(collect_table_schema(reader, table, comment).await?);
    }
    Ok(out)
}

/// An open, pinged connection of either dialect.
pub enum Catalog {
    MySql(MySqlCatalog),
    Postgres(PostgresCatalog),
}

impl Catalog {
    /// Detect the dialect, connect and ping.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let dialect = detect_dialect(dsn)?;
        info!(dialect = %dialect, dsn = %mask_dsn(dsn), "connecting for introspection");
        match dialect {
            Dialect::MySql => {
                let parsed = MySqlDsn::parse(dsn)?;
                Ok(Catalog::MySql(MySqlCatalog::connect(&parsed).await?))
            }
            Dialect::Postgres => {
                let parsed = PostgresDsn::parse(dsn)?;
                Ok(Catalog::Postgres(PostgresCatalog::connect(&parsed).await?))
            }
        }
    }

    /// Release the connection. Close failures are logged, not returned.
    pub async fn close(self) {
        let outcome = match self {
            Catalog::MySql(c) => c.close().await,
            Catalog::Postgres(c) => c.close().await,
        };
        if let Err(e) = outcome {
            warn!(error = %e, "failed to close introspection connection cleanly");
        }
    }

    fn reader(&mut self) -> &mut dyn CatalogReader {
        match self {
            Catalog::MySql(c) => c as &mut dyn CatalogReader,
            Catalog::Postgres(c) => c as &mut dyn CatalogReader,
        }
    }
}

/// All base tables reachable through `dsn`, with field and index counts.
///
/// # Errors
///
/// [`GenError::UnsupportedDialect`], [`GenError::Connection`] or [`GenError::Query`].
pub async fn list_tables(dsn: &str) -> Result<Vec<TableInfo>> {
    let mut catalog = Catalog::connect(dsn).await?;
    let result = collect_tables(catalog.reader()).await;
    catalog.close().await;
    result
}

/// Detailed schema of one table.
pub async fn get_table_schema(dsn: &str, table: &str) -> Result<DetailedTableInfo> {
    get_table_schemas(dsn, &[table.to_string()])
        .await?
        .pop()
        .ok_or_else(|| GenError::Validation(format!("table {table} not found")))
}

/// Detailed schema of several tables over a single connection.
pub async fn get_table_schemas(dsn: &str, tables: &[String]) -> Result<Vec<DetailedTableInfo>> {
    let mut catalog = Catalog::connect(dsn).await?;
    let result = collect_table_schemas(catalog.reader(), tables).await;
    catalog.close().await;
    result
}

#[cfg(test)]
mod tests;
