use super::dsn::MySqlDsn;
use super::{CatalogReader, ColumnInfo, IndexInfo, TableInfo};
use crate::error::{GenError, Result};
use async_trait::async_trait;
use sqlx::{Connection, MySqlConnection};
use tracing::debug;

// Catalog columns are CAST to CHAR / SIGNED so decoding does not depend on the
// server's information_schema collation or integer widths.

const TABLES_SQL: &str = "SELECT CAST(TABLE_NAME AS CHAR), CAST(IFNULL(TABLE_COMMENT, '') AS CHAR) \
     FROM INFORMATION_SCHEMA.TABLES \
     WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE' \
     ORDER BY TABLE_NAME";

const COLUMNS_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR), CAST(DATA_TYPE AS CHAR), \
     CAST(COLUMN_TYPE AS CHAR), CAST(IS_NULLABLE AS CHAR), CAST(COLUMN_KEY AS CHAR), \
     CAST(COLUMN_DEFAULT AS CHAR), CAST(EXTRA AS CHAR), CAST(COLUMN_COMMENT AS CHAR), \
     CAST(CHARACTER_MAXIMUM_LENGTH AS SIGNED) \
     FROM INFORMATION_SCHEMA.COLUMNS \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

const INDEXES_SQL: &str = "SELECT CAST(INDEX_NAME AS CHAR), \
     CAST(GROUP_CONCAT(COLUMN_NAME ORDER BY SEQ_IN_INDEX) AS CHAR), \
     CAST(MIN(NON_UNIQUE) AS SIGNED) \
     FROM INFORMATION_SCHEMA.STATISTICS \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? \
     GROUP BY INDEX_NAME \
     ORDER BY INDEX_NAME";

type ColumnRow = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    Option<i64>,
);

pub struct MySqlCatalog {
    conn: MySqlConnection,
    database: String,
}

impl MySqlCatalog {
    pub async fn connect(dsn: &MySqlDsn) -> Result<Self> {
        let mut conn = MySqlConnection::connect_with(&dsn.connect_options())
            .await
            .map_err(GenError::Connection)?;
        if let Err(e) = conn.ping().await {
            // Best effort: the ping failure is the error worth reporting.
            let _ = conn.close().await;
            return Err(GenError::Connection(e));
        }
        Ok(MySqlCatalog {
            conn,
            database: dsn.database.clone(),
        })
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await.map_err(GenError::Connection)
    }
}

#[async_trait]
impl CatalogReader for MySqlCatalog {
    async fn tables(&mut self) -> Result<Vec<TableInfo>> {
        debug!(schema = %self.database, "listing mysql tables");
        let rows: Vec<(String, String)> = sqlx::query_as(TABLES_SQL)
            .bind(&self.database)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| GenError::query("list tables", e))?;
        Ok(rows
            .into_iter()
            .map(|(name, comment)| TableInfo {
                name,
                comment,
                ..Default::default()
            })
            .collect())
    }

    async fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        let rows: Vec<ColumnRow> = sqlx::query_as(COLUMNS_SQL)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| GenError::query(format!("columns of {table}"), e))?;
        Ok(rows
            .into_iter()
            .map(
                |(name, data_type, column_type, nullable, key, default, extra, comment, max_length)| {
                    ColumnInfo {
                        name,
                        data_type,
                        column_type,
                        nullable: nullable.eq_ignore_ascii_case("YES"),
                        key,
                        default,
                        extra,
                        comment: comment.unwrap_or_default(),
                        max_length,
                    }
                },
            )
            .collect())
    }

    async fn indexes(&mut self, table: &str) -> Result<Vec<IndexInfo>> {
        let rows: Vec<(String, Option<String>, i64)> = sqlx::query_as(INDEXES_SQL)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| GenError::query(format!("indexes of {table}"), e))?;
        Ok(rows
            .into_iter()
            .map(|(name, columns, non_unique)| IndexInfo {
                primary: name == "PRIMARY",
                unique: non_unique == 0,
                columns: columns
                    .unwrap_or_default()
                    .split(',')
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect(),
                name,
            })
            .collect())
    }
}
