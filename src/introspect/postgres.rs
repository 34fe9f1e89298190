use super::dsn::PostgresDsn;
use super::{CatalogReader, ColumnInfo, IndexInfo, TableInfo};
use crate::error::{GenError, Result};
use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use tracing::debug;

const TABLES_SQL: &str = "SELECT t.table_name::text, \
     COALESCE(obj_description((quote_ident(t.table_schema) || '.' || quote_ident(t.table_name))::regclass, 'pg_class'), '')::text \
     FROM information_schema.tables t \
     WHERE t.table_schema = current_schema() AND t.table_type = 'BASE TABLE' \
     ORDER BY t.table_name";

const COLUMNS_SQL: &str = "SELECT c.column_name::text, c.data_type::text, c.udt_name::text, \
     c.is_nullable::text, \
     CASE WHEN pk.column_name IS NOT NULL THEN 'PRI' ELSE '' END::text, \
     c.column_default::text, \
     CASE WHEN c.is_identity = 'YES' THEN 'identity' ELSE '' END::text, \
     col_description((quote_ident(c.table_schema) || '.' || quote_ident(c.table_name))::regclass, c.ordinal_position::int)::text, \
     c.character_maximum_length::bigint \
     FROM information_schema.columns c \
     LEFT JOIN ( \
         SELECT kcu.column_name \
         FROM information_schema.table_constraints tc \
         JOIN information_schema.key_column_usage kcu \
           ON tc.constraint_name = kcu.constraint_name \
          AND tc.table_schema = kcu.table_schema \
          AND tc.table_name = kcu.table_name \
         WHERE tc.constraint_type = 'PRIMARY KEY' \
           AND tc.table_schema = current_schema() \
           AND tc.table_name = $1 \
     ) pk ON pk.column_name = c.column_name \
     WHERE c.table_schema = current_schema() AND c.table_name = $1 \
     ORDER BY c.ordinal_position";

const INDEXES_SQL: &str = "SELECT i.relname::text, \
     array_to_string(ARRAY( \
         SELECT a.attname::text \
         FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord) \
         JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum \
         ORDER BY k.ord), ',')::text, \
     ix.indisunique, ix.indisprimary \
     FROM pg_index ix \
     JOIN pg_class t ON t.oid = ix.indrelid \
     JOIN pg_class i ON i.oid = ix.indexrelid \
     JOIN pg_namespace n ON n.oid = t.relnamespace \
     WHERE t.relname = $1 AND n.nspname = current_schema() \
     ORDER BY i.relname";

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

pub struct PostgresCatalog {
    conn: PgConnection,
}

impl PostgresCatalog {
    pub async fn connect(dsn: &PostgresDsn) -> Result<Self> {
        let mut conn = PgConnection::connect_with(&dsn.connect_options())
            .await
            .map_err(GenError::Connection)?;
        if let Err(e) = conn.ping().await {
            let _ = conn.close().await;
            return Err(GenError::Connection(e));
        }
        Ok(PostgresCatalog { conn })
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await.map_err(GenError::Connection)
    }
}

#[async_trait]
impl CatalogReader for PostgresCatalog {
    async fn tables(&mut self) -> Result<Vec<TableInfo>> {
        debug!("listing postgres tables");
        let rows: Vec<(String, String)> = sqlx::query_as(TABLES_SQL)
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
            .bind(table)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| GenError::query(format!("columns of {table}"), e))?;
        Ok(rows
            .into_iter()
            .map(
                |(name, data_type, udt_name, nullable, key, default, extra, comment, max_length)| {
                    ColumnInfo {
                        name,
                        data_type,
                        column_type: udt_name,
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
        let rows: Vec<(String, String, bool, bool)> = sqlx::query_as(INDEXES_SQL)
            .bind(table)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| GenError::query(format!("indexes of {table}"), e))?;
        Ok(rows
            .into_iter()
            .map(|(name, columns, unique, primary)| IndexInfo {
                name,
                columns: columns
                    .split(',')
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect(),
                unique,
                primary,
            })
            .collect())
    }
}
