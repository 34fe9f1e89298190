//! Native column type → logical type vocabulary.
//!
//! Unmapped native types fall back to `string`. That loses information (a
//! `geometry` column becomes a Go `string`) but always yields compilable output.

use crate::naming::LogicalType;

/// Map a catalog column to the logical vocabulary.
///
/// `data_type` is the bare type name (`int`, `character varying`); `column_type` is
/// the full declaration where the dialect has one (`int(10) unsigned`, `tinyint(1)`)
/// and is used for signedness and MySQL's boolean convention.
pub fn logical_type(data_type: &str, column_type: &str) -> LogicalType {
    let data_type = data_type.trim().to_ascii_lowercase();
    let column_type = column_type.trim().to_ascii_lowercase();
    let unsigned = column_type.contains("unsigned");

    match data_type.as_str() {
        "tinyint" if column_type.starts_with("tinyint(1)") => LogicalType::Bool,
        "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint" | "int2" | "int4"
        | "int8" | "serial" | "smallserial" | "bigserial" | "year" => {
            if unsigned {
                LogicalType::Uint
            } else {
                LogicalType::Int
            }
        }
        "varchar" | "char" | "character varying" | "character" | "bpchar" | "enum" | "set"
        | "uuid" | "citext" | "name" | "inet" => LogicalType::String,
        "text" | "tinytext" | "mediumtext" | "longtext" => LogicalType::Text,
        "float" | "real" | "float4" => LogicalType::Float,
        "double" | "double precision" | "float8" => LogicalType::Double,
        "decimal" | "numeric" | "money" => LogicalType::Decimal,
        "datetime" => LogicalType::Datetime,
        "timestamp" | "timestamptz" | "timestamp without time zone"
        | "timestamp with time zone" => LogicalType::Timestamp,
        "date" => LogicalType::Date,
        "bool" | "boolean" | "bit" => LogicalType::Bool,
        "json" | "jsonb" => LogicalType::Json,
        _ => LogicalType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_types() {
        assert_eq!(logical_type("varchar", "varchar(255)"), LogicalType::String);
        assert_eq!(logical_type("longtext", "longtext"), LogicalType::Text);
        assert_eq!(logical_type("int", "int(11)"), LogicalType::Int);
        assert_eq!(logical_type("bigint", "bigint(20) unsigned"), LogicalType::Uint);
        assert_eq!(logical_type("tinyint", "tinyint(1)"), LogicalType::Bool);
        assert_eq!(logical_type("tinyint", "tinyint(4)"), LogicalType::Int);
        assert_eq!(logical_type("decimal", "decimal(10,2)"), LogicalType::Decimal);
        assert_eq!(logical_type("datetime", "datetime"), LogicalType::Datetime);
        assert_eq!(logical_type("json", "json"), LogicalType::Json);
    }

    #[test]
    fn test_postgres_types() {
        assert_eq!(logical_type("character varying", "varchar"), LogicalType::String);
        assert_eq!(logical_type("integer", "int4"), LogicalType::Int);
        assert_eq!(logical_type("double precision", "float8"), LogicalType::Double);
        assert_eq!(
            logical_type("timestamp with time zone", "timestamptz"),
            LogicalType::Timestamp
        );
        assert_eq!(logical_type("boolean", "bool"), LogicalType::Bool);
        assert_eq!(logical_type("jsonb", "jsonb"), LogicalType::Json);
    }

    #[test]
    fn test_unknown_types_fall_back_to_string() {
        assert_eq!(logical_type("geometry", "geometry"), LogicalType::String);
        assert_eq!(logical_type("", ""), LogicalType::String);
    }
}
