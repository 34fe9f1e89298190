//! Naming and type mapping for generated Go code.
//!
//! Everything here is a pure function of its input. The generators call these
//! both directly (to precompute render inputs) and through the template function
//! library registered in [`crate::generator::registry`].

use crate::spec::{FieldDefinition, IndexDefinition};
use once_cell::sync::Lazy;
use regex::Regex;

/// Go initialisms kept fully upper-case in exported identifiers (`user_id` → `UserID`).
const GO_INITIALISMS: &[&str] = &[
    "ACL", "API", "DNS", "HTML", "HTTP", "HTTPS", "ID", "IP", "JSON", "SQL", "TTL", "UID",
    "URI", "URL", "UUID", "XML",
];

/// `user_profile` → `UserProfile`. Empty segments are skipped.
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .filter(|seg| !seg.is_empty())
        .map(capitalize)
        .collect()
}

/// `user_profile` → `userProfile`.
pub fn to_camel_case(s: &str) -> String {
    lower_first(&to_pascal_case(s))
}

/// Lower-case only the first character: `UserProfile` → `userProfile`.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Naive English plural: trailing `y` becomes `ies`, anything else gains an `s`.
pub fn pluralize(word: &str) -> String {
    match word.strip_suffix('y') {
        Some(stem) => format!("{stem}ies"),
        None => format!("{word}s"),
    }
}

/// Inverse of [`pluralize`] for table-name segments: `categories` → `category`,
/// `users` → `user`. Words ending in `ss` (`address`) are left alone.
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    if word.ends_with("ss") || word.len() < 2 {
        return word.to_string();
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}

/// Model name for a physical table: PascalCase with the final segment singularised.
///
/// `user_profiles` → `UserProfile`, `categories` → `Category`.
pub fn model_name_from_table(table: &str) -> String {
    let mut segments: Vec<String> = table
        .split('_')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(last) = segments.last_mut() {
        *last = singularize(last);
    }
    segments.iter().map(|s| capitalize(s)).collect()
}

/// Exported Go struct field name. Like [`to_pascal_case`] but with Go initialisms
/// upper-cased per segment (`id` → `ID`, `avatar_url` → `AvatarURL`).
pub fn go_field_name(name: &str) -> String {
    name.split('_')
        .filter(|seg| !seg.is_empty())
        .map(|seg| {
            let upper = seg.to_ascii_uppercase();
            if GO_INITIALISMS.contains(&upper.as_str()) {
                upper
            } else {
                capitalize(seg)
            }
        })
        .collect()
}

/// Identifiers a generated local variable must not take: Go keywords, predeclared
/// names and the packages imported by generated files.
const GO_RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var", "error", "string", "len", "new",
    "make", "append", "copy", "delete", "model", "repository", "service", "controller",
    "validator", "response", "capability", "context", "errors", "fmt", "http", "strconv",
    "gin", "gorm", "time", "playground", "ctx", "id", "err", "res", "total", "page", "items",
    "cached", "entry", "key", "cache", "hit", "ok", "raw", "req", "userID", "repo",
    "svc", "r", "s", "c", "db",
];

/// Local variable name for a model value: lowerCamel, suffixed when it would
/// shadow a keyword, an imported package or a local of the generated code
/// (`Type` → `typeItem`).
pub fn go_var_name(model_name: &str) -> String {
    let var = lower_first(model_name);
    if GO_RESERVED.contains(&var.as_str()) {
        format!("{var}Item")
    } else {
        var
    }
}

/// The logical column type vocabulary of a specification document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    Uint,
    Int,
    String,
    Text,
    Bool,
    Float,
    Double,
    Decimal,
    Timestamp,
    Date,
    Datetime,
    Json,
}

impl LogicalType {
    /// Unknown names yield `None`; callers treat that as `string`.
    pub fn parse(s: &str) -> Option<Self> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "uint" => LogicalType::Uint,
            "int" => LogicalType::Int,
            "string" => LogicalType::String,
            "text" => LogicalType::Text,
            "bool" => LogicalType::Bool,
            "float" => LogicalType::Float,
            "double" => LogicalType::Double,
            "decimal" => LogicalType::Decimal,
            "timestamp" => LogicalType::Timestamp,
            "date" => LogicalType::Date,
            "datetime" => LogicalType::Datetime,
            "json" => LogicalType::Json,
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogicalType::Uint => "uint",
            LogicalType::Int => "int",
            LogicalType::String => "string",
            LogicalType::Text => "text",
            LogicalType::Bool => "bool",
            LogicalType::Float => "float",
            LogicalType::Double => "double",
            LogicalType::Decimal => "decimal",
            LogicalType::Timestamp => "timestamp",
            LogicalType::Date => "date",
            LogicalType::Datetime => "datetime",
            LogicalType::Json => "json",
        }
    }

    pub fn go_type(self) -> &'static str {
        match self {
            LogicalType::Uint => "uint",
            LogicalType::Int => "int",
            LogicalType::String | LogicalType::Text | LogicalType::Json => "string",
            LogicalType::Bool => "bool",
            LogicalType::Float | LogicalType::Double | LogicalType::Decimal => "float64",
            LogicalType::Timestamp | LogicalType::Date | LogicalType::Datetime => "time.Time",
        }
    }
}

/// Go type for a logical type name; nullable columns become pointers.
pub fn go_type(logical: &str, nullable: bool) -> String {
    let base = LogicalType::parse(logical)
        .map(LogicalType::go_type)
        .unwrap_or("string");
    if nullable {
        format!("*{base}")
    } else {
        base.to_string()
    }
}

/// Go type of a model field, honouring nullability.
pub fn field_go_type(field: &FieldDefinition) -> String {
    go_type(&field.field_type, field.is_nullable())
}

/// gorm struct tag body for `field`, clauses joined by `;` in a fixed order.
///
/// Index clauses are contributed by every entry of `indexes` that lists the field.
pub fn storage_tag(field: &FieldDefinition, indexes: &[IndexDefinition]) -> String {
    let mut tags: Vec<String> = Vec::new();

    if field.primary_key {
        tags.push("primarykey".into());
    }
    if field.auto_increment {
        tags.push("autoIncrement".into());
    }
    if field.size > 0 {
        tags.push(format!("size:{}", field.size));
    }
    if field.not_null {
        tags.push("not null".into());
    }
    if field.unique {
        tags.push("uniqueIndex".into());
    }
    if field.index {
        tags.push("index".into());
    }
    for idx in indexes.iter().filter(|i| i.fields.iter().any(|f| f == &field.name)) {
        if idx.unique {
            tags.push(format!("uniqueIndex:{}", idx.name));
        } else {
            tags.push(format!("index:{}", idx.name));
        }
    }
    if !field.default.is_empty() {
        tags.push(format!("default:{}", field.default));
    }
    if !field.foreign_key.is_empty() {
        tags.push(format!("foreignKey:{}", field.foreign_key));
        let on_update = non_empty_or(&field.on_update, "CASCADE");
        let on_delete = non_empty_or(
            &field.on_delete,
            if field.not_null { "CASCADE" } else { "SET NULL" },
        );
        tags.push(format!("constraint:OnUpdate:{on_update},OnDelete:{on_delete}"));
    }
    if field.auto_create_time {
        tags.push("autoCreateTime".into());
    }
    if field.auto_update_time {
        tags.push("autoUpdateTime".into());
    }
    if !field.comment.is_empty() {
        tags.push(format!("comment:{}", field.comment));
    }

    tags.join(";")
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// JSON name of a field: the explicit override, else lowerCamel of the column name.
pub fn serialization_name(field: &FieldDefinition) -> String {
    if field.json.is_empty() {
        to_camel_case(&field.name)
    } else {
        field.json.clone()
    }
}

/// Go type for a request-validator field, guessed from its rule string.
///
/// Rules are matched as whole comma-separated tokens (a bare `numeric` token,
/// not `min=1`), so `required,numeric` → `int`.
pub fn request_field_type(rules: &str) -> &'static str {
    let tokens: Vec<&str> = rules.split(',').map(str::trim).collect();
    let has = |name: &str| tokens.iter().any(|t| *t == name || t.starts_with(&format!("{name}=")));
    if has("array") || has("dive") {
        "[]string"
    } else if has("numeric") || has("number") {
        "int"
    } else if has("bool") || has("boolean") {
        "bool"
    } else {
        "string"
    }
}

/// `password=` in key/value DSNs; the value is either single-quoted (with `\'`
/// escapes, possibly unterminated) or runs to the next whitespace.
#[allow(clippy::expect_used)]
static KV_PASSWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password=)('(?:[^'\\]|\\.)*'?|\S*)")
        .expect("password pattern should be valid")
});

/// Replace the password part of a DSN with `****` before it reaches logs.
///
/// Handles `user:pass@…`, `scheme://user:pass@…` and `password=…` key/value forms,
/// including quoted values such as `password='a b'`.
pub fn mask_dsn(dsn: &str) -> String {
    if KV_PASSWORD.is_match(dsn) {
        return KV_PASSWORD.replace_all(dsn, "${1}****").into_owned();
    }
    let Some(at) = dsn.rfind('@') else {
        return dsn.to_string();
    };
    let userinfo_start = dsn[..at].find("://").map(|i| i + 3).unwrap_or(0);
    match dsn[userinfo_start..at].find(':') {
        Some(colon) => {
            let colon = userinfo_start + colon;
            format!("{}:****{}", &dsn[..colon], &dsn[at..])
        }
        None => dsn.to_string(),
    }
}
