use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params_from_iter};

use crate::error::{DbError, Result};

/// Column assignments for a partial UPDATE; unset fields are skipped.
pub(crate) struct Assignments {
    columns: Vec<&'static str>,
    values: Vec<Box<dyn ToSql>>,
}

impl Assignments {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn set<T: ToSql + 'static>(mut self, column: &'static str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.columns.push(column);
            self.values.push(Box::new(value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Runs the UPDATE. With `touch`, `updated_at` is refreshed as well.
    pub fn apply(
        mut self,
        conn: &Connection,
        table: &str,
        id: i64,
        touch: bool,
    ) -> rusqlite::Result<usize> {
        if self.columns.is_empty() {
            return Ok(0);
        }

        let mut sets: Vec<String> = self.columns.iter().map(|c| format!("{} = ?", c)).collect();
        if touch {
            sets.push("updated_at = CURRENT_TIMESTAMP".to_string());
        }
        let sql = format!("UPDATE {} SET {} WHERE id = ?", table, sets.join(", "));

        self.values.push(Box::new(id));
        conn.execute(&sql, params_from_iter(self.values.iter()))
    }
}

/// WHERE-clause builder for list filters.
pub(crate) struct Conditions {
    clauses: Vec<String>,
    values: Vec<Box<dyn ToSql>>,
}

impl Conditions {
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
            values: Vec::new(),
        }
    }

    /// `expr` may hold several `?` placeholders; each receives `value`.
    pub fn push<T: ToSql + Clone + 'static>(mut self, expr: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            for _ in 0..expr.matches('?').count() {
                self.values.push(Box::new(value.clone()));
            }
            self.clauses.push(expr.to_string());
        }
        self
    }

    /// Exact match on a text column. An empty value filters nothing.
    pub fn equals(self, expr: &str, value: Option<&str>) -> Self {
        self.push(expr, value.filter(|v| !v.is_empty()).map(str::to_string))
    }

    /// Case-insensitive containment on a free-text column.
    pub fn contains(self, column: &str, keyword: Option<&str>) -> Self {
        let pattern = keyword.filter(|k| !k.is_empty()).map(like_pattern);
        self.push(&format!("casefold({}) LIKE ? ESCAPE '\\'", column), pattern)
    }

    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn query<T, F>(&self, conn: &Connection, sql: &str, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(self.values.iter()), map)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Registers `casefold(text)`, a Unicode lower-case. SQLite's own `LOWER()`
/// and `LIKE` only fold ASCII, so keyword filters run `casefold` on the
/// column and match it against a [`like_pattern`].
pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            Ok(match ctx.get_raw(0) {
                ValueRef::Text(text) => Some(String::from_utf8_lossy(text).to_lowercase()),
                _ => None,
            })
        },
    )
}

/// `%keyword%`, lower-cased the same way as `casefold`, with LIKE wildcards
/// in the keyword escaped.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn ensure_exists(
    conn: &Connection,
    table: &str,
    entity: &'static str,
    id: i64,
) -> Result<()> {
    let found = conn
        .query_row(&format!("SELECT 1 FROM {} WHERE id = ?1", table), [id], |_| Ok(()))
        .optional()?;
    found.ok_or(DbError::NotFound { entity, id })
}

pub(crate) fn delete_by_id(
    conn: &Connection,
    table: &str,
    entity: &'static str,
    id: i64,
) -> Result<()> {
    let deleted = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
    if deleted == 0 {
        return Err(DbError::NotFound { entity, id });
    }
    Ok(())
}
