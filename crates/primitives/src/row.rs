//! Column accessors for rows returned by `ConnectionPool::run_query`

use rusqlite::types::Value as SqlValue;
use testdb_core::{Error, Result};

/// Required text column
pub(crate) fn text_at<'a>(row: &'a [SqlValue], index: usize, column: &str) -> Result<&'a str> {
    match row.get(index) {
        Some(SqlValue::Text(s)) => Ok(s),
        Some(other) => Err(Error::decode(format!(
            "column '{}' holds {:?}, expected text",
            column,
            other.data_type()
        ))),
        None => Err(Error::internal(format!("column '{}' missing from row", column))),
    }
}

/// Nullable text column
pub(crate) fn optional_text_at<'a>(
    row: &'a [SqlValue],
    index: usize,
    column: &str,
) -> Result<Option<&'a str>> {
    match row.get(index) {
        Some(SqlValue::Null) => Ok(None),
        _ => text_at(row, index, column).map(Some),
    }
}
