//! Guard for user-supplied SQL.
//!
//! Only `SELECT` and `WITH` statements pass, and a blocklist of mutating or
//! engine-control keywords is checked token by token. The read-only
//! connection enforces the same at execution time.

use std::error::Error;
use std::fmt::{Display, Formatter};

const BLOCKED_KEYWORDS: &[&str] = &[
    "DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "CREATE", "TRUNCATE", "REPLACE", "ATTACH",
    "DETACH", "PRAGMA",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlGuardError {
    Empty,
    NotSelect,
    BlockedKeyword(String),
}

impl Display for SqlGuardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "query cannot be empty"),
            Self::NotSelect => write!(f, "only SELECT queries are allowed"),
            Self::BlockedKeyword(keyword) => write!(f, "keyword '{keyword}' is not allowed"),
        }
    }
}

impl Error for SqlGuardError {}

/// Validates `query` against the read-only policy.
pub fn validate_sql(query: &str) -> Result<(), SqlGuardError> {
    let normalized = query.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(SqlGuardError::Empty);
    }
    if !normalized.starts_with("SELECT") && !normalized.starts_with("WITH") {
        return Err(SqlGuardError::NotSelect);
    }

    let blocked = normalized
        .split(|c: char| c.is_whitespace() || "(),;=<>".contains(c))
        .find(|token| BLOCKED_KEYWORDS.contains(token));
    match blocked {
        Some(keyword) => Err(SqlGuardError::BlockedKeyword(keyword.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_sql, SqlGuardError};

    #[test]
    fn accepts_select_and_with() {
        assert!(validate_sql("SELECT * FROM markdown").is_ok());
        assert!(validate_sql("  select count(*) from markdown").is_ok());
        assert!(validate_sql(
            "WITH recent AS (SELECT * FROM markdown) SELECT relative FROM recent"
        )
        .is_ok());
        assert!(validate_sql(
            "SELECT a.relative FROM markdown a JOIN markdown b ON a.filepath = b.filepath UNION SELECT 'x'"
        )
        .is_ok());
    }

    #[test]
    fn rejects_empty_and_non_select() {
        assert_eq!(validate_sql("   "), Err(SqlGuardError::Empty));
        assert_eq!(
            validate_sql("DELETE FROM markdown"),
            Err(SqlGuardError::NotSelect)
        );
    }

    #[test]
    fn rejects_blocked_keywords_anywhere() {
        for keyword in [
            "DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "CREATE", "TRUNCATE", "REPLACE",
            "ATTACH", "DETACH", "PRAGMA",
        ] {
            let query = format!("SELECT 1; {} something", keyword.to_lowercase());
            assert_eq!(
                validate_sql(&query),
                Err(SqlGuardError::BlockedKeyword(keyword.to_string())),
                "{keyword} should be blocked"
            );
        }
    }

    #[test]
    fn keywords_inside_identifiers_are_allowed() {
        assert!(validate_sql("SELECT updated_at, created FROM markdown").is_ok());
    }
}
