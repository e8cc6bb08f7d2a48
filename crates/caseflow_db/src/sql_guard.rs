//! Read-only SQL guard for the ad hoc query path.

use crate::error::{DbError, Result};

const ALLOWED_PREFIXES: &[&str] = &["SELECT", "WITH"];
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "ATTACH", "DETACH", "VACUUM",
    "PRAGMA",
];

/// Validate that a SQL query is a single read-only statement.
pub fn validate_read_only(sql: &str) -> Result<()> {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return Err(DbError::rejected("Query is empty"));
    }

    validate_single_statement(trimmed)?;

    let first = first_keyword(trimmed)
        .ok_or_else(|| DbError::rejected("Query must start with SELECT or WITH"))?;
    if !ALLOWED_PREFIXES.contains(&first.as_str()) {
        return Err(DbError::rejected("Query must start with SELECT or WITH"));
    }

    for token in tokens_upper(trimmed) {
        if FORBIDDEN_KEYWORDS.contains(&token.as_str()) {
            return Err(DbError::rejected(format!(
                "Query contains forbidden keyword: {token}"
            )));
        }
    }

    Ok(())
}

fn validate_single_statement(sql: &str) -> Result<()> {
    let mut semicolons = sql.match_indices(';').map(|(idx, _)| idx);
    let first = semicolons.next();
    if semicolons.next().is_some() {
        return Err(DbError::rejected("Multiple statements are not allowed"));
    }
    if let Some(idx) = first {
        if sql[idx + 1..].chars().any(|c| !c.is_whitespace()) {
            return Err(DbError::rejected("Multiple statements are not allowed"));
        }
    }
    Ok(())
}

fn first_keyword(sql: &str) -> Option<String> {
    tokens_upper(sql).into_iter().next()
}

fn tokens_upper(sql: &str) -> Vec<String> {
    sql.split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_select_and_with() {
        assert!(validate_read_only("SELECT * FROM cases").is_ok());
        assert!(validate_read_only("  with c as (select 1) select * from c").is_ok());
        assert!(validate_read_only("SELECT 1;").is_ok());
    }

    #[test]
    fn rejects_writes_and_multi_statements() {
        assert!(validate_read_only("DELETE FROM cases").is_err());
        assert!(validate_read_only("SELECT 1; DROP TABLE cases").is_err());
        assert!(validate_read_only("SELECT 1; SELECT 2").is_err());
        assert!(validate_read_only("").is_err());
    }

    #[test]
    fn rejects_embedded_forbidden_keyword() {
        assert!(validate_read_only("SELECT * FROM cases WHERE x = (DELETE)").is_err());
    }
}
