use crate::domain::repositories::StoreError;

/// Returns true if `e` is a unique violation on the `links` primary key.
pub fn is_unique_violation_on_identifier(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some("links_pkey"))
}

/// Maps a sqlx error onto the store taxonomy.
pub fn map_sqlx_error(e: sqlx::Error, identifier: &str) -> StoreError {
    if is_unique_violation_on_identifier(&e) {
        return StoreError::ConstraintViolation(identifier.to_string());
    }

    StoreError::Unavailable(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_unavailable() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut, "abc123");
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(!is_unique_violation_on_identifier(&sqlx::Error::RowNotFound));
    }
}
