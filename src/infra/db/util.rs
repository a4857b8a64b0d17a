use crate::application::repos::RepoError;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.message().contains("duplicate key") => {
            RepoError::Duplicate {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            }
        }
        sqlx::Error::Database(db)
            if db.message().contains("violates foreign key constraint")
                || db.message().contains("invalid input syntax") =>
        {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("violates") => RepoError::Integrity {
            message: db.message().to_string(),
        },
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to user request") =>
        {
            RepoError::Timeout
        }
        other => RepoError::from_persistence(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        match map_sqlx_error(sqlx::Error::RowNotFound) {
            RepoError::NotFound => {}
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn unclassified_errors_map_to_persistence() {
        let err = sqlx::Error::Protocol("unexpected frame".to_string());
        match map_sqlx_error(err) {
            RepoError::Persistence(message) => assert!(message.contains("unexpected frame")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
