//! Shared helper routines for operator implementations.

use chrono::{DateTime, Utc};
use tracing::error;

use crate::adapter::outbound::sqlite::store::SqliteStore;
use crate::error::{Error, Result};

pub(super) fn map_app_result(
    result: std::result::Result<Result<()>, tokio::task::JoinError>,
) -> Result<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => {
            error!(error = %error, "Control loop exited with error");
            Err(error)
        }
        Err(error) => {
            error!(error = %error, "Control loop task join failed");
            Err(Error::Connection(error.to_string()))
        }
    }
}

pub(super) fn open_store(database_url: &str) -> Result<SqliteStore> {
    SqliteStore::open(database_url)
}

pub(super) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_render_to_the_second() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-09 14:05:07");
    }

    #[tokio::test]
    async fn join_errors_become_connection_errors() {
        let handle = tokio::spawn(async {
            if true {
                panic!("boom");
            }
            Ok::<(), Error>(())
        });
        assert!(matches!(map_app_result(handle.await), Err(Error::Connection(_))));
    }
}
