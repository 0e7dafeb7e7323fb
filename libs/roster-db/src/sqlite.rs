//! SQLite-specific DSN helpers.

use std::path::Path;

/// True for `sqlite::memory:` and `sqlite:file:...?mode=memory` style DSNs.
pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Extract the file path of a `sqlite:` DSN (without scheme and query string).
pub fn file_path(dsn: &str) -> Option<&str> {
    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    (!path.is_empty()).then_some(path)
}

/// Create the parent directory of a file-backed `SQLite` database if it is missing.
pub fn prepare_sqlite_dir(dsn: &str) -> std::io::Result<()> {
    let Some(path) = file_path(dsn) else {
        return Ok(());
    };
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        tracing::debug!(dir = %parent.display(), "creating sqlite parent directory");
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn memory_dsn_detection() {
        assert!(is_memory_dsn("sqlite::memory:"));
        assert!(is_memory_dsn("sqlite:file:roster?mode=memory&cache=shared"));
        assert!(!is_memory_dsn("sqlite://data/roster.db"));
    }

    #[test]
    fn file_path_strips_scheme_and_query() {
        assert_eq!(file_path("sqlite://data/roster.db"), Some("data/roster.db"));
        assert_eq!(file_path("sqlite:roster.db?mode=rwc"), Some("roster.db"));
        assert_eq!(file_path("sqlite://"), None);
        assert_eq!(file_path("postgres://x"), None);
    }

    #[test]
    fn prepare_creates_missing_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested/dir/roster.db");
        let dsn = format!("sqlite://{}", db_path.display());
        prepare_sqlite_dir(&dsn).unwrap();
        assert!(tmp.path().join("nested/dir").is_dir());
    }
}
