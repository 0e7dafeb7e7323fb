//! `ConnectOpts` → sqlx pool builder.

use sea_orm::sqlx::Database;
use sea_orm::sqlx::pool::PoolOptions;

use crate::ConnectOpts;

/// Pool builder for any sqlx driver, with every knob set in `opts` applied.
pub fn pool_options<DB: Database>(opts: &ConnectOpts) -> PoolOptions<DB> {
    let mut builder = PoolOptions::<DB>::new();
    if let Some(n) = opts.max_conns {
        builder = builder.max_connections(n);
    }
    if let Some(n) = opts.min_conns {
        builder = builder.min_connections(n);
    }
    if let Some(t) = opts.acquire_timeout {
        builder = builder.acquire_timeout(t);
    }
    builder.idle_timeout(opts.idle_timeout)
}

#[cfg(all(test, feature = "sqlite"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use sea_orm::sqlx::Sqlite;

    use super::*;

    #[test]
    fn unset_idle_timeout_disables_reaping() {
        let defaults = PoolOptions::<Sqlite>::new();
        let opts = ConnectOpts {
            max_conns: None,
            min_conns: None,
            acquire_timeout: None,
            idle_timeout: None,
            create_sqlite_dirs: false,
        };
        let built = pool_options::<Sqlite>(&opts);
        assert_eq!(built.get_max_connections(), defaults.get_max_connections());
        assert_eq!(built.get_idle_timeout(), None);
    }

    #[test]
    fn set_knobs_are_applied() {
        let opts = ConnectOpts {
            max_conns: Some(3),
            min_conns: Some(1),
            acquire_timeout: Some(Duration::from_secs(2)),
            idle_timeout: Some(Duration::from_secs(60)),
            create_sqlite_dirs: false,
        };
        let built = pool_options::<Sqlite>(&opts);
        assert_eq!(built.get_max_connections(), 3);
        assert_eq!(built.get_min_connections(), 1);
        assert_eq!(built.get_acquire_timeout(), Duration::from_secs(2));
        assert_eq!(built.get_idle_timeout(), Some(Duration::from_secs(60)));
    }
}
