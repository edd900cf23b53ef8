//! First-run account seeding.
//!
//! An empty store is populated with a numbered roster of accounts so the
//! board is usable immediately. Seeding is idempotent: once any account
//! exists, later calls change nothing.

use tracing::{debug, info};

use super::sqlite::SqliteStore;
use super::types::Account;
use crate::config::SeedConfig;
use crate::error::{ForemanError, Result};

/// Populate an empty store with `cfg.accounts` accounts, each owning
/// `cfg.builders_per_account` builders.
///
/// Account ids are `acc-01`, `acc-02`, ... (two-digit, zero-padded) with
/// matching display names. Returns the number of accounts inserted: the
/// full roster on first run, 0 on every later run.
pub fn seed_accounts(store: &SqliteStore, cfg: &SeedConfig) -> Result<usize> {
    if cfg.builders_per_account == 0 {
        return Err(ForemanError::InvalidInput(
            "builders_per_account must be at least 1".to_owned(),
        ));
    }

    let roster: Vec<Account> = (1..=cfg.accounts)
        .map(|n| Account {
            id: format!("acc-{n:02}"),
            name: format!("Account {n}"),
            builders: cfg.builders_per_account,
        })
        .collect();

    let inserted = store.bulk_insert_accounts(&roster)?;
    if inserted > 0 {
        info!(
            accounts = inserted,
            builders_per_account = cfg.builders_per_account,
            "seeded account roster"
        );
    } else {
        debug!("store already seeded");
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::config::StoreConfig;

    fn test_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let cfg = StoreConfig {
            root_dir: dir.path().to_path_buf(),
        };
        let store = SqliteStore::open(&cfg).expect("open SqliteStore");
        (dir, store)
    }

    #[test]
    fn seeds_default_roster() {
        let (_dir, store) = test_store();
        let inserted = seed_accounts(&store, &SeedConfig::default()).expect("seed");
        assert_eq!(inserted, 15);

        let accounts = store.list_accounts().expect("list");
        assert_eq!(accounts.len(), 15);
        assert_eq!(accounts[0].id, "acc-01");
        assert_eq!(accounts[14].id, "acc-15");
        assert!(accounts.iter().all(|a| a.builders == 5));
    }

    #[test]
    fn second_seed_is_a_no_op() {
        let (_dir, store) = test_store();
        seed_accounts(&store, &SeedConfig::default()).expect("first seed");
        let inserted = seed_accounts(&store, &SeedConfig::default()).expect("second seed");
        assert_eq!(inserted, 0);
        assert_eq!(store.account_count().expect("count"), 15);
    }

    #[test]
    fn custom_roster_size_is_honoured() {
        let (_dir, store) = test_store();
        let cfg = SeedConfig {
            accounts: 3,
            builders_per_account: 2,
        };
        let inserted = seed_accounts(&store, &cfg).expect("seed");
        assert_eq!(inserted, 3);

        let accounts = store.list_accounts().expect("list");
        let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["acc-01", "acc-02", "acc-03"]);
        assert!(accounts.iter().all(|a| a.builders == 2));
    }

    #[test]
    fn zero_builders_per_account_is_rejected() {
        let (_dir, store) = test_store();
        let cfg = SeedConfig {
            accounts: 5,
            builders_per_account: 0,
        };
        let err = seed_accounts(&store, &cfg).expect_err("zero builders should fail");
        assert!(matches!(err, ForemanError::InvalidInput(_)));
        assert_eq!(store.account_count().expect("count"), 0);
    }
}
