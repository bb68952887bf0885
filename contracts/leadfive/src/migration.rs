use crate::error::Error;
use crate::events::MigratedEvent;
use crate::storage::Storage;
use crate::types::{Config, Pool, PoolKind, Totals, STORAGE_VERSION};
use soroban_sdk::{log, Env, Symbol};

/// Stepwise schema upgrades. Each step only adds records; nothing already
/// stored is rewritten or removed.
pub struct Migration;

impl Migration {
    /// Run every pending step up to `STORAGE_VERSION`; returns the new version
    pub fn migrate(env: &Env) -> Result<u32, Error> {
        let from_version = Storage::get_storage_version(env);
        if from_version >= STORAGE_VERSION {
            return Err(Error::AlreadyMigrated);
        }

        let mut version = from_version;
        while version < STORAGE_VERSION {
            if version == 0 {
                Self::backfill_singletons(env);
            }
            version += 1;
            Storage::set_storage_version(env, version);
            log!(env, "migrated step", version);
        }

        env.events().publish(
            (Symbol::new(env, "migrated"),),
            MigratedEvent {
                from_version,
                to_version: version,
            },
        );
        Ok(version)
    }

    /// 0 → 1: seed config, pools and totals a pre-versioned deployment lacks
    fn backfill_singletons(env: &Env) {
        if !Storage::has_config(env) {
            Storage::set_config(env, &Config::default());
        }
        for kind in [PoolKind::Leader, PoolKind::Help, PoolKind::Club] {
            if !Storage::has_pool(env, kind) {
                Storage::set_pool(env, kind, &Pool::new(Pool::default_interval(kind)));
            }
        }
        if !Storage::has_totals(env) {
            Storage::set_totals(env, &Totals::default());
        }
    }
}
