use crate::error::Error;
use crate::types::{
    Config, DailyUsage, DataKey, DistributionRound, Package, Pool, PoolKind, Totals, User,
    INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};
use soroban_sdk::{Address, Env, Symbol};

pub struct Storage;

impl Storage {
    pub fn bump_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    fn bump_persistent(env: &Env, key: &DataKey) {
        env.storage().persistent().extend_ttl(
            key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }

    // Initialization
    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Initialized)
    }

    pub fn set_initialized(env: &Env) {
        env.storage().instance().set(&DataKey::Initialized, &true);
    }

    pub fn get_storage_version(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::StorageVersion)
            .unwrap_or(0)
    }

    pub fn set_storage_version(env: &Env, version: u32) {
        env.storage()
            .instance()
            .set(&DataKey::StorageVersion, &version);
    }

    // Roles
    pub fn get_owner(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_owner(env: &Env, owner: &Address) {
        env.storage().instance().set(&DataKey::Owner, owner);
    }

    pub fn has_admin_flag(env: &Env, account: &Address) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Admin(account.clone()))
            .unwrap_or(false)
    }

    pub fn set_admin_flag(env: &Env, account: &Address, enabled: bool) {
        let key = DataKey::Admin(account.clone());
        if enabled {
            env.storage().instance().set(&key, &true);
        } else {
            env.storage().instance().remove(&key);
        }
    }

    // Collaborator addresses
    pub fn get_treasury(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Treasury)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_treasury(env: &Env, treasury: &Address) {
        env.storage().instance().set(&DataKey::Treasury, treasury);
    }

    pub fn get_usdt(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Usdt)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_usdt(env: &Env, usdt: &Address) {
        env.storage().instance().set(&DataKey::Usdt, usdt);
    }

    pub fn get_native_token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::NativeToken)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_native_token(env: &Env, token: &Address) {
        env.storage().instance().set(&DataKey::NativeToken, token);
    }

    pub fn get_oracle(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Oracle)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_oracle(env: &Env, oracle: &Address) {
        env.storage().instance().set(&DataKey::Oracle, oracle);
    }

    // Config & flags
    pub fn get_config(env: &Env) -> Result<Config, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    pub fn has_config(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Config)
    }

    pub fn set_config(env: &Env, config: &Config) {
        env.storage().instance().set(&DataKey::Config, config);
    }

    pub fn is_paused(env: &Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn set_paused(env: &Env, paused: bool) {
        env.storage().instance().set(&DataKey::Paused, &paused);
    }

    pub fn is_locked(env: &Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Locked)
            .unwrap_or(false)
    }

    pub fn set_locked(env: &Env, locked: bool) {
        if locked {
            env.storage().instance().set(&DataKey::Locked, &true);
        } else {
            env.storage().instance().remove(&DataKey::Locked);
        }
    }

    // Accounting
    pub fn has_totals(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Totals)
    }

    pub fn get_totals(env: &Env) -> Totals {
        env.storage()
            .instance()
            .get(&DataKey::Totals)
            .unwrap_or_default()
    }

    pub fn set_totals(env: &Env, totals: &Totals) {
        env.storage().instance().set(&DataKey::Totals, totals);
    }

    // Packages
    pub fn package_count(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::PackageCount)
            .unwrap_or(0)
    }

    pub fn set_package_count(env: &Env, count: u32) {
        env.storage().instance().set(&DataKey::PackageCount, &count);
    }

    pub fn get_package(env: &Env, level: u32) -> Result<Package, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Package(level))
            .ok_or(Error::InvalidPackageLevel)
    }

    pub fn set_package(env: &Env, level: u32, package: &Package) {
        env.storage()
            .instance()
            .set(&DataKey::Package(level), package);
    }

    // Pools
    pub fn has_pool(env: &Env, kind: PoolKind) -> bool {
        env.storage().instance().has(&DataKey::Pool(kind))
    }

    pub fn get_pool(env: &Env, kind: PoolKind) -> Result<Pool, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Pool(kind))
            .ok_or(Error::NotInitialized)
    }

    pub fn set_pool(env: &Env, kind: PoolKind, pool: &Pool) {
        env.storage().instance().set(&DataKey::Pool(kind), pool);
    }

    pub fn get_round(env: &Env, kind: PoolKind) -> Option<DistributionRound> {
        env.storage().instance().get(&DataKey::PoolRound(kind))
    }

    pub fn set_round(env: &Env, kind: PoolKind, round: &DistributionRound) {
        env.storage()
            .instance()
            .set(&DataKey::PoolRound(kind), round);
    }

    pub fn remove_round(env: &Env, kind: PoolKind) {
        env.storage().instance().remove(&DataKey::PoolRound(kind));
    }

    // Users
    pub fn user_id(env: &Env, account: &Address) -> Option<u32> {
        env.storage()
            .persistent()
            .get(&DataKey::UserId(account.clone()))
    }

    pub fn set_user_id(env: &Env, account: &Address, id: u32) {
        let key = DataKey::UserId(account.clone());
        env.storage().persistent().set(&key, &id);
        Self::bump_persistent(env, &key);
    }

    pub fn get_user(env: &Env, id: u32) -> Result<User, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::User(id))
            .ok_or(Error::UserNotRegistered)
    }

    pub fn get_user_by_address(env: &Env, account: &Address) -> Result<User, Error> {
        let id = Self::user_id(env, account).ok_or(Error::UserNotRegistered)?;
        Self::get_user(env, id)
    }

    pub fn set_user(env: &Env, user: &User) {
        let key = DataKey::User(user.id);
        env.storage().persistent().set(&key, user);
        Self::bump_persistent(env, &key);
    }

    // Referral codes
    pub fn code_owner(env: &Env, code: &Symbol) -> Option<u32> {
        env.storage()
            .persistent()
            .get(&DataKey::ReferralCode(code.clone()))
    }

    pub fn code_of(env: &Env, id: u32) -> Option<Symbol> {
        env.storage().persistent().get(&DataKey::CodeOf(id))
    }

    pub fn set_code(env: &Env, id: u32, code: &Symbol) {
        if let Some(previous) = Self::code_of(env, id) {
            env.storage()
                .persistent()
                .remove(&DataKey::ReferralCode(previous));
        }
        let code_key = DataKey::ReferralCode(code.clone());
        let owner_key = DataKey::CodeOf(id);
        env.storage().persistent().set(&code_key, &id);
        env.storage().persistent().set(&owner_key, code);
        Self::bump_persistent(env, &code_key);
        Self::bump_persistent(env, &owner_key);
    }

    // Withdrawal limits
    pub fn get_user_daily(env: &Env, id: u32) -> Option<DailyUsage> {
        env.storage().persistent().get(&DataKey::UserDaily(id))
    }

    pub fn set_user_daily(env: &Env, id: u32, usage: &DailyUsage) {
        let key = DataKey::UserDaily(id);
        env.storage().persistent().set(&key, usage);
        Self::bump_persistent(env, &key);
    }

    pub fn get_global_daily(env: &Env) -> Option<DailyUsage> {
        env.storage().instance().get(&DataKey::GlobalDaily)
    }

    pub fn set_global_daily(env: &Env, usage: &DailyUsage) {
        env.storage().instance().set(&DataKey::GlobalDaily, usage);
    }

    // Anti-MEV marker, only needs to outlive the current ledger
    pub fn last_tx_ledger(env: &Env, account: &Address) -> Option<u32> {
        env.storage()
            .temporary()
            .get(&DataKey::LastTxLedger(account.clone()))
    }

    pub fn set_last_tx_ledger(env: &Env, account: &Address, sequence: u32) {
        env.storage()
            .temporary()
            .set(&DataKey::LastTxLedger(account.clone()), &sequence);
    }
}
