#![no_std]

mod admin;
mod commission;
mod error;
mod events;
mod guard;
mod matrix;
mod migration;
mod oracle;
mod pools;
mod registration;
mod storage;
mod types;
mod validation;
mod withdrawal;


pub use error::Error;
pub use oracle::PriceData;
pub use types::{
    Config, DistributionRound, LeaderRank, MatrixPosition, MatrixSide, Package, Pool,
    PoolBalances, PoolKind, RankRequirements, RewardKind, Totals, UserInfo, WithdrawalReceipt,
    DEFAULT_DISTRIBUTION_PAGE, MAX_UPLINE_DEPTH, SCALE, STORAGE_VERSION, USD,
};

use admin::Admin;
use guard::Guard;
use matrix::Matrix;
use migration::Migration;
use pools::Pools;
use registration::Registration;
use storage::Storage;
use withdrawal::Withdrawal;

use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Symbol, Vec};

/// Default catalog seeded at initialization, in whole USD
const DEFAULT_PACKAGE_PRICES: [i128; 4] = [30, 50, 100, 200];

#[contract]
pub struct LeadFive;

#[contractimpl]
impl LeadFive {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the compensation engine
    ///
    /// Seeds the default config, the four default packages, empty pools and
    /// the current storage version.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        owner: Address,
        usdt: Address,
        native_token: Address,
        oracle: Address,
        treasury: Address,
    ) -> Result<(), Error> {
        if Storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        Storage::set_initialized(&env);
        Storage::set_owner(&env, &owner);
        Storage::set_usdt(&env, &usdt);
        Storage::set_native_token(&env, &native_token);
        Storage::set_oracle(&env, &oracle);
        Storage::set_treasury(&env, &treasury);
        Storage::set_config(&env, &Config::default());
        Storage::set_paused(&env, false);

        for (index, price) in DEFAULT_PACKAGE_PRICES.iter().enumerate() {
            Storage::set_package(&env, index as u32 + 1, &Package::standard(price * USD));
        }
        Storage::set_package_count(&env, DEFAULT_PACKAGE_PRICES.len() as u32);

        for kind in [PoolKind::Leader, PoolKind::Help, PoolKind::Club] {
            Storage::set_pool(&env, kind, &Pool::new(Pool::default_interval(kind)));
        }
        Storage::set_totals(&env, &Totals::default());
        Storage::set_storage_version(&env, STORAGE_VERSION);
        Storage::bump_instance(&env);

        Ok(())
    }

    /// Pause every state-changing user flow (emergency)
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an admin
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::set_paused(&env, &caller, true)
    }

    /// Resume user flows after a pause
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not an admin
    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::set_paused(&env, &caller, false)
    }

    /// Hand the owner role to `new_owner`; needs the current owner's signature
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::transfer_ownership(&env, &new_owner)
    }

    /// Grant the admin role (owner only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: `admin` is the owner, who is always an admin
    pub fn add_admin(env: Env, admin: Address) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::set_admin(&env, &admin, true)
    }

    /// Revoke the admin role (owner only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: `admin` is the owner
    pub fn remove_admin(env: Env, admin: Address) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::set_admin(&env, &admin, false)
    }

    /// Set where withdrawal fees are sent (owner only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn set_treasury_wallet(env: Env, wallet: Address) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::require_owner(&env)?;
        Storage::set_treasury(&env, &wallet);
        Ok(())
    }

    /// Point native-token pricing at another price feed
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not an admin
    pub fn set_oracle(env: Env, caller: Address, oracle: Address) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::require_admin(&env, &caller)?;
        Storage::set_oracle(&env, &oracle);
        Ok(())
    }

    /// Replace the business rules wholesale
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an admin
    /// - `InvalidConfig`: A field is out of range
    pub fn update_config(env: Env, caller: Address, config: Config) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::update_config(&env, &caller, &config)
    }

    /// Replace package `level` or append the next tier
    ///
    /// # Errors
    /// - `InvalidPackageLevel`: Level is neither existing nor the next one
    /// - `InvalidPackageConfig`: Bad price, over-allocated split, or price order broken
    pub fn set_package(
        env: Env,
        caller: Address,
        level: u32,
        package: Package,
    ) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::set_package(&env, &caller, level, &package)
    }

    /// Change how often `kind` may be distributed
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not an admin
    /// - `InvalidConfig`: Interval out of range
    pub fn set_pool_interval(
        env: Env,
        caller: Address,
        kind: PoolKind,
        seconds: u64,
    ) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::set_pool_interval(&env, &caller, kind, seconds)
    }

    /// Exclude `user` from rewards, withdrawals and sponsoring, or lift that
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not an admin
    /// - `UserNotRegistered`: `user` has no record
    pub fn blacklist(
        env: Env,
        caller: Address,
        user: Address,
        blacklisted: bool,
    ) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::set_blacklisted(&env, &caller, &user, blacklisted)
    }

    /// Recover `amount` of `token` held by the contract to the owner
    ///
    /// Owner only and only while paused. Recorded balances and pools are not
    /// adjusted.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractNotPaused`: Contract is running
    /// - `InvalidAmount`: Amount is not positive
    /// - `InsufficientBalance`: Contract holds less than `amount`
    pub fn emergency_withdraw(env: Env, token: Address, amount: i128) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::emergency_withdraw(&env, &token, amount)
    }

    /// Swap the contract code; storage is kept and migrated separately
    pub fn upgrade(env: Env, wasm_hash: BytesN<32>) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Admin::require_owner(&env)?;
        env.deployer().update_current_contract_wasm(wasm_hash);
        Ok(())
    }

    /// Bring stored records up to the current schema version
    ///
    /// # Errors
    /// - `AlreadyMigrated`: Storage is already at the current version
    pub fn migrate(env: Env) -> Result<u32, Error> {
        Guard::check_initialized(&env)?;
        Admin::require_owner(&env)?;
        Migration::migrate(&env)
    }

    // ============================================
    // REGISTRATION & PACKAGES
    // ============================================

    /// Register `user` under `sponsor` on package `package_level`
    ///
    /// Pays in USDT, or in the native token at the oracle price. Only the
    /// first registrant may omit the sponsor. Returns the new user id.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `MevProtection`: User already acted in this ledger
    /// - `AlreadyRegistered`: User already registered
    /// - `InvalidPackageLevel`: No such package
    /// - `InvalidSponsor`: Sponsor missing, unregistered or blacklisted
    /// - `InsufficientPayment`: Payer balance below the package price
    pub fn register(
        env: Env,
        user: Address,
        sponsor: Option<Address>,
        package_level: u32,
        pay_in_usdt: bool,
    ) -> Result<u32, Error> {
        Guard::check_initialized(&env)?;
        Guard::check_not_paused(&env)?;
        Guard::lock(&env)?;

        let id = Registration::register(&env, &user, sponsor, package_level, pay_in_usdt)?;

        Guard::unlock(&env);
        Storage::bump_instance(&env);
        Ok(id)
    }

    /// Register with a sponsor looked up by referral code
    pub fn register_with_code(
        env: Env,
        user: Address,
        code: Symbol,
        package_level: u32,
        pay_in_usdt: bool,
    ) -> Result<u32, Error> {
        Guard::check_initialized(&env)?;
        Guard::check_not_paused(&env)?;
        Guard::lock(&env)?;

        let id = Registration::register_with_code(&env, &user, &code, package_level, pay_in_usdt)?;

        Guard::unlock(&env);
        Storage::bump_instance(&env);
        Ok(id)
    }

    /// Upgrade to `new_level`, paying the price difference
    ///
    /// # Errors
    /// - `UserNotRegistered`: User not registered
    /// - `UserBlacklisted`: User is blacklisted
    /// - `InvalidPackageLevel`: Not a higher existing tier
    /// - `InsufficientPayment`: Payer balance below the difference
    pub fn upgrade_package(
        env: Env,
        user: Address,
        new_level: u32,
        pay_in_usdt: bool,
    ) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Guard::check_not_paused(&env)?;
        Guard::lock(&env)?;

        Registration::upgrade(&env, &user, new_level, pay_in_usdt)?;

        Guard::unlock(&env);
        Storage::bump_instance(&env);
        Ok(())
    }

    /// Claim `code` so others can register with `register_with_code`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `UserNotRegistered`: User not registered
    /// - `ReferralCodeTaken`: Another user holds `code`
    pub fn set_referral_code(env: Env, user: Address, code: Symbol) -> Result<(), Error> {
        Guard::check_initialized(&env)?;
        Registration::set_referral_code(&env, &user, &code)
    }

    // ============================================
    // WITHDRAWAL
    // ============================================

    /// Withdraw `amount` of earned balance
    ///
    /// Part of the amount is reinvested into the help pool depending on the
    /// user's direct referrals; the platform fee goes to the treasury wallet.
    ///
    /// # Errors
    /// - `UserBlacklisted`: User is blacklisted
    /// - `InvalidAmount`, `BelowMinimumWithdrawal`, `ExceedsMaximumWithdrawal`
    /// - `InsufficientBalance`: Amount above the user's balance
    /// - `WithdrawalLimitExceeded`: User or contract daily limit reached
    pub fn withdraw(env: Env, user: Address, amount: i128) -> Result<WithdrawalReceipt, Error> {
        Guard::check_initialized(&env)?;
        Guard::check_not_paused(&env)?;
        Guard::lock(&env)?;

        let receipt = Withdrawal::withdraw(&env, &user, amount)?;

        Guard::unlock(&env);
        Storage::bump_instance(&env);
        Ok(receipt)
    }

    // ============================================
    // POOL DISTRIBUTION
    // ============================================

    /// Advance the distribution of one pool by up to `max_users` users.
    ///
    /// Anyone may call it. A round opens once the pool's interval has elapsed
    /// and runs over as many calls as it needs; the interval restarts when it
    /// completes. Returns the amount allotted by this call.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `InvalidAmount`: `max_users` is zero
    /// - `DistributionNotDue`: No round open and the interval has not elapsed
    /// - `PoolEmpty`: No round open and nothing to distribute
    /// - `NoEligibleUsers`: Nobody qualifies
    pub fn distribute_pool(env: Env, kind: PoolKind, max_users: u32) -> Result<i128, Error> {
        Guard::check_initialized(&env)?;
        Guard::check_not_paused(&env)?;

        let allotted = Pools::distribute(&env, kind, max_users)?;
        Storage::bump_instance(&env);
        Ok(allotted)
    }

    /// `distribute_pool` on the leader pool with the default page size
    pub fn distribute_leader_pool(env: Env) -> Result<i128, Error> {
        Self::distribute_pool(env, PoolKind::Leader, DEFAULT_DISTRIBUTION_PAGE)
    }

    pub fn distribute_help_pool(env: Env) -> Result<i128, Error> {
        Self::distribute_pool(env, PoolKind::Help, DEFAULT_DISTRIBUTION_PAGE)
    }

    pub fn distribute_club_pool(env: Env) -> Result<i128, Error> {
        Self::distribute_pool(env, PoolKind::Club, DEFAULT_DISTRIBUTION_PAGE)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Unregistered accounts get `is_registered = false` and zeroed fields
    pub fn get_user_info(env: Env, user: Address) -> UserInfo {
        match Storage::get_user_by_address(&env, &user) {
            Ok(record) => UserInfo {
                is_registered: true,
                id: record.id,
                sponsor: record
                    .sponsor
                    .and_then(|id| Storage::get_user(&env, id).ok())
                    .map(|s| s.address),
                package_level: record.package_level,
                total_investment: record.total_investment,
                balance: record.balance,
                total_earnings: record.total_earnings,
                earnings_cap: record.earnings_cap,
                total_withdrawn: record.total_withdrawn,
                direct_referrals: record.direct_referrals,
                team_size: record.team_size,
                registration_time: record.registration_time,
                blacklisted: record.blacklisted,
            },
            Err(_) => UserInfo {
                is_registered: false,
                id: 0,
                sponsor: None,
                package_level: 0,
                total_investment: 0,
                balance: 0,
                total_earnings: 0,
                earnings_cap: 0,
                total_withdrawn: 0,
                direct_referrals: 0,
                team_size: 0,
                registration_time: 0,
                blacklisted: false,
            },
        }
    }

    /// Balances of all three pools
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn get_pool_balances(env: Env) -> Result<PoolBalances, Error> {
        Pools::balances(&env)
    }

    /// Balance and schedule of one pool
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn get_pool(env: Env, kind: PoolKind) -> Result<Pool, Error> {
        Storage::get_pool(&env, kind)
    }

    /// Progress of the open round for `kind`, if any
    pub fn get_distribution_round(env: Env, kind: PoolKind) -> Option<DistributionRound> {
        Storage::get_round(&env, kind)
    }

    /// Rank the user would draw from in the leader pool right now
    ///
    /// # Errors
    /// - `UserNotRegistered`: User not registered
    /// - `NotInitialized`: Contract not initialized
    pub fn get_leader_rank(env: Env, user: Address) -> Result<Option<LeaderRank>, Error> {
        let record = Storage::get_user_by_address(&env, &user)?;
        let config = Storage::get_config(&env)?;
        Ok(pools::leader_rank(&record, &config))
    }

    /// Team size and direct referrals needed for `rank`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn get_rank_requirements(env: Env, rank: LeaderRank) -> Result<RankRequirements, Error> {
        let config = Storage::get_config(&env)?;
        Ok(pools::rank_requirements(rank, &config))
    }

    /// Contract-wide counters
    pub fn get_totals(env: Env) -> Totals {
        Storage::get_totals(&env)
    }

    pub fn total_users(env: Env) -> u32 {
        Storage::get_totals(&env).total_users
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn get_config(env: Env) -> Result<Config, Error> {
        Storage::get_config(&env)
    }

    /// # Errors
    /// - `InvalidPackageLevel`: No such package
    pub fn get_package(env: Env, level: u32) -> Result<Package, Error> {
        Storage::get_package(&env, level)
    }

    /// Price of package `level` in USDT units
    ///
    /// # Errors
    /// - `InvalidPackageLevel`: No such package
    pub fn get_package_price(env: Env, level: u32) -> Result<i128, Error> {
        Ok(Storage::get_package(&env, level)?.price)
    }

    pub fn package_count(env: Env) -> u32 {
        Storage::package_count(&env)
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn owner(env: Env) -> Result<Address, Error> {
        Storage::get_owner(&env)
    }

    /// True for the owner and every granted admin
    pub fn is_admin(env: Env, account: Address) -> bool {
        Admin::is_admin(&env, &account)
    }

    pub fn is_paused(env: Env) -> bool {
        Storage::is_paused(&env)
    }

    /// False for unregistered accounts
    pub fn is_blacklisted(env: Env, user: Address) -> bool {
        Storage::get_user_by_address(&env, &user)
            .map(|u| u.blacklisted)
            .unwrap_or(false)
    }

    /// Withdrawable share in basis points for the user's referral tier
    ///
    /// # Errors
    /// - `UserNotRegistered`: User not registered
    pub fn withdrawal_rate(env: Env, user: Address) -> Result<u32, Error> {
        let record = Storage::get_user_by_address(&env, &user)?;
        Ok(withdrawal::rate_bps(record.direct_referrals))
    }

    /// Matrix neighbours and leg volumes of `user`
    ///
    /// # Errors
    /// - `UserNotRegistered`: User not registered
    pub fn get_matrix_position(env: Env, user: Address) -> Result<MatrixPosition, Error> {
        let record = Storage::get_user_by_address(&env, &user)?;
        let address_of = |id: Option<u32>| -> Result<Option<Address>, Error> {
            match id {
                Some(id) => Ok(Some(Storage::get_user(&env, id)?.address)),
                None => Ok(None),
            }
        };

        Ok(MatrixPosition {
            parent: address_of(record.matrix_parent)?,
            left: address_of(record.left_child)?,
            right: address_of(record.right_child)?,
            left_volume: record.left_volume,
            right_volume: record.right_volume,
        })
    }

    /// Sponsor chain, nearest first, at most `MAX_UPLINE_DEPTH` entries
    ///
    /// # Errors
    /// - `UserNotRegistered`: User not registered
    pub fn get_upline(env: Env, user: Address, depth: u32) -> Result<Vec<Address>, Error> {
        let record = Storage::get_user_by_address(&env, &user)?;
        let chain = Matrix::sponsor_chain(&env, &record, depth.min(MAX_UPLINE_DEPTH))?;

        let mut upline = Vec::new(&env);
        for ancestor in chain.iter() {
            upline.push_back(ancestor.address);
        }
        Ok(upline)
    }

    /// Native units currently needed to buy package `level`
    ///
    /// # Errors
    /// - `InvalidPackageLevel`: No such package
    /// - `OraclePriceUnavailable`, `OraclePriceOutOfBounds`, `OraclePriceStale`
    pub fn required_native_amount(env: Env, level: u32) -> Result<i128, Error> {
        let package = Storage::get_package(&env, level)?;
        oracle::required_native(&env, package.price)
    }

    /// Code currently held by `user`
    pub fn get_referral_code(env: Env, user: Address) -> Option<Symbol> {
        let id = Storage::user_id(&env, &user)?;
        Storage::code_of(&env, id)
    }

    /// Holder of `code`, if claimed
    pub fn resolve_referral_code(env: Env, code: Symbol) -> Option<Address> {
        let id = Storage::code_owner(&env, &code)?;
        Storage::get_user(&env, id).ok().map(|u| u.address)
    }

    /// Schema version of stored records
    pub fn storage_version(env: Env) -> u32 {
        Storage::get_storage_version(&env)
    }
}
