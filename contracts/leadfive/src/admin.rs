use crate::error::Error;
use crate::events::{
    AdminChangedEvent, BlacklistedEvent, ConfigUpdatedEvent, EmergencyWithdrawalEvent,
    OwnershipTransferredEvent, PackageUpdatedEvent, PausedEvent,
};
use crate::storage::Storage;
use crate::types::{Config, Package, PoolKind};
use crate::validation::Validator;
use soroban_sdk::{log, token, Address, Env, Symbol};

pub struct Admin;

impl Admin {
    /// Load the owner and require its signature
    pub fn require_owner(env: &Env) -> Result<Address, Error> {
        let owner = Storage::get_owner(env)?;
        owner.require_auth();
        Ok(owner)
    }

    /// The owner is implicitly an admin
    pub fn is_admin(env: &Env, account: &Address) -> bool {
        match Storage::get_owner(env) {
            Ok(owner) if owner == *account => true,
            _ => Storage::has_admin_flag(env, account),
        }
    }

    pub fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        if !Self::is_admin(env, caller) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    pub fn transfer_ownership(env: &Env, new_owner: &Address) -> Result<(), Error> {
        let previous_owner = Self::require_owner(env)?;
        Storage::set_owner(env, new_owner);

        env.events().publish(
            (Symbol::new(env, "ownership_transferred"),),
            OwnershipTransferredEvent {
                previous_owner,
                new_owner: new_owner.clone(),
            },
        );
        Ok(())
    }

    pub fn set_admin(env: &Env, admin: &Address, enabled: bool) -> Result<(), Error> {
        let owner = Self::require_owner(env)?;
        if *admin == owner {
            return Err(Error::Unauthorized);
        }
        Storage::set_admin_flag(env, admin, enabled);

        env.events().publish(
            (Symbol::new(env, "admin_changed"), admin.clone()),
            AdminChangedEvent {
                admin: admin.clone(),
                enabled,
            },
        );
        Ok(())
    }

    pub fn set_paused(env: &Env, caller: &Address, paused: bool) -> Result<(), Error> {
        Self::require_admin(env, caller)?;
        Storage::set_paused(env, paused);

        env.events().publish(
            (Symbol::new(env, "paused"),),
            PausedEvent {
                by: caller.clone(),
                paused,
            },
        );
        Ok(())
    }

    pub fn update_config(env: &Env, caller: &Address, config: &Config) -> Result<(), Error> {
        Self::require_admin(env, caller)?;
        Validator::validate_config(config)?;
        Storage::set_config(env, config);

        env.events().publish(
            (Symbol::new(env, "config_updated"),),
            ConfigUpdatedEvent { by: caller.clone() },
        );
        Ok(())
    }

    /// Replace an existing tier or append the next one
    pub fn set_package(
        env: &Env,
        caller: &Address,
        level: u32,
        package: &Package,
    ) -> Result<(), Error> {
        Self::require_admin(env, caller)?;

        let count = Storage::package_count(env);
        if level == 0 || level > count + 1 {
            return Err(Error::InvalidPackageLevel);
        }

        Validator::validate_package(package)?;

        let lower = if level > 1 {
            Some(Storage::get_package(env, level - 1)?)
        } else {
            None
        };
        let higher = if level < count {
            Some(Storage::get_package(env, level + 1)?)
        } else {
            None
        };
        Validator::validate_package_order(package, lower.as_ref(), higher.as_ref())?;

        Storage::set_package(env, level, package);
        if level > count {
            Storage::set_package_count(env, level);
        }

        env.events().publish(
            (Symbol::new(env, "package_updated"), level),
            PackageUpdatedEvent {
                level,
                price: package.price,
            },
        );
        Ok(())
    }

    pub fn set_pool_interval(
        env: &Env,
        caller: &Address,
        kind: PoolKind,
        seconds: u64,
    ) -> Result<(), Error> {
        Self::require_admin(env, caller)?;
        Validator::validate_interval(seconds)?;

        let mut pool = Storage::get_pool(env, kind)?;
        pool.interval = seconds;
        Storage::set_pool(env, kind, &pool);
        Ok(())
    }

    pub fn set_blacklisted(
        env: &Env,
        caller: &Address,
        account: &Address,
        blacklisted: bool,
    ) -> Result<(), Error> {
        Self::require_admin(env, caller)?;

        let mut user = Storage::get_user_by_address(env, account)?;
        user.blacklisted = blacklisted;
        Storage::set_user(env, &user);

        env.events().publish(
            (Symbol::new(env, "blacklisted"), account.clone()),
            BlacklistedEvent {
                user: account.clone(),
                blacklisted,
            },
        );
        Ok(())
    }

    /// Move `amount` of any token held by the contract to the owner.
    /// Only while paused; internal balances and pools are left untouched.
    pub fn emergency_withdraw(env: &Env, token: &Address, amount: i128) -> Result<(), Error> {
        let owner = Self::require_owner(env)?;
        if !Storage::is_paused(env) {
            return Err(Error::ContractNotPaused);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let client = token::Client::new(env, token);
        let contract = env.current_contract_address();
        if client.balance(&contract) < amount {
            return Err(Error::InsufficientBalance);
        }
        client.transfer(&contract, &owner, &amount);

        log!(env, "emergency withdrawal", amount);
        env.events().publish(
            (Symbol::new(env, "emergency_withdrawal"), token.clone()),
            EmergencyWithdrawalEvent {
                token: token.clone(),
                to: owner,
                amount,
            },
        );
        Ok(())
    }
}
