use crate::error::Error;
use crate::storage::Storage;
use soroban_sdk::{Address, Env};

/// Entry-point checks shared by every state-changing flow
pub struct Guard;

impl Guard {
    pub fn check_initialized(env: &Env) -> Result<(), Error> {
        if !Storage::is_initialized(env) {
            return Err(Error::NotInitialized);
        }
        Ok(())
    }

    pub fn check_not_paused(env: &Env) -> Result<(), Error> {
        if Storage::is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    /// Take the reentrancy lock. A failed invocation rolls the flag back with
    /// the rest of its writes, so only the success path needs `unlock`.
    pub fn lock(env: &Env) -> Result<(), Error> {
        if Storage::is_locked(env) {
            return Err(Error::Reentrancy);
        }
        Storage::set_locked(env, true);
        Ok(())
    }

    pub fn unlock(env: &Env) {
        Storage::set_locked(env, false);
    }

    /// One state-changing call per account per ledger
    pub fn anti_mev(env: &Env, account: &Address) -> Result<(), Error> {
        let sequence = env.ledger().sequence();
        if Storage::last_tx_ledger(env, account) == Some(sequence) {
            return Err(Error::MevProtection);
        }
        Storage::set_last_tx_ledger(env, account, sequence);
        Ok(())
    }
}
