use crate::error::Error;
use crate::events::WithdrawalEvent;
use crate::guard::Guard;
use crate::pools::Pools;
use crate::storage::Storage;
use crate::types::{
    Config, DailyUsage, PoolKind, WithdrawalReceipt, BASIS_POINTS, SECONDS_PER_DAY,
};
use soroban_sdk::{log, token, Address, Env, Symbol};

/// Withdrawable share in basis points, by direct referral count
pub fn rate_bps(direct_referrals: u32) -> u32 {
    match direct_referrals {
        0..=4 => 7_000,
        5..=19 => 7_500,
        _ => 8_000,
    }
}

/// Split `amount` into net payout, platform fee and reinvested part.
/// `net + fee + reinvested == amount` always holds.
pub fn split_withdrawal(
    amount: i128,
    rate_bps: u32,
    fee_bps: u32,
) -> Result<WithdrawalReceipt, Error> {
    let withdrawable = amount
        .checked_mul(rate_bps as i128)
        .and_then(|v| v.checked_div(BASIS_POINTS))
        .ok_or(Error::MathOverflow)?;
    let reinvested = amount - withdrawable;
    let fee = withdrawable
        .checked_mul(fee_bps as i128)
        .and_then(|v| v.checked_div(BASIS_POINTS))
        .ok_or(Error::MathOverflow)?;
    let net = withdrawable - fee;

    Ok(WithdrawalReceipt {
        amount,
        net,
        fee,
        reinvested,
    })
}

/// Add `amount` to a day counter, resetting it when the day rolled over
pub fn consume_daily(
    usage: Option<DailyUsage>,
    day: u64,
    amount: i128,
    limit: i128,
) -> Result<DailyUsage, Error> {
    let spent = match usage {
        Some(usage) if usage.day == day => usage.amount,
        _ => 0,
    };
    let next = spent.checked_add(amount).ok_or(Error::MathOverflow)?;
    if next > limit {
        return Err(Error::WithdrawalLimitExceeded);
    }
    Ok(DailyUsage { day, amount: next })
}

fn check_bounds(config: &Config, amount: i128, balance: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    if amount < config.min_withdrawal {
        return Err(Error::BelowMinimumWithdrawal);
    }
    if amount > config.max_withdrawal {
        return Err(Error::ExceedsMaximumWithdrawal);
    }
    if amount > balance {
        return Err(Error::InsufficientBalance);
    }
    Ok(())
}

pub struct Withdrawal;

impl Withdrawal {
    pub fn withdraw(env: &Env, account: &Address, amount: i128) -> Result<WithdrawalReceipt, Error> {
        account.require_auth();
        Guard::anti_mev(env, account)?;

        let mut user = Storage::get_user_by_address(env, account)?;
        if user.blacklisted {
            return Err(Error::UserBlacklisted);
        }

        let config = Storage::get_config(env)?;
        check_bounds(&config, amount, user.balance)?;

        let day = env.ledger().timestamp() / SECONDS_PER_DAY;
        let user_usage = consume_daily(
            Storage::get_user_daily(env, user.id),
            day,
            amount,
            config.user_daily_limit,
        )?;
        let global_usage = consume_daily(
            Storage::get_global_daily(env),
            day,
            amount,
            config.global_daily_limit,
        )?;

        let receipt = split_withdrawal(
            amount,
            rate_bps(user.direct_referrals),
            config.platform_fee_bps,
        )?;

        // Effects
        user.balance -= amount;
        user.total_withdrawn = user
            .total_withdrawn
            .checked_add(receipt.net)
            .ok_or(Error::MathOverflow)?;
        Storage::set_user(env, &user);
        Storage::set_user_daily(env, user.id, &user_usage);
        Storage::set_global_daily(env, &global_usage);

        Pools::fund(env, PoolKind::Help, receipt.reinvested)?;

        let mut totals = Storage::get_totals(env);
        totals.total_withdrawn = totals
            .total_withdrawn
            .checked_add(receipt.net)
            .ok_or(Error::MathOverflow)?;
        totals.total_platform_fees = totals
            .total_platform_fees
            .checked_add(receipt.fee)
            .ok_or(Error::MathOverflow)?;
        totals.total_reinvested = totals
            .total_reinvested
            .checked_add(receipt.reinvested)
            .ok_or(Error::MathOverflow)?;
        Storage::set_totals(env, &totals);

        // Interactions
        let usdt = token::Client::new(env, &Storage::get_usdt(env)?);
        let contract = env.current_contract_address();
        if receipt.net > 0 {
            usdt.transfer(&contract, account, &receipt.net);
        }
        if receipt.fee > 0 {
            usdt.transfer(&contract, &Storage::get_treasury(env)?, &receipt.fee);
        }

        log!(env, "withdrawal", user.id, amount, receipt.net);

        env.events().publish(
            (Symbol::new(env, "withdrawal"), account.clone()),
            WithdrawalEvent {
                user: account.clone(),
                amount,
                net: receipt.net,
                fee: receipt.fee,
                reinvested: receipt.reinvested,
            },
        );

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::USD;

    #[test]
    fn test_rate_tiers() {
        assert_eq!(rate_bps(0), 7_000);
        assert_eq!(rate_bps(4), 7_000);
        assert_eq!(rate_bps(5), 7_500);
        assert_eq!(rate_bps(19), 7_500);
        assert_eq!(rate_bps(20), 8_000);
        assert_eq!(rate_bps(1_000), 8_000);
    }

    #[test]
    fn test_ten_dollars_at_75_percent() {
        let receipt = split_withdrawal(10 * USD, 7_500, 500).unwrap();

        assert_eq!(receipt.net, 71_250_000); // $10 × 0.75 × 0.95
        assert_eq!(receipt.fee, 3_750_000);
        assert_eq!(receipt.reinvested, 25_000_000);
    }

    #[test]
    fn test_split_identity_with_rounding() {
        let amount = 12_345_679i128;
        let receipt = split_withdrawal(amount, 7_000, 500).unwrap();

        assert_eq!(receipt.net + receipt.fee + receipt.reinvested, amount);
        assert!(receipt.net + receipt.reinvested <= amount);
    }

    #[test]
    fn test_daily_counter_accumulates_and_resets() {
        let first = consume_daily(None, 10, 600 * USD, 1_000 * USD).unwrap();
        assert_eq!(first.amount, 600 * USD);

        assert_eq!(
            consume_daily(Some(first.clone()), 10, 500 * USD, 1_000 * USD),
            Err(Error::WithdrawalLimitExceeded)
        );

        let same_day = consume_daily(Some(first.clone()), 10, 400 * USD, 1_000 * USD).unwrap();
        assert_eq!(same_day.amount, 1_000 * USD);

        let next_day = consume_daily(Some(same_day), 11, 900 * USD, 1_000 * USD).unwrap();
        assert_eq!(next_day, DailyUsage { day: 11, amount: 900 * USD });
    }

    #[test]
    fn test_bounds() {
        let config = Config::default();

        assert_eq!(check_bounds(&config, 0, 100 * USD), Err(Error::InvalidAmount));
        assert_eq!(
            check_bounds(&config, USD - 1, 100 * USD),
            Err(Error::BelowMinimumWithdrawal)
        );
        assert_eq!(
            check_bounds(&config, 50_001 * USD, 100_000 * USD),
            Err(Error::ExceedsMaximumWithdrawal)
        );
        assert_eq!(
            check_bounds(&config, 101 * USD, 100 * USD),
            Err(Error::InsufficientBalance)
        );
        assert_eq!(check_bounds(&config, 100 * USD, 100 * USD), Ok(()));
    }
}
