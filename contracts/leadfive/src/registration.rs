use crate::commission::{Commission, Payout};
use crate::error::Error;
use crate::events::{PackageUpgradedEvent, ReferralCodeSetEvent, UserRegisteredEvent};
use crate::guard::Guard;
use crate::matrix::Matrix;
use crate::oracle;
use crate::storage::Storage;
use crate::types::{Config, Totals, User};
use soroban_sdk::{log, token, Address, Env, Symbol};

/// Pull `usd_amount` from `payer` in USDT, or its oracle-priced equivalent
/// in the native token. The balance is checked first so a short payer gets
/// `InsufficientPayment` rather than a token-side failure.
pub fn collect_payment(
    env: &Env,
    payer: &Address,
    usd_amount: i128,
    pay_in_usdt: bool,
) -> Result<i128, Error> {
    let (asset, due) = if pay_in_usdt {
        (Storage::get_usdt(env)?, usd_amount)
    } else {
        (
            Storage::get_native_token(env)?,
            oracle::required_native(env, usd_amount)?,
        )
    };

    let client = token::Client::new(env, &asset);
    if client.balance(payer) < due {
        return Err(Error::InsufficientPayment);
    }
    client.transfer(payer, &env.current_contract_address(), &due);
    Ok(due)
}

/// Fold one payment's outcome into the contract-wide totals
fn record_payment(totals: &mut Totals, amount: i128, payout: &Payout) -> Result<(), Error> {
    totals.total_invested = totals
        .total_invested
        .checked_add(amount)
        .ok_or(Error::MathOverflow)?;
    totals.total_credited = totals
        .total_credited
        .checked_add(payout.credited)
        .ok_or(Error::MathOverflow)?;
    totals.total_forfeited = totals
        .total_forfeited
        .checked_add(payout.forfeited)
        .ok_or(Error::MathOverflow)?;
    totals.platform_reserve = totals
        .platform_reserve
        .checked_add(payout.reserve)
        .ok_or(Error::MathOverflow)?;
    Ok(())
}

fn cap_for(amount: i128, config: &Config) -> Result<i128, Error> {
    amount
        .checked_mul(config.cap_multiplier as i128)
        .ok_or(Error::MathOverflow)
}

pub struct Registration;

impl Registration {
    /// Resolve the sponsor id. Only the very first registrant may come in
    /// without one.
    fn resolve_sponsor(
        env: &Env,
        sponsor: &Option<Address>,
        total_users: u32,
    ) -> Result<Option<User>, Error> {
        match sponsor {
            None if total_users == 0 => Ok(None),
            None => Err(Error::InvalidSponsor),
            Some(address) => {
                let sponsor = Storage::get_user_by_address(env, address)
                    .map_err(|_| Error::InvalidSponsor)?;
                if sponsor.blacklisted {
                    return Err(Error::InvalidSponsor);
                }
                Ok(Some(sponsor))
            }
        }
    }

    pub fn register(
        env: &Env,
        account: &Address,
        sponsor: Option<Address>,
        package_level: u32,
        pay_in_usdt: bool,
    ) -> Result<u32, Error> {
        account.require_auth();
        Guard::anti_mev(env, account)?;

        if Storage::user_id(env, account).is_some() {
            return Err(Error::AlreadyRegistered);
        }

        let package = Storage::get_package(env, package_level)?;
        let config = Storage::get_config(env)?;
        let mut totals = Storage::get_totals(env);

        let sponsor_user = Self::resolve_sponsor(env, &sponsor, totals.total_users)?;

        collect_payment(env, account, package.price, pay_in_usdt)?;

        let id = totals
            .total_users
            .checked_add(1)
            .ok_or(Error::MathOverflow)?;
        let mut user = User {
            id,
            address: account.clone(),
            sponsor: sponsor_user.as_ref().map(|s| s.id),
            package_level,
            total_investment: package.price,
            balance: 0,
            total_earnings: 0,
            earnings_cap: cap_for(package.price, &config)?,
            total_withdrawn: 0,
            direct_referrals: 0,
            team_size: 0,
            matrix_parent: None,
            left_child: None,
            right_child: None,
            left_volume: 0,
            right_volume: 0,
            registration_time: env.ledger().timestamp(),
            blacklisted: false,
        };
        Storage::set_user_id(env, account, id);

        if let Some(mut sponsor) = sponsor_user {
            sponsor.direct_referrals = sponsor
                .direct_referrals
                .checked_add(1)
                .ok_or(Error::MathOverflow)?;
            Storage::set_user(env, &sponsor);

            Matrix::place(env, &mut user, sponsor.id)?;
            Storage::set_user(env, &user);

            Matrix::add_volume(env, &user, package.price, config.upline_depth)?;
            Matrix::grow_team(env, &user, config.upline_depth)?;
        } else {
            Storage::set_user(env, &user);
        }

        totals.total_users = id;
        let payout =
            Commission::distribute_payment(env, &user, package.price, &package, package_level, &config)?;
        record_payment(&mut totals, package.price, &payout)?;
        Storage::set_totals(env, &totals);

        log!(env, "registered", id, package_level, payout.credited);

        env.events().publish(
            (Symbol::new(env, "user_registered"), account.clone()),
            UserRegisteredEvent {
                user: account.clone(),
                id,
                sponsor,
                package_level,
                amount: package.price,
                paid_in_usdt: pay_in_usdt,
            },
        );

        Ok(id)
    }

    pub fn register_with_code(
        env: &Env,
        account: &Address,
        code: &Symbol,
        package_level: u32,
        pay_in_usdt: bool,
    ) -> Result<u32, Error> {
        let sponsor_id = Storage::code_owner(env, code).ok_or(Error::ReferralCodeNotFound)?;
        let sponsor = Storage::get_user(env, sponsor_id)?;
        Self::register(env, account, Some(sponsor.address), package_level, pay_in_usdt)
    }

    /// Move to a higher tier, paying only the price difference. Commission on
    /// the difference follows the new tier's split; matrix position is kept.
    pub fn upgrade(
        env: &Env,
        account: &Address,
        new_level: u32,
        pay_in_usdt: bool,
    ) -> Result<(), Error> {
        account.require_auth();
        Guard::anti_mev(env, account)?;

        let mut user = Storage::get_user_by_address(env, account)?;
        if user.blacklisted {
            return Err(Error::UserBlacklisted);
        }
        if new_level <= user.package_level {
            return Err(Error::InvalidPackageLevel);
        }

        let current = Storage::get_package(env, user.package_level)?;
        let target = Storage::get_package(env, new_level)?;
        let delta = target
            .price
            .checked_sub(current.price)
            .ok_or(Error::MathOverflow)?;
        if delta <= 0 {
            return Err(Error::InvalidPackageConfig);
        }

        let config = Storage::get_config(env)?;
        collect_payment(env, account, delta, pay_in_usdt)?;

        let old_level = user.package_level;
        user.package_level = new_level;
        user.total_investment = user
            .total_investment
            .checked_add(delta)
            .ok_or(Error::MathOverflow)?;
        user.earnings_cap = user
            .earnings_cap
            .checked_add(cap_for(delta, &config)?)
            .ok_or(Error::MathOverflow)?;
        Storage::set_user(env, &user);

        Matrix::add_volume(env, &user, delta, config.upline_depth)?;

        let payout = Commission::distribute_payment(env, &user, delta, &target, new_level, &config)?;
        let mut totals = Storage::get_totals(env);
        record_payment(&mut totals, delta, &payout)?;
        Storage::set_totals(env, &totals);

        env.events().publish(
            (Symbol::new(env, "package_upgraded"), account.clone()),
            PackageUpgradedEvent {
                user: account.clone(),
                old_level,
                new_level,
                amount: delta,
            },
        );

        Ok(())
    }

    /// Claim `code` for a registered user, replacing any code they held
    pub fn set_referral_code(env: &Env, account: &Address, code: &Symbol) -> Result<(), Error> {
        account.require_auth();

        let user = Storage::get_user_by_address(env, account)?;
        match Storage::code_owner(env, code) {
            Some(owner) if owner != user.id => return Err(Error::ReferralCodeTaken),
            _ => {}
        }
        Storage::set_code(env, user.id, code);

        env.events().publish(
            (Symbol::new(env, "referral_code_set"), account.clone()),
            ReferralCodeSetEvent {
                user: account.clone(),
                code: code.clone(),
            },
        );
        Ok(())
    }
}
