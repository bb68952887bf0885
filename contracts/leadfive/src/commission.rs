use crate::error::Error;
use crate::events::{EarningsCapReachedEvent, RewardCreditedEvent};
use crate::matrix::Matrix;
use crate::pools::Pools;
use crate::storage::Storage;
use crate::types::{
    Config, Package, PoolKind, RewardKind, User, BASIS_POINTS, LEVEL_LADDER, PER_MILLE,
};
use soroban_sdk::{Env, Symbol};

/// One payment broken into its basis-point buckets
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PaymentSplit {
    pub direct: i128,
    pub level: i128,
    pub upline: i128,
    pub leader: i128,
    pub help: i128,
    pub club: i128,
    /// Unallocated basis points plus bucket rounding
    pub reserve: i128,
}

/// What a single payment ended up doing
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Payout {
    pub credited: i128,
    pub forfeited: i128,
    /// Shares with no eligible recipient, routed to the help pool
    pub help_fallback: i128,
    pub reserve: i128,
}

fn bps_of(amount: i128, bps: u32) -> Result<i128, Error> {
    amount
        .checked_mul(bps as i128)
        .and_then(|v| v.checked_div(BASIS_POINTS))
        .ok_or(Error::MathOverflow)
}

/// Split `amount` by the package's basis-point table.
///
/// The buckets plus `reserve` always add back to `amount`.
pub fn split_payment(amount: i128, package: &Package) -> Result<PaymentSplit, Error> {
    let direct = bps_of(amount, package.direct_bonus_bps)?;
    let level = bps_of(amount, package.level_bonus_bps)?;
    let upline = bps_of(amount, package.upline_bonus_bps)?;
    let leader = bps_of(amount, package.leader_bonus_bps)?;
    let help = bps_of(amount, package.help_bonus_bps)?;
    let club = bps_of(amount, package.club_bonus_bps)?;

    let allocated = [direct, level, upline, leader, help, club]
        .iter()
        .try_fold(0i128, |acc, v| acc.checked_add(*v))
        .ok_or(Error::MathOverflow)?;
    let reserve = amount.checked_sub(allocated).ok_or(Error::MathOverflow)?;

    Ok(PaymentSplit {
        direct,
        level,
        upline,
        leader,
        help,
        club,
        reserve,
    })
}

/// Share of the level bonus owed to generation `index` (0 = sponsor)
pub fn level_share(level_amount: i128, index: usize) -> Result<i128, Error> {
    let rate = LEVEL_LADDER.get(index).copied().unwrap_or(0);
    level_amount
        .checked_mul(rate)
        .and_then(|v| v.checked_div(PER_MILLE))
        .ok_or(Error::MathOverflow)
}

/// Equal per-generation upline share and the dust left after `depth` of them
pub fn upline_split(upline_amount: i128, depth: u32) -> Result<(i128, i128), Error> {
    let per_upline = upline_amount
        .checked_div(depth as i128)
        .ok_or(Error::MathOverflow)?;
    let dust = per_upline
        .checked_mul(depth as i128)
        .and_then(|paid| upline_amount.checked_sub(paid))
        .ok_or(Error::MathOverflow)?;
    Ok((per_upline, dust))
}

pub struct Commission;

impl Commission {
    /// Credit `amount` to user `id`, clipped to their remaining cap room.
    /// Whatever does not fit is forfeited, never passed on.
    pub fn credit(
        env: &Env,
        id: u32,
        amount: i128,
        kind: RewardKind,
        payout: &mut Payout,
    ) -> Result<i128, Error> {
        if amount <= 0 {
            return Ok(0);
        }
        let mut user = Storage::get_user(env, id)?;
        Self::credit_user(env, &mut user, amount, kind, payout)
    }

    /// Same as `credit` for a record the caller already loaded; saves it
    pub fn credit_user(
        env: &Env,
        user: &mut User,
        amount: i128,
        kind: RewardKind,
        payout: &mut Payout,
    ) -> Result<i128, Error> {
        if amount <= 0 {
            return Ok(0);
        }

        let credited = amount.min(user.cap_room());
        let forfeited = amount - credited;

        if credited > 0 {
            user.balance = user.balance.checked_add(credited).ok_or(Error::MathOverflow)?;
            user.total_earnings = user
                .total_earnings
                .checked_add(credited)
                .ok_or(Error::MathOverflow)?;
            Storage::set_user(env, user);

            env.events().publish(
                (Symbol::new(env, "reward_credited"), user.address.clone()),
                RewardCreditedEvent {
                    user: user.address.clone(),
                    amount: credited,
                    kind,
                },
            );
        }

        if forfeited > 0 {
            env.events().publish(
                (Symbol::new(env, "earnings_cap_reached"), user.address.clone()),
                EarningsCapReachedEvent {
                    user: user.address.clone(),
                    forfeited,
                },
            );
        }

        payout.credited = payout
            .credited
            .checked_add(credited)
            .ok_or(Error::MathOverflow)?;
        payout.forfeited = payout
            .forfeited
            .checked_add(forfeited)
            .ok_or(Error::MathOverflow)?;
        Ok(credited)
    }

    /// Pay out one registration or upgrade payment made by `payer`.
    ///
    /// Direct bonus goes to the sponsor, level bonus down the 10-step ladder,
    /// upline bonus evenly over `upline_depth` generations, pool shares accrue.
    /// Shares with no eligible recipient fall back to the help pool.
    pub fn distribute_payment(
        env: &Env,
        payer: &User,
        amount: i128,
        package: &Package,
        package_level: u32,
        config: &Config,
    ) -> Result<Payout, Error> {
        let split = split_payment(amount, package)?;
        let depth = config.upline_depth.max(LEVEL_LADDER.len() as u32);
        let chain = Matrix::sponsor_chain(env, payer, depth)?;

        let mut payout = Payout {
            reserve: split.reserve,
            ..Payout::default()
        };
        let mut fallback: i128 = 0;

        // Direct
        match chain.get(0) {
            Some(sponsor) if !sponsor.blacklisted => {
                Self::credit(env, sponsor.id, split.direct, RewardKind::Direct, &mut payout)?;
            }
            _ => fallback = fallback.checked_add(split.direct).ok_or(Error::MathOverflow)?,
        }

        // Level ladder
        let mut level_paid: i128 = 0;
        for index in 0..LEVEL_LADDER.len() {
            let share = level_share(split.level, index)?;
            level_paid = level_paid.checked_add(share).ok_or(Error::MathOverflow)?;

            match chain.get(index as u32) {
                Some(ancestor) if !ancestor.blacklisted && ancestor.package_level >= package_level => {
                    Self::credit(env, ancestor.id, share, RewardKind::Level, &mut payout)?;
                }
                _ => fallback = fallback.checked_add(share).ok_or(Error::MathOverflow)?,
            }
        }
        fallback = split
            .level
            .checked_sub(level_paid)
            .and_then(|dust| fallback.checked_add(dust))
            .ok_or(Error::MathOverflow)?;

        // Upline, equal shares
        let (per_upline, upline_dust) = upline_split(split.upline, config.upline_depth)?;
        for index in 0..config.upline_depth {
            match chain.get(index) {
                Some(ancestor) if !ancestor.blacklisted => {
                    Self::credit(env, ancestor.id, per_upline, RewardKind::Upline, &mut payout)?;
                }
                _ => fallback = fallback.checked_add(per_upline).ok_or(Error::MathOverflow)?,
            }
        }
        fallback = fallback
            .checked_add(upline_dust)
            .ok_or(Error::MathOverflow)?;

        // Pools
        Pools::fund(env, PoolKind::Leader, split.leader)?;
        Pools::fund(
            env,
            PoolKind::Help,
            split.help.checked_add(fallback).ok_or(Error::MathOverflow)?,
        )?;
        Pools::fund(env, PoolKind::Club, split.club)?;

        payout.help_fallback = fallback;
        Ok(payout)
    }
}
