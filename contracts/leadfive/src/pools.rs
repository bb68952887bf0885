use crate::commission::{Commission, Payout};
use crate::error::Error;
use crate::events::{PoolDistributedEvent, PoolFundedEvent};
use crate::storage::Storage;
use crate::types::{
    Config, DistributionRound, LeaderRank, Pool, PoolBalances, PoolKind, RankRequirements,
    RewardKind, User,
};
use soroban_sdk::{log, Env, Symbol};

/// Silver Star outranks Shining Star; a user holds at most one rank
pub fn leader_rank(user: &User, config: &Config) -> Option<LeaderRank> {
    if user.team_size >= config.silver_star_team {
        Some(LeaderRank::SilverStar)
    } else if user.team_size >= config.shining_star_team
        && user.direct_referrals >= config.shining_star_directs
    {
        Some(LeaderRank::ShiningStar)
    } else {
        None
    }
}

pub fn rank_requirements(rank: LeaderRank, config: &Config) -> RankRequirements {
    match rank {
        LeaderRank::ShiningStar => RankRequirements {
            team_size: config.shining_star_team,
            direct_referrals: config.shining_star_directs,
        },
        LeaderRank::SilverStar => RankRequirements {
            team_size: config.silver_star_team,
            direct_referrals: 0,
        },
    }
}

/// Blacklisted and capped-out users never take part in a distribution
pub fn is_active(user: &User) -> bool {
    !user.blacklisted && !user.is_capped_out()
}

pub fn is_club_member(user: &User, config: &Config) -> bool {
    user.package_level >= config.club_min_package
        && user.direct_referrals >= config.club_min_directs
}

pub fn is_due(pool: &Pool, now: u64) -> bool {
    pool.distributions == 0 || now >= pool.last_distribution.saturating_add(pool.interval)
}

/// Equal share of `amount` for `recipients`; zero when nobody is eligible
pub fn equal_share(amount: i128, recipients: u32) -> i128 {
    if recipients == 0 {
        return 0;
    }
    amount / recipients as i128
}

/// Which share of a pool a user draws from
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot {
    /// Help, Club, or the Shining Star half of the leader pool
    Main,
    /// Silver Star half of the leader pool
    Silver,
}

pub fn slot(kind: PoolKind, user: &User, config: &Config) -> Option<Slot> {
    if !is_active(user) {
        return None;
    }
    match kind {
        PoolKind::Help => Some(Slot::Main),
        PoolKind::Club => is_club_member(user, config).then_some(Slot::Main),
        PoolKind::Leader => match leader_rank(user, config)? {
            LeaderRank::ShiningStar => Some(Slot::Main),
            LeaderRank::SilverStar => Some(Slot::Silver),
        },
    }
}

/// Fix the per-user shares once counting is over
fn fix_shares(round: &mut DistributionRound, kind: PoolKind, balance: i128) {
    match kind {
        PoolKind::Leader => {
            let shining_half = balance / 2;
            round.share = equal_share(shining_half, round.eligible);
            round.silver_share = equal_share(balance - shining_half, round.silver_eligible);
        }
        PoolKind::Help | PoolKind::Club => {
            round.share = equal_share(balance, round.eligible);
        }
    }
    round.paying = true;
    round.cursor = if round.share > 0 || round.silver_share > 0 {
        1
    } else {
        round.last_id.saturating_add(1)
    };
}

pub struct Pools;

impl Pools {
    pub fn fund(env: &Env, kind: PoolKind, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Ok(());
        }

        let mut pool = Storage::get_pool(env, kind)?;
        pool.balance = pool.balance.checked_add(amount).ok_or(Error::MathOverflow)?;
        Storage::set_pool(env, kind, &pool);

        env.events().publish(
            (Symbol::new(env, "pool_funded"), kind),
            PoolFundedEvent {
                kind,
                amount,
                balance: pool.balance,
            },
        );
        Ok(())
    }

    pub fn balances(env: &Env) -> Result<PoolBalances, Error> {
        Ok(PoolBalances {
            leader: Storage::get_pool(env, PoolKind::Leader)?.balance,
            help: Storage::get_pool(env, PoolKind::Help)?.balance,
            club: Storage::get_pool(env, PoolKind::Club)?.balance,
        })
    }

    /// Time-gated fan-out of one pool, visiting at most `max_users` users per call.
    ///
    /// A round first counts eligible users over ids `1..=total_users` as of its
    /// opening, then fixes equal shares and pays them on a second walk. Both walks
    /// may span any number of calls; the schedule only advances when the round
    /// completes. Returns the amount taken out of the pool by this call.
    ///
    /// Only `share × recipients` leaves the pool; division dust carries over.
    pub fn distribute(env: &Env, kind: PoolKind, max_users: u32) -> Result<i128, Error> {
        if max_users == 0 {
            return Err(Error::InvalidAmount);
        }

        let mut pool = Storage::get_pool(env, kind)?;
        let (mut round, opened_now) = match Storage::get_round(env, kind) {
            Some(round) => (round, false),
            None => {
                let now = env.ledger().timestamp();
                if !is_due(&pool, now) {
                    return Err(Error::DistributionNotDue);
                }
                if pool.balance <= 0 {
                    return Err(Error::PoolEmpty);
                }
                let last_id = Storage::get_totals(env).total_users;
                (DistributionRound::open(now, last_id), true)
            }
        };

        let config = Storage::get_config(env)?;
        let reward = RewardKind::for_pool(kind);
        let mut payout = Payout::default();
        let mut allotted: i128 = 0;
        let mut steps = max_users;

        loop {
            if round.is_walked() {
                if round.paying {
                    break;
                }
                if round.eligible == 0 && round.silver_eligible == 0 {
                    if opened_now {
                        return Err(Error::NoEligibleUsers);
                    }
                    // Everyone counted earlier dropped out; close without advancing the schedule
                    Storage::remove_round(env, kind);
                    log!(env, "distribution round closed empty", kind);
                    return Ok(0);
                }
                fix_shares(&mut round, kind, pool.balance);
                continue;
            }
            if steps == 0 {
                break;
            }

            let mut user = Storage::get_user(env, round.cursor)?;
            match (round.paying, slot(kind, &user, &config)) {
                (false, Some(Slot::Main)) => round.eligible += 1,
                (false, Some(Slot::Silver)) => round.silver_eligible += 1,
                (true, Some(Slot::Main)) if round.paid < round.eligible && round.share > 0 => {
                    Commission::credit_user(env, &mut user, round.share, reward, &mut payout)?;
                    round.paid += 1;
                    allotted = allotted.checked_add(round.share).ok_or(Error::MathOverflow)?;
                }
                (true, Some(Slot::Silver))
                    if round.silver_paid < round.silver_eligible && round.silver_share > 0 =>
                {
                    Commission::credit_user(
                        env,
                        &mut user,
                        round.silver_share,
                        reward,
                        &mut payout,
                    )?;
                    round.silver_paid += 1;
                    allotted = allotted
                        .checked_add(round.silver_share)
                        .ok_or(Error::MathOverflow)?;
                }
                _ => {}
            }
            round.cursor += 1;
            steps -= 1;
        }

        pool.balance = pool
            .balance
            .checked_sub(allotted)
            .ok_or(Error::MathOverflow)?;
        round.allotted = round
            .allotted
            .checked_add(allotted)
            .ok_or(Error::MathOverflow)?;

        if payout.credited > 0 || payout.forfeited > 0 {
            let mut totals = Storage::get_totals(env);
            totals.total_credited = totals
                .total_credited
                .checked_add(payout.credited)
                .ok_or(Error::MathOverflow)?;
            totals.total_forfeited = totals
                .total_forfeited
                .checked_add(payout.forfeited)
                .ok_or(Error::MathOverflow)?;
            Storage::set_totals(env, &totals);
        }

        let complete = round.paying && round.is_walked();
        if complete {
            pool.last_distribution = round.opened_at;
            pool.distributions = pool.distributions.saturating_add(1);
            Storage::remove_round(env, kind);

            let recipients = round.paid + round.silver_paid;
            log!(env, "pool distributed", kind, round.allotted, recipients);

            env.events().publish(
                (Symbol::new(env, "pool_distributed"), kind),
                PoolDistributedEvent {
                    kind,
                    amount: round.allotted,
                    recipients,
                },
            );
        } else {
            Storage::set_round(env, kind, &round);
            log!(env, "distribution page", kind, round.cursor, allotted);
        }
        Storage::set_pool(env, kind, &pool);

        Ok(allotted)
    }
}
