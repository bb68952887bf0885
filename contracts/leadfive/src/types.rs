use soroban_sdk::{contracttype, Address, Symbol};

// Constants
pub const SCALE: i128 = 10_000_000; // 7 decimals
pub const USD: i128 = 1 * SCALE; // 1.0000000 USDT
pub const BASIS_POINTS: i128 = 10_000; // 100% = 10,000 basis points
pub const PER_MILLE: i128 = 1_000;
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Hard ceiling for any walk along the sponsor or matrix chain
pub const MAX_UPLINE_DEPTH: u32 = 30;

/// Share of the level bonus paid to each sponsor generation, in per-mille.
/// With a 10% level bonus: 3% L1, 1% L2-6, 0.5% L7-10 of the price.
pub const LEVEL_LADDER: [i128; 10] = [300, 100, 100, 100, 100, 100, 50, 50, 50, 50];

/// Bumped whenever a stored record changes shape; see `migration.rs`
pub const STORAGE_VERSION: u32 = 1;

/// Users visited per pool distribution call by the named entry points
pub const DEFAULT_DISTRIBUTION_PAGE: u32 = 25;

pub const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
pub const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960;
pub const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200;

/// Catalog entry for one package tier
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Package {
    /// Price in USDT units
    pub price: i128,
    /// Paid to the sponsor immediately
    pub direct_bonus_bps: u32,
    /// Split across 10 sponsor generations by LEVEL_LADDER
    pub level_bonus_bps: u32,
    /// Split equally across `upline_depth` sponsor generations
    pub upline_bonus_bps: u32,
    /// Accrued into the leader pool
    pub leader_bonus_bps: u32,
    /// Accrued into the help pool
    pub help_bonus_bps: u32,
    /// Accrued into the club pool
    pub club_bonus_bps: u32,
}

impl Package {
    /// Standard 40/10/10/10/30 split used by every default tier
    pub fn standard(price: i128) -> Self {
        Package {
            price,
            direct_bonus_bps: 4_000,
            level_bonus_bps: 1_000,
            upline_bonus_bps: 1_000,
            leader_bonus_bps: 1_000,
            help_bonus_bps: 3_000,
            club_bonus_bps: 0,
        }
    }

    pub fn total_bonus_bps(&self) -> u64 {
        self.direct_bonus_bps as u64
            + self.level_bonus_bps as u64
            + self.upline_bonus_bps as u64
            + self.leader_bonus_bps as u64
            + self.help_bonus_bps as u64
            + self.club_bonus_bps as u64
    }
}

/// One registered participant. Referenced everywhere by its dense id.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub id: u32,
    pub address: Address,
    /// Set once at registration; `None` only for the root
    pub sponsor: Option<u32>,
    pub package_level: u32,
    /// Registration price plus every upgrade delta
    pub total_investment: i128,
    /// Withdrawable earnings
    pub balance: i128,
    /// Lifetime credited earnings, never decreases
    pub total_earnings: i128,
    /// total_investment × cap_multiplier
    pub earnings_cap: i128,
    /// Net USDT actually paid out to the user
    pub total_withdrawn: i128,
    pub direct_referrals: u32,
    /// Descendants along the sponsor chain within `upline_depth`
    pub team_size: u32,
    pub matrix_parent: Option<u32>,
    pub left_child: Option<u32>,
    pub right_child: Option<u32>,
    /// Investment placed in the left matrix subtree
    pub left_volume: i128,
    /// Investment placed in the right matrix subtree
    pub right_volume: i128,
    pub registration_time: u64,
    pub blacklisted: bool,
}

impl User {
    /// Remaining earnings before the cap is hit
    pub fn cap_room(&self) -> i128 {
        self.earnings_cap.saturating_sub(self.total_earnings).max(0)
    }

    pub fn is_capped_out(&self) -> bool {
        self.cap_room() == 0
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatrixSide {
    Left = 0,
    Right = 1,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PoolKind {
    /// Split between Shining Star and Silver Star ranks
    Leader = 1,
    /// Community pool shared by every active user
    Help = 2,
    /// Shared by users meeting the club package/referral bar
    Club = 3,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RewardKind {
    Direct = 1,
    Level = 2,
    Upline = 3,
    LeaderPool = 4,
    HelpPool = 5,
    ClubPool = 6,
}

impl RewardKind {
    pub fn for_pool(kind: PoolKind) -> Self {
        match kind {
            PoolKind::Leader => RewardKind::LeaderPool,
            PoolKind::Help => RewardKind::HelpPool,
            PoolKind::Club => RewardKind::ClubPool,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub balance: i128,
    /// Minimum seconds between two distributions
    pub interval: u64,
    pub last_distribution: u64,
    /// Number of completed distributions; zero means always due
    pub distributions: u32,
}

impl Pool {
    pub fn new(interval: u64) -> Self {
        Pool {
            balance: 0,
            interval,
            last_distribution: 0,
            distributions: 0,
        }
    }

    pub fn default_interval(kind: PoolKind) -> u64 {
        match kind {
            PoolKind::Leader => 15 * SECONDS_PER_DAY,
            PoolKind::Help => 7 * SECONDS_PER_DAY,
            PoolKind::Club => 30 * SECONDS_PER_DAY,
        }
    }
}

/// Progress of a pool distribution spread over several calls.
///
/// A round first counts eligible users, then fixes the per-user share and
/// pays. Only users registered when the round opened take part.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionRound {
    pub opened_at: u64,
    /// Highest user id in the round
    pub last_id: u32,
    /// Next user id to visit
    pub cursor: u32,
    /// false while counting, true once shares are fixed
    pub paying: bool,
    /// Help and Club members, or Shining Stars for the leader pool
    pub eligible: u32,
    /// Silver Stars, leader pool only
    pub silver_eligible: u32,
    pub share: i128,
    pub silver_share: i128,
    pub paid: u32,
    pub silver_paid: u32,
    /// Taken out of the pool so far in this round
    pub allotted: i128,
}

impl DistributionRound {
    pub fn open(opened_at: u64, last_id: u32) -> Self {
        DistributionRound {
            opened_at,
            last_id,
            cursor: 1,
            paying: false,
            eligible: 0,
            silver_eligible: 0,
            share: 0,
            silver_share: 0,
            paid: 0,
            silver_paid: 0,
            allotted: 0,
        }
    }

    pub fn is_walked(&self) -> bool {
        self.cursor > self.last_id
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeaderRank {
    ShiningStar = 1,
    SilverStar = 2,
}

/// Thresholds for one leader rank; zero means no direct-referral bar
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RankRequirements {
    pub team_size: u32,
    pub direct_referrals: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolBalances {
    pub leader: i128,
    pub help: i128,
    pub club: i128,
}

/// Tunable business rules, stored once and replaced wholesale by admins
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub cap_multiplier: u32,
    pub platform_fee_bps: u32,
    pub min_withdrawal: i128,
    pub max_withdrawal: i128,
    pub user_daily_limit: i128,
    /// Contract-wide circuit breaker on withdrawals per day
    pub global_daily_limit: i128,
    pub upline_depth: u32,
    pub shining_star_team: u32,
    pub shining_star_directs: u32,
    pub silver_star_team: u32,
    pub club_min_package: u32,
    pub club_min_directs: u32,
    /// USD per native unit, SCALE-d
    pub min_oracle_price: i128,
    pub max_oracle_price: i128,
    pub max_price_age: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cap_multiplier: 4,
            platform_fee_bps: 500,
            min_withdrawal: 1 * USD,
            max_withdrawal: 50_000 * USD,
            user_daily_limit: 1_000 * USD,
            global_daily_limit: 100_000 * USD,
            upline_depth: MAX_UPLINE_DEPTH,
            shining_star_team: 250,
            shining_star_directs: 10,
            silver_star_team: 500,
            club_min_package: 3,
            club_min_directs: 3,
            min_oracle_price: 100 * USD,
            max_oracle_price: 2_000 * USD,
            max_price_age: 1_800,
        }
    }
}

/// Contract-wide accounting, updated by every flow
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Totals {
    pub total_users: u32,
    /// USD value of every registration and upgrade payment
    pub total_invested: i128,
    pub total_credited: i128,
    /// Commission dropped because the recipient hit the earnings cap
    pub total_forfeited: i128,
    pub total_withdrawn: i128,
    pub total_platform_fees: i128,
    pub total_reinvested: i128,
    /// Basis points a package leaves unallocated
    pub platform_reserve: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DailyUsage {
    /// UTC day index (timestamp / 86400)
    pub day: u64,
    pub amount: i128,
}

/// Public view of a user, sponsor resolved to an address
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserInfo {
    pub is_registered: bool,
    pub id: u32,
    pub sponsor: Option<Address>,
    pub package_level: u32,
    pub total_investment: i128,
    pub balance: i128,
    pub total_earnings: i128,
    pub earnings_cap: i128,
    pub total_withdrawn: i128,
    pub direct_referrals: u32,
    pub team_size: u32,
    pub registration_time: u64,
    pub blacklisted: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatrixPosition {
    pub parent: Option<Address>,
    pub left: Option<Address>,
    pub right: Option<Address>,
    pub left_volume: i128,
    pub right_volume: i128,
}

/// How one withdrawal amount was split
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalReceipt {
    pub amount: i128,
    /// Transferred to the user
    pub net: i128,
    /// Transferred to the treasury wallet
    pub fee: i128,
    /// Credited to the help pool
    pub reinvested: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Admin(Address),
    Treasury,
    Usdt,
    NativeToken,
    Oracle,
    Config,
    Paused,
    Locked,
    StorageVersion,
    Totals,
    PackageCount,
    Package(u32),
    Pool(PoolKind),
    PoolRound(PoolKind),
    UserId(Address), // address → dense id
    User(u32),       // dense id → User
    ReferralCode(Symbol),
    CodeOf(u32),
    UserDaily(u32),
    GlobalDaily,
    LastTxLedger(Address),
}
