use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller is neither the owner nor an admin
    Unauthorized = 10,
    /// User has been blacklisted by an admin
    UserBlacklisted = 11,

    // ============================================
    // REGISTRATION ERRORS (20-29)
    // ============================================
    /// Sponsor is missing, unregistered, blacklisted or the caller itself
    InvalidSponsor = 20,
    /// Caller already has a position in the network
    AlreadyRegistered = 21,
    /// Address has never registered
    UserNotRegistered = 22,
    /// Package level does not exist or is not an upgrade
    InvalidPackageLevel = 23,
    /// Package price or basis-point table is invalid
    InvalidPackageConfig = 24,
    /// No open matrix slot was found under the sponsor
    PlacementFailed = 25,
    /// Referral code already belongs to another user
    ReferralCodeTaken = 26,
    /// Referral code is not registered
    ReferralCodeNotFound = 27,

    // ============================================
    // PAYMENT ERRORS (30-39)
    // ============================================
    /// Payer cannot cover the package price
    InsufficientPayment = 30,

    // ============================================
    // AMOUNT/WITHDRAWAL ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,
    /// Amount exceeds the withdrawable balance
    InsufficientBalance = 41,
    /// Amount is below the configured minimum withdrawal
    BelowMinimumWithdrawal = 42,
    /// Amount is above the configured maximum single withdrawal
    ExceedsMaximumWithdrawal = 43,
    /// Per-user or contract-wide daily limit reached
    WithdrawalLimitExceeded = 44,

    // ============================================
    // POOL ERRORS (50-59)
    // ============================================
    /// Pool interval has not elapsed since the last distribution
    DistributionNotDue = 50,
    /// Pool holds nothing to distribute
    PoolEmpty = 51,
    /// No user satisfies the pool's eligibility rules
    NoEligibleUsers = 52,
    /// Config values are out of range
    InvalidConfig = 53,

    // ============================================
    // ORACLE ERRORS (60-69)
    // ============================================
    /// Oracle returned no price
    OraclePriceUnavailable = 60,
    /// Oracle price outside the accepted band
    OraclePriceOutOfBounds = 61,
    /// Oracle price older than max_price_age
    OraclePriceStale = 62,

    // ============================================
    // OPERATIONAL ERRORS (70-79)
    // ============================================
    /// Contract is paused
    ContractPaused = 70,
    /// A guarded entry point is already executing
    Reentrancy = 71,
    /// Caller already transacted in this ledger
    MevProtection = 72,
    /// Only allowed while the contract is paused
    ContractNotPaused = 73,

    // ============================================
    // SCHEMA ERRORS (80-89)
    // ============================================
    /// Stored schema is already at the current version
    AlreadyMigrated = 80,

    // ============================================
    // ARITHMETIC ERRORS (90-99)
    // ============================================
    /// Checked arithmetic overflowed
    MathOverflow = 90,
}
