use crate::types::{MatrixSide, PoolKind, RewardKind};
use soroban_sdk::{contracttype, Address, Symbol};

#[contracttype]
#[derive(Clone, Debug)]
pub struct UserRegisteredEvent {
    pub user: Address,
    pub id: u32,
    pub sponsor: Option<Address>,
    pub package_level: u32,
    pub amount: i128,
    pub paid_in_usdt: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PackageUpgradedEvent {
    pub user: Address,
    pub old_level: u32,
    pub new_level: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct MatrixPlacedEvent {
    pub user: Address,
    pub parent: Address,
    pub side: MatrixSide,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RewardCreditedEvent {
    pub user: Address,
    pub amount: i128,
    pub kind: RewardKind,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct EarningsCapReachedEvent {
    pub user: Address,
    pub forfeited: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolFundedEvent {
    pub kind: PoolKind,
    pub amount: i128,
    pub balance: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolDistributedEvent {
    pub kind: PoolKind,
    pub amount: i128,
    pub recipients: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawalEvent {
    pub user: Address,
    pub amount: i128,
    pub net: i128,
    pub fee: i128,
    pub reinvested: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ConfigUpdatedEvent {
    pub by: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PackageUpdatedEvent {
    pub level: u32,
    pub price: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct OwnershipTransferredEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct AdminChangedEvent {
    pub admin: Address,
    pub enabled: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PausedEvent {
    pub by: Address,
    pub paused: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BlacklistedEvent {
    pub user: Address,
    pub blacklisted: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ReferralCodeSetEvent {
    pub user: Address,
    pub code: Symbol,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct MigratedEvent {
    pub from_version: u32,
    pub to_version: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct EmergencyWithdrawalEvent {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
}
