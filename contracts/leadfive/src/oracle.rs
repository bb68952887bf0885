use crate::error::Error;
use crate::storage::Storage;
use crate::types::{Config, SCALE};
use soroban_sdk::{contractclient, contracttype, Env};

/// Latest native/USD quote, USD per native unit with 7 decimals
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    pub price: i128,
    pub timestamp: u64,
}

/// Interface the external price feed has to expose
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn lastprice(env: Env) -> Option<PriceData>;
}

/// Reject quotes that are missing, outside the accepted band or too old
pub fn validate_price(quote: Option<PriceData>, now: u64, config: &Config) -> Result<i128, Error> {
    let quote = quote.ok_or(Error::OraclePriceUnavailable)?;

    if quote.price < config.min_oracle_price || quote.price > config.max_oracle_price {
        return Err(Error::OraclePriceOutOfBounds);
    }
    if now.saturating_sub(quote.timestamp) > config.max_price_age {
        return Err(Error::OraclePriceStale);
    }
    Ok(quote.price)
}

/// Native units needed to cover `usd_amount`, rounded up
pub fn native_for_usd(usd_amount: i128, price: i128) -> Result<i128, Error> {
    if price <= 0 {
        return Err(Error::OraclePriceUnavailable);
    }
    let numerator = usd_amount
        .checked_mul(SCALE)
        .and_then(|v| v.checked_add(price - 1))
        .ok_or(Error::MathOverflow)?;
    Ok(numerator / price)
}

/// Query the configured feed and convert `usd_amount` into native units
pub fn required_native(env: &Env, usd_amount: i128) -> Result<i128, Error> {
    let config = Storage::get_config(env)?;
    let feed = PriceFeedClient::new(env, &Storage::get_oracle(env)?);
    let price = validate_price(feed.lastprice(), env.ledger().timestamp(), &config)?;
    native_for_usd(usd_amount, price)
}
