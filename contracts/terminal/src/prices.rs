//! Price feeds: how many units of a currency one settlement unit buys,
//! fixed-point scaled.
//!
//! Currency 0 is the settlement asset itself and always converts at par.
//! Other currencies need a governance-registered feed; a feed can be added
//! once and is immutable afterwards.

use soroban_sdk::{contracttype, panic_with_error, Env};

use crate::math::FIXED_POINT_SCALE;
use crate::storage::bump_persistent;
use crate::Error;

/// Currency code of the settlement asset.
pub const BASE_CURRENCY: u32 = 0;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PriceKey {
    Feed(u32),
}

/// Units of `currency` per settlement unit, scaled by
/// [`FIXED_POINT_SCALE`]. Converting a currency amount to settlement base
/// units divides by this.
pub fn price_of(env: &Env, currency: u32) -> i128 {
    if currency == BASE_CURRENCY {
        return FIXED_POINT_SCALE;
    }
    let key = PriceKey::Feed(currency);
    match env.storage().persistent().get(&key) {
        Some(price) => {
            bump_persistent(env, &key);
            price
        }
        None => panic_with_error!(env, Error::PriceFeedMissing),
    }
}

pub fn set_feed(env: &Env, currency: u32, price: i128) {
    if currency == BASE_CURRENCY || price <= 0 {
        panic_with_error!(env, Error::BadProperties);
    }
    let key = PriceKey::Feed(currency);
    if env.storage().persistent().has(&key) {
        panic_with_error!(env, Error::PriceFeedExists);
    }
    env.storage().persistent().set(&key, &price);
    bump_persistent(env, &key);
}
