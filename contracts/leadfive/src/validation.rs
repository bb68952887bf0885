use crate::error::Error;
use crate::types::{Config, Package, BASIS_POINTS, MAX_UPLINE_DEPTH};

pub struct Validator;

impl Validator {
    /// Price must be positive and the six bonus buckets may not exceed 100%
    pub fn validate_package(package: &Package) -> Result<(), Error> {
        if package.price <= 0 {
            return Err(Error::InvalidPackageConfig);
        }
        if package.total_bonus_bps() > BASIS_POINTS as u64 {
            return Err(Error::InvalidPackageConfig);
        }
        Ok(())
    }

    /// Upgrades charge the price delta, so prices must rise strictly with level
    pub fn validate_package_order(
        package: &Package,
        lower: Option<&Package>,
        higher: Option<&Package>,
    ) -> Result<(), Error> {
        if let Some(lower) = lower {
            if package.price <= lower.price {
                return Err(Error::InvalidPackageConfig);
            }
        }
        if let Some(higher) = higher {
            if package.price >= higher.price {
                return Err(Error::InvalidPackageConfig);
            }
        }
        Ok(())
    }

    pub fn validate_config(config: &Config) -> Result<(), Error> {
        if config.cap_multiplier == 0 {
            return Err(Error::InvalidConfig);
        }
        if config.platform_fee_bps as i128 >= BASIS_POINTS {
            return Err(Error::InvalidConfig);
        }
        if config.min_withdrawal <= 0 || config.max_withdrawal < config.min_withdrawal {
            return Err(Error::InvalidConfig);
        }
        if config.user_daily_limit < config.min_withdrawal
            || config.global_daily_limit < config.user_daily_limit
        {
            return Err(Error::InvalidConfig);
        }
        if config.upline_depth == 0 || config.upline_depth > MAX_UPLINE_DEPTH {
            return Err(Error::InvalidConfig);
        }
        if config.shining_star_team == 0 || config.silver_star_team == 0 {
            return Err(Error::InvalidConfig);
        }
        if config.club_min_package == 0 {
            return Err(Error::InvalidConfig);
        }
        if config.min_oracle_price <= 0 || config.max_oracle_price <= config.min_oracle_price {
            return Err(Error::InvalidConfig);
        }
        if config.max_price_age == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    pub fn validate_interval(seconds: u64) -> Result<(), Error> {
        if seconds == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::USD;

    #[test]
    fn test_standard_package_allocates_everything() {
        let package = Package::standard(30 * USD);
        assert_eq!(package.total_bonus_bps(), 10_000);
        assert_eq!(Validator::validate_package(&package), Ok(()));
    }

    #[test]
    fn test_package_over_100_percent_rejected() {
        let mut package = Package::standard(30 * USD);
        package.club_bonus_bps = 1;

        assert_eq!(
            Validator::validate_package(&package),
            Err(Error::InvalidPackageConfig)
        );
    }

    #[test]
    fn test_package_under_100_percent_allowed() {
        let mut package = Package::standard(30 * USD);
        package.help_bonus_bps = 2_500;

        assert_eq!(Validator::validate_package(&package), Ok(()));
    }

    #[test]
    fn test_zero_price_rejected() {
        let package = Package::standard(0);
        assert_eq!(
            Validator::validate_package(&package),
            Err(Error::InvalidPackageConfig)
        );
    }

    #[test]
    fn test_package_order() {
        let low = Package::standard(30 * USD);
        let high = Package::standard(100 * USD);

        let between = Package::standard(50 * USD);
        assert_eq!(
            Validator::validate_package_order(&between, Some(&low), Some(&high)),
            Ok(())
        );

        let equal = Package::standard(30 * USD);
        assert_eq!(
            Validator::validate_package_order(&equal, Some(&low), Some(&high)),
            Err(Error::InvalidPackageConfig)
        );

        let above = Package::standard(150 * USD);
        assert_eq!(
            Validator::validate_package_order(&above, Some(&low), Some(&high)),
            Err(Error::InvalidPackageConfig)
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(Validator::validate_config(&Config::default()), Ok(()));
    }

    #[test]
    fn test_config_bounds() {
        let mut config = Config::default();
        config.upline_depth = MAX_UPLINE_DEPTH + 1;
        assert_eq!(Validator::validate_config(&config), Err(Error::InvalidConfig));

        let mut config = Config::default();
        config.user_daily_limit = config.global_daily_limit + 1;
        assert_eq!(Validator::validate_config(&config), Err(Error::InvalidConfig));

        let mut config = Config::default();
        config.platform_fee_bps = 10_000;
        assert_eq!(Validator::validate_config(&config), Err(Error::InvalidConfig));

        let mut config = Config::default();
        config.max_oracle_price = config.min_oracle_price;
        assert_eq!(Validator::validate_config(&config), Err(Error::InvalidConfig));
    }
}
