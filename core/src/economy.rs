//! Prices, refunds, and upgrade scaling.
//!
//! Costs are computed with integer arithmetic so that the floor of each
//! fractional price is exact.

use serde::{Deserialize, Serialize};

/// Highest level a tower can be upgraded to.
pub const MAX_UPGRADE_LEVEL: u8 = 3;

/// Money credited for a kill when the enemy type does not override it.
pub const DEFAULT_KILL_REWARD: u32 = 1;

/// Each upgrade level costs this ratio (3/2) times the previous one.
const UPGRADE_GROWTH: (u64, u64) = (3, 2);

/// Share of the total investment returned on sale (7/10).
const SELL_REFUND: (u64, u64) = (7, 10);

/// Price of moving a tower from `level` to `level + 1`.
///
/// Equals `floor(base_cost * 1.5^(level + 1))`.
#[must_use]
pub fn upgrade_cost(base_cost: u32, level: u8) -> u32 {
    let exponent = u32::from(level) + 1;
    let (numerator, denominator) = UPGRADE_GROWTH;
    let scaled = u128::from(base_cost) * u128::from(numerator).pow(exponent)
        / u128::from(denominator).pow(exponent);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Refund paid for a tower whose purchase and upgrades cost `total_invested`.
#[must_use]
pub fn sell_value(total_invested: u32) -> u32 {
    let (numerator, denominator) = SELL_REFUND;
    let refund = u64::from(total_invested) * numerator / denominator;
    u32::try_from(refund).unwrap_or(u32::MAX)
}

/// Specialisation a tower commits to with its first upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePath {
    /// Path A: harder and faster hits.
    Power,
    /// Path B: longer reach with a smaller damage bonus.
    Reach,
}

impl UpgradePath {
    /// Short label shown on upgrade buttons.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Power => "A: Power",
            Self::Reach => "B: Reach",
        }
    }

    /// Stat multipliers granted at `level` along this path.
    #[must_use]
    pub fn multipliers(self, level: u8) -> StatMultipliers {
        let level = f32::from(level);
        match self {
            Self::Power => StatMultipliers {
                damage: 1.0 + 0.25 * level,
                fire_rate: 1.0 + 0.2 * level,
                range: 1.0,
            },
            Self::Reach => StatMultipliers {
                damage: 1.0 + 0.15 * level,
                fire_rate: 1.0,
                range: 1.0 + 0.2 * level,
            },
        }
    }
}

/// Scale factors applied to a tower's base statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatMultipliers {
    /// Factor applied to damage per shot.
    pub damage: f32,
    /// Factor applied to shots per second.
    pub fire_rate: f32,
    /// Factor applied to range.
    pub range: f32,
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self {
            damage: 1.0,
            fire_rate: 1.0,
            range: 1.0,
        }
    }
}
