use rust_decimal::{
    Decimal,
    RoundingStrategy,
};
use std::{
    fmt,
    ops::Deref,
    str::FromStr,
};
use crate::error::ValueError;
use super::{
    ChangeType,
    LanguagePairRate,
    LanguagePairRates,
    LanguagePairRateHistory,
    LanguagePairRateHistories,
    RateChange,
};

/// Rates are kept to two decimal places, with midpoints rounded away
/// from zero as a DECIMAL(10,2) column would.
pub fn normalize_rate(rate: Decimal) -> Decimal {
    let mut rate = rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rate.rescale(2);
    rate
}

impl RateChange {
    pub const NOTES: &'static str = "Rate approved.";

    /// Determine whether moving the approved rate from `old` to `new`
    /// produces a history entry.
    ///
    /// Only a change to a set value counts; moving from a set value
    /// back to unset is not recorded.
    pub fn detect(old: Option<Decimal>, new: Option<Decimal>) -> Option<Self> {
        let new_rate = new?;
        match old {
            Some(old_rate) if old_rate == new_rate => None,
            old_rate => Some(RateChange { old_rate, new_rate }),
        }
    }

    pub fn change_type(&self) -> ChangeType {
        ChangeType::Approved
    }

    pub fn notes(&self) -> &'static str {
        Self::NOTES
    }
}

impl ChangeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Proposed => "proposed",
            ChangeType::Approved => "approved",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposed" => Ok(ChangeType::Proposed),
            "approved" => Ok(ChangeType::Approved),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl LanguagePairRate {
    pub fn is_approved(&self) -> bool {
        self.final_rate.is_some()
    }

    /// The identifying tuple of the rate.
    pub fn pair(&self) -> (i64, i64, i64) {
        (self.source_language_id, self.target_language_id, self.service_id)
    }
}

impl From<Vec<LanguagePairRate>> for LanguagePairRates {
    fn from(args: Vec<LanguagePairRate>) -> Self {
        Self(args)
    }
}

impl From<LanguagePairRates> for Vec<LanguagePairRate> {
    fn from(value: LanguagePairRates) -> Self {
        value.0
    }
}

impl Deref for LanguagePairRates {
    type Target = Vec<LanguagePairRate>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<LanguagePairRateHistory>> for LanguagePairRateHistories {
    fn from(args: Vec<LanguagePairRateHistory>) -> Self {
        Self(args)
    }
}

impl From<LanguagePairRateHistories> for Vec<LanguagePairRateHistory> {
    fn from(value: LanguagePairRateHistories) -> Self {
        value.0
    }
}

impl Deref for LanguagePairRateHistories {
    type Target = Vec<LanguagePairRateHistory>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
