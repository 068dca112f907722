use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A priced offering for translating from one language to another for
/// a given service.  Unique per user, source, target and service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct LanguagePairRate {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
    pub source_language_id: i64,
    pub target_language_id: i64,
    pub service_id: i64,
    pub proposed_rate: Option<Decimal>,
    /// The approved rate; remains unset until an approval happens.
    pub final_rate: Option<Decimal>,
    #[serde(default)]
    pub machine_translation_experience: bool,
    pub approved_by: Option<i64>,
    pub approval_reference_email: Option<String>,
    #[serde(default)]
    pub created_ts: i64,
    #[serde(default)]
    pub updated_ts: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct LanguagePairRates(Vec<LanguagePairRate>);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Proposed,
    #[default]
    Approved,
}

/// Append-only record of a change to the approved rate.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LanguagePairRateHistory {
    #[serde(default)]
    pub id: i64,
    pub language_pair_rate_id: i64,
    pub old_rate: Option<Decimal>,
    pub new_rate: Decimal,
    pub changed_by: Option<i64>,
    pub change_type: ChangeType,
    pub notes: Option<String>,
    #[serde(default)]
    pub created_ts: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct LanguagePairRateHistories(Vec<LanguagePairRateHistory>);

/// A change of the approved rate that warrants a history entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateChange {
    pub old_rate: Option<Decimal>,
    pub new_rate: Decimal,
}

mod impls;
pub mod traits;

pub use impls::normalize_rate;
