use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::{
    error::BackendError,
    update::LanguagePairRateItem,
};
use super::{
    LanguagePairRate,
    LanguagePairRates,
    LanguagePairRateHistories,
};

#[async_trait]
pub trait LanguagePairRateBackend {
    async fn insert_language_pair_rate(
        &self,
        user_id: i64,
        item: &LanguagePairRateItem,
    ) -> Result<i64, BackendError>;
    async fn get_language_pair_rate(
        &self,
        id: i64,
    ) -> Result<Option<LanguagePairRate>, BackendError>;
    async fn list_language_pair_rates_for_user(
        &self,
        user_id: i64,
    ) -> Result<LanguagePairRates, BackendError>;
    /// Rates that have been proposed but not yet approved.
    async fn list_pending_language_pair_rates(
        &self,
    ) -> Result<LanguagePairRates, BackendError>;
    /// Set the approved rate, recording the approver and reference.
    ///
    /// Returns the id of the history entry if the change produced one.
    async fn set_language_pair_rate_final_rate(
        &self,
        id: i64,
        final_rate: Option<Decimal>,
        approved_by: Option<i64>,
        approval_reference_email: Option<&str>,
        actor: Option<i64>,
    ) -> Result<Option<i64>, BackendError>;
    async fn list_language_pair_rate_history(
        &self,
        language_pair_rate_id: i64,
    ) -> Result<LanguagePairRateHistories, BackendError>;
}
