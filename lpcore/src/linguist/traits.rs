use async_trait::async_trait;
use crate::error::BackendError;
use super::{
    Documents,
    Expertises,
    Qualifications,
    References,
    TranslationTools,
};

// Writes to these collections only happen through the aggregate write
// of the profile, so only the listings are exposed here.

#[async_trait]
pub trait LinguistBackend {
    async fn list_expertises(
        &self,
        user_id: i64,
    ) -> Result<Expertises, BackendError>;
    async fn list_translation_tools(
        &self,
        user_id: i64,
    ) -> Result<TranslationTools, BackendError>;
    async fn list_qualifications(
        &self,
        user_id: i64,
    ) -> Result<Qualifications, BackendError>;
    async fn list_references(
        &self,
        user_id: i64,
    ) -> Result<References, BackendError>;
    async fn list_documents(
        &self,
        user_id: i64,
    ) -> Result<Documents, BackendError>;
}
