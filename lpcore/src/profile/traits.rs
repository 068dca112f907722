use async_trait::async_trait;
use crate::{
    error::BackendError,
    linguist::traits::LinguistBackend,
    profile::{
        Address,
        Profile,
        ProfileAggregate,
    },
    rate::traits::LanguagePairRateBackend,
    update::ProfileUpdate,
};

#[async_trait]
pub trait ProfileBackend {
    async fn get_profile_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<Profile>, BackendError>;
    /// Returns the profile for the user, creating an empty one if the
    /// user has none yet.
    async fn ensure_profile(
        &self,
        user_id: i64,
    ) -> Result<Profile, BackendError>;
    async fn set_profile_avatar(
        &self,
        profile_id: i64,
        avatar: Option<&str>,
    ) -> Result<bool, BackendError>;
    async fn get_profile_address(
        &self,
        profile_id: i64,
    ) -> Result<Option<Address>, BackendError>;
    async fn get_profile_languages(
        &self,
        profile_id: i64,
    ) -> Result<Vec<i64>, BackendError>;
}

#[async_trait]
pub trait ProfileAggregateBackend: ProfileBackend
    + LinguistBackend
    + LanguagePairRateBackend

    + Sync
{
    /// Apply the update to the profile of the user along with every
    /// child collection named by the update, as a single unit of work.
    ///
    /// A profile is created for the user if one does not exist yet.
    /// The `actor` is stamped onto any rate history produced by the
    /// write.  Returns the id of the profile.
    async fn write_profile_aggregate(
        &self,
        user_id: i64,
        actor: Option<i64>,
        update: &ProfileUpdate,
    ) -> Result<i64, BackendError>;

    async fn get_profile_aggregate(
        &self,
        user_id: i64,
    ) -> Result<Option<ProfileAggregate>, BackendError> {
        let profile = match ProfileBackend::get_profile_by_user_id(
            self,
            user_id,
        ).await? {
            Some(profile) => profile,
            None => return Ok(None),
        };
        let address = ProfileBackend::get_profile_address(self, profile.id).await?;
        let native_languages = ProfileBackend::get_profile_languages(self, profile.id).await?;
        Ok(Some(ProfileAggregate {
            address,
            native_languages,
            expertises: LinguistBackend::list_expertises(self, user_id).await?,
            translation_tools: LinguistBackend::list_translation_tools(self, user_id).await?,
            language_pairs_rates: LanguagePairRateBackend::list_language_pair_rates_for_user(
                self,
                user_id,
            ).await?,
            qualifications: LinguistBackend::list_qualifications(self, user_id).await?,
            references: LinguistBackend::list_references(self, user_id).await?,
            documents: LinguistBackend::list_documents(self, user_id).await?,
            profile,
        }))
    }
}
