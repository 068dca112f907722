use lpcore::{
    ac::{
        Agent,
        User,
        traits::UserBackend as _,
    },
    catalog::{
        CatalogEntries,
        CatalogKind,
        traits::CatalogBackend as _,
    },
    platform::LPPlatform,
    profile::{
        Profile,
        ProfileAggregate,
        traits::{
            ProfileAggregateBackend as _,
            ProfileBackend as _,
        },
    },
    rate::{
        LanguagePairRate,
        LanguagePairRateHistories,
        LanguagePairRates,
        traits::LanguagePairRateBackend as _,
    },
    update::{
        LanguagePairRateItem,
        ProfileUpdate,
    },
};
use rust_decimal::Decimal;
use std::path::Path;

use crate::{
    error::{
        AuthorizationError,
        Error,
    },
    storage::FileStorage,
    validation::{
        ValidationErrors,
        Validator,
    },
};
use super::{
    AVATAR_DIR,
    AVATAR_EXTENSIONS,
    Platform,
};

impl Platform {
    pub fn lp_platform(&self) -> &dyn LPPlatform {
        self.0.lp_platform.as_dyn()
    }

    pub fn storage(&self) -> &dyn FileStorage {
        self.0.storage.as_ref()
    }

    pub fn validator(&self) -> &Validator {
        &self.0.validator
    }

    fn authorize(agent: &Agent) -> Result<i64, AuthorizationError> {
        agent.user_id().ok_or(AuthorizationError::Anonymous)
    }
}

// Users and catalogs.
impl Platform {
    pub async fn create_user(&self, name: &str) -> Result<User, Error> {
        let id = self.lp_platform().add_user(name).await?;
        log::info!("created user {name:?} with id {id}");
        self.get_user(id).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, Error> {
        self.lp_platform().get_user_by_id(id).await?
            .ok_or_else(|| Error::NotFound(format!("user {id}")))
    }

    pub async fn get_user_by_name(&self, name: &str) -> Result<User, Error> {
        self.lp_platform().get_user_by_name(name).await?
            .ok_or_else(|| Error::NotFound(format!("user {name:?}")))
    }

    pub async fn add_catalog_entry(
        &self,
        kind: CatalogKind,
        name: &str,
        code: Option<&str>,
    ) -> Result<i64, Error> {
        Ok(self.lp_platform().add_catalog_entry(kind, name, code).await?)
    }

    pub async fn list_catalog_entries(
        &self,
        kind: CatalogKind,
    ) -> Result<CatalogEntries, Error> {
        Ok(self.lp_platform().list_catalog_entries(kind).await?)
    }
}

// Profiles.
impl Platform {
    pub async fn get_profile(&self, user_id: i64) -> Result<ProfileAggregate, Error> {
        self.lp_platform().get_profile_aggregate(user_id).await?
            .ok_or_else(|| Error::NotFound(format!("profile for user {user_id}")))
    }

    /// Validate the update against the stored profile of the agent and
    /// write it as a single unit, returning the resulting aggregate.
    ///
    /// Approval details on rate items are dropped; approved rates only
    /// change through [`Platform::approve_rate`].
    pub async fn update_profile(
        &self,
        agent: &Agent,
        update: &ProfileUpdate,
    ) -> Result<ProfileAggregate, Error> {
        let user_id = Self::authorize(agent)?;
        let update = update.without_approvals();
        let existing = self.lp_platform().get_profile_aggregate(user_id).await?;
        self.validator()
            .validate(self.lp_platform(), &update, existing.as_ref())
            .await?
            .into_result()?;
        let profile_id = self.lp_platform()
            .write_profile_aggregate(user_id, Some(user_id), &update)
            .await?;
        log::info!("profile {profile_id} updated by user {user_id}");
        self.get_profile(user_id).await
    }

    fn check_avatar(&self, filename: &str, contents: &[u8]) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if contents.is_empty() {
            errors.add("avatar", "The avatar field is required.");
        }
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .filter(|ext| AVATAR_EXTENSIONS.contains(&ext.as_str()));
        if extension.is_none() {
            errors.add(
                "avatar",
                format!("The avatar field must be a file of type: {}.", AVATAR_EXTENSIONS.join(", ")),
            );
        }
        if contents.len() > self.0.avatar_max_size * 1024 {
            errors.add(
                "avatar",
                format!(
                    "The avatar field must not be greater than {} kilobytes.",
                    self.0.avatar_max_size,
                ),
            );
        }
        errors.into_result()?;
        Ok(extension.unwrap_or_default())
    }

    /// Replace the avatar of the agent, creating the profile if needed.
    pub async fn update_avatar(
        &self,
        agent: &Agent,
        filename: &str,
        contents: &[u8],
    ) -> Result<Profile, Error> {
        let user_id = Self::authorize(agent)?;
        let extension = self.check_avatar(filename, contents)?;
        let profile = self.lp_platform().ensure_profile(user_id).await?;
        if let Some(previous) = profile.avatar.as_deref() {
            self.storage().delete(previous).await?;
        }
        let path = self.storage().store(AVATAR_DIR, &extension, contents).await?;
        self.lp_platform().set_profile_avatar(profile.id, Some(&path)).await?;
        log::info!("avatar of profile {} set to {path}", profile.id);
        Ok(Profile {
            avatar: Some(path),
            .. profile
        })
    }

    pub async fn destroy_avatar(&self, agent: &Agent) -> Result<Profile, Error> {
        let user_id = Self::authorize(agent)?;
        let profile = self.lp_platform().get_profile_by_user_id(user_id).await?
            .ok_or_else(|| Error::NotFound(format!("profile for user {user_id}")))?;
        match profile.avatar.as_deref() {
            Some(path) => {
                self.storage().delete(path).await?;
                self.lp_platform().set_profile_avatar(profile.id, None).await?;
                log::info!("avatar of profile {} removed", profile.id);
            }
            None => log::debug!("profile {} has no avatar to remove", profile.id),
        }
        Ok(Profile {
            avatar: None,
            .. profile
        })
    }
}

// Rates.
impl Platform {
    async fn get_rate(&self, id: i64) -> Result<LanguagePairRate, Error> {
        self.lp_platform().get_language_pair_rate(id).await?
            .ok_or_else(|| Error::NotFound(format!("language pair rate {id}")))
    }

    /// Propose a rate for the agent; approval details are never taken
    /// from a proposal.
    pub async fn propose_rate(
        &self,
        agent: &Agent,
        item: &LanguagePairRateItem,
    ) -> Result<LanguagePairRate, Error> {
        let user_id = Self::authorize(agent)?;
        let item = LanguagePairRateItem {
            id: None,
            .. item.as_proposal()
        };
        let mut errors = self.validator()
            .validate_rate_item(self.lp_platform(), &item)
            .await?;
        let existing = self.lp_platform().list_language_pair_rates_for_user(user_id).await?;
        let pair = (item.source_language_id, item.target_language_id, item.service_id);
        if existing.iter().any(|rate| rate.pair() == pair) {
            errors.add(
                "language_pair",
                "The language pair and service combination has already been taken.",
            );
        }
        errors.into_result()?;
        let id = self.lp_platform().insert_language_pair_rate(user_id, &item).await?;
        log::info!("user {user_id} proposed language pair rate {id}");
        self.get_rate(id).await
    }

    /// Set the approved rate on behalf of the agent, who is recorded as
    /// the approver.
    pub async fn approve_rate(
        &self,
        agent: &Agent,
        id: i64,
        final_rate: Decimal,
        approval_reference_email: Option<&str>,
    ) -> Result<LanguagePairRate, Error> {
        let actor = Self::authorize(agent)?;
        self.validator()
            .check_approval(final_rate, approval_reference_email)
            .into_result()?;
        self.get_rate(id).await?;
        let history = self.lp_platform()
            .set_language_pair_rate_final_rate(
                id,
                Some(final_rate),
                Some(actor),
                approval_reference_email,
                Some(actor),
            )
            .await?;
        match history {
            Some(history_id) => log::info!(
                "language pair rate {id} approved at {final_rate} by user {actor} \
                 (history {history_id})"
            ),
            None => log::info!("language pair rate {id} already approved at {final_rate}"),
        }
        self.get_rate(id).await
    }

    /// Clear the approved rate; this leaves no history entry.
    pub async fn retract_rate(
        &self,
        agent: &Agent,
        id: i64,
    ) -> Result<LanguagePairRate, Error> {
        let actor = Self::authorize(agent)?;
        self.get_rate(id).await?;
        self.lp_platform()
            .set_language_pair_rate_final_rate(id, None, None, None, Some(actor))
            .await?;
        log::info!("approval of language pair rate {id} retracted by user {actor}");
        self.get_rate(id).await
    }

    pub async fn rate_history(&self, id: i64) -> Result<LanguagePairRateHistories, Error> {
        self.get_rate(id).await?;
        Ok(self.lp_platform().list_language_pair_rate_history(id).await?)
    }

    pub async fn pending_rates(&self) -> Result<LanguagePairRates, Error> {
        Ok(self.lp_platform().list_pending_language_pair_rates().await?)
    }
}
