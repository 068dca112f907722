use async_trait::async_trait;
use lpcore::{
    ac::{
        traits::UserBackend,
        user::User,
    },
    catalog::{
        CatalogEntries,
        CatalogKind,
        traits::CatalogBackend,
    },
    error::BackendError,
    linguist::{
        Documents,
        Expertises,
        Qualifications,
        References,
        TranslationTools,
        traits::LinguistBackend,
    },
    platform::{
        DefaultLPPlatform,
        PlatformUrl,
    },
    profile::{
        Address,
        Profile,
        traits::{
            ProfileAggregateBackend,
            ProfileBackend,
        },
    },
    rate::{
        LanguagePairRate,
        LanguagePairRates,
        LanguagePairRateHistories,
        traits::LanguagePairRateBackend,
    },
    update::{
        LanguagePairRateItem,
        ProfileUpdate,
    },
};
use mockall::mock;
use rust_decimal::Decimal;

mock! {
    pub Platform {
        // Methods taking an optional borrowed str are mocked under these
        // names with owned arguments, as mockall is unable to deal with
        // the lifetimes of references nested inside an Option; the trait
        // impls further below forward to them.
        pub async fn catalog_add_entry(
            &self,
            kind: CatalogKind,
            name: &str,
            code: Option<String>,
        ) -> Result<i64, BackendError>;
        pub async fn catalog_list_entries(
            &self,
            kind: CatalogKind,
        ) -> Result<CatalogEntries, BackendError>;
        pub async fn catalog_existing_ids(
            &self,
            kind: CatalogKind,
            ids: &[i64],
        ) -> Result<Vec<i64>, BackendError>;

        pub async fn profile_get_by_user_id(
            &self,
            user_id: i64,
        ) -> Result<Option<Profile>, BackendError>;
        pub async fn profile_ensure(
            &self,
            user_id: i64,
        ) -> Result<Profile, BackendError>;
        pub async fn profile_set_avatar(
            &self,
            profile_id: i64,
            avatar: Option<String>,
        ) -> Result<bool, BackendError>;
        pub async fn profile_get_address(
            &self,
            profile_id: i64,
        ) -> Result<Option<Address>, BackendError>;
        pub async fn profile_get_languages(
            &self,
            profile_id: i64,
        ) -> Result<Vec<i64>, BackendError>;

        pub async fn rate_insert(
            &self,
            user_id: i64,
            item: &LanguagePairRateItem,
        ) -> Result<i64, BackendError>;
        pub async fn rate_get(
            &self,
            id: i64,
        ) -> Result<Option<LanguagePairRate>, BackendError>;
        pub async fn rate_list_for_user(
            &self,
            user_id: i64,
        ) -> Result<LanguagePairRates, BackendError>;
        pub async fn rate_list_pending(
            &self,
        ) -> Result<LanguagePairRates, BackendError>;
        pub async fn rate_set_final_rate(
            &self,
            id: i64,
            final_rate: Option<Decimal>,
            approved_by: Option<i64>,
            approval_reference_email: Option<String>,
            actor: Option<i64>,
        ) -> Result<Option<i64>, BackendError>;
        pub async fn rate_list_history(
            &self,
            language_pair_rate_id: i64,
        ) -> Result<LanguagePairRateHistories, BackendError>;
    }

    #[async_trait]
    impl UserBackend for Platform {
        async fn add_user(&self, name: &str) -> Result<i64, BackendError>;
        async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, BackendError>;
        async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, BackendError>;
    }

    // the default get_profile_aggregate is left in place so that it
    // may be exercised through the mocked component backends
    #[async_trait]
    impl ProfileAggregateBackend for Platform {
        async fn write_profile_aggregate(
            &self,
            user_id: i64,
            actor: Option<i64>,
            update: &ProfileUpdate,
        ) -> Result<i64, BackendError>;
    }

    #[async_trait]
    impl LinguistBackend for Platform {
        async fn list_expertises(&self, user_id: i64) -> Result<Expertises, BackendError>;
        async fn list_translation_tools(&self, user_id: i64) -> Result<TranslationTools, BackendError>;
        async fn list_qualifications(&self, user_id: i64) -> Result<Qualifications, BackendError>;
        async fn list_references(&self, user_id: i64) -> Result<References, BackendError>;
        async fn list_documents(&self, user_id: i64) -> Result<Documents, BackendError>;
    }
}

#[async_trait]
impl CatalogBackend for MockPlatform {
    async fn add_catalog_entry(
        &self,
        kind: CatalogKind,
        name: &str,
        code: Option<&str>,
    ) -> Result<i64, BackendError> {
        self.catalog_add_entry(kind, name, code.map(str::to_string)).await
    }

    async fn list_catalog_entries(
        &self,
        kind: CatalogKind,
    ) -> Result<CatalogEntries, BackendError> {
        self.catalog_list_entries(kind).await
    }

    async fn existing_catalog_ids(
        &self,
        kind: CatalogKind,
        ids: &[i64],
    ) -> Result<Vec<i64>, BackendError> {
        self.catalog_existing_ids(kind, ids).await
    }
}

#[async_trait]
impl ProfileBackend for MockPlatform {
    async fn get_profile_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<Profile>, BackendError> {
        self.profile_get_by_user_id(user_id).await
    }

    async fn ensure_profile(
        &self,
        user_id: i64,
    ) -> Result<Profile, BackendError> {
        self.profile_ensure(user_id).await
    }

    async fn set_profile_avatar(
        &self,
        profile_id: i64,
        avatar: Option<&str>,
    ) -> Result<bool, BackendError> {
        self.profile_set_avatar(profile_id, avatar.map(str::to_string)).await
    }

    async fn get_profile_address(
        &self,
        profile_id: i64,
    ) -> Result<Option<Address>, BackendError> {
        self.profile_get_address(profile_id).await
    }

    async fn get_profile_languages(
        &self,
        profile_id: i64,
    ) -> Result<Vec<i64>, BackendError> {
        self.profile_get_languages(profile_id).await
    }
}

#[async_trait]
impl LanguagePairRateBackend for MockPlatform {
    async fn insert_language_pair_rate(
        &self,
        user_id: i64,
        item: &LanguagePairRateItem,
    ) -> Result<i64, BackendError> {
        self.rate_insert(user_id, item).await
    }

    async fn get_language_pair_rate(
        &self,
        id: i64,
    ) -> Result<Option<LanguagePairRate>, BackendError> {
        self.rate_get(id).await
    }

    async fn list_language_pair_rates_for_user(
        &self,
        user_id: i64,
    ) -> Result<LanguagePairRates, BackendError> {
        self.rate_list_for_user(user_id).await
    }

    async fn list_pending_language_pair_rates(
        &self,
    ) -> Result<LanguagePairRates, BackendError> {
        self.rate_list_pending().await
    }

    async fn set_language_pair_rate_final_rate(
        &self,
        id: i64,
        final_rate: Option<Decimal>,
        approved_by: Option<i64>,
        approval_reference_email: Option<&str>,
        actor: Option<i64>,
    ) -> Result<Option<i64>, BackendError> {
        self.rate_set_final_rate(
            id,
            final_rate,
            approved_by,
            approval_reference_email.map(str::to_string),
            actor,
        ).await
    }

    async fn list_language_pair_rate_history(
        &self,
        language_pair_rate_id: i64,
    ) -> Result<LanguagePairRateHistories, BackendError> {
        self.rate_list_history(language_pair_rate_id).await
    }
}

impl PlatformUrl for MockPlatform {
    fn url(&self) -> &str {
        "mock://"
    }
}

impl DefaultLPPlatform for MockPlatform {}
