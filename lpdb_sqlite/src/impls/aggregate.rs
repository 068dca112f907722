use async_trait::async_trait;
use lpcore::{
    error::BackendError,
    profile::{
        Address,
        Profile,
        traits::ProfileAggregateBackend,
    },
    sync::{
        Collection,
        Identified,
        Policy,
        SyncPlan,
        replace_set,
    },
    update::{
        AddressInput,
        DocumentItem,
        ExpertiseItem,
        LanguagePairRateItem,
        ProfileUpdate,
        QualificationItem,
        ReferenceItem,
    },
};
use sqlx::{
    sqlite::SqliteRow,
    QueryBuilder,
    Row,
    Sqlite,
    SqliteConnection,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
    utils::json_to_text,
};
use super::{
    profile::find_or_create_profile,
    rate::{
        insert_rate,
        update_rate,
    },
};

// The table and column names interpolated into the statements below
// are all constants of this module.

/// A child collection stored as rows owned through `user_id`.
#[async_trait]
trait ChildTable: Identified + Sync {
    const COLLECTION: Collection;
    const TABLE: &'static str;

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<i64, BackendError>;

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        user_id: i64,
        actor: Option<i64>,
    ) -> Result<(), BackendError>;
}

async fn child_ids(
    conn: &mut SqliteConnection,
    table: &str,
    user_id: i64,
) -> Result<Vec<i64>, BackendError> {
    let ids = sqlx::query(&format!(
        "SELECT id FROM {table} WHERE user_id = ?1 ORDER BY id"
    ))
        .bind(user_id)
        .try_map(|row: SqliteRow| row.try_get("id"))
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids)
}

async fn delete_children(
    conn: &mut SqliteConnection,
    table: &str,
    user_id: i64,
    ids: Option<&[i64]>,
) -> Result<u64, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "DELETE FROM {table} WHERE user_id = "
    ));
    query_builder.push_bind(user_id);
    if let Some(ids) = ids {
        if ids.is_empty() {
            return Ok(0);
        }
        query_builder.push(" AND id IN (");
        let mut separated = query_builder.separated(", ");
        for id in ids.iter() {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
    }
    let rows_affected = query_builder.build()
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(rows_affected)
}

async fn reconcile<T: ChildTable>(
    conn: &mut SqliteConnection,
    user_id: i64,
    actor: Option<i64>,
    items: &[T],
) -> Result<(), BackendError> {
    match T::COLLECTION.policy() {
        Policy::Overwrite => {
            let removed = delete_children(conn, T::TABLE, user_id, None).await?;
            log::debug!(
                "{}: overwriting {removed} existing with {} items",
                T::COLLECTION,
                items.len(),
            );
            for item in items {
                item.insert(conn, user_id).await?;
            }
        }
        Policy::Sync => {
            let existing = child_ids(conn, T::TABLE, user_id).await?;
            let plan = SyncPlan::new(&existing, items);
            for id in plan.unmatched.iter() {
                log::warn!(
                    "{}: id {id} is not owned by user_id {user_id}; creating as new",
                    T::COLLECTION,
                );
            }
            log::debug!(
                "{}: prune {:?}, update {}, create {}",
                T::COLLECTION,
                plan.prune,
                plan.update.len(),
                plan.create.len(),
            );
            // pruning first frees up unique keys for the creations
            delete_children(conn, T::TABLE, user_id, Some(&plan.prune)).await?;
            for (id, item) in plan.update {
                item.update(conn, id, user_id, actor).await?;
            }
            for item in plan.create {
                item.insert(conn, user_id).await?;
            }
        }
        Policy::ReplaceSet => {
            return Err(BackendError::AppInvariantViolation(format!(
                "{} is not reconciled row by row",
                T::COLLECTION,
            )));
        }
    }
    Ok(())
}

/// Make the association between the owner and the keys exactly the
/// distinct set of `keys`.
async fn replace_association(
    conn: &mut SqliteConnection,
    table: &str,
    owner_column: &str,
    owner_id: i64,
    key_column: &str,
    keys: &[i64],
) -> Result<(), BackendError> {
    let keys = replace_set(keys);
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "DELETE FROM {table} WHERE {owner_column} = "
    ));
    query_builder.push_bind(owner_id);
    if !keys.is_empty() {
        query_builder.push(format!(" AND {key_column} NOT IN ("));
        let mut separated = query_builder.separated(", ");
        for key in keys.iter() {
            separated.push_bind(*key);
        }
        separated.push_unseparated(")");
    }
    query_builder.build()
        .execute(&mut *conn)
        .await?;

    for key in keys {
        sqlx::query(&format!(
            "INSERT INTO {table} ({owner_column}, {key_column}) VALUES (?1, ?2) \
            ON CONFLICT DO NOTHING"
        ))
            .bind(owner_id)
            .bind(key)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn update_profile_row(
    conn: &mut SqliteConnection,
    profile: &Profile,
) -> Result<(), BackendError> {
    let ts = Utc::now().timestamp();
    sqlx::query(
        r#"
UPDATE
    profile
SET
    is_individual = ?2,
    first_name = ?3,
    last_name = ?4,
    company_name = ?5,
    phone_number = ?6,
    date_of_birth = ?7,
    preferred_currency_id = ?8,
    is_translator = ?9,
    is_interpreter = ?10,
    avatar = ?11,
    secondary_email = ?12,
    secondary_phone = ?13,
    additional_fields = ?14,
    updated_ts = ?15
WHERE
    id = ?1
        "#,
    )
    .bind(profile.id)
    .bind(profile.is_individual)
    .bind(profile.first_name.as_deref())
    .bind(profile.last_name.as_deref())
    .bind(profile.company_name.as_deref())
    .bind(profile.phone_number.as_deref())
    .bind(profile.date_of_birth)
    .bind(profile.preferred_currency_id)
    .bind(profile.is_translator)
    .bind(profile.is_interpreter)
    .bind(profile.avatar.as_deref())
    .bind(profile.secondary_email.as_deref())
    .bind(profile.secondary_phone.as_deref())
    .bind(json_to_text(profile.additional_fields.as_ref()))
    .bind(ts)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn upsert_address(
    conn: &mut SqliteConnection,
    profile_id: i64,
    address: &AddressInput,
) -> Result<i64, BackendError> {
    let id = sqlx::query(
        r#"
INSERT INTO address (
    addressable_kind,
    addressable_id,
    address_line_1,
    address_line_2,
    city,
    state,
    postal_code,
    country,
    type
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9 )
ON CONFLICT (addressable_kind, addressable_id) DO UPDATE SET
    address_line_1 = excluded.address_line_1,
    address_line_2 = excluded.address_line_2,
    city = excluded.city,
    state = excluded.state,
    postal_code = excluded.postal_code,
    country = excluded.country,
    type = excluded.type
RETURNING id
        "#,
    )
    .bind(Address::PROFILE_KIND)
    .bind(profile_id)
    .bind(&address.address_line_1)
    .bind(address.address_line_2.as_deref())
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.postal_code)
    .bind(&address.country)
    .bind(address.kind.as_deref())
    .try_map(|row: SqliteRow| row.try_get("id"))
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

#[async_trait]
impl ChildTable for ExpertiseItem {
    const COLLECTION: Collection = Collection::Expertises;
    const TABLE: &'static str = "expertise";

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<i64, BackendError> {
        let id = sqlx::query(
            r#"
INSERT INTO expertise (
    user_id,
    domain_id,
    years_of_experience
)
VALUES ( ?1, ?2, ?3 )
            "#,
        )
        .bind(user_id)
        .bind(self.domain_id)
        .bind(self.years_of_experience)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
        Ok(id)
    }

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        user_id: i64,
        _actor: Option<i64>,
    ) -> Result<(), BackendError> {
        sqlx::query(
            r#"
UPDATE expertise
SET domain_id = ?3, years_of_experience = ?4
WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(self.domain_id)
        .bind(self.years_of_experience)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ChildTable for LanguagePairRateItem {
    const COLLECTION: Collection = Collection::LanguagePairsRates;
    const TABLE: &'static str = "language_pair_rate";

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<i64, BackendError> {
        insert_rate(conn, user_id, self).await
    }

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        user_id: i64,
        actor: Option<i64>,
    ) -> Result<(), BackendError> {
        update_rate(conn, id, user_id, self, actor).await?;
        Ok(())
    }
}

#[async_trait]
impl ChildTable for QualificationItem {
    const COLLECTION: Collection = Collection::Qualifications;
    const TABLE: &'static str = "qualification";

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<i64, BackendError> {
        let id = sqlx::query(
            r#"
INSERT INTO qualification (
    user_id,
    type,
    name,
    institution,
    country,
    city,
    issued_date,
    expiry_date
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8 )
            "#,
        )
        .bind(user_id)
        .bind(&self.kind)
        .bind(&self.name)
        .bind(self.institution.as_deref())
        .bind(self.country.as_deref())
        .bind(self.city.as_deref())
        .bind(self.issued_date)
        .bind(self.expiry_date)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
        Ok(id)
    }

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        user_id: i64,
        _actor: Option<i64>,
    ) -> Result<(), BackendError> {
        sqlx::query(
            r#"
UPDATE qualification
SET
    type = ?3,
    name = ?4,
    institution = ?5,
    country = ?6,
    city = ?7,
    issued_date = ?8,
    expiry_date = ?9
WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&self.kind)
        .bind(&self.name)
        .bind(self.institution.as_deref())
        .bind(self.country.as_deref())
        .bind(self.city.as_deref())
        .bind(self.issued_date)
        .bind(self.expiry_date)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ChildTable for ReferenceItem {
    const COLLECTION: Collection = Collection::References;
    const TABLE: &'static str = "'reference'";

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<i64, BackendError> {
        let id = sqlx::query(
            r#"
INSERT INTO 'reference' (
    user_id,
    company_name,
    contact_name,
    contact_email
)
VALUES ( ?1, ?2, ?3, ?4 )
            "#,
        )
        .bind(user_id)
        .bind(&self.company_name)
        .bind(&self.contact_name)
        .bind(&self.contact_email)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
        Ok(id)
    }

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        user_id: i64,
        _actor: Option<i64>,
    ) -> Result<(), BackendError> {
        sqlx::query(
            r#"
UPDATE 'reference'
SET company_name = ?3, contact_name = ?4, contact_email = ?5
WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&self.company_name)
        .bind(&self.contact_name)
        .bind(&self.contact_email)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ChildTable for DocumentItem {
    const COLLECTION: Collection = Collection::Documents;
    const TABLE: &'static str = "document";

    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<i64, BackendError> {
        let id = sqlx::query(
            r#"
INSERT INTO document (
    user_id,
    name,
    file_path,
    type
)
VALUES ( ?1, ?2, ?3, ?4 )
            "#,
        )
        .bind(user_id)
        .bind(&self.name)
        .bind(&self.file_path)
        .bind(self.kind.as_deref())
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
        Ok(id)
    }

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        user_id: i64,
        _actor: Option<i64>,
    ) -> Result<(), BackendError> {
        sqlx::query(
            r#"
UPDATE document
SET name = ?3, file_path = ?4, type = ?5
WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&self.name)
        .bind(&self.file_path)
        .bind(self.kind.as_deref())
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

async fn write_profile_aggregate_inner(
    conn: &mut SqliteConnection,
    user_id: i64,
    actor: Option<i64>,
    update: &ProfileUpdate,
) -> Result<i64, BackendError> {
    let mut profile = find_or_create_profile(conn, user_id).await?;
    update.apply_to(&mut profile);
    update_profile_row(conn, &profile).await?;

    if let Some(address) = &update.address {
        upsert_address(conn, profile.id, address).await?;
    }

    for collection in update.collections() {
        match collection {
            Collection::NativeLanguages => if let Some(ids) = &update.native_languages {
                replace_association(
                    conn, "language_profile", "profile_id", profile.id, "language_id", ids,
                ).await?;
            },
            Collection::TranslationTools => if let Some(items) = &update.translation_tools {
                let ids = items.iter()
                    .map(|item| item.translation_tool_id)
                    .collect::<Vec<_>>();
                replace_association(
                    conn, "translation_tool", "user_id", user_id, "translation_tool_id", &ids,
                ).await?;
            },
            Collection::Expertises => if let Some(items) = &update.expertises {
                reconcile(conn, user_id, actor, items).await?;
            },
            Collection::LanguagePairsRates => if let Some(items) = &update.language_pairs_rates {
                reconcile(conn, user_id, actor, items).await?;
            },
            Collection::Qualifications => if let Some(items) = &update.qualifications {
                reconcile(conn, user_id, actor, items).await?;
            },
            Collection::References => if let Some(items) = &update.references {
                reconcile(conn, user_id, actor, items).await?;
            },
            Collection::Documents => if let Some(items) = &update.documents {
                reconcile(conn, user_id, actor, items).await?;
            },
        }
    }
    Ok(profile.id)
}

async fn write_profile_aggregate_sqlite(
    sqlite: &SqliteBackend,
    user_id: i64,
    actor: Option<i64>,
    update: &ProfileUpdate,
) -> Result<i64, BackendError> {
    let mut tx = sqlite.pool.begin().await?;
    match write_profile_aggregate_inner(&mut *tx, user_id, actor, update).await {
        Ok(profile_id) => {
            tx.commit().await?;
            log::info!(
                "wrote profile aggregate for user_id: {user_id}; profile_id: {profile_id}; \
                collections: {:?}",
                update.collections(),
            );
            Ok(profile_id)
        }
        Err(e) => {
            log::warn!("rolling back profile aggregate write for user_id: {user_id}: {e}");
            tx.rollback().await?;
            Err(e)
        }
    }
}

#[async_trait]
impl ProfileAggregateBackend for SqliteBackend {
    async fn write_profile_aggregate(
        &self,
        user_id: i64,
        actor: Option<i64>,
        update: &ProfileUpdate,
    ) -> Result<i64, BackendError> {
        write_profile_aggregate_sqlite(&self, user_id, actor, update).await
    }
}

#[cfg(test)]
mod testing {
    use lpcore::{
        ac::traits::UserBackend,
        catalog::{
            CatalogKind,
            traits::CatalogBackend,
        },
        linguist::traits::LinguistBackend,
        profile::{
            Address,
            traits::{
                ProfileAggregateBackend,
                ProfileBackend,
            },
        },
        rate::traits::LanguagePairRateBackend,
        update::{
            LanguagePairRateItem,
            ProfileUpdate,
            ReferenceItem,
        },
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use test_lp::chrono::set_timestamp;
    use crate::SqliteBackend;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal")
    }

    // languages 1..=3, services 1..=2, domains 1..=2, tools 1..=2,
    // currency 1
    async fn seeded() -> anyhow::Result<SqliteBackend> {
        let backend = SqliteBackend::connect("sqlite::memory:".into())
            .await?
            .migrate_lp()
            .await?;
        for (name, code) in [("English", "en"), ("French", "fr"), ("German", "de")] {
            backend.add_catalog_entry(CatalogKind::Language, name, Some(code)).await?;
        }
        backend.add_catalog_entry(CatalogKind::Currency, "US Dollar", Some("USD")).await?;
        backend.add_catalog_entry(CatalogKind::Service, "Translation", None).await?;
        backend.add_catalog_entry(CatalogKind::Service, "Interpreting", None).await?;
        backend.add_catalog_entry(CatalogKind::Domain, "Legal", None).await?;
        backend.add_catalog_entry(CatalogKind::Domain, "Medical", None).await?;
        backend.add_catalog_entry(CatalogKind::TranslationTool, "Trados", None).await?;
        backend.add_catalog_entry(CatalogKind::TranslationTool, "memoQ", None).await?;
        Ok(backend)
    }

    fn braxton() -> anyhow::Result<ProfileUpdate> {
        Ok(serde_json::from_str(r#"{
            "first_name": "Braxton",
            "last_name": "Cartwright",
            "is_individual": true,
            "native_languages": [1, 2],
            "address": {
                "address_line_1": "5678 Oak St",
                "city": "Shelbyville",
                "state": "IL",
                "postal_code": "62705",
                "country": "USA"
            }
        }"#)?)
    }

    fn rate(
        id: Option<i64>,
        target_language_id: i64,
        proposed_rate: &str,
    ) -> LanguagePairRateItem {
        LanguagePairRateItem {
            id,
            source_language_id: 1,
            target_language_id,
            service_id: 1,
            proposed_rate: Some(d(proposed_rate)),
            .. Default::default()
        }
    }

    fn reference(company_name: &str) -> ReferenceItem {
        ReferenceItem {
            company_name: company_name.to_string(),
            contact_name: "Jo".to_string(),
            contact_email: "jo@example.com".to_string(),
            .. Default::default()
        }
    }

    #[async_std::test]
    async fn test_fresh_user() -> anyhow::Result<()> {
        let backend = seeded().await?;
        let user_id = backend.add_user("braxton").await?;
        set_timestamp(1234567890);
        let profile_id = backend.write_profile_aggregate(user_id, Some(user_id), &braxton()?).await?;

        let aggregate = backend.get_profile_aggregate(user_id).await?
            .expect("profile created");
        assert_eq!(aggregate.profile.id, profile_id);
        assert_eq!(aggregate.profile.first_name.as_deref(), Some("Braxton"));
        assert_eq!(aggregate.profile.last_name.as_deref(), Some("Cartwright"));
        assert_eq!(aggregate.profile.is_individual, Some(true));
        assert_eq!(aggregate.profile.created_ts, 1234567890);
        assert_eq!(aggregate.address, Some(Address {
            id: 1,
            addressable_kind: "profile".to_string(),
            addressable_id: profile_id,
            address_line_1: "5678 Oak St".to_string(),
            address_line_2: None,
            city: "Shelbyville".to_string(),
            state: "IL".to_string(),
            postal_code: "62705".to_string(),
            country: "USA".to_string(),
            kind: None,
        }));
        assert_eq!(aggregate.native_languages, vec![1, 2]);
        assert!(aggregate.expertises.is_empty());
        assert!(aggregate.language_pairs_rates.is_empty());
        Ok(())
    }

    #[async_std::test]
    async fn test_partial_update_and_idempotence() -> anyhow::Result<()> {
        let backend = seeded().await?;
        let user_id = backend.add_user("braxton").await?;
        let mut update = braxton()?;
        update.language_pairs_rates = Some(vec![rate(None, 2, "0.10")]);
        update.references = Some(vec![reference("Acme")]);
        backend.write_profile_aggregate(user_id, Some(user_id), &update).await?;
        let first = backend.get_profile_aggregate(user_id).await?;

        // the identical payload again yields the same state
        backend.write_profile_aggregate(user_id, Some(user_id), &update).await?;
        let second = backend.get_profile_aggregate(user_id).await?;
        assert_eq!(first.as_ref().map(|a| a.language_pairs_rates.len()), Some(1));
        assert_eq!(second.as_ref().map(|a| a.references.len()), Some(1));
        assert_eq!(
            first.as_ref().map(|a| (&a.address, &a.native_languages, &a.language_pairs_rates)),
            second.as_ref().map(|a| (&a.address, &a.native_languages, &a.language_pairs_rates)),
        );

        // only the fields present are changed; absent collections are kept
        let partial: ProfileUpdate = serde_json::from_str(r#"{
            "last_name": "Smith",
            "first_name": null,
            "native_languages": [3, 3]
        }"#)?;
        backend.write_profile_aggregate(user_id, Some(user_id), &partial).await?;
        let aggregate = backend.get_profile_aggregate(user_id).await?
            .expect("profile exists");
        assert_eq!(aggregate.profile.first_name.as_deref(), Some("Braxton"));
        assert_eq!(aggregate.profile.last_name.as_deref(), Some("Smith"));
        assert_eq!(aggregate.native_languages, vec![3]);
        assert_eq!(aggregate.address.map(|a| a.city), Some("Shelbyville".to_string()));
        assert_eq!(aggregate.language_pairs_rates.len(), 1);
        assert_eq!(aggregate.references.len(), 1);

        let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profile")
            .fetch_one(&*backend.pool)
            .await?;
        assert_eq!(profiles, 1);
        Ok(())
    }

    #[async_std::test]
    async fn test_sync_rates() -> anyhow::Result<()> {
        let backend = seeded().await?;
        let user_id = backend.add_user("braxton").await?;
        let update = ProfileUpdate {
            language_pairs_rates: Some(vec![
                rate(None, 2, "0.10"),
                rate(None, 3, "0.11"),
                rate(None, 1, "0.12"),
            ]),
            .. Default::default()
        };
        backend.write_profile_aggregate(user_id, Some(user_id), &update).await?;
        let existing = backend.list_language_pair_rates_for_user(user_id).await?;
        let (a, b, c) = (existing[0].id, existing[1].id, existing[2].id);

        // {A, B, C} -> {A', D}, where D reuses the tuple of the pruned B
        let update = ProfileUpdate {
            language_pairs_rates: Some(vec![
                rate(Some(a), 2, "0.20"),
                rate(None, 3, "0.30"),
            ]),
            .. Default::default()
        };
        backend.write_profile_aggregate(user_id, Some(user_id), &update).await?;
        let rates = backend.list_language_pair_rates_for_user(user_id).await?;
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].id, a);
        assert_eq!(rates[0].proposed_rate, Some(d("0.20")));
        assert!(rates[1].id != b && rates[1].id != c);
        assert_eq!(rates[1].proposed_rate, Some(d("0.30")));
        Ok(())
    }

    #[async_std::test]
    async fn test_overwrite_references() -> anyhow::Result<()> {
        let backend = seeded().await?;
        let user_id = backend.add_user("braxton").await?;
        let update = ProfileUpdate {
            references: Some(vec![reference("X"), reference("Y")]),
            .. Default::default()
        };
        backend.write_profile_aggregate(user_id, None, &update).await?;
        let before = backend.list_references(user_id).await?;

        // submitted ids are discarded under the overwrite policy
        let update = ProfileUpdate {
            references: Some(vec![ReferenceItem {
                id: Some(before[0].id),
                .. reference("Z")
            }]),
            .. Default::default()
        };
        backend.write_profile_aggregate(user_id, None, &update).await?;
        let after = backend.list_references(user_id).await?;
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].company_name, "Z");
        assert!(before.iter().all(|r| r.id != after[0].id));

        // an empty submission clears the collection
        let update = ProfileUpdate {
            references: Some(vec![]),
            .. Default::default()
        };
        backend.write_profile_aggregate(user_id, None, &update).await?;
        assert!(backend.list_references(user_id).await?.is_empty());
        Ok(())
    }

    #[async_std::test]
    async fn test_translation_tools_replace_set() -> anyhow::Result<()> {
        let backend = seeded().await?;
        let user_id = backend.add_user("braxton").await?;
        let update: ProfileUpdate = serde_json::from_str(r#"{
            "translation_tools": [
                {"translation_tool_id": 1},
                {"translation_tool_id": 2},
                {"translation_tool_id": 1}
            ]
        }"#)?;
        backend.write_profile_aggregate(user_id, None, &update).await?;
        let tools = backend.list_translation_tools(user_id).await?;
        assert_eq!(
            tools.iter().map(|t| t.translation_tool_id).collect::<Vec<_>>(),
            vec![1, 2],
        );
        let kept = tools[1].id;

        let update: ProfileUpdate = serde_json::from_str(r#"{
            "translation_tools": [{"translation_tool_id": 2}]
        }"#)?;
        backend.write_profile_aggregate(user_id, None, &update).await?;
        let tools = backend.list_translation_tools(user_id).await?;
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].id, kept);
        Ok(())
    }

    #[async_std::test]
    async fn test_rollback() -> anyhow::Result<()> {
        let backend = seeded().await?;
        let user_id = backend.add_user("braxton").await?;
        backend.write_profile_aggregate(user_id, None, &braxton()?).await?;

        // the duplicated rate tuple fails the write after the scalar
        // fields and languages were already applied
        let update = ProfileUpdate {
            first_name: Some("Changed".to_string()),
            native_languages: Some(vec![3]),
            language_pairs_rates: Some(vec![
                rate(None, 2, "0.10"),
                rate(None, 2, "0.11"),
            ]),
            .. Default::default()
        };
        assert!(backend.write_profile_aggregate(user_id, None, &update).await.is_err());

        let aggregate = backend.get_profile_aggregate(user_id).await?
            .expect("profile exists");
        assert_eq!(aggregate.profile.first_name.as_deref(), Some("Braxton"));
        assert_eq!(aggregate.native_languages, vec![1, 2]);
        assert!(aggregate.language_pairs_rates.is_empty());

        // a fresh user gets no profile from a failed write
        let other = backend.add_user("other").await?;
        assert!(backend.write_profile_aggregate(other, None, &update).await.is_err());
        assert!(backend.get_profile_by_user_id(other).await?.is_none());
        Ok(())
    }

    #[async_std::test]
    async fn test_foreign_id_is_created() -> anyhow::Result<()> {
        let backend = seeded().await?;
        let alice = backend.add_user("alice").await?;
        let mallory = backend.add_user("mallory").await?;
        let update = ProfileUpdate {
            language_pairs_rates: Some(vec![rate(None, 2, "0.10")]),
            .. Default::default()
        };
        backend.write_profile_aggregate(alice, Some(alice), &update).await?;
        let victim = backend.list_language_pair_rates_for_user(alice).await?[0].clone();

        let update = ProfileUpdate {
            language_pairs_rates: Some(vec![LanguagePairRateItem {
                final_rate: Some(d("999")),
                .. rate(Some(victim.id), 2, "9.99")
            }]),
            .. Default::default()
        };
        backend.write_profile_aggregate(mallory, Some(mallory), &update).await?;

        assert_eq!(backend.get_language_pair_rate(victim.id).await?, Some(victim.clone()));
        assert!(backend.list_language_pair_rate_history(victim.id).await?.is_empty());
        let created = backend.list_language_pair_rates_for_user(mallory).await?;
        assert_eq!(created.len(), 1);
        assert_ne!(created[0].id, victim.id);
        assert_eq!(created[0].user_id, mallory);
        Ok(())
    }

    #[async_std::test]
    async fn test_history_through_sync() -> anyhow::Result<()> {
        let backend = seeded().await?;
        let user_id = backend.add_user("braxton").await?;
        let admin = backend.add_user("admin").await?;
        let update = ProfileUpdate {
            language_pairs_rates: Some(vec![rate(None, 2, "0.10")]),
            .. Default::default()
        };
        backend.write_profile_aggregate(user_id, Some(user_id), &update).await?;
        let id = backend.list_language_pair_rates_for_user(user_id).await?[0].id;

        let approve = |final_rate: Option<&str>| ProfileUpdate {
            language_pairs_rates: Some(vec![LanguagePairRateItem {
                final_rate: final_rate.map(d),
                .. rate(Some(id), 2, "0.10")
            }]),
            .. Default::default()
        };
        backend.write_profile_aggregate(user_id, Some(admin), &approve(Some("100"))).await?;
        // same value, and an absent value, are both not a change
        backend.write_profile_aggregate(user_id, Some(admin), &approve(Some("100.00"))).await?;
        backend.write_profile_aggregate(user_id, Some(admin), &approve(None)).await?;
        backend.write_profile_aggregate(user_id, Some(admin), &approve(Some("120"))).await?;

        let rate = backend.get_language_pair_rate(id).await?
            .expect("rate exists");
        assert_eq!(rate.final_rate, Some(d("120.00")));
        let history = backend.list_language_pair_rate_history(id).await?;
        assert_eq!(history.len(), 2);
        assert_eq!((history[0].old_rate, history[0].new_rate), (None, d("100.00")));
        assert_eq!(
            (history[1].old_rate, history[1].new_rate),
            (Some(d("100.00")), d("120.00")),
        );
        assert!(history.iter().all(|h| h.changed_by == Some(admin)));
        Ok(())
    }
}
