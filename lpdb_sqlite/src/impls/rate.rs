use async_trait::async_trait;
use lpcore::{
    error::BackendError,
    rate::{
        ChangeType,
        LanguagePairRate,
        LanguagePairRates,
        LanguagePairRateHistory,
        LanguagePairRateHistories,
        RateChange,
        traits::LanguagePairRateBackend,
    },
    update::LanguagePairRateItem,
};
use rust_decimal::Decimal;
use sqlx::{
    sqlite::SqliteRow,
    Row,
    SqliteConnection,
};
use std::str::FromStr;

use crate::{
    SqliteBackend,
    chrono::Utc,
    utils::{
        decimal_to_text,
        text_to_decimal,
    },
};

const SELECT_RATE: &str = r#"
SELECT
    id,
    user_id,
    source_language_id,
    target_language_id,
    service_id,
    proposed_rate,
    final_rate,
    machine_translation_experience,
    approved_by,
    approval_reference_email,
    created_ts,
    updated_ts
FROM
    language_pair_rate
"#;

fn rate_from_row(row: SqliteRow) -> Result<LanguagePairRate, sqlx::Error> {
    Ok(LanguagePairRate {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        source_language_id: row.try_get("source_language_id")?,
        target_language_id: row.try_get("target_language_id")?,
        service_id: row.try_get("service_id")?,
        proposed_rate: text_to_decimal(row.try_get("proposed_rate")?)?,
        final_rate: text_to_decimal(row.try_get("final_rate")?)?,
        machine_translation_experience: row.try_get("machine_translation_experience")?,
        approved_by: row.try_get("approved_by")?,
        approval_reference_email: row.try_get("approval_reference_email")?,
        created_ts: row.try_get("created_ts")?,
        updated_ts: row.try_get("updated_ts")?,
    })
}

fn history_from_row(row: SqliteRow) -> Result<LanguagePairRateHistory, sqlx::Error> {
    let change_type: String = row.try_get("change_type")?;
    Ok(LanguagePairRateHistory {
        id: row.try_get("id")?,
        language_pair_rate_id: row.try_get("language_pair_rate_id")?,
        old_rate: text_to_decimal(row.try_get("old_rate")?)?,
        new_rate: text_to_decimal(Some(row.try_get("new_rate")?))?
            .unwrap_or_default(),
        changed_by: row.try_get("changed_by")?,
        change_type: ChangeType::from_str(&change_type)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        notes: row.try_get("notes")?,
        created_ts: row.try_get("created_ts")?,
    })
}

pub(crate) async fn insert_rate(
    conn: &mut SqliteConnection,
    user_id: i64,
    item: &LanguagePairRateItem,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(
        r#"
INSERT INTO language_pair_rate (
    user_id,
    source_language_id,
    target_language_id,
    service_id,
    proposed_rate,
    final_rate,
    machine_translation_experience,
    approved_by,
    approval_reference_email,
    created_ts,
    updated_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10 )
        "#,
    )
    .bind(user_id)
    .bind(item.source_language_id)
    .bind(item.target_language_id)
    .bind(item.service_id)
    .bind(decimal_to_text(item.proposed_rate))
    .bind(decimal_to_text(item.final_rate))
    .bind(item.machine_translation_experience.unwrap_or(false))
    .bind(item.approved_by)
    .bind(item.approval_reference_email.as_deref())
    .bind(ts)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}

/// The stored approved rate; `None` if there is no such rate.
async fn select_final_rate(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Option<Decimal>>, sqlx::Error> {
    sqlx::query("SELECT final_rate FROM language_pair_rate WHERE id = ?1")
        .bind(id)
        .try_map(|row: SqliteRow| text_to_decimal(row.try_get("final_rate")?))
        .fetch_optional(&mut *conn)
        .await
}

/// Append the history entry for the change.
pub(crate) async fn record_rate_change(
    conn: &mut SqliteConnection,
    language_pair_rate_id: i64,
    change: RateChange,
    changed_by: Option<i64>,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(
        r#"
INSERT INTO language_pair_rate_history (
    language_pair_rate_id,
    old_rate,
    new_rate,
    changed_by,
    change_type,
    notes,
    created_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7 )
        "#,
    )
    .bind(language_pair_rate_id)
    .bind(decimal_to_text(change.old_rate))
    .bind(decimal_to_text(Some(change.new_rate)))
    .bind(changed_by)
    .bind(change.change_type().as_str())
    .bind(change.notes())
    .bind(ts)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    log::info!(
        "recorded rate change for language_pair_rate_id: {language_pair_rate_id}; \
        {:?} -> {}",
        change.old_rate,
        change.new_rate,
    );
    Ok(id)
}

/// Update the rate owned by the user from the submitted item.  Values
/// for the approval fields that are absent from the item are kept.
///
/// Returns the id of the history entry if the approved rate changed.
pub(crate) async fn update_rate(
    conn: &mut SqliteConnection,
    id: i64,
    user_id: i64,
    item: &LanguagePairRateItem,
    actor: Option<i64>,
) -> Result<Option<i64>, BackendError> {
    let old_rate = select_final_rate(conn, id).await?
        .ok_or_else(|| BackendError::AppInvariantViolation(format!(
            "language_pair_rate {id} vanished during update"
        )))?;
    let ts = Utc::now().timestamp();
    sqlx::query(
        r#"
UPDATE
    language_pair_rate
SET
    source_language_id = ?3,
    target_language_id = ?4,
    service_id = ?5,
    proposed_rate = ?6,
    final_rate = COALESCE(?7, final_rate),
    machine_translation_experience = COALESCE(?8, machine_translation_experience),
    approved_by = COALESCE(?9, approved_by),
    approval_reference_email = COALESCE(?10, approval_reference_email),
    updated_ts = ?11
WHERE
    id = ?1 AND user_id = ?2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(item.source_language_id)
    .bind(item.target_language_id)
    .bind(item.service_id)
    .bind(decimal_to_text(item.proposed_rate))
    .bind(decimal_to_text(item.final_rate))
    .bind(item.machine_translation_experience)
    .bind(item.approved_by)
    .bind(item.approval_reference_email.as_deref())
    .bind(ts)
    .execute(&mut *conn)
    .await?;

    let new_rate = item.final_rate.map(lpcore::rate::normalize_rate).or(old_rate);
    match RateChange::detect(old_rate, new_rate) {
        Some(change) => Ok(Some(record_rate_change(conn, id, change, actor).await?)),
        None => Ok(None),
    }
}

async fn insert_language_pair_rate_sqlite(
    sqlite: &SqliteBackend,
    user_id: i64,
    item: &LanguagePairRateItem,
) -> Result<i64, BackendError> {
    let mut conn = sqlite.pool.acquire().await?;
    insert_rate(&mut conn, user_id, item).await
}

async fn get_language_pair_rate_sqlite(
    sqlite: &SqliteBackend,
    id: i64,
) -> Result<Option<LanguagePairRate>, BackendError> {
    let rec = sqlx::query(&format!("{SELECT_RATE} WHERE id = ?1"))
        .bind(id)
        .try_map(rate_from_row)
        .fetch_optional(&*sqlite.pool)
        .await?;
    Ok(rec)
}

async fn list_language_pair_rates_for_user_sqlite(
    sqlite: &SqliteBackend,
    user_id: i64,
) -> Result<LanguagePairRates, BackendError> {
    let recs = sqlx::query(&format!("{SELECT_RATE} WHERE user_id = ?1 ORDER BY id"))
        .bind(user_id)
        .try_map(rate_from_row)
        .fetch_all(&*sqlite.pool)
        .await?;
    Ok(recs.into())
}

async fn list_pending_language_pair_rates_sqlite(
    sqlite: &SqliteBackend,
) -> Result<LanguagePairRates, BackendError> {
    let recs = sqlx::query(&format!(
        "{SELECT_RATE} WHERE final_rate IS NULL AND proposed_rate IS NOT NULL ORDER BY id"
    ))
        .try_map(rate_from_row)
        .fetch_all(&*sqlite.pool)
        .await?;
    Ok(recs.into())
}

async fn set_language_pair_rate_final_rate_sqlite(
    sqlite: &SqliteBackend,
    id: i64,
    final_rate: Option<Decimal>,
    approved_by: Option<i64>,
    approval_reference_email: Option<&str>,
    actor: Option<i64>,
) -> Result<Option<i64>, BackendError> {
    let mut tx = sqlite.pool.begin().await?;
    let old_rate = match select_final_rate(&mut *tx, id).await? {
        Some(old_rate) => old_rate,
        None => {
            tx.rollback().await?;
            return Err(BackendError::AppInvariantViolation(format!(
                "no language_pair_rate with id {id}"
            )));
        }
    };
    let ts = Utc::now().timestamp();
    sqlx::query(
        r#"
UPDATE
    language_pair_rate
SET
    final_rate = ?2,
    approved_by = ?3,
    approval_reference_email = ?4,
    updated_ts = ?5
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .bind(decimal_to_text(final_rate))
    .bind(approved_by)
    .bind(approval_reference_email)
    .bind(ts)
    .execute(&mut *tx)
    .await?;

    let result = match RateChange::detect(old_rate, final_rate.map(lpcore::rate::normalize_rate)) {
        Some(change) => Some(record_rate_change(&mut *tx, id, change, actor).await?),
        None => None,
    };
    tx.commit().await?;
    Ok(result)
}

async fn list_language_pair_rate_history_sqlite(
    sqlite: &SqliteBackend,
    language_pair_rate_id: i64,
) -> Result<LanguagePairRateHistories, BackendError> {
    let recs = sqlx::query(
        r#"
SELECT
    id,
    language_pair_rate_id,
    old_rate,
    new_rate,
    changed_by,
    change_type,
    notes,
    created_ts
FROM
    language_pair_rate_history
WHERE
    language_pair_rate_id = ?1
ORDER BY
    id
        "#,
    )
    .bind(language_pair_rate_id)
    .try_map(history_from_row)
    .fetch_all(&*sqlite.pool)
    .await?;
    Ok(recs.into())
}

#[async_trait]
impl LanguagePairRateBackend for SqliteBackend {
    async fn insert_language_pair_rate(
        &self,
        user_id: i64,
        item: &LanguagePairRateItem,
    ) -> Result<i64, BackendError> {
        insert_language_pair_rate_sqlite(&self, user_id, item).await
    }

    async fn get_language_pair_rate(
        &self,
        id: i64,
    ) -> Result<Option<LanguagePairRate>, BackendError> {
        get_language_pair_rate_sqlite(&self, id).await
    }

    async fn list_language_pair_rates_for_user(
        &self,
        user_id: i64,
    ) -> Result<LanguagePairRates, BackendError> {
        list_language_pair_rates_for_user_sqlite(&self, user_id).await
    }

    async fn list_pending_language_pair_rates(
        &self,
    ) -> Result<LanguagePairRates, BackendError> {
        list_pending_language_pair_rates_sqlite(&self).await
    }

    async fn set_language_pair_rate_final_rate(
        &self,
        id: i64,
        final_rate: Option<Decimal>,
        approved_by: Option<i64>,
        approval_reference_email: Option<&str>,
        actor: Option<i64>,
    ) -> Result<Option<i64>, BackendError> {
        set_language_pair_rate_final_rate_sqlite(
            &self,
            id,
            final_rate,
            approved_by,
            approval_reference_email,
            actor,
        ).await
    }

    async fn list_language_pair_rate_history(
        &self,
        language_pair_rate_id: i64,
    ) -> Result<LanguagePairRateHistories, BackendError> {
        list_language_pair_rate_history_sqlite(&self, language_pair_rate_id).await
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
        error::BackendError,
        rate::{
            ChangeType,
            LanguagePairRate,
            LanguagePairRateHistory,
            traits::LanguagePairRateBackend,
        },
        update::LanguagePairRateItem,
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use test_lp::chrono::set_timestamp;
    use crate::SqliteBackend;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal")
    }

    // returns the backend, the linguist, the admin and an item
    async fn setup() -> anyhow::Result<(SqliteBackend, i64, i64, LanguagePairRateItem)> {
        let backend = SqliteBackend::connect("sqlite::memory:".into())
            .await?
            .migrate_lp()
            .await?;
        let linguist = backend.add_user("linguist").await?;
        let admin = backend.add_user("admin").await?;
        let en = backend.add_catalog_entry(CatalogKind::Language, "English", Some("en")).await?;
        let fr = backend.add_catalog_entry(CatalogKind::Language, "French", Some("fr")).await?;
        let service = backend.add_catalog_entry(CatalogKind::Service, "Translation", None).await?;
        let item = LanguagePairRateItem {
            source_language_id: en,
            target_language_id: fr,
            service_id: service,
            proposed_rate: Some(d("0.1")),
            .. Default::default()
        };
        Ok((backend, linguist, admin, item))
    }

    #[async_std::test]
    async fn test_insert_and_pending() -> anyhow::Result<()> {
        let (backend, linguist, admin, item) = setup().await?;
        set_timestamp(1234567890);
        let id = backend.insert_language_pair_rate(linguist, &item).await?;
        let rate = backend.get_language_pair_rate(id).await?
            .expect("rate was inserted");
        assert_eq!(rate, LanguagePairRate {
            id,
            user_id: linguist,
            source_language_id: item.source_language_id,
            target_language_id: item.target_language_id,
            service_id: item.service_id,
            proposed_rate: Some(d("0.10")),
            final_rate: None,
            machine_translation_experience: false,
            approved_by: None,
            approval_reference_email: None,
            created_ts: 1234567890,
            updated_ts: 1234567890,
        });
        assert_eq!(rate.proposed_rate.map(|r| r.to_string()).as_deref(), Some("0.10"));
        assert_eq!(backend.list_pending_language_pair_rates().await?.len(), 1);
        assert_eq!(backend.list_language_pair_rates_for_user(linguist).await?.len(), 1);

        // creating a rate with an approved value produces no history
        let approved = backend.insert_language_pair_rate(admin, &LanguagePairRateItem {
            final_rate: Some(d("0.2")),
            .. item.clone()
        }).await?;
        assert!(backend.list_language_pair_rate_history(approved).await?.is_empty());
        assert_eq!(backend.list_pending_language_pair_rates().await?.len(), 1);

        // the tuple is unique per user
        assert!(backend.insert_language_pair_rate(linguist, &item).await.is_err());
        Ok(())
    }

    #[async_std::test]
    async fn test_approval_history() -> anyhow::Result<()> {
        let (backend, linguist, admin, item) = setup().await?;
        let id = backend.insert_language_pair_rate(linguist, &item).await?;

        set_timestamp(1234567900);
        let first = backend.set_language_pair_rate_final_rate(
            id, Some(d("100")), Some(admin), Some("ops@example.com"), Some(admin),
        ).await?;
        assert!(first.is_some());
        assert!(backend.list_pending_language_pair_rates().await?.is_empty());

        // saving the same value again is not a change
        let same = backend.set_language_pair_rate_final_rate(
            id, Some(d("100.00")), Some(admin), Some("ops@example.com"), Some(admin),
        ).await?;
        assert_eq!(same, None);

        set_timestamp(1234567910);
        let second = backend.set_language_pair_rate_final_rate(
            id, Some(d("120")), Some(admin), None, None,
        ).await?;
        assert!(second.is_some());

        // retracting back to null records nothing
        let retracted = backend.set_language_pair_rate_final_rate(
            id, None, None, None, Some(admin),
        ).await?;
        assert_eq!(retracted, None);
        let rate = backend.get_language_pair_rate(id).await?
            .expect("rate exists");
        assert_eq!(rate.final_rate, None);

        let history = backend.list_language_pair_rate_history(id).await?;
        assert_eq!(history.as_slice(), &[
            LanguagePairRateHistory {
                id: 1,
                language_pair_rate_id: id,
                old_rate: None,
                new_rate: d("100.00"),
                changed_by: Some(admin),
                change_type: ChangeType::Approved,
                notes: Some("Rate approved.".to_string()),
                created_ts: 1234567900,
            },
            LanguagePairRateHistory {
                id: 2,
                language_pair_rate_id: id,
                old_rate: Some(d("100.00")),
                new_rate: d("120.00"),
                changed_by: None,
                change_type: ChangeType::Approved,
                notes: Some("Rate approved.".to_string()),
                created_ts: 1234567910,
            },
        ]);
        Ok(())
    }

    #[async_std::test]
    async fn test_history_append_only() -> anyhow::Result<()> {
        let (backend, linguist, admin, item) = setup().await?;
        let id = backend.insert_language_pair_rate(linguist, &item).await?;
        backend.set_language_pair_rate_final_rate(
            id, Some(d("1")), Some(admin), None, Some(admin),
        ).await?;
        let result = sqlx::query("UPDATE language_pair_rate_history SET notes = 'x'")
            .execute(&*backend.pool)
            .await;
        assert!(result.is_err());

        // deleting the rate takes its history along
        sqlx::query("DELETE FROM language_pair_rate WHERE id = ?1")
            .bind(id)
            .execute(&*backend.pool)
            .await?;
        assert!(backend.list_language_pair_rate_history(id).await?.is_empty());
        Ok(())
    }

    #[async_std::test]
    async fn test_missing_rate() -> anyhow::Result<()> {
        let (backend, _, admin, _) = setup().await?;
        let result = backend.set_language_pair_rate_final_rate(
            42, Some(d("1")), Some(admin), None, Some(admin),
        ).await;
        assert!(matches!(result, Err(BackendError::AppInvariantViolation(_))));
        Ok(())
    }
}
