use async_trait::async_trait;
use lpcore::{
    catalog::{
        CatalogEntries,
        CatalogEntry,
        CatalogKind,
        traits::CatalogBackend,
    },
    error::BackendError,
};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};

use crate::SqliteBackend;

// The table names interpolated below all come from `CatalogKind::table`.

async fn add_catalog_entry_sqlite(
    sqlite: &SqliteBackend,
    kind: CatalogKind,
    name: &str,
    code: Option<&str>,
) -> Result<i64, BackendError> {
    let id = sqlx::query(&format!(
        r#"
INSERT INTO {} (
    name,
    code
)
VALUES ( ?1, ?2 )
        "#,
        kind.table(),
    ))
    .bind(name)
    .bind(code)
    .execute(&*sqlite.pool)
    .await?
    .last_insert_rowid();
    Ok(id)
}

async fn list_catalog_entries_sqlite(
    sqlite: &SqliteBackend,
    kind: CatalogKind,
) -> Result<CatalogEntries, BackendError> {
    let recs = sqlx::query(&format!(
        r#"
SELECT
    id,
    name,
    code
FROM
    {}
ORDER BY
    id
        "#,
        kind.table(),
    ))
    .try_map(|row: SqliteRow| Ok(CatalogEntry {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        code: row.try_get("code")?,
    }))
    .fetch_all(&*sqlite.pool)
    .await?;
    Ok(recs.into())
}

async fn existing_catalog_ids_sqlite(
    sqlite: &SqliteBackend,
    kind: CatalogKind,
    ids: &[i64],
) -> Result<Vec<i64>, BackendError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(r#"
SELECT id
FROM {}
WHERE id IN ("#,
        kind.table(),
    ));

    let mut separated = query_builder.separated(", ");
    for id in ids.iter() {
        separated.push_bind(id);
    }
    separated.push_unseparated(") ORDER BY id");

    let recs = query_builder
        .build()
        .try_map(|rec: SqliteRow| rec.try_get("id"))
        .fetch_all(&*sqlite.pool)
        .await?;

    Ok(recs)
}

#[async_trait]
impl CatalogBackend for SqliteBackend {
    async fn add_catalog_entry(
        &self,
        kind: CatalogKind,
        name: &str,
        code: Option<&str>,
    ) -> Result<i64, BackendError> {
        add_catalog_entry_sqlite(&self, kind, name, code).await
    }

    async fn list_catalog_entries(
        &self,
        kind: CatalogKind,
    ) -> Result<CatalogEntries, BackendError> {
        list_catalog_entries_sqlite(&self, kind).await
    }

    async fn existing_catalog_ids(
        &self,
        kind: CatalogKind,
        ids: &[i64],
    ) -> Result<Vec<i64>, BackendError> {
        existing_catalog_ids_sqlite(&self, kind, ids).await
    }
}

#[cfg(test)]
mod testing {
    use lpcore::{
        catalog::{
            CatalogEntry,
            CatalogKind,
            traits::CatalogBackend,
        },
        platform::PlatformConnector as _,
    };
    use crate::SqliteBackend;

    #[async_std::test]
    async fn test_basic() -> anyhow::Result<()> {
        let backend = SqliteBackend::lp("sqlite::memory:".into())
            .await
            .map_err(anyhow::Error::from_boxed)?;
        let en = backend.add_catalog_entry(CatalogKind::Language, "English", Some("en")).await?;
        let fr = backend.add_catalog_entry(CatalogKind::Language, "French", Some("fr")).await?;
        let usd = backend.add_catalog_entry(CatalogKind::Currency, "US Dollar", Some("USD")).await?;
        backend.add_catalog_entry(CatalogKind::TranslationTool, "Trados", None).await?;

        let languages = backend.list_catalog_entries(CatalogKind::Language).await?;
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[1], CatalogEntry {
            id: fr,
            name: "French".to_string(),
            code: Some("fr".to_string()),
        });
        let tools = backend.list_catalog_entries(CatalogKind::TranslationTool).await?;
        assert_eq!(tools[0].code, None);
        assert!(backend.list_catalog_entries(CatalogKind::Domain).await?.is_empty());

        assert_eq!(
            backend.existing_catalog_ids(CatalogKind::Language, &[fr, 99, en]).await?,
            vec![en, fr],
        );
        assert_eq!(
            backend.existing_catalog_ids(CatalogKind::Currency, &[usd]).await?,
            vec![usd],
        );
        assert!(backend.existing_catalog_ids(CatalogKind::Service, &[1]).await?.is_empty());
        assert!(backend.existing_catalog_ids(CatalogKind::Service, &[]).await?.is_empty());
        Ok(())
    }
}
