use async_trait::async_trait;
use lpcore::{
    error::BackendError,
    linguist::{
        Document,
        Documents,
        Expertise,
        Expertises,
        Qualification,
        Qualifications,
        Reference,
        References,
        TranslationTool,
        TranslationTools,
        traits::LinguistBackend,
    },
};
use sqlx::{sqlite::SqliteRow, Row};

use crate::SqliteBackend;

async fn list_expertises_sqlite(
    sqlite: &SqliteBackend,
    user_id: i64,
) -> Result<Expertises, BackendError> {
    let recs = sqlx::query(
        r#"
SELECT
    id,
    user_id,
    domain_id,
    years_of_experience
FROM
    expertise
WHERE
    user_id = ?1
ORDER BY
    id
        "#,
    )
    .bind(user_id)
    .try_map(|row: SqliteRow| Ok(Expertise {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        domain_id: row.try_get("domain_id")?,
        years_of_experience: row.try_get("years_of_experience")?,
    }))
    .fetch_all(&*sqlite.pool)
    .await?;
    Ok(recs.into())
}

async fn list_translation_tools_sqlite(
    sqlite: &SqliteBackend,
    user_id: i64,
) -> Result<TranslationTools, BackendError> {
    let recs = sqlx::query(
        r#"
SELECT
    id,
    user_id,
    translation_tool_id
FROM
    translation_tool
WHERE
    user_id = ?1
ORDER BY
    id
        "#,
    )
    .bind(user_id)
    .try_map(|row: SqliteRow| Ok(TranslationTool {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        translation_tool_id: row.try_get("translation_tool_id")?,
    }))
    .fetch_all(&*sqlite.pool)
    .await?;
    Ok(recs.into())
}

async fn list_qualifications_sqlite(
    sqlite: &SqliteBackend,
    user_id: i64,
) -> Result<Qualifications, BackendError> {
    let recs = sqlx::query(
        r#"
SELECT
    id,
    user_id,
    type,
    name,
    institution,
    country,
    city,
    issued_date,
    expiry_date
FROM
    qualification
WHERE
    user_id = ?1
ORDER BY
    id
        "#,
    )
    .bind(user_id)
    .try_map(|row: SqliteRow| Ok(Qualification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: row.try_get("type")?,
        name: row.try_get("name")?,
        institution: row.try_get("institution")?,
        country: row.try_get("country")?,
        city: row.try_get("city")?,
        issued_date: row.try_get("issued_date")?,
        expiry_date: row.try_get("expiry_date")?,
    }))
    .fetch_all(&*sqlite.pool)
    .await?;
    Ok(recs.into())
}

async fn list_references_sqlite(
    sqlite: &SqliteBackend,
    user_id: i64,
) -> Result<References, BackendError> {
    let recs = sqlx::query(
        r#"
SELECT
    id,
    user_id,
    company_name,
    contact_name,
    contact_email
FROM
    'reference'
WHERE
    user_id = ?1
ORDER BY
    id
        "#,
    )
    .bind(user_id)
    .try_map(|row: SqliteRow| Ok(Reference {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        company_name: row.try_get("company_name")?,
        contact_name: row.try_get("contact_name")?,
        contact_email: row.try_get("contact_email")?,
    }))
    .fetch_all(&*sqlite.pool)
    .await?;
    Ok(recs.into())
}

async fn list_documents_sqlite(
    sqlite: &SqliteBackend,
    user_id: i64,
) -> Result<Documents, BackendError> {
    let recs = sqlx::query(
        r#"
SELECT
    id,
    user_id,
    name,
    file_path,
    type
FROM
    document
WHERE
    user_id = ?1
ORDER BY
    id
        "#,
    )
    .bind(user_id)
    .try_map(|row: SqliteRow| Ok(Document {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        file_path: row.try_get("file_path")?,
        kind: row.try_get("type")?,
    }))
    .fetch_all(&*sqlite.pool)
    .await?;
    Ok(recs.into())
}

#[async_trait]
impl LinguistBackend for SqliteBackend {
    async fn list_expertises(
        &self,
        user_id: i64,
    ) -> Result<Expertises, BackendError> {
        list_expertises_sqlite(&self, user_id).await
    }

    async fn list_translation_tools(
        &self,
        user_id: i64,
    ) -> Result<TranslationTools, BackendError> {
        list_translation_tools_sqlite(&self, user_id).await
    }

    async fn list_qualifications(
        &self,
        user_id: i64,
    ) -> Result<Qualifications, BackendError> {
        list_qualifications_sqlite(&self, user_id).await
    }

    async fn list_references(
        &self,
        user_id: i64,
    ) -> Result<References, BackendError> {
        list_references_sqlite(&self, user_id).await
    }

    async fn list_documents(
        &self,
        user_id: i64,
    ) -> Result<Documents, BackendError> {
        list_documents_sqlite(&self, user_id).await
    }
}
