use async_trait::async_trait;
use lpcore::{
    ac::{
        traits::UserBackend,
        user::User,
    },
    error::BackendError,
};
use sqlx::{sqlite::SqliteRow, Row};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

fn user_from_row(row: SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_ts: row.try_get("created_ts")?,
    })
}

async fn add_user_sqlite(
    backend: &SqliteBackend,
    name: &str,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(
        r#"
INSERT INTO 'user' (
    name,
    created_ts
)
VALUES ( ?1, ?2 )
        "#,
    )
    .bind(name)
    .bind(ts)
    .execute(&*backend.pool)
    .await?
    .last_insert_rowid();
    Ok(id)
}

async fn get_user_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<User>, BackendError> {
    let rec = sqlx::query(r#"
SELECT
    id,
    name,
    created_ts
FROM
    'user'
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .try_map(user_from_row)
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(rec)
}

async fn get_user_by_name_sqlite(
    backend: &SqliteBackend,
    name: &str,
) -> Result<Option<User>, BackendError> {
    let rec = sqlx::query(r#"
SELECT
    id,
    name,
    created_ts
FROM
    'user'
WHERE
    name = ?1
        "#,
    )
    .bind(name)
    .try_map(user_from_row)
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(rec)
}

#[async_trait]
impl UserBackend for SqliteBackend {
    async fn add_user(
        &self,
        name: &str,
    ) -> Result<i64, BackendError> {
        add_user_sqlite(
            &self,
            name,
        ).await
    }

    async fn get_user_by_id(
        &self,
        id: i64,
    ) -> Result<Option<User>, BackendError> {
        get_user_by_id_sqlite(
            &self,
            id,
        ).await
    }

    async fn get_user_by_name(
        &self,
        name: &str,
    ) -> Result<Option<User>, BackendError> {
        get_user_by_name_sqlite(
            &self,
            name,
        ).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use lpcore::{
        platform::PlatformConnector as _,
        ac::{
            traits::UserBackend,
            user::User,
        },
    };
    use crate::SqliteBackend;
    use test_lp::chrono::set_timestamp;

    #[async_std::test]
    async fn test_basic() -> anyhow::Result<()> {
        let backend = SqliteBackend::lp("sqlite::memory:".into())
            .await
            .map_err(anyhow::Error::from_boxed)?;
        set_timestamp(1234567890);
        let user_id = UserBackend::add_user(&backend, "test_user").await?;
        let user = UserBackend::get_user_by_id(&backend, user_id).await?
            .expect("user is missing?");
        assert_eq!(
            user,
            User {
                id: 1,
                name: "test_user".to_string(),
                created_ts: 1234567890,
            },
        );
        assert_eq!(
            UserBackend::get_user_by_name(&backend, "test_user").await?,
            Some(user),
        );
        assert!(UserBackend::get_user_by_name(&backend, "nobody").await?.is_none());
        assert!(UserBackend::get_user_by_id(&backend, 2).await?.is_none());

        // names are unique
        assert!(UserBackend::add_user(&backend, "test_user").await.is_err());
        Ok(())
    }
}
