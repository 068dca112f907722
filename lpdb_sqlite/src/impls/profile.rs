use async_trait::async_trait;
use lpcore::{
    error::BackendError,
    profile::{
        Address,
        Profile,
        traits::ProfileBackend,
    },
};
use sqlx::{
    sqlite::SqliteRow,
    Row,
    SqliteConnection,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
    utils::text_to_json,
};

fn profile_from_row(row: SqliteRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        is_individual: row.try_get("is_individual")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        company_name: row.try_get("company_name")?,
        phone_number: row.try_get("phone_number")?,
        date_of_birth: row.try_get("date_of_birth")?,
        preferred_currency_id: row.try_get("preferred_currency_id")?,
        is_translator: row.try_get("is_translator")?,
        is_interpreter: row.try_get("is_interpreter")?,
        avatar: row.try_get("avatar")?,
        secondary_email: row.try_get("secondary_email")?,
        secondary_phone: row.try_get("secondary_phone")?,
        additional_fields: text_to_json(row.try_get("additional_fields")?)?,
        created_ts: row.try_get("created_ts")?,
        updated_ts: row.try_get("updated_ts")?,
    })
}

pub(crate) async fn select_profile_by_user_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query(
        r#"
SELECT
    id,
    user_id,
    is_individual,
    first_name,
    last_name,
    company_name,
    phone_number,
    date_of_birth,
    preferred_currency_id,
    is_translator,
    is_interpreter,
    avatar,
    secondary_email,
    secondary_phone,
    additional_fields,
    created_ts,
    updated_ts
FROM
    profile
WHERE
    user_id = ?1
        "#,
    )
    .bind(user_id)
    .try_map(profile_from_row)
    .fetch_optional(&mut *conn)
    .await
}

/// Returns the profile of the user, inserting an empty one first if the
/// user does not have one.
pub(crate) async fn find_or_create_profile(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Profile, BackendError> {
    let ts = Utc::now().timestamp();
    let rows_affected = sqlx::query(
        r#"
INSERT INTO profile (
    user_id,
    created_ts,
    updated_ts
)
VALUES ( ?1, ?2, ?2 )
ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(ts)
    .execute(&mut *conn)
    .await?
    .rows_affected();
    if rows_affected > 0 {
        log::info!("created profile for user_id: {user_id}");
    }
    select_profile_by_user_id(conn, user_id).await?
        .ok_or_else(|| BackendError::AppInvariantViolation(format!(
            "profile for user_id {user_id} is missing after creation"
        )))
}

pub(crate) async fn select_address(
    conn: &mut SqliteConnection,
    addressable_kind: &str,
    addressable_id: i64,
) -> Result<Option<Address>, sqlx::Error> {
    sqlx::query(
        r#"
SELECT
    id,
    addressable_kind,
    addressable_id,
    address_line_1,
    address_line_2,
    city,
    state,
    postal_code,
    country,
    type
FROM
    address
WHERE
    addressable_kind = ?1 AND addressable_id = ?2
        "#,
    )
    .bind(addressable_kind)
    .bind(addressable_id)
    .try_map(|row: SqliteRow| Ok(Address {
        id: row.try_get("id")?,
        addressable_kind: row.try_get("addressable_kind")?,
        addressable_id: row.try_get("addressable_id")?,
        address_line_1: row.try_get("address_line_1")?,
        address_line_2: row.try_get("address_line_2")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        postal_code: row.try_get("postal_code")?,
        country: row.try_get("country")?,
        kind: row.try_get("type")?,
    }))
    .fetch_optional(&mut *conn)
    .await
}

pub(crate) async fn select_profile_languages(
    conn: &mut SqliteConnection,
    profile_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query(
        r#"
SELECT
    language_id
FROM
    language_profile
WHERE
    profile_id = ?1
ORDER BY
    id
        "#,
    )
    .bind(profile_id)
    .try_map(|row: SqliteRow| row.try_get("language_id"))
    .fetch_all(&mut *conn)
    .await
}

async fn set_profile_avatar_sqlite(
    sqlite: &SqliteBackend,
    profile_id: i64,
    avatar: Option<&str>,
) -> Result<bool, BackendError> {
    let ts = Utc::now().timestamp();
    let rows_affected = sqlx::query(
        r#"
UPDATE
    profile
SET
    avatar = ?2,
    updated_ts = ?3
WHERE
    id = ?1
        "#,
    )
    .bind(profile_id)
    .bind(avatar)
    .bind(ts)
    .execute(&*sqlite.pool)
    .await?
    .rows_affected();
    Ok(rows_affected > 0)
}

#[async_trait]
impl ProfileBackend for SqliteBackend {
    async fn get_profile_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<Profile>, BackendError> {
        let mut conn = self.pool.acquire().await?;
        Ok(select_profile_by_user_id(&mut conn, user_id).await?)
    }

    async fn ensure_profile(
        &self,
        user_id: i64,
    ) -> Result<Profile, BackendError> {
        let mut conn = self.pool.acquire().await?;
        find_or_create_profile(&mut conn, user_id).await
    }

    async fn set_profile_avatar(
        &self,
        profile_id: i64,
        avatar: Option<&str>,
    ) -> Result<bool, BackendError> {
        set_profile_avatar_sqlite(&self, profile_id, avatar).await
    }

    async fn get_profile_address(
        &self,
        profile_id: i64,
    ) -> Result<Option<Address>, BackendError> {
        let mut conn = self.pool.acquire().await?;
        Ok(select_address(&mut conn, Address::PROFILE_KIND, profile_id).await?)
    }

    async fn get_profile_languages(
        &self,
        profile_id: i64,
    ) -> Result<Vec<i64>, BackendError> {
        let mut conn = self.pool.acquire().await?;
        Ok(select_profile_languages(&mut conn, profile_id).await?)
    }
}
