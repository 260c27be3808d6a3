use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::LoginId;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::IdentityError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    login: String,
    password_hash: String,
    is_active: bool,
    is_verified: bool,
    is_superuser: bool,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = IdentityError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            login: LoginId::new(row.login)?,
            password_hash: row.password_hash,
            is_active: row.is_active,
            is_verified: row.is_verified,
            is_superuser: row.is_superuser,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, login, password_hash, is_active, is_verified, is_superuser, \
                              created_at, last_login_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, IdentityError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, login, password_hash, is_active, is_verified, is_superuser,
                               created_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id.0)
        .bind(user.login.as_str())
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.is_superuser)
        .bind(user.created_at)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                // The login uniqueness constraint is the race defense for
                // concurrent registrations.
                if db_err.is_unique_violation() {
                    return IdentityError::DuplicateLogin(user.login.as_str().to_string());
                }
            }
            IdentityError::Database(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", SELECT_COLUMNS))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| IdentityError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_login(&self, login: &LoginId) -> Result<Option<User>, IdentityError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE login = $1",
            SELECT_COLUMNS
        ))
        .bind(login.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn update(&self, user: User) -> Result<User, IdentityError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET login = $2, password_hash = $3, is_active = $4, is_verified = $5,
                is_superuser = $6, last_login_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.login.as_str())
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.is_superuser)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return IdentityError::DuplicateLogin(user.login.as_str().to_string());
                }
            }
            IdentityError::Database(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }
}
