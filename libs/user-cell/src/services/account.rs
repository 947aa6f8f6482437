use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use shared_utils::jwt::sign_token;

use crate::models::{NewUser, UserError, UserRecord};

pub struct AccountService {
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, user: NewUser) -> Result<UserRecord, UserError> {
        if user.name.trim().is_empty()
            || user.email.trim().is_empty()
            || user.password.is_empty()
            || user.role.trim().is_empty()
        {
            return Err(UserError::ValidationError(
                "name, email, password and role are required".to_string(),
            ));
        }

        let password_hash = Self::hash_password(&user.password)?;
        let now = Utc::now();

        // The unique index on email turns a duplicate insert into EmailTaken.
        let result = sqlx::query(
            "INSERT INTO users (name, email, password, role, overview, avatar, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&password_hash)
        .bind(&user.role)
        .bind(&user.overview)
        .bind(&user.avatar)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let user_id = result.last_insert_rowid();
        info!("Registered user {} ({})", user_id, user.email);
        self.get(user_id).await
    }

    /// Verify credentials and issue a bearer token. Unknown email and wrong
    /// password collapse into the same error.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        jwt_secret: &str,
    ) -> Result<String, UserError> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password)? {
            debug!("Password mismatch for {}", email);
            return Err(UserError::InvalidCredentials);
        }

        let token = sign_token(
            &user.id.to_string(),
            Some(&user.email),
            Some(&user.role),
            jwt_secret,
        )
        .map_err(UserError::Token)?;

        info!("User {} logged in", user.id);
        Ok(token)
    }

    pub async fn get(&self, user_id: i64) -> Result<UserRecord, UserError> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        user.ok_or(UserError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>, UserError> {
        let users = sqlx::query_as::<_, UserRecord>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    fn hash_password(password: &str) -> Result<String, UserError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UserError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(password: &str, hash: &str) -> Result<bool, UserError> {
        let parsed = PasswordHash::new(hash).map_err(|e| UserError::Hash(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(UserError::Hash(e.to_string())),
        }
    }
}
