//! Postgres-backed document store for user records.
//!
//! One row per user; sequence-valued fields (`researchInterest`,
//! `eventbasedRole`) live in array/JSONB columns so the persisted shape
//! round-trips exactly. Uniqueness of username and email is enforced by
//! unique indexes — the authoritative enforcement; violations surface as
//! the store's duplicate errors, which the core maps into its taxonomy.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::info;
use uuid::Uuid;

use account_core::store::search::SearchAttribute;
use account_core::{
    EventRole, Role, StoreError, User, UserFilter, UserPatch, UserQuery, UserStore, UserUpdate,
};

/// Postgres error code for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

const USER_COLUMNS: &str = "id, title, gender, firstname, lastname, username, email, \
     password_hash, organisation, address, city, country, zip_code, field_of_activity, \
     research_interest, role, security_question, security_answer, eventbased_role";

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        title TEXT,
        gender TEXT,
        firstname TEXT NOT NULL,
        lastname TEXT NOT NULL,
        username TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        organisation TEXT,
        address TEXT,
        city TEXT,
        country TEXT,
        zip_code BIGINT,
        field_of_activity TEXT NOT NULL,
        research_interest TEXT[] NOT NULL DEFAULT '{}',
        role TEXT NOT NULL DEFAULT 'user',
        security_question TEXT NOT NULL,
        security_answer TEXT NOT NULL,
        eventbased_role JSONB NOT NULL DEFAULT '[]'
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON users (username)",
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)",
];

#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Create a store from an existing pool. Useful for testing.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database behind `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the pool cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await
            .map_err(backend)?;

        info!("database connection pool created");
        Ok(Self { pool })
    }

    /// Create the users table and its unique indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on DDL failure.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(backend)?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Translate a unique-index violation into the duplicate it names.
fn write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return match db.constraint() {
                Some("users_username_key") => StoreError::DuplicateUsername,
                Some("users_email_key") => StoreError::DuplicateEmail,
                _ => backend(err),
            };
        }
    }
    backend(err)
}

fn map_user(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let eventbased_role: Json<Vec<EventRole>> = row.try_get("eventbased_role")?;
    Ok(User {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        gender: row.try_get("gender")?,
        firstname: row.try_get("firstname")?,
        lastname: row.try_get("lastname")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password: row.try_get("password_hash")?,
        organisation: row.try_get("organisation")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        country: row.try_get("country")?,
        zip_code: row.try_get("zip_code")?,
        field_of_activity: row.try_get("field_of_activity")?,
        research_interest: row.try_get("research_interest")?,
        role: Role::from_stored(&role),
        security_question: row.try_get("security_question")?,
        security_answer: row.try_get("security_answer")?,
        eventbased_role: eventbased_role.0,
    })
}

fn push_profile_assignments<'a>(
    builder: &mut QueryBuilder<'a, Postgres>,
    update: &'a UserUpdate,
) {
    let mut assignments = builder.separated(", ");
    if let Some(v) = &update.title {
        assignments.push("title = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.gender {
        assignments.push("gender = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.firstname {
        assignments.push("firstname = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.lastname {
        assignments.push("lastname = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.username {
        assignments.push("username = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.email {
        assignments.push("email = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.organisation {
        assignments.push("organisation = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.address {
        assignments.push("address = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.city {
        assignments.push("city = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.country {
        assignments.push("country = ").push_bind_unseparated(v);
    }
    if let Some(v) = update.zip_code {
        assignments.push("zip_code = ").push_bind_unseparated(v);
    }
    if let Some(v) = &update.field_of_activity {
        assignments
            .push("field_of_activity = ")
            .push_bind_unseparated(v);
    }
    if let Some(v) = &update.research_interest {
        assignments
            .push("research_interest = ")
            .push_bind_unseparated(v);
    }
    if let Some(v) = update.role {
        assignments.push("role = ").push_bind_unseparated(v.as_str());
    }
    if let Some(v) = &update.security_question {
        assignments
            .push("security_question = ")
            .push_bind_unseparated(v);
    }
    if let Some(v) = &update.security_answer {
        assignments
            .push("security_answer = ")
            .push_bind_unseparated(v);
    }
    if let Some(v) = &update.eventbased_role {
        assignments
            .push("eventbased_role = ")
            .push_bind_unseparated(Json(v));
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(user.id)
            .bind(&user.title)
            .bind(&user.gender)
            .bind(&user.firstname)
            .bind(&user.lastname)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.organisation)
            .bind(&user.address)
            .bind(&user.city)
            .bind(&user.country)
            .bind(user.zip_code)
            .bind(&user.field_of_activity)
            .bind(&user.research_interest)
            .bind(user.role.as_str())
            .bind(&user.security_question)
            .bind(&user.security_answer)
            .bind(Json(&user.eventbased_role))
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)?;
        map_user(&row).map_err(backend)
    }

    async fn find_one(&self, query: &UserQuery) -> Result<Option<User>, StoreError> {
        let row = match query {
            UserQuery::ById(id) => {
                sqlx::query(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
                ))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
            }
            UserQuery::ByUsername(username) => {
                sqlx::query(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
                ))
                .bind(username)
                .fetch_optional(&self.pool)
                .await
            }
            UserQuery::ByEmail(email) => {
                sqlx::query(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
                ))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(backend)?;

        row.as_ref().map(map_user).transpose().map_err(backend)
    }

    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let rows = match filter {
            UserFilter::All => {
                sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users"))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(backend)?
            }
            UserFilter::Matching(search) => {
                if search.attributes.is_empty() {
                    return Ok(Vec::new());
                }
                let pattern = search.pattern.alternation();
                let mut builder = QueryBuilder::<Postgres>::new(format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE "
                ));
                let mut first = true;
                for attribute in &search.attributes {
                    if !first {
                        builder.push(" OR ");
                    }
                    first = false;
                    match attribute {
                        SearchAttribute::ResearchInterest => {
                            // Array column: any element may match.
                            builder.push(
                                "EXISTS (SELECT 1 FROM unnest(research_interest) AS tag \
                                 WHERE tag ~* ",
                            );
                            builder.push_bind(pattern.clone());
                            builder.push(")");
                        }
                        other => {
                            builder.push(other.column());
                            builder.push(" ~* ");
                            builder.push_bind(pattern.clone());
                        }
                    }
                }
                builder
                    .build()
                    .fetch_all(&self.pool)
                    .await
                    .map_err(backend)?
            }
        };

        rows.iter().map(map_user).collect::<Result<_, _>>().map_err(backend)
    }

    async fn update_one(&self, id: Uuid, patch: UserPatch<'_>) -> Result<Option<User>, StoreError> {
        match patch {
            UserPatch::Profile(update) if update.is_empty() => self.find_one(&UserQuery::ById(id)).await,
            UserPatch::Profile(update) => {
                let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET ");
                push_profile_assignments(&mut builder, update);
                builder.push(" WHERE id = ");
                builder.push_bind(id);
                builder.push(format!(" RETURNING {USER_COLUMNS}"));

                let row = builder
                    .build()
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(write_error)?;
                row.as_ref().map(map_user).transpose().map_err(backend)
            }
            UserPatch::Password(hash) => {
                let sql = format!(
                    "UPDATE users SET password_hash = $1 WHERE id = $2 RETURNING {USER_COLUMNS}"
                );
                let row = sqlx::query(&sql)
                    .bind(hash)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(backend)?;
                row.as_ref().map(map_user).transpose().map_err(backend)
            }
        }
    }

    async fn delete_one(&self, query: &UserQuery) -> Result<Option<User>, StoreError> {
        let row = match query {
            UserQuery::ById(id) => {
                sqlx::query(&format!(
                    "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
                ))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
            }
            UserQuery::ByUsername(username) => {
                sqlx::query(&format!(
                    "DELETE FROM users WHERE username = $1 RETURNING {USER_COLUMNS}"
                ))
                .bind(username)
                .fetch_optional(&self.pool)
                .await
            }
            UserQuery::ByEmail(email) => {
                sqlx::query(&format!(
                    "DELETE FROM users WHERE email = $1 RETURNING {USER_COLUMNS}"
                ))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(backend)?;

        row.as_ref().map(map_user).transpose().map_err(backend)
    }
}
