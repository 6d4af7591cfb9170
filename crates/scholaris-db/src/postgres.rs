//! PostgreSQL implementation of [`SchoolStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{AccountStatus, Role};
use scholaris_models::{Account, Credentials, ParentProfile, StudentProfile, TeacherProfile};

use crate::error::StoreError;
use crate::store::SchoolStore;

#[derive(FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password: String,
    role: String,
    status: String,
    last_login: Option<DateTime<Utc>>,
}

impl AccountRow {
    fn into_credentials(self) -> Result<Credentials, StoreError> {
        let role: Role = self
            .role
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("user {}: {}", self.id, e)))?;
        let status = AccountStatus::from(self.status.as_str());

        Ok(Credentials {
            account: Account {
                id: self.id,
                email: self.email,
                role,
                status,
                last_login: self.last_login,
            },
            password_hash: self.password,
        })
    }
}

#[derive(FromRow)]
struct StudentRow {
    id: Uuid,
    user_id: Uuid,
    first_name: String,
    last_name: String,
    current_class_id: Option<Uuid>,
}

#[derive(FromRow)]
struct PersonRow {
    id: Uuid,
    user_id: Uuid,
    first_name: String,
    last_name: String,
}

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts an account and the directory record matching its role.
    ///
    /// Admins have no directory record.
    #[instrument(skip(self, password_hash))]
    pub async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        first_name: &str,
        last_name: &str,
    ) -> Result<Account, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO users (email, password, role, status)
            VALUES ($1, $2, $3, 'active')
            RETURNING id, email, password, role, status, last_login
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let profile_table = match role {
            Role::Admin => None,
            Role::Teacher => Some("teachers"),
            Role::Student => Some("students"),
            Role::Parent => Some("parents"),
        };

        if let Some(table) = profile_table {
            let sql = format!(
                "INSERT INTO {} (user_id, first_name, last_name) VALUES ($1, $2, $3)",
                table
            );
            sqlx::query(&sql)
                .bind(row.id)
                .bind(first_name)
                .bind(last_name)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(row.into_credentials()?.account)
    }

    async fn exists(&self, sql: &str, a: Uuid, b: Uuid) -> Result<bool, StoreError> {
        let found: bool = sqlx::query_scalar(sql)
            .bind(a)
            .bind(b)
            .fetch_one(&self.pool)
            .await?;
        Ok(found)
    }
}

#[async_trait]
impl SchoolStore for PgStore {
    #[instrument(skip(self))]
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password, role, status, last_login
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_credentials).transpose()
    }

    #[instrument(skip(self))]
    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password, role, status, last_login
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(AccountRow::into_credentials)
            .transpose()?
            .map(|credentials| credentials.account))
    }

    #[instrument(skip(self))]
    async fn record_login(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_login = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn student_belongs_to(
        &self,
        student_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM students WHERE id = $1 AND user_id = $2)",
            student_id,
            user_id,
        )
        .await
    }

    async fn parent_linked_to_student(
        &self,
        user_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.exists(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM parent_student_relationships psr
                JOIN parents p ON p.id = psr.parent_id
                WHERE p.user_id = $1 AND psr.student_id = $2 AND psr.status = 'active'
            )
            "#,
            user_id,
            student_id,
        )
        .await
    }

    async fn teacher_assigned_to_student(
        &self,
        user_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.exists(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM students s
                JOIN teacher_class_assignments tca ON tca.class_id = s.current_class_id
                JOIN teachers t ON t.id = tca.teacher_id
                WHERE t.user_id = $1 AND s.id = $2
            )
            "#,
            user_id,
            student_id,
        )
        .await
    }

    async fn teacher_belongs_to(
        &self,
        teacher_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1 AND user_id = $2)",
            teacher_id,
            user_id,
        )
        .await
    }

    async fn parent_belongs_to(&self, parent_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM parents WHERE id = $1 AND user_id = $2)",
            parent_id,
            user_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_student(&self, id: Uuid) -> Result<Option<StudentProfile>, StoreError> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT id, user_id, first_name, last_name, current_class_id FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| StudentProfile {
            id: r.id,
            user_id: r.user_id,
            first_name: r.first_name,
            last_name: r.last_name,
            current_class_id: r.current_class_id,
        }))
    }

    #[instrument(skip(self))]
    async fn find_teacher(&self, id: Uuid) -> Result<Option<TeacherProfile>, StoreError> {
        let row = sqlx::query_as::<_, PersonRow>(
            "SELECT id, user_id, first_name, last_name FROM teachers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| TeacherProfile {
            id: r.id,
            user_id: r.user_id,
            first_name: r.first_name,
            last_name: r.last_name,
        }))
    }

    #[instrument(skip(self))]
    async fn find_parent(&self, id: Uuid) -> Result<Option<ParentProfile>, StoreError> {
        let row = sqlx::query_as::<_, PersonRow>(
            "SELECT id, user_id, first_name, last_name FROM parents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| ParentProfile {
            id: r.id,
            user_id: r.user_id,
            first_name: r.first_name,
            last_name: r.last_name,
        }))
    }
}
