use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use welfare_application::{RoleAssignment, RoleAssignmentRepository};
use welfare_core::{AppError, AppResult};
use welfare_domain::Role;

/// PostgreSQL-backed role store.
#[derive(Clone)]
pub struct PostgresRoleAssignmentRepository {
    pool: PgPool,
}

impl PostgresRoleAssignmentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BaseRoleRow {
    subject: String,
    base_role: String,
}

#[derive(Debug, FromRow)]
struct EnhancedRoleRow {
    subject: String,
    role: String,
}

#[async_trait]
impl RoleAssignmentRepository for PostgresRoleAssignmentRepository {
    async fn find_assignment(&self, subject: &str) -> AppResult<Option<RoleAssignment>> {
        let base_row = sqlx::query_as::<_, BaseRoleRow>(
            r#"
            SELECT subject, base_role
            FROM user_roles
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load base role: {error}")))?;

        let Some(base_row) = base_row else {
            return Ok(None);
        };

        let enhanced_rows = sqlx::query_as::<_, EnhancedRoleRow>(
            r#"
            SELECT subject, role
            FROM user_enhanced_roles
            WHERE subject = $1
            ORDER BY position
            "#,
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load enhanced roles: {error}")))?;

        Ok(Some(RoleAssignment {
            subject: base_row.subject,
            base_role: Role::new(base_row.base_role),
            enhanced_roles: enhanced_rows
                .into_iter()
                .map(|row| Role::new(row.role))
                .collect(),
        }))
    }

    async fn list_assignments(&self) -> AppResult<Vec<RoleAssignment>> {
        let base_rows = sqlx::query_as::<_, BaseRoleRow>(
            r#"
            SELECT subject, base_role
            FROM user_roles
            ORDER BY subject
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list base roles: {error}")))?;

        let enhanced_rows = sqlx::query_as::<_, EnhancedRoleRow>(
            r#"
            SELECT subject, role
            FROM user_enhanced_roles
            ORDER BY subject, position
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list enhanced roles: {error}")))?;

        let mut enhanced_by_subject: BTreeMap<String, Vec<Role>> = BTreeMap::new();
        for row in enhanced_rows {
            enhanced_by_subject
                .entry(row.subject)
                .or_default()
                .push(Role::new(row.role));
        }

        Ok(base_rows
            .into_iter()
            .map(|row| RoleAssignment {
                enhanced_roles: enhanced_by_subject.remove(&row.subject).unwrap_or_default(),
                subject: row.subject,
                base_role: Role::new(row.base_role),
            })
            .collect())
    }

    async fn save_assignment(&self, assignment: RoleAssignment) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start role assignment transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO user_roles (subject, base_role, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (subject)
            DO UPDATE SET base_role = EXCLUDED.base_role, updated_at = now()
            "#,
        )
        .bind(assignment.subject.as_str())
        .bind(assignment.base_role.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save base role: {error}")))?;

        sqlx::query(
            r#"
            DELETE FROM user_enhanced_roles
            WHERE subject = $1
            "#,
        )
        .bind(assignment.subject.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to clear enhanced roles: {error}"))
        })?;

        for (position, role) in assignment.enhanced_roles.iter().enumerate() {
            let position = i32::try_from(position).map_err(|_| {
                AppError::Validation("too many enhanced roles in one assignment".to_owned())
            })?;

            sqlx::query(
                r#"
                INSERT INTO user_enhanced_roles (subject, role, position)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(assignment.subject.as_str())
            .bind(role.as_str())
            .bind(position)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to save enhanced role: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit role assignment: {error}"))
        })?;

        Ok(())
    }
}
