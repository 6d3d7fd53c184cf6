use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{AgeCategory, Ruleset, RulesetRow};
use crate::services::RulesetCatalog;

/// A ruleset about to be written, categories in priority order.
#[derive(Debug, Clone)]
pub struct NewRuleset<'r> {
    pub name: &'r str,
    pub description: Option<&'r str>,
    pub categories: &'r [AgeCategory],
}

/// Repository for Ruleset database operations
pub struct RulesetRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RulesetRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all rulesets, oldest first
    pub async fn list(&self) -> Result<Vec<Ruleset>> {
        let rows = sqlx::query_as::<_, RulesetRow>(
            r#"
            SELECT ruleset_id, name, description, is_active, created_at
            FROM rulesets
            ORDER BY created_at, name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let mut conn = self.pool.acquire().await?;
        let mut rulesets = Vec::with_capacity(rows.len());
        for row in rows {
            let categories = load_categories(&mut conn, row.ruleset_id).await?;
            rulesets.push(Ruleset::from_row(row, categories));
        }

        Ok(rulesets)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Ruleset> {
        let mut conn = self.pool.acquire().await?;
        find_ruleset(&mut conn, id).await
    }

    /// The active ruleset, `NotFound` when none is active
    pub async fn find_active(&self) -> Result<Ruleset> {
        let row = sqlx::query_as::<_, RulesetRow>(
            r#"
            SELECT ruleset_id, name, description, is_active, created_at
            FROM rulesets
            WHERE is_active = 1
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        let mut conn = self.pool.acquire().await?;
        let categories = load_categories(&mut conn, row.ruleset_id).await?;
        Ok(Ruleset::from_row(row, categories))
    }

    /// Create a ruleset with its categories, optionally making it active
    pub async fn create(&self, new: &NewRuleset<'_>, activate: bool) -> Result<Ruleset> {
        let mut tx = self.pool.begin().await?;

        let ruleset_id = insert_ruleset(&mut tx, new).await?;
        if activate {
            activate_ruleset(&mut tx, ruleset_id).await?;
        }
        let ruleset = find_ruleset(&mut tx, ruleset_id).await?;

        tx.commit().await?;
        tracing::info!(%ruleset_id, name = new.name, activate, "Ruleset created");

        Ok(ruleset)
    }

    /// Make `id` the single active ruleset
    pub async fn set_active(&self, id: Uuid) -> Result<Ruleset> {
        let mut tx = self.pool.begin().await?;
        activate_ruleset(&mut tx, id).await?;
        let ruleset = find_ruleset(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(ruleset_id = %id, "Active ruleset changed");
        Ok(ruleset)
    }

    /// Delete a ruleset. Tournaments keep their snapshots.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM rulesets WHERE ruleset_id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Load every stored ruleset into an in-memory catalog
    pub async fn load_catalog(&self) -> Result<RulesetCatalog> {
        Ok(RulesetCatalog::from_rulesets(self.list().await?))
    }
}

pub async fn find_ruleset(conn: &mut SqliteConnection, id: Uuid) -> Result<Ruleset> {
    let row = sqlx::query_as::<_, RulesetRow>(
        r#"
        SELECT ruleset_id, name, description, is_active, created_at
        FROM rulesets
        WHERE ruleset_id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(StorageError::NotFound)?;

    let categories = load_categories(conn, id).await?;
    Ok(Ruleset::from_row(row, categories))
}

/// Id of the ruleset called `name`, if any
pub async fn find_ruleset_id_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<Uuid>> {
    let id: Option<Uuid> = sqlx::query_scalar("SELECT ruleset_id FROM rulesets WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(id)
}

async fn load_categories(conn: &mut SqliteConnection, ruleset_id: Uuid) -> Result<Vec<AgeCategory>> {
    let categories = sqlx::query_as::<_, AgeCategory>(
        r#"
        SELECT name, min_age, max_age, gender
        FROM age_categories
        WHERE ruleset_id = ?
        ORDER BY position
        "#,
    )
    .bind(ruleset_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(categories)
}

/// Insert a ruleset (inactive) and its categories on an open connection or
/// transaction
pub async fn insert_ruleset(conn: &mut SqliteConnection, new: &NewRuleset<'_>) -> Result<Uuid> {
    let ruleset_id = Uuid::new_v4();

    sqlx::query("INSERT INTO rulesets (ruleset_id, name, description) VALUES (?, ?, ?)")
        .bind(ruleset_id)
        .bind(new.name)
        .bind(new.description)
        .execute(&mut *conn)
        .await
        .map_err(|e| StorageError::from(e).describe_constraint(&format!("Ruleset '{}'", new.name)))?;

    for (position, category) in new.categories.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO age_categories (ruleset_id, position, name, min_age, max_age, gender)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(ruleset_id)
        .bind(position as i64)
        .bind(&category.name)
        .bind(category.min_age)
        .bind(category.max_age)
        .bind(category.gender.as_str())
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            StorageError::from(e).describe_constraint(&format!("Category '{}'", category.name))
        })?;
    }

    Ok(ruleset_id)
}

/// Deactivate every ruleset, then activate `id`. Run inside a transaction so
/// no reader sees zero or two active rulesets.
pub async fn activate_ruleset(conn: &mut SqliteConnection, id: Uuid) -> Result<()> {
    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rulesets WHERE ruleset_id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if found == 0 {
        return Err(StorageError::NotFound);
    }

    // two statements: the partial unique index is checked row by row
    sqlx::query("UPDATE rulesets SET is_active = 0 WHERE is_active = 1")
        .execute(&mut *conn)
        .await?;
    sqlx::query("UPDATE rulesets SET is_active = 1 WHERE ruleset_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryGender;
    use crate::test_support::migrated_db;

    fn categories() -> Vec<AgeCategory> {
        vec![
            AgeCategory::new("U-18 Cadets (M)", 15, 17, CategoryGender::M),
            AgeCategory::new("Seniors (M)", 21, 125, CategoryGender::M),
            AgeCategory::new("Open", 18, 125, CategoryGender::Mixed),
        ]
    }

    fn new_ruleset<'r>(name: &'r str, categories: &'r [AgeCategory]) -> NewRuleset<'r> {
        NewRuleset {
            name,
            description: Some("test"),
            categories,
        }
    }

    #[tokio::test]
    async fn test_create_keeps_category_order() {
        let db = migrated_db().await;
        let repo = RulesetRepository::new(db.pool());
        let categories = categories();

        let created = repo.create(&new_ruleset("2025", &categories), false).await.unwrap();
        let loaded = repo.find_by_id(created.ruleset_id).await.unwrap();

        assert_eq!(loaded.categories, categories);
        assert!(!loaded.is_active);
        assert_eq!(loaded.description.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn test_set_active_is_exclusive() {
        let db = migrated_db().await;
        let repo = RulesetRepository::new(db.pool());
        let categories = categories();

        let first = repo.create(&new_ruleset("2024", &categories), true).await.unwrap();
        let second = repo.create(&new_ruleset("2025", &categories), false).await.unwrap();
        assert_eq!(repo.find_active().await.unwrap().ruleset_id, first.ruleset_id);

        repo.set_active(second.ruleset_id).await.unwrap();

        let rulesets = repo.list().await.unwrap();
        assert_eq!(rulesets.iter().filter(|r| r.is_active).count(), 1);
        assert_eq!(repo.find_active().await.unwrap().ruleset_id, second.ruleset_id);

        let catalog = repo.load_catalog().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.active().map(|r| r.ruleset_id), Some(second.ruleset_id));
    }

    #[tokio::test]
    async fn test_set_active_unknown_keeps_current() {
        let db = migrated_db().await;
        let repo = RulesetRepository::new(db.pool());
        let categories = categories();
        let first = repo.create(&new_ruleset("2024", &categories), true).await.unwrap();

        let err = repo.set_active(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
        assert_eq!(repo.find_active().await.unwrap().ruleset_id, first.ruleset_id);
    }

    #[tokio::test]
    async fn test_no_active_ruleset() {
        let db = migrated_db().await;
        let repo = RulesetRepository::new(db.pool());
        assert!(matches!(repo.find_active().await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_constraint_violation() {
        let db = migrated_db().await;
        let repo = RulesetRepository::new(db.pool());
        let categories = categories();
        repo.create(&new_ruleset("2025", &categories), false).await.unwrap();

        let err = repo.create(&new_ruleset("2025", &categories), false).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_find_id_by_name() {
        let db = migrated_db().await;
        let repo = RulesetRepository::new(db.pool());
        let categories = categories();
        let created = repo.create(&new_ruleset("2025", &categories), false).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(
            find_ruleset_id_by_name(&mut conn, "2025").await.unwrap(),
            Some(created.ruleset_id)
        );
        assert_eq!(find_ruleset_id_by_name(&mut conn, "1999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_cascades_categories() {
        let db = migrated_db().await;
        let repo = RulesetRepository::new(db.pool());
        let categories = categories();
        let created = repo.create(&new_ruleset("2025", &categories), false).await.unwrap();

        repo.delete(created.ruleset_id).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM age_categories")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert!(matches!(repo.delete(created.ruleset_id).await, Err(StorageError::NotFound)));
    }
}
