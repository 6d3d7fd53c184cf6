use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::dto::club::CreateClubRequest;
use crate::error::{Result, StorageError};
use crate::models::Club;

pub struct ClubRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ClubRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Club>> {
        let clubs = sqlx::query_as::<_, Club>(
            "SELECT club_id, name, city, created_at FROM clubs ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(clubs)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Club> {
        let club = sqlx::query_as::<_, Club>(
            "SELECT club_id, name, city, created_at FROM clubs WHERE club_id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(club)
    }

    pub async fn create(&self, req: &CreateClubRequest) -> Result<Club> {
        let mut conn = self.pool.acquire().await?;
        let club = insert_club(&mut conn, req).await?;
        tracing::info!(club_id = %club.club_id, name = %club.name, "Club created");
        Ok(club)
    }

    /// Delete a club. Its athletes stay, without a club.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM clubs WHERE club_id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

pub async fn find_club_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<Club>> {
    let club = sqlx::query_as::<_, Club>(
        "SELECT club_id, name, city, created_at FROM clubs WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(club)
}

pub async fn insert_club(conn: &mut SqliteConnection, req: &CreateClubRequest) -> Result<Club> {
    let club = sqlx::query_as::<_, Club>(
        r#"
        INSERT INTO clubs (club_id, name, city)
        VALUES (?, ?, ?)
        RETURNING club_id, name, city, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.city)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| StorageError::from(e).describe_constraint(&format!("Club '{}'", req.name)))?;

    Ok(club)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::athlete::CreateAthleteRequest;
    use crate::models::Gender;
    use crate::repository::athlete::AthleteRepository;
    use crate::test_support::migrated_db;
    use rust_decimal::Decimal;

    fn club(name: &str) -> CreateClubRequest {
        CreateClubRequest {
            name: name.to_string(),
            city: Some("Lyon".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_list_and_lookup_by_name() {
        let db = migrated_db().await;
        let repo = ClubRepository::new(db.pool());

        repo.create(&club("Yawara")).await.unwrap();
        let budokan = repo.create(&club("Budokan")).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Budokan", "Yawara"]);

        let mut conn = db.pool().acquire().await.unwrap();
        let found = find_club_by_name(&mut conn, "Budokan").await.unwrap();
        assert_eq!(found.map(|c| c.club_id), Some(budokan.club_id));
        assert!(find_club_by_name(&mut conn, "Missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_constraint_violation() {
        let db = migrated_db().await;
        let repo = ClubRepository::new(db.pool());
        repo.create(&club("Yawara")).await.unwrap();

        let err = repo.create(&club("Yawara")).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_delete_detaches_athletes() {
        let db = migrated_db().await;
        let clubs = ClubRepository::new(db.pool());
        let athletes = AthleteRepository::new(db.pool());
        let created = clubs.create(&club("Yawara")).await.unwrap();

        let athlete = athletes
            .create(&CreateAthleteRequest {
                first_name: "Lea".to_string(),
                last_name: "Martin".to_string(),
                birth_date: None,
                gender: Gender::Female,
                weight: Decimal::ZERO,
                rank: None,
                club_id: Some(created.club_id),
                nationality: None,
                license_number: None,
            })
            .await
            .unwrap();
        assert_eq!(athletes.list_by_club(created.club_id).await.unwrap().len(), 1);

        clubs.delete(created.club_id).await.unwrap();

        let reloaded = athletes.find_by_id(athlete.athlete_id).await.unwrap();
        assert_eq!(reloaded.club_id, None);
        assert!(matches!(clubs.find_by_id(created.club_id).await, Err(StorageError::NotFound)));
    }
}
