use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::dto::athlete::{CreateAthleteRequest, UpdateAthleteRequest};
use crate::dto::common::PaginationParams;
use crate::error::{Result, StorageError};
use crate::models::{Athlete, NormalizedAthleteName};

const ATHLETE_COLUMNS: &str = "athlete_id, first_name, last_name, birth_date, gender, weight, \
     rank, club_id, nationality, license_number, created_at";

pub struct AthleteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of athletes ordered by name, plus the total count
    pub async fn list(&self, params: &PaginationParams) -> Result<(Vec<Athlete>, i64)> {
        let athletes = sqlx::query_as::<_, Athlete>(&format!(
            "SELECT {} FROM athletes ORDER BY last_name, first_name LIMIT ? OFFSET ?",
            ATHLETE_COLUMNS
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM athletes")
            .fetch_one(self.pool)
            .await?;

        Ok((athletes, total))
    }

    pub async fn list_by_club(&self, club_id: Uuid) -> Result<Vec<Athlete>> {
        let athletes = sqlx::query_as::<_, Athlete>(&format!(
            "SELECT {} FROM athletes WHERE club_id = ? ORDER BY last_name, first_name",
            ATHLETE_COLUMNS
        ))
        .bind(club_id)
        .fetch_all(self.pool)
        .await?;

        Ok(athletes)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Athlete> {
        let mut conn = self.pool.acquire().await?;
        find_athlete(&mut conn, id).await
    }

    pub async fn create(&self, req: &CreateAthleteRequest) -> Result<Athlete> {
        let mut conn = self.pool.acquire().await?;
        let athlete = insert_athlete(&mut conn, req).await?;
        tracing::info!(athlete_id = %athlete.athlete_id, "Athlete created");
        Ok(athlete)
    }

    /// Update an existing athlete; absent fields keep their current value,
    /// nullable fields sent as `null` are cleared
    pub async fn update(
        &self,
        id: Uuid,
        existing: &Athlete,
        req: &UpdateAthleteRequest,
    ) -> Result<Athlete> {
        let first_name = req.first_name.as_ref().unwrap_or(&existing.first_name);
        let last_name = req.last_name.as_ref().unwrap_or(&existing.last_name);
        let birth_date = req.birth_date.as_ref().or(existing.birth_date.as_ref());
        let gender = req.gender.unwrap_or(existing.gender);
        let weight = req.weight.unwrap_or(existing.weight);
        let rank = merge_nullable(&req.rank, &existing.rank);
        let club_id = merge_nullable(&req.club_id, &existing.club_id).copied();
        let nationality = merge_nullable(&req.nationality, &existing.nationality);
        let license_number = merge_nullable(&req.license_number, &existing.license_number);

        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            r#"
            UPDATE athletes
            SET first_name = ?,
                last_name = ?,
                birth_date = ?,
                gender = ?,
                weight = ?,
                rank = ?,
                club_id = ?,
                nationality = ?,
                license_number = ?
            WHERE athlete_id = ?
            RETURNING {}
            "#,
            ATHLETE_COLUMNS
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(birth_date)
        .bind(gender.as_str())
        .bind(weight.to_string())
        .bind(rank)
        .bind(club_id)
        .bind(nationality)
        .bind(license_number)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).describe_constraint("Athlete"))?
        .ok_or(StorageError::NotFound)?;

        Ok(athlete)
    }

    /// Delete an athlete by ID
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM athletes WHERE athlete_id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn merge_nullable<'v, T>(update: &'v Option<Option<T>>, current: &'v Option<T>) -> Option<&'v T> {
    match update {
        Some(value) => value.as_ref(),
        None => current.as_ref(),
    }
}

pub async fn find_athlete(conn: &mut SqliteConnection, id: Uuid) -> Result<Athlete> {
    let athlete = sqlx::query_as::<_, Athlete>(&format!(
        "SELECT {} FROM athletes WHERE athlete_id = ?",
        ATHLETE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(StorageError::NotFound)?;

    Ok(athlete)
}

/// Find an athlete with the same name (in either order, any case) and birth
/// date, used to avoid duplicates on import
pub async fn find_matching(
    conn: &mut SqliteConnection,
    name: &NormalizedAthleteName,
    birth_date: Option<&str>,
) -> Result<Option<Athlete>> {
    let candidates = sqlx::query_as::<_, Athlete>(&format!(
        "SELECT {} FROM athletes WHERE birth_date IS ?",
        ATHLETE_COLUMNS
    ))
    .bind(birth_date)
    .fetch_all(&mut *conn)
    .await?;

    Ok(candidates
        .into_iter()
        .find(|a| name.matches(&a.first_name, &a.last_name)))
}

pub async fn insert_athlete(conn: &mut SqliteConnection, req: &CreateAthleteRequest) -> Result<Athlete> {
    let athlete = sqlx::query_as::<_, Athlete>(&format!(
        r#"
        INSERT INTO athletes (
            athlete_id, first_name, last_name, birth_date, gender, weight,
            rank, club_id, nationality, license_number
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        ATHLETE_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(&req.birth_date)
    .bind(req.gender.as_str())
    .bind(req.weight.to_string())
    .bind(&req.rank)
    .bind(req.club_id)
    .bind(&req.nationality)
    .bind(&req.license_number)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| StorageError::from(e).describe_constraint("Athlete"))?;

    Ok(athlete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::test_support::migrated_db;
    use rust_decimal_macros::dec;

    fn request(first: &str, last: &str) -> CreateAthleteRequest {
        CreateAthleteRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            birth_date: Some("2003-09-21".to_string()),
            gender: Gender::Male,
            weight: dec!(72.5),
            rank: Some("brown belt".to_string()),
            club_id: None,
            nationality: None,
            license_number: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_round_trip() {
        let db = migrated_db().await;
        let repo = AthleteRepository::new(db.pool());

        let created = repo.create(&request("Kenji", "Sato")).await.unwrap();
        let found = repo.find_by_id(created.athlete_id).await.unwrap();

        assert_eq!(found.first_name, "Kenji");
        assert_eq!(found.weight, dec!(72.5));
        assert_eq!(found.gender, Gender::Male);
        assert_eq!(found.birth_date.as_deref(), Some("2003-09-21"));
    }

    #[tokio::test]
    async fn test_update_keeps_unspecified_fields() {
        let db = migrated_db().await;
        let repo = AthleteRepository::new(db.pool());
        let created = repo.create(&request("Kenji", "Sato")).await.unwrap();

        let update = UpdateAthleteRequest {
            weight: Some(dec!(74)),
            ..Default::default()
        };
        let updated = repo
            .update(created.athlete_id, &created, &update)
            .await
            .unwrap();

        assert_eq!(updated.weight, dec!(74));
        assert_eq!(updated.rank.as_deref(), Some("brown belt"));
        assert_eq!(updated.last_name, "Sato");
    }

    #[tokio::test]
    async fn test_update_clears_nullable_fields() {
        let db = migrated_db().await;
        let club = crate::repository::ClubRepository::new(db.pool())
            .create(&crate::dto::club::CreateClubRequest {
                name: "Yawara".to_string(),
                city: None,
            })
            .await
            .unwrap();
        let repo = AthleteRepository::new(db.pool());
        let mut req = request("Kenji", "Sato");
        req.club_id = Some(club.club_id);
        let created = repo.create(&req).await.unwrap();
        assert_eq!(created.club_id, Some(club.club_id));

        let update: UpdateAthleteRequest =
            serde_json::from_str(r#"{"club_id": null, "rank": null, "nationality": "JPN"}"#).unwrap();
        let updated = repo
            .update(created.athlete_id, &created, &update)
            .await
            .unwrap();

        assert_eq!(updated.club_id, None);
        assert_eq!(updated.rank, None);
        assert_eq!(updated.nationality.as_deref(), Some("JPN"));
        assert_eq!(updated.weight, created.weight);
    }

    #[tokio::test]
    async fn test_list_is_paginated_and_sorted() {
        let db = migrated_db().await;
        let repo = AthleteRepository::new(db.pool());
        for (first, last) in [("A", "Weber"), ("B", "Abe"), ("C", "Mori")] {
            repo.create(&request(first, last)).await.unwrap();
        }

        let params = PaginationParams {
            page: 1,
            page_size: 2,
        };
        let (page, total) = repo.list(&params).await.unwrap();

        assert_eq!(total, 3);
        let names: Vec<&str> = page.iter().map(|a| a.last_name.as_str()).collect();
        assert_eq!(names, vec!["Abe", "Mori"]);
    }

    #[tokio::test]
    async fn test_find_matching_ignores_name_order() {
        let db = migrated_db().await;
        let repo = AthleteRepository::new(db.pool());
        let created = repo.create(&request("Kenji", "Sato")).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let name = NormalizedAthleteName::new("sato", "KENJI");
        let found = find_matching(&mut conn, &name, Some("2003-09-21"))
            .await
            .unwrap();
        assert_eq!(found.map(|a| a.athlete_id), Some(created.athlete_id));

        let other_birth = find_matching(&mut conn, &name, Some("2004-01-01"))
            .await
            .unwrap();
        assert!(other_birth.is_none());
    }

    #[tokio::test]
    async fn test_unknown_club_is_constraint_violation() {
        let db = migrated_db().await;
        let repo = AthleteRepository::new(db.pool());
        let mut req = request("Kenji", "Sato");
        req.club_id = Some(Uuid::new_v4());

        let err = repo.create(&req).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_athlete() {
        let db = migrated_db().await;
        let repo = AthleteRepository::new(db.pool());
        assert!(matches!(
            repo.delete(Uuid::new_v4()).await,
            Err(StorageError::NotFound)
        ));
    }
}
