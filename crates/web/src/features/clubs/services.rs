use sqlx::SqlitePool;
use storage::{
    dto::club::CreateClubRequest,
    error::Result,
    models::{Athlete, Club},
    repository::{AthleteRepository, ClubRepository},
};
use uuid::Uuid;

pub async fn list_clubs(pool: &SqlitePool) -> Result<Vec<Club>> {
    ClubRepository::new(pool).list().await
}

pub async fn get_club(pool: &SqlitePool, id: Uuid) -> Result<Club> {
    ClubRepository::new(pool).find_by_id(id).await
}

pub async fn create_club(pool: &SqlitePool, request: &CreateClubRequest) -> Result<Club> {
    ClubRepository::new(pool).create(request).await
}

pub async fn delete_club(pool: &SqlitePool, id: Uuid) -> Result<()> {
    ClubRepository::new(pool).delete(id).await
}

/// Members of a club; unknown clubs are a 404 rather than an empty list
pub async fn list_club_athletes(pool: &SqlitePool, id: Uuid) -> Result<Vec<Athlete>> {
    let club = get_club(pool, id).await?;
    AthleteRepository::new(pool).list_by_club(club.club_id).await
}
