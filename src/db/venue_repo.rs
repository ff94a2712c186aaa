// src/db/venue_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::venue::{CreateVenuePayload, Venue},
};

#[derive(Clone)]
pub struct VenueRepository {
    pool: PgPool,
}

impl VenueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_venue(&self, payload: &CreateVenuePayload) -> Result<Venue, AppError> {
        let venue = sqlx::query_as::<_, Venue>(
            r#"
            INSERT INTO venues (name, address, description, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.address)
        .bind(&payload.description)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .fetch_one(&self.pool)
        .await?;
        Ok(venue)
    }

    pub async fn update_venue(&self, venue: &Venue) -> Result<Venue, AppError> {
        let updated = sqlx::query_as::<_, Venue>(
            r#"
            UPDATE venues SET
                name = $2, address = $3, description = $4, latitude = $5, longitude = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(venue.id)
        .bind(&venue.name)
        .bind(&venue.address)
        .bind(&venue.description)
        .bind(venue.latitude)
        .bind(venue.longitude)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("local {}", venue.id)))?;
        Ok(updated)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Venue>, AppError> {
        let venue = sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(venue)
    }

    pub async fn list_all(&self) -> Result<Vec<Venue>, AppError> {
        let venues = sqlx::query_as::<_, Venue>("SELECT * FROM venues ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(venues)
    }

    // O SQLx lida bem com arrays usando ANY
    pub async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Venue>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let venues = sqlx::query_as::<_, Venue>(
            "SELECT * FROM venues WHERE id = ANY($1) ORDER BY name, id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(venues)
    }
}
