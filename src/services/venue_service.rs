// src/services/venue_service.rs

use crate::{
    common::error::AppError,
    db::VenueRepository,
    models::{
        auth::User,
        rbac::Permission,
        venue::{CreateVenuePayload, UpdateVenuePayload, Venue},
    },
    services::rbac_service::{has_permission, has_scoped_permission, require_permission},
};

// Latitude e longitude andam juntas
pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), AppError> {
    match (latitude, longitude) {
        (Some(_), Some(_)) | (None, None) => Ok(()),
        _ => Err(AppError::invalid_state(
            "latitude e longitude devem ser informadas juntas",
        )),
    }
}

#[derive(Clone)]
pub struct VenueService {
    repo: VenueRepository,
}

impl VenueService {
    pub fn new(repo: VenueRepository) -> Self {
        Self { repo }
    }

    pub async fn create_venue(
        &self,
        acting_user: &User,
        payload: CreateVenuePayload,
    ) -> Result<Venue, AppError> {
        require_permission(acting_user, Permission::ManageVenues)?;
        validate_coordinates(payload.latitude, payload.longitude)?;

        let venue = self.repo.create_venue(&payload).await?;
        tracing::info!(venue_id = venue.id, created_by = acting_user.id, "Local criado");
        Ok(venue)
    }

    pub async fn update_venue(
        &self,
        acting_user: &User,
        id: i64,
        payload: UpdateVenuePayload,
    ) -> Result<Venue, AppError> {
        require_permission(acting_user, Permission::ManageVenues)?;

        let mut venue = self.find(id).await?;
        if let Some(name) = payload.name {
            venue.name = name;
        }
        if let Some(address) = payload.address {
            venue.address = address;
        }
        if let Some(description) = payload.description {
            venue.description = Some(description);
        }
        if payload.latitude.is_some() || payload.longitude.is_some() {
            venue.latitude = payload.latitude;
            venue.longitude = payload.longitude;
        }
        validate_coordinates(venue.latitude, venue.longitude)?;

        self.repo.update_venue(&venue).await
    }

    /// Quem vê todos os locais recebe a lista completa; os demais, os atribuídos.
    pub async fn list_venues(&self, acting_user: &User) -> Result<Vec<Venue>, AppError> {
        if has_permission(acting_user, Permission::ViewAllVenues)
            || has_permission(acting_user, Permission::ManageVenues)
        {
            self.repo.list_all().await
        } else {
            self.repo.list_by_ids(&acting_user.assigned_venues).await
        }
    }

    pub async fn get_venue(&self, acting_user: &User, id: i64) -> Result<Venue, AppError> {
        if !acting_user.assigned_venues.contains(&id)
            && !has_scoped_permission(acting_user, Permission::ViewAllVenues, id)
        {
            return Err(AppError::forbidden(format!("sem acesso ao local {}", id)));
        }
        self.find(id).await
    }

    async fn find(&self, id: i64) -> Result<Venue, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("local {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_both_or_neither() {
        assert!(validate_coordinates(None, None).is_ok());
        assert!(validate_coordinates(Some(-23.5), Some(-46.6)).is_ok());
        assert!(matches!(
            validate_coordinates(Some(-23.5), None),
            Err(AppError::InvalidState(_))
        ));
        assert!(validate_coordinates(None, Some(1.0)).is_err());
    }
}
