// src/services/shift_service.rs

use chrono::{DateTime, Utc};

use crate::{
    common::error::AppError,
    db::{ShiftRepository, UserRepository, VenueRepository},
    models::{
        auth::User,
        rbac::Permission,
        shift::{CreateShiftPayload, Shift, ShiftFilter, UpdateShiftPayload},
    },
    services::rbac_service::{has_scoped_permission, list_scope, require_scoped_permission},
};

pub fn validate_window(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<(), AppError> {
    if end_time <= start_time {
        return Err(AppError::invalid_state(
            "o fim do turno deve ser posterior ao início",
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ShiftService {
    repo: ShiftRepository,
    venue_repo: VenueRepository,
    user_repo: UserRepository,
}

impl ShiftService {
    pub fn new(repo: ShiftRepository, venue_repo: VenueRepository, user_repo: UserRepository) -> Self {
        Self { repo, venue_repo, user_repo }
    }

    async fn ensure_employee_exists(&self, employee_id: Option<i64>) -> Result<(), AppError> {
        if let Some(id) = employee_id {
            if self.user_repo.find_by_id(id).await?.is_none() {
                return Err(AppError::not_found(format!("usuário {}", id)));
            }
        }
        Ok(())
    }

    pub async fn create_shift(
        &self,
        acting_user: &User,
        payload: CreateShiftPayload,
    ) -> Result<Shift, AppError> {
        require_scoped_permission(acting_user, Permission::ManageVenueShifts, payload.venue_id)?;
        validate_window(payload.start_time, payload.end_time)?;

        if self.venue_repo.find_by_id(payload.venue_id).await?.is_none() {
            return Err(AppError::not_found(format!("local {}", payload.venue_id)));
        }
        self.ensure_employee_exists(payload.employee_id).await?;

        let shift = self.repo.create_shift(&payload).await?;
        tracing::info!(
            shift_id = shift.id,
            venue_id = shift.venue_id,
            created_by = acting_user.id,
            "Turno criado"
        );
        Ok(shift)
    }

    pub async fn update_shift(
        &self,
        acting_user: &User,
        id: i64,
        patch: UpdateShiftPayload,
    ) -> Result<Shift, AppError> {
        let mut shift = self.find(id).await?;
        require_scoped_permission(acting_user, Permission::ManageVenueShifts, shift.venue_id)?;

        if let Some(employee_id) = patch.employee_id {
            self.ensure_employee_exists(employee_id).await?;
        }
        apply_shift_patch(&mut shift, patch);
        validate_window(shift.start_time, shift.end_time)?;

        self.repo.update_shift(&shift).await
    }

    /// Os filtros da query se somam ao alcance do usuário: `view_all_shifts`
    /// só alcança os locais atribuídos, a menos que ele tenha `manage_all_shifts`.
    pub async fn list_shifts(
        &self,
        acting_user: &User,
        filter: ShiftFilter,
    ) -> Result<Vec<Shift>, AppError> {
        let scope = list_scope(acting_user, Permission::ViewAllShifts);
        self.repo.list_shifts(&filter, &scope).await
    }

    pub async fn get_shift(&self, acting_user: &User, id: i64) -> Result<Shift, AppError> {
        let shift = self.find(id).await?;
        if shift.employee_id != Some(acting_user.id)
            && !has_scoped_permission(acting_user, Permission::ViewAllShifts, shift.venue_id)
        {
            return Err(AppError::forbidden(format!("sem acesso ao turno {}", id)));
        }
        Ok(shift)
    }

    async fn find(&self, id: i64) -> Result<Shift, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("turno {}", id)))
    }
}

// Campos ausentes ficam; `null` apaga os opcionais.
fn apply_shift_patch(shift: &mut Shift, patch: UpdateShiftPayload) {
    if let Some(employee_id) = patch.employee_id {
        shift.employee_id = employee_id;
    }
    if let Some(start_time) = patch.start_time {
        shift.start_time = start_time;
    }
    if let Some(end_time) = patch.end_time {
        shift.end_time = end_time;
    }
    if let Some(title) = patch.title {
        shift.title = title;
    }
    if let Some(status) = patch.status {
        shift.status = status;
    }
    if let Some(notes) = patch.notes {
        shift.notes = notes;
    }
}
