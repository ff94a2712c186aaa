// src/services/time_service.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::{ShiftRepository, TimeEntryRepository},
    models::{
        auth::User,
        rbac::Permission,
        shift::Shift,
        time_entry::{ClockInPayload, ClockOutPayload, TimeEntry},
    },
    services::rbac_service::{has_permission, has_scoped_permission, list_scope},
};

pub fn ensure_can_clock_in(user: &User, shift: &Shift) -> Result<(), AppError> {
    if shift.employee_id != Some(user.id) {
        return Err(AppError::forbidden(format!(
            "o turno {} não está atribuído a você",
            shift.id
        )));
    }
    if !shift.status.accepts_clock_in() {
        return Err(AppError::invalid_state(
            "o turno está encerrado ou cancelado",
        ));
    }
    Ok(())
}

// Mesma ordem das guardas do caixa: permissão → não é o próprio → estado.
pub fn ensure_can_verify_entry(user: &User, entry: &TimeEntry, venue_id: i64) -> Result<(), AppError> {
    if !has_permission(user, Permission::ManageAllTime)
        && !has_scoped_permission(user, Permission::ManageVenueTime, venue_id)
    {
        return Err(AppError::forbidden(format!(
            "permissão '{}' necessária para o local {}",
            Permission::ManageVenueTime,
            venue_id
        )));
    }
    if user.id == entry.employee_id {
        return Err(AppError::invalid_state(
            "ninguém pode verificar o próprio ponto",
        ));
    }
    if entry.is_open() {
        return Err(AppError::invalid_state(
            "o ponto ainda está aberto (sem saída registrada)",
        ));
    }
    if entry.verified {
        return Err(AppError::invalid_state("o ponto já foi verificado"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct TimeService {
    repo: TimeEntryRepository,
    shift_repo: ShiftRepository,
}

impl TimeService {
    pub fn new(repo: TimeEntryRepository, shift_repo: ShiftRepository) -> Self {
        Self { repo, shift_repo }
    }

    async fn find_entry(&self, id: i64) -> Result<TimeEntry, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("registro de ponto {}", id)))
    }

    async fn find_shift(&self, id: i64) -> Result<Shift, AppError> {
        self.shift_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("turno {}", id)))
    }

    pub async fn clock_in(&self, acting_user: &User, payload: ClockInPayload) -> Result<TimeEntry, AppError> {
        let shift = self.find_shift(payload.shift_id).await?;
        ensure_can_clock_in(acting_user, &shift)?;

        // Um ponto aberto por vez (o índice parcial no banco garante sob concorrência)
        if self.repo.find_open_for_employee(acting_user.id).await?.is_some() {
            return Err(AppError::invalid_state(
                "já existe um ponto aberto para este usuário",
            ));
        }

        let entry = self.repo.clock_in(acting_user.id, &payload, Utc::now()).await?;
        tracing::info!(entry_id = entry.id, shift_id = shift.id, employee_id = acting_user.id, "Entrada registrada");
        Ok(entry)
    }

    pub async fn clock_out(
        &self,
        acting_user: &User,
        id: i64,
        payload: ClockOutPayload,
    ) -> Result<TimeEntry, AppError> {
        let entry = self.find_entry(id).await?;
        if entry.employee_id != acting_user.id {
            return Err(AppError::forbidden("apenas o dono do ponto pode registrar a saída"));
        }
        if !entry.is_open() {
            return Err(AppError::invalid_state("a saída já foi registrada"));
        }

        let closed = self.repo
            .clock_out(id, &payload, Utc::now())
            .await?
            .ok_or_else(|| AppError::invalid_state("a saída já foi registrada"))?;

        tracing::info!(entry_id = closed.id, employee_id = acting_user.id, "Saída registrada");
        Ok(closed)
    }

    pub async fn verify_entry(&self, acting_user: &User, id: i64) -> Result<TimeEntry, AppError> {
        let entry = self.find_entry(id).await?;
        let shift = self.find_shift(entry.shift_id).await?;

        ensure_can_verify_entry(acting_user, &entry, shift.venue_id)?;

        let verified = self.repo
            .mark_verified(id)
            .await?
            .ok_or_else(|| AppError::invalid_state("o ponto já foi verificado"))?;

        tracing::info!(entry_id = verified.id, verified_by = acting_user.id, "Ponto verificado");
        Ok(verified)
    }

    pub async fn list_entries(&self, acting_user: &User) -> Result<Vec<TimeEntry>, AppError> {
        let scope = list_scope(acting_user, Permission::ViewAllTime);
        self.repo.list(&scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{auth::fixtures::user_at, rbac::Role, shift::ShiftStatus};
    use chrono::Duration;

    fn shift(employee_id: Option<i64>, status: ShiftStatus) -> Shift {
        let now = Utc::now();
        Shift {
            id: 10,
            venue_id: 4,
            employee_id,
            start_time: now,
            end_time: now + Duration::hours(6),
            title: None,
            status,
            notes: None,
            created_at: now,
        }
    }

    fn entry(employee_id: i64, closed: bool, verified: bool) -> TimeEntry {
        let now = Utc::now();
        TimeEntry {
            id: 1,
            employee_id,
            shift_id: 10,
            clock_in: now,
            clock_out: closed.then(|| now + Duration::hours(6)),
            verified,
            notes: None,
            clock_in_latitude: None,
            clock_in_longitude: None,
            clock_out_latitude: None,
            clock_out_longitude: None,
            created_at: now,
        }
    }

    #[test]
    fn only_assignee_clocks_into_open_shift() {
        let staff = user_at(1, Role::Employee, &[]);
        assert!(ensure_can_clock_in(&staff, &shift(Some(1), ShiftStatus::Confirmed)).is_ok());
        assert!(matches!(
            ensure_can_clock_in(&staff, &shift(Some(2), ShiftStatus::Confirmed)),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_can_clock_in(&staff, &shift(Some(1), ShiftStatus::Cancelled)),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn reviewer_guards_follow_fixed_order() {
        let supervisor = user_at(3, Role::Supervisor, &[4]);
        let staff = user_at(1, Role::Employee, &[4]);

        assert!(ensure_can_verify_entry(&supervisor, &entry(1, true, false), 4).is_ok());
        assert!(matches!(
            ensure_can_verify_entry(&supervisor, &entry(1, true, false), 9),
            Err(AppError::Forbidden(_))
        ));
        // Sem permissão vence o "próprio ponto"
        assert!(matches!(
            ensure_can_verify_entry(&staff, &entry(1, true, false), 4),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_can_verify_entry(&supervisor, &entry(3, true, false), 4),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            ensure_can_verify_entry(&supervisor, &entry(1, false, false), 4),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            ensure_can_verify_entry(&supervisor, &entry(1, true, true), 4),
            Err(AppError::InvalidState(_))
        ));
    }
}
