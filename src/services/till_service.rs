// src/services/till_service.rs

//! Conferência de caixa (till verification).
//!
//! Um registro nasce "não conferido" e passa a "conferido" uma única vez,
//! quando alguém com permissão de gestão de caixa (e que não seja quem
//! contou) preenche `verified_by` e `verified_at` juntos. A transição é
//! feita com update condicional no store, então de duas conferências
//! simultâneas só uma vence; a outra recebe `InvalidState`.
//!
//! Ordem fixa das guardas: permissão → não é o próprio → ainda não conferido.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        rbac::{ListScope, Permission},
        shift::Shift,
        till::{
            CreateTillVerificationPayload, NewTillVerification, TillAmounts, TillVerification,
            UpdateTillVerificationPayload,
        },
    },
    services::rbac_service::{has_permission, has_scoped_permission, list_scope},
};

/// Persistência usada pelo motor de conferência.
///
/// `update_unverified` e `mark_verified` são updates condicionais
/// ("... WHERE verified_by IS NULL"): devolvem `None` quando o registro já
/// estava conferido no momento da escrita.
#[async_trait]
pub trait TillStore: Send + Sync {
    async fn find_shift(&self, shift_id: i64) -> Result<Option<Shift>, AppError>;

    async fn user_exists(&self, user_id: i64) -> Result<bool, AppError>;

    async fn find_verification(&self, id: i64) -> Result<Option<TillVerification>, AppError>;

    /// Registros visíveis no alcance, mais recentes primeiro.
    async fn list_verifications(
        &self,
        scope: &ListScope,
    ) -> Result<Vec<TillVerification>, AppError>;

    async fn insert_verification(
        &self,
        new: NewTillVerification,
    ) -> Result<TillVerification, AppError>;

    async fn update_unverified(
        &self,
        id: i64,
        amounts: TillAmounts,
    ) -> Result<Option<TillVerification>, AppError>;

    async fn mark_verified(
        &self,
        id: i64,
        verified_by: i64,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<TillVerification>, AppError>;
}

/// `actual - expected`, recusando valores negativos.
pub fn compute_discrepancy(expected_amount: i64, actual_amount: i64) -> Result<i64, AppError> {
    if expected_amount < 0 || actual_amount < 0 {
        return Err(AppError::invalid_state(
            "os valores do caixa não podem ser negativos",
        ));
    }
    // Ambos >= 0: a subtração não estoura.
    Ok(actual_amount - expected_amount)
}

fn can_manage_tills(user: &User, venue_id: i64) -> bool {
    has_permission(user, Permission::ManageAllTills)
        || has_scoped_permission(user, Permission::ManageVenueTills, venue_id)
}

/// Quem pode alterar um registro: quem contou (enquanto não conferido) ou
/// quem gerencia os caixas do local.
pub fn ensure_can_edit(
    user: &User,
    verification: &TillVerification,
    venue_id: i64,
) -> Result<(), AppError> {
    if user.id != verification.employee_id && !can_manage_tills(user, venue_id) {
        return Err(AppError::forbidden(
            "apenas quem contou o caixa ou um gestor de caixas pode alterá-lo",
        ));
    }
    if verification.is_verified() {
        return Err(AppError::invalid_state(
            "a conferência de caixa já foi verificada e não pode mais ser alterada",
        ));
    }
    Ok(())
}

pub fn ensure_can_verify(
    user: &User,
    verification: &TillVerification,
    venue_id: i64,
) -> Result<(), AppError> {
    if !can_manage_tills(user, venue_id) {
        return Err(AppError::forbidden(format!(
            "permissão '{}' ou '{}' necessária para o local {}",
            Permission::ManageAllTills,
            Permission::ManageVenueTills,
            venue_id
        )));
    }
    if user.id == verification.employee_id {
        return Err(AppError::invalid_state(
            "ninguém pode verificar a própria contagem de caixa",
        ));
    }
    if verification.is_verified() {
        return Err(AppError::invalid_state(
            "a conferência de caixa já foi verificada",
        ));
    }
    Ok(())
}

pub fn ensure_can_view(
    user: &User,
    verification: &TillVerification,
    venue_id: i64,
) -> Result<(), AppError> {
    if user.id == verification.employee_id
        || has_scoped_permission(user, Permission::ViewAllTills, venue_id)
    {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "sem permissão para ver esta conferência de caixa",
        ))
    }
}

#[derive(Clone)]
pub struct TillService {
    store: Arc<dyn TillStore>,
}

impl TillService {
    pub fn new(store: Arc<dyn TillStore>) -> Self {
        Self { store }
    }

    async fn load(&self, id: i64) -> Result<(TillVerification, Shift), AppError> {
        let verification = self
            .store
            .find_verification(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("conferência de caixa {}", id)))?;
        let shift = self.load_shift(verification.shift_id).await?;
        Ok((verification, shift))
    }

    async fn load_shift(&self, shift_id: i64) -> Result<Shift, AppError> {
        self.store
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("turno {}", shift_id)))
    }

    /// Registra a contagem de um turno. Nada é gravado se algum valor for
    /// negativo.
    pub async fn create_verification(
        &self,
        acting_user: &User,
        input: CreateTillVerificationPayload,
    ) -> Result<TillVerification, AppError> {
        let discrepancy = compute_discrepancy(input.expected_amount, input.actual_amount)?;

        let shift = self.load_shift(input.shift_id).await?;

        let employee_id = input.employee_id.unwrap_or(acting_user.id);
        if employee_id != acting_user.id {
            // Lançar em nome de outra pessoa exige gestão de caixa no local
            if !can_manage_tills(acting_user, shift.venue_id) {
                return Err(AppError::forbidden(
                    "apenas gestores de caixa podem registrar contagens de outra pessoa",
                ));
            }
            if !self.store.user_exists(employee_id).await? {
                return Err(AppError::not_found(format!("usuário {}", employee_id)));
            }
        }

        let created = self
            .store
            .insert_verification(NewTillVerification {
                shift_id: shift.id,
                employee_id,
                expected_amount: input.expected_amount,
                actual_amount: input.actual_amount,
                discrepancy,
                notes: input.notes,
            })
            .await?;

        tracing::info!(
            till_id = created.id,
            shift_id = created.shift_id,
            employee_id = created.employee_id,
            discrepancy = created.discrepancy,
            "Conferência de caixa registrada"
        );
        Ok(created)
    }

    /// Altera valores/observação de um registro não conferido. A diferença é
    /// recalculada a partir dos novos valores.
    pub async fn edit_verification(
        &self,
        acting_user: &User,
        id: i64,
        patch: UpdateTillVerificationPayload,
    ) -> Result<TillVerification, AppError> {
        let (current, shift) = self.load(id).await?;

        ensure_can_edit(acting_user, &current, shift.venue_id)?;

        let expected_amount = patch.expected_amount.unwrap_or(current.expected_amount);
        let actual_amount = patch.actual_amount.unwrap_or(current.actual_amount);
        let discrepancy = compute_discrepancy(expected_amount, actual_amount)?;

        let updated = self
            .store
            .update_unverified(
                id,
                TillAmounts {
                    expected_amount,
                    actual_amount,
                    discrepancy,
                    notes: patch.notes.unwrap_or(current.notes),
                },
            )
            .await?
            .ok_or_else(|| {
                tracing::warn!(till_id = id, "Edição perdeu a corrida para uma verificação");
                AppError::invalid_state("a conferência de caixa já foi verificada")
            })?;

        tracing::info!(
            till_id = updated.id,
            acting_user = acting_user.id,
            discrepancy = updated.discrepancy,
            "Conferência de caixa alterada"
        );
        Ok(updated)
    }

    /// Transição única não conferido → conferido.
    pub async fn verify(&self, acting_user: &User, id: i64) -> Result<TillVerification, AppError> {
        let (current, shift) = self.load(id).await?;

        ensure_can_verify(acting_user, &current, shift.venue_id)?;

        let verified = self
            .store
            .mark_verified(id, acting_user.id, Utc::now())
            .await?
            .ok_or_else(|| {
                tracing::warn!(till_id = id, "Verificação concorrente já concluída");
                AppError::invalid_state("a conferência de caixa já foi verificada")
            })?;

        tracing::info!(
            till_id = verified.id,
            verified_by = acting_user.id,
            discrepancy = verified.discrepancy,
            "Conferência de caixa verificada"
        );
        Ok(verified)
    }

    pub async fn get_verification(
        &self,
        acting_user: &User,
        id: i64,
    ) -> Result<TillVerification, AppError> {
        let (verification, shift) = self.load(id).await?;
        ensure_can_view(acting_user, &verification, shift.venue_id)?;
        Ok(verification)
    }

    /// Com `manage_all_tills` a listagem é completa; com `view_all_tills`,
    /// próprias contagens mais as dos locais atribuídos; sem ela, só as próprias.
    pub async fn list_verifications(
        &self,
        acting_user: &User,
    ) -> Result<Vec<TillVerification>, AppError> {
        let scope = list_scope(acting_user, Permission::ViewAllTills);
        self.store.list_verifications(&scope).await
    }
}
