// src/services/message_service.rs

use crate::{
    common::error::AppError,
    db::{MessageRepository, UserRepository},
    models::{
        auth::User,
        message::{Message, SendMessagePayload},
        rbac::Permission,
    },
    services::rbac_service::require_permission,
};

// Comunicado (sem destinatário) exige send_mass_messages
pub fn ensure_can_send(user: &User, receiver_id: Option<i64>) -> Result<(), AppError> {
    match receiver_id {
        None => require_permission(user, Permission::SendMassMessages),
        Some(_) => Ok(()),
    }
}

#[derive(Clone)]
pub struct MessageService {
    repo: MessageRepository,
    user_repo: UserRepository,
}

impl MessageService {
    pub fn new(repo: MessageRepository, user_repo: UserRepository) -> Self {
        Self { repo, user_repo }
    }

    pub async fn send_message(
        &self,
        acting_user: &User,
        payload: SendMessagePayload,
    ) -> Result<Message, AppError> {
        ensure_can_send(acting_user, payload.receiver_id)?;

        let content = payload.content.trim();
        if content.is_empty() {
            return Err(AppError::invalid_state("a mensagem não pode estar vazia"));
        }

        if let Some(receiver_id) = payload.receiver_id {
            if self.user_repo.find_by_id(receiver_id).await?.is_none() {
                return Err(AppError::not_found(format!("usuário {}", receiver_id)));
            }
        }

        let message = self.repo
            .create_message(acting_user.id, payload.receiver_id, content)
            .await?;

        if message.is_announcement() {
            tracing::info!(message_id = message.id, sender_id = acting_user.id, "Comunicado enviado");
        }
        Ok(message)
    }

    /// Mensagens diretas para o usuário + comunicados, mais recentes primeiro.
    pub async fn inbox(&self, acting_user: &User) -> Result<Vec<Message>, AppError> {
        self.repo.inbox(acting_user.id).await
    }

    pub async fn mark_read(&self, acting_user: &User, id: i64) -> Result<Message, AppError> {
        let message = self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("mensagem {}", id)))?;

        match message.receiver_id {
            None => Err(AppError::invalid_state(
                "comunicados não têm estado de leitura por usuário",
            )),
            Some(receiver_id) if receiver_id != acting_user.id => Err(AppError::forbidden(
                "apenas o destinatário pode marcar a mensagem como lida",
            )),
            Some(_) => self.repo.mark_read(id).await,
        }
    }
}
