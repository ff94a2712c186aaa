use crate::common::error::AppError;

// Converte violação de chave única em um erro de domínio mais amigável.
// Qualquer outro erro do banco segue como DatabaseError.
pub(crate) fn map_unique_violation(e: sqlx::Error, on_conflict: AppError) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_conflict;
        }
    }
    AppError::DatabaseError(e)
}

// Violação de CHECK constraint: o banco recusou um invariante que o serviço
// já deveria ter barrado (ex: corrida entre duas requisições).
pub(crate) fn map_check_violation(e: sqlx::Error, on_violation: AppError) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_check_violation() {
            return on_violation;
        }
    }
    AppError::DatabaseError(e)
}
