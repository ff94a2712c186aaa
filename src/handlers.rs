pub mod auth;
pub mod messages;
pub mod rbac;
pub mod shifts;
pub mod tills;
pub mod time_entries;
pub mod users;
pub mod venues;

use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    middleware::i18n::Locale,
};

// Valida o corpo e já devolve o erro traduzido
pub(crate) fn validate_payload<T: Validate>(payload: &T, locale: &Locale) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(locale))
}
