// src/common/i18n.rs

// Mensagens de erro por idioma. Idiomas desconhecidos caem no inglês.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    Validation,
    Forbidden,
    InvalidState,
    NotFound,
    Conflict,
    InvalidCredentials,
    InvalidToken,
    Internal,
}

pub fn translate(key: MessageKey, lang: &str) -> &'static str {
    match lang {
        "pt" => match key {
            MessageKey::Validation => "Um ou mais campos são inválidos.",
            MessageKey::Forbidden => "Você não tem permissão para realizar esta ação.",
            MessageKey::InvalidState => "A operação não é permitida no estado atual do registro.",
            MessageKey::NotFound => "Recurso não encontrado.",
            MessageKey::Conflict => "O recurso já existe.",
            MessageKey::InvalidCredentials => "Usuário ou senha inválidos.",
            MessageKey::InvalidToken => "Token de autenticação inválido ou ausente.",
            MessageKey::Internal => "Ocorreu um erro inesperado.",
        },
        _ => match key {
            MessageKey::Validation => "One or more fields are invalid.",
            MessageKey::Forbidden => "You do not have permission to perform this action.",
            MessageKey::InvalidState => "The operation is not allowed in the record's current state.",
            MessageKey::NotFound => "Resource not found.",
            MessageKey::Conflict => "The resource already exists.",
            MessageKey::InvalidCredentials => "Invalid username or password.",
            MessageKey::InvalidToken => "Missing or invalid authentication token.",
            MessageKey::Internal => "An unexpected error occurred.",
        },
    }
}
