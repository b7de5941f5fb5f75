// src/common/i18n.rs

// Catálogo das mensagens que a API mostra para pessoas.
// As chaves também servem de código de erro do validator.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl Language {
    /// "pt-BR" -> Pt, "en-US" -> En, desconhecido -> En.
    pub fn from_tag(tag: &str) -> Self {
        match tag.split('-').next().unwrap_or(tag).to_ascii_lowercase().as_str() {
            "pt" => Language::Pt,
            _ => Language::En,
        }
    }
}

pub fn message(language: Language, key: &str) -> String {
    let (en, pt) = match key {
        "credentials_required" => (
            "Email and Password are required.",
            "E-mail e senha são obrigatórios.",
        ),
        "invalid_credentials" => (
            "Invalid email or password",
            "E-mail ou senha inválidos.",
        ),
        "registration_fields_required" => (
            "Name, Email, and Password are required.",
            "Nome, e-mail e senha são obrigatórios.",
        ),
        "profile_fields_required" => (
            "Name and Email are required.",
            "Nome e e-mail são obrigatórios.",
        ),
        "email_in_use" => (
            "Could not save the account. Email may already be in use.",
            "Não foi possível salvar a conta. O e-mail pode já estar em uso.",
        ),
        "account_not_created" => (
            "Could not create account.",
            "Não foi possível criar a conta.",
        ),
        "registration_number_in_use" => (
            "Could not save the vehicle. Registration number may already exist.",
            "Não foi possível salvar o veículo. A placa pode já existir.",
        ),
        "vehicle_fields_required" => (
            "Vehicle type, model and registration number are required.",
            "Tipo, modelo e placa do veículo são obrigatórios.",
        ),
        "price_negative" => (
            "Rental price cannot be negative.",
            "O preço do aluguel não pode ser negativo.",
        ),
        "unknown_role" => (
            "The selected role does not exist.",
            "O cargo selecionado não existe.",
        ),
        "rental_days_out_of_range" => (
            "The number of rental days is out of range.",
            "A quantidade de dias de aluguel está fora do limite.",
        ),
        "account_created" => (
            "Account created successfully. Please login.",
            "Conta criada com sucesso. Faça login.",
        ),
        "profile_updated" => (
            "Profile updated successfully.",
            "Perfil atualizado com sucesso.",
        ),
        "validation_failed" => (
            "One or more fields are invalid.",
            "Um ou mais campos são inválidos.",
        ),
        "internal_error" => (
            "An unexpected error occurred.",
            "Ocorreu um erro inesperado.",
        ),
        unknown => return unknown.to_string(),
    };

    match language {
        Language::En => en.to_string(),
        Language::Pt => pt.to_string(),
    }
}
