use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::database::models::{
    BulkShiftInput, HospitalInput, LoginInput, ProfileUpdateInput, RegisterInput, ShiftInput,
    parse_time,
};
use crate::error::AppError;

pub const MIN_HOSPITAL_NAME_LENGTH: usize = 3;
pub const MIN_ADDRESS_LENGTH: usize = 10;
pub const MAX_HOURLY_RATE: f64 = 10_000.0;
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));
static SPECIAL_CHAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).expect("valid special character regex")
});

/// Field name to message, serialized as a plain JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first message reported for a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(self))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Unmet strength requirements, empty when the password is strong enough
pub fn password_problems(password: &str) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push("Mínimo de 8 caracteres");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("Pelo menos uma letra maiúscula");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("Pelo menos uma letra minúscula");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("Pelo menos um número");
    }
    if !SPECIAL_CHAR_RE.is_match(password) {
        problems.push("Pelo menos um caractere especial");
    }
    problems
}

fn check_email(errors: &mut ValidationErrors, field: &str, email: &str) {
    if email.trim().is_empty() {
        errors.add(field, "Email é obrigatório");
    } else if !is_valid_email(email) {
        errors.add(field, "Formato de email inválido");
    }
}

fn check_strong_password(errors: &mut ValidationErrors, field: &str, password: &str) {
    let problems = password_problems(password);
    if !problems.is_empty() {
        errors.add(field, problems.join(", "));
    }
}

pub fn validate_hospital(input: &HospitalInput) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.add("name", "Nome do hospital é obrigatório");
    } else if name.chars().count() < MIN_HOSPITAL_NAME_LENGTH {
        errors.add(
            "name",
            format!("Nome deve ter pelo menos {} caracteres", MIN_HOSPITAL_NAME_LENGTH),
        );
    }

    match input.hourly_rate {
        None => errors.add("hourlyRate", "Taxa horária é obrigatória"),
        Some(rate) if !rate.is_finite() || rate < 0.0 => {
            errors.add("hourlyRate", "Taxa horária deve ser um valor válido")
        }
        Some(rate) if rate > MAX_HOURLY_RATE => errors.add("hourlyRate", "Taxa horária muito alta"),
        Some(rate) if rate == 0.0 => {
            errors.add("hourlyRate", "Taxa horária deve ser maior que zero")
        }
        Some(_) => {}
    }

    if let Some(address) = input.address.as_deref().map(str::trim) {
        if !address.is_empty() && address.chars().count() < MIN_ADDRESS_LENGTH {
            errors.add(
                "address",
                format!("Endereço deve ter pelo menos {} caracteres", MIN_ADDRESS_LENGTH),
            );
        }
    }

    if !COLOR_RE.is_match(&input.color) {
        errors.add("color", "Cor deve ser um código hexadecimal válido");
    }

    errors.into_result()
}

fn check_shift_template(
    errors: &mut ValidationErrors,
    hospital_present: bool,
    start_time: &str,
    end_time: &str,
) {
    if !hospital_present {
        errors.add("hospitalId", "Hospital é obrigatório");
    }

    for (field, value, missing) in [
        ("startTime", start_time, "Horário de início é obrigatório"),
        ("endTime", end_time, "Horário de término é obrigatório"),
    ] {
        if value.trim().is_empty() {
            errors.add(field, missing);
        } else if parse_time(value).is_none() {
            errors.add(field, "Horário inválido, use HH:MM");
        }
    }
}

/// End at or before start is fine: it is an overnight or 24 hour shift.
pub fn validate_shift(input: &ShiftInput) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();
    check_shift_template(
        &mut errors,
        input.hospital_id.is_some(),
        &input.start_time,
        &input.end_time,
    );
    if input.date.is_none() {
        errors.add("date", "Data é obrigatória");
    }
    errors.into_result()
}

pub fn validate_bulk_shift(input: &BulkShiftInput) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();
    check_shift_template(
        &mut errors,
        input.hospital_id.is_some(),
        &input.start_time,
        &input.end_time,
    );
    if input.dates.is_empty() {
        errors.add("dates", "Selecione pelo menos uma data");
    }
    errors.into_result()
}

pub fn validate_login(input: &LoginInput) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();
    check_email(&mut errors, "email", &input.email);
    if input.password.trim().is_empty() {
        errors.add("password", "Senha é obrigatória");
    }
    errors.into_result()
}

pub fn validate_register(input: &RegisterInput) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.add("name", "Nome é obrigatório");
    } else if name.chars().count() < 2 {
        errors.add("name", "Nome deve ter pelo menos 2 caracteres");
    }

    check_email(&mut errors, "email", &input.email);

    if input.password.trim().is_empty() {
        errors.add("password", "Senha é obrigatória");
    } else {
        check_strong_password(&mut errors, "password", &input.password);
    }

    if input.confirm_password.trim().is_empty() {
        errors.add("confirmPassword", "Confirmação de senha é obrigatória");
    } else if input.password != input.confirm_password {
        errors.add("confirmPassword", "Senhas não coincidem");
    }

    errors.into_result()
}

/// `force_password_change` makes the password fields mandatory
pub fn validate_profile(input: &ProfileUpdateInput, force_password_change: bool) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    if let Some(email) = &input.email {
        check_email(&mut errors, "email", email);
    }

    let current = input.current_password.as_deref().unwrap_or_default();
    let new = input.new_password.as_deref().unwrap_or_default();
    let confirm = input.confirm_password.as_deref().unwrap_or_default();

    if force_password_change || !new.is_empty() || !confirm.is_empty() || !current.is_empty() {
        if current.is_empty() {
            errors.add("currentPassword", "Senha atual é obrigatória para alterações");
        }
        if new.is_empty() {
            if force_password_change {
                errors.add("newPassword", "Nova senha é obrigatória");
            }
        } else {
            check_strong_password(&mut errors, "newPassword", new);
        }
        if new != confirm {
            errors.add("confirmPassword", "Senhas não coincidem");
        }
    }

    errors.into_result()
}
