// Declaro — Form validation
//
// Field rules applied by the form layer before it calls a repository. The
// repositories themselves accept whatever they are given. Each check returns
// every violation at once so a form can flag all fields in one pass.

use std::fmt;

use crate::store::{BeneficialOwner, DeclarationFields, PurposeOfTransaction, SourceOfFund};

/// Minimum length for usernames (after trimming) and passwords.
pub const MIN_CREDENTIAL_LEN: usize = 3;

/// One violated rule, tied to the form field that should show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All violations found in one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// `Ok(())` when `errors` is empty.
    pub fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", joined.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn opt_is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, is_blank)
}

// ─── Declaration form ────────────────────────────────────────────────────────

pub fn validate_declaration(fields: &DeclarationFields) -> Vec<FieldError> {
    let required: [(&'static str, &str, &str); 8] = [
        ("transactionNo", &fields.transaction_no, "Transaction No is required"),
        ("transactionDate", &fields.transaction_date, "Transaction Date is required"),
        ("idNo", &fields.id_no, "ID No is required"),
        ("name", &fields.name, "Name is required"),
        ("nationality", &fields.nationality, "Nationality is required"),
        ("address", &fields.address, "Address is required"),
        ("dob", &fields.dob, "Date of Birth is required"),
        ("phoneNo", &fields.phone_no, "Phone No is required"),
    ];

    let mut errors: Vec<FieldError> = required
        .iter()
        .filter(|(_, value, _)| is_blank(value))
        .map(|(field, _, message)| FieldError::new(*field, *message))
        .collect();

    if fields.source_of_fund == SourceOfFund::Others && opt_is_blank(&fields.source_of_fund_others)
    {
        errors.push(FieldError::new(
            "sourceOfFundOthers",
            "Please specify other source of fund",
        ));
    }

    if fields.purpose_of_transaction == PurposeOfTransaction::Others
        && opt_is_blank(&fields.purpose_of_transaction_others)
    {
        errors.push(FieldError::new(
            "purposeOfTransactionOthers",
            "Please specify other purpose of transaction",
        ));
    }

    if fields.beneficial_owner == BeneficialOwner::Shares
        && opt_is_blank(&fields.beneficial_owner_share)
    {
        errors.push(FieldError::new(
            "beneficialOwnerShare",
            "Please specify share percentage",
        ));
    }

    errors
}

// ─── Account forms ───────────────────────────────────────────────────────────

fn check_username(username: &str, errors: &mut Vec<FieldError>) {
    if is_blank(username) {
        errors.push(FieldError::new("username", "Username is required"));
    } else if username.trim().chars().count() < MIN_CREDENTIAL_LEN {
        errors.push(FieldError::new(
            "username",
            format!("Username must be at least {} characters", MIN_CREDENTIAL_LEN),
        ));
    }
}

/// Messages for the "missing" cases, which differ between the registration
/// and password-change forms.
struct PasswordPrompts {
    required: &'static str,
    confirm: &'static str,
}

const REGISTRATION_PROMPTS: PasswordPrompts = PasswordPrompts {
    required: "Password is required",
    confirm: "Please confirm your password",
};

const CHANGE_PROMPTS: PasswordPrompts = PasswordPrompts {
    required: "New password is required",
    confirm: "Please confirm your new password",
};

fn check_new_password(
    field: &'static str,
    prompts: &PasswordPrompts,
    password: &str,
    confirm: &str,
    errors: &mut Vec<FieldError>,
) {
    if password.is_empty() {
        errors.push(FieldError::new(field, prompts.required));
    } else if password.chars().count() < MIN_CREDENTIAL_LEN {
        errors.push(FieldError::new(
            field,
            format!("Password must be at least {} characters", MIN_CREDENTIAL_LEN),
        ));
    }

    if confirm.is_empty() {
        errors.push(FieldError::new("confirmPassword", prompts.confirm));
    } else if password != confirm {
        errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
    }
}

/// Login only checks presence; credentials are verified by the session provider.
pub fn validate_login(username: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if is_blank(username) {
        errors.push(FieldError::new("username", "Username is required"));
    }
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    errors
}

pub fn validate_registration(username: &str, password: &str, confirm: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_username(username, &mut errors);
    check_new_password("password", &REGISTRATION_PROMPTS, password, confirm, &mut errors);
    errors
}

pub fn validate_password_change(current: &str, new: &str, confirm: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if current.is_empty() {
        errors.push(FieldError::new("currentPassword", "Current password is required"));
    }
    check_new_password("newPassword", &CHANGE_PROMPTS, new, confirm, &mut errors);
    errors
}

pub fn validate_profile(username: &str, store_name: &str, store_address: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_username(username, &mut errors);
    if is_blank(store_name) {
        errors.push(FieldError::new("storeName", "Store name is required"));
    }
    if is_blank(store_address) {
        errors.push(FieldError::new("storeAddress", "Store address is required"));
    }
    errors
}

// ─── Tests ───────────────────────────────────────────────────────────────────
