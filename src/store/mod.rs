// Declaro — Store Module
//
// The declaration repository: an ordered, persisted sequence of compliance
// declarations with a "current" record staged for display.

mod error;
mod models;
mod repository;

pub use error::StoreError;
pub use models::{
    BeneficialOwner, Declaration, DeclarationFields, DeclarationPatch, PurposeOfTransaction,
    SourceOfFund, TransactionVolume,
};
pub use repository::{
    DeclarationStore, PersistedDeclarationStore, DECLARATION_STORAGE_KEY, FALLBACK_USER_ID,
};
