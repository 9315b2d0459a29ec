// Declaro — CLI Module
//
// Command-line front end using clap derive macros. It plays the form layer:
// input is validated here before any repository call.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::store::{
    BeneficialOwner, DeclarationFields, DeclarationPatch, PurposeOfTransaction, SourceOfFund,
    TransactionVolume,
};

pub use commands::execute;

/// Declaro — currency declaration records for a retail store.
#[derive(Parser, Debug)]
#[command(name = "declaro")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (defaults to the platform data directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to an existing account.
    Login {
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Create a new account and log in to it.
    Register {
        username: String,

        #[arg(long)]
        password: String,

        /// Repeat the password.
        #[arg(long)]
        confirm: String,
    },

    /// End the current session.
    Logout,

    /// Show the logged-in user and store.
    Whoami,

    /// Update the logged-in user's profile.
    Profile {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        store_name: Option<String>,

        #[arg(long)]
        store_address: Option<String>,
    },

    /// Change the logged-in user's password.
    Passwd {
        #[arg(long)]
        current: String,

        #[arg(long)]
        new: String,

        /// Repeat the new password.
        #[arg(long)]
        confirm: String,
    },

    /// Record a new declaration.
    Create(Box<CreateArgs>),

    /// List your declarations.
    List,

    /// Show one declaration in full.
    Show {
        id: String,
    },

    /// Overwrite fields of an existing declaration.
    Update(Box<UpdateArgs>),

    /// Delete a declaration.
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Transaction volume: less | above (20,000 threshold).
    #[arg(long, default_value = "less")]
    pub volume: TransactionVolume,

    #[arg(long)]
    pub transaction_no: String,

    #[arg(long)]
    pub transaction_date: String,

    /// Declarant's identification number.
    #[arg(long)]
    pub id_no: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub nationality: String,

    #[arg(long)]
    pub address: String,

    /// Date of birth.
    #[arg(long)]
    pub dob: String,

    #[arg(long)]
    pub phone_no: String,

    /// savings | employment | sale | inheritance | business | others
    #[arg(long, default_value = "savings")]
    pub source_of_fund: SourceOfFund,

    /// Required when the source of fund is "others".
    #[arg(long)]
    pub source_of_fund_others: Option<String>,

    /// savings | employment | sale | investment | holiday | business | others
    #[arg(long, default_value = "savings")]
    pub purpose: PurposeOfTransaction,

    /// Required when the purpose is "others".
    #[arg(long)]
    pub purpose_others: Option<String>,

    /// none | shares
    #[arg(long, default_value = "none")]
    pub beneficial_owner: BeneficialOwner,

    /// Share percentage, required when the beneficial owner is "shares".
    #[arg(long)]
    pub share: Option<String>,

    /// Money is being moved across the border.
    #[arg(long)]
    pub cross_border: bool,

    /// Correlated with sanctioned persons or entities.
    #[arg(long)]
    pub mas: bool,

    /// Correlated with a politically exposed person.
    #[arg(long)]
    pub pep: bool,

    /// Correlated with tax evasion.
    #[arg(long)]
    pub tax_evasion: bool,
}

impl CreateArgs {
    pub fn into_fields(self) -> DeclarationFields {
        DeclarationFields {
            transaction_volume: self.volume,
            transaction_no: self.transaction_no,
            transaction_date: self.transaction_date,
            id_no: self.id_no,
            name: self.name,
            nationality: self.nationality,
            address: self.address,
            dob: self.dob,
            phone_no: self.phone_no,
            source_of_fund: self.source_of_fund,
            source_of_fund_others: self.source_of_fund_others,
            purpose_of_transaction: self.purpose,
            purpose_of_transaction_others: self.purpose_others,
            beneficial_owner: self.beneficial_owner,
            beneficial_owner_share: self.share,
            cross_border_movement: self.cross_border,
            compliance_mas: self.mas,
            compliance_pep: self.pep,
            compliance_tax_evasion: self.tax_evasion,
        }
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: String,

    #[arg(long)]
    pub volume: Option<TransactionVolume>,

    #[arg(long)]
    pub transaction_no: Option<String>,

    #[arg(long)]
    pub transaction_date: Option<String>,

    #[arg(long)]
    pub id_no: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub nationality: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub dob: Option<String>,

    #[arg(long)]
    pub phone_no: Option<String>,

    #[arg(long)]
    pub source_of_fund: Option<SourceOfFund>,

    #[arg(long)]
    pub source_of_fund_others: Option<String>,

    #[arg(long)]
    pub purpose: Option<PurposeOfTransaction>,

    #[arg(long)]
    pub purpose_others: Option<String>,

    #[arg(long)]
    pub beneficial_owner: Option<BeneficialOwner>,

    #[arg(long)]
    pub share: Option<String>,

    #[arg(long)]
    pub cross_border: Option<bool>,

    #[arg(long)]
    pub mas: Option<bool>,

    #[arg(long)]
    pub pep: Option<bool>,

    #[arg(long)]
    pub tax_evasion: Option<bool>,
}

impl UpdateArgs {
    /// Split into the target id and the field overwrite.
    pub fn into_patch(self) -> (String, DeclarationPatch) {
        let patch = DeclarationPatch {
            transaction_volume: self.volume,
            transaction_no: self.transaction_no,
            transaction_date: self.transaction_date,
            id_no: self.id_no,
            name: self.name,
            nationality: self.nationality,
            address: self.address,
            dob: self.dob,
            phone_no: self.phone_no,
            source_of_fund: self.source_of_fund,
            source_of_fund_others: self.source_of_fund_others,
            purpose_of_transaction: self.purpose,
            purpose_of_transaction_others: self.purpose_others,
            beneficial_owner: self.beneficial_owner,
            beneficial_owner_share: self.share,
            cross_border_movement: self.cross_border,
            compliance_mas: self.mas,
            compliance_pep: self.pep,
            compliance_tax_evasion: self.tax_evasion,
        };
        (self.id, patch)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "declaro",
            "create",
            "--transaction-no",
            "TX-1",
            "--transaction-date",
            "2024-05-01",
            "--id-no",
            "S1",
            "--name",
            "Alice",
            "--nationality",
            "SG",
            "--address",
            "1 Road",
            "--dob",
            "1990-01-01",
            "--phone-no",
            "999",
            "--source-of-fund",
            "others",
            "--source-of-fund-others",
            "Gift",
            "--pep",
        ])
        .unwrap();

        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        let fields = args.into_fields();
        assert_eq!(fields.transaction_volume, TransactionVolume::Less);
        assert_eq!(fields.source_of_fund, SourceOfFund::Others);
        assert_eq!(fields.source_of_fund_others.as_deref(), Some("Gift"));
        assert!(fields.compliance_pep);
        assert!(!fields.compliance_mas);
    }

    #[test]
    fn test_parse_update_builds_sparse_patch() {
        let cli = Cli::try_parse_from(["declaro", "update", "abc", "--name", "X", "--mas", "true"])
            .unwrap();

        let Commands::Update(args) = cli.command else {
            panic!("expected update");
        };
        let (id, patch) = args.into_patch();
        assert_eq!(id, "abc");
        assert_eq!(
            patch,
            DeclarationPatch {
                name: Some("X".to_string()),
                compliance_mas: Some(true),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let result = Cli::try_parse_from(["declaro", "update", "abc", "--volume", "huge"]);
        assert!(result.is_err());
    }
}
