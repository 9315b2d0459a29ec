// Declaro — Declaration data models
//
// A declaration is written once by `create` and afterwards changed only
// through `DeclarationPatch`, which cannot reach the identity fields.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Categorical fields ──────────────────────────────────────────────────────

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal / $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Human-readable label as printed on the form.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "unknown {} '{}' (expected one of: {})",
                        stringify!($name),
                        other,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// Size bracket of the exchange transaction.
    TransactionVolume {
        Less => "less" / "Less than 20,000",
        Above => "above" / "Above 20,000",
    }
}

choice_enum! {
    SourceOfFund {
        Savings => "savings" / "Savings",
        Employment => "employment" / "Employment",
        Sale => "sale" / "Sale/Buy Property",
        Inheritance => "inheritance" / "Inheritance",
        Business => "business" / "Business",
        Others => "others" / "Others",
    }
}

choice_enum! {
    PurposeOfTransaction {
        Savings => "savings" / "Savings",
        Employment => "employment" / "Employment",
        Sale => "sale" / "Sale/Buy Property",
        Investment => "investment" / "Investment",
        Holiday => "holiday" / "Holiday",
        Business => "business" / "Business",
        Others => "others" / "Others",
    }
}

choice_enum! {
    /// Whether anyone other than the declarant has a share in the money.
    BeneficialOwner {
        None => "none" / "I/We hereby declare that there is no other beneficial owner is involved in this money exchange transaction.",
        Shares => "shares" / "I/We hereby declare the above person/entity owns (%) share in this money exchange transaction.",
    }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// The form payload: everything the declarant fills in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationFields {
    pub transaction_volume: TransactionVolume,
    pub transaction_no: String,
    pub transaction_date: String,
    pub id_no: String,
    pub name: String,
    pub nationality: String,
    pub address: String,
    pub dob: String,
    pub phone_no: String,
    pub source_of_fund: SourceOfFund,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_of_fund_others: Option<String>,
    pub purpose_of_transaction: PurposeOfTransaction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose_of_transaction_others: Option<String>,
    pub beneficial_owner: BeneficialOwner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficial_owner_share: Option<String>,
    pub cross_border_movement: bool,
    #[serde(rename = "complianceMAS")]
    pub compliance_mas: bool,
    #[serde(rename = "compliancePEP")]
    pub compliance_pep: bool,
    pub compliance_tax_evasion: bool,
}

/// A stored declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: DeclarationFields,
}

/// One-line summary used when sharing a declaration.
impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Declaration #{} - {}",
            self.fields.transaction_no, self.fields.name
        )
    }
}

/// Field-level overwrite for an existing declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationPatch {
    pub transaction_volume: Option<TransactionVolume>,
    pub transaction_no: Option<String>,
    pub transaction_date: Option<String>,
    pub id_no: Option<String>,
    pub name: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub dob: Option<String>,
    pub phone_no: Option<String>,
    pub source_of_fund: Option<SourceOfFund>,
    pub source_of_fund_others: Option<String>,
    pub purpose_of_transaction: Option<PurposeOfTransaction>,
    pub purpose_of_transaction_others: Option<String>,
    pub beneficial_owner: Option<BeneficialOwner>,
    pub beneficial_owner_share: Option<String>,
    pub cross_border_movement: Option<bool>,
    pub compliance_mas: Option<bool>,
    pub compliance_pep: Option<bool>,
    pub compliance_tax_evasion: Option<bool>,
}

impl DeclarationPatch {
    /// Overwrite every field this patch specifies; leave the rest alone.
    pub fn apply_to(&self, fields: &mut DeclarationFields) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *slot = value.clone();
            }
        }

        set(&mut fields.transaction_volume, &self.transaction_volume);
        set(&mut fields.transaction_no, &self.transaction_no);
        set(&mut fields.transaction_date, &self.transaction_date);
        set(&mut fields.id_no, &self.id_no);
        set(&mut fields.name, &self.name);
        set(&mut fields.nationality, &self.nationality);
        set(&mut fields.address, &self.address);
        set(&mut fields.dob, &self.dob);
        set(&mut fields.phone_no, &self.phone_no);
        set(&mut fields.source_of_fund, &self.source_of_fund);
        set_opt(&mut fields.source_of_fund_others, &self.source_of_fund_others);
        set(&mut fields.purpose_of_transaction, &self.purpose_of_transaction);
        set_opt(
            &mut fields.purpose_of_transaction_others,
            &self.purpose_of_transaction_others,
        );
        set(&mut fields.beneficial_owner, &self.beneficial_owner);
        set_opt(&mut fields.beneficial_owner_share, &self.beneficial_owner_share);
        set(&mut fields.cross_border_movement, &self.cross_border_movement);
        set(&mut fields.compliance_mas, &self.compliance_mas);
        set(&mut fields.compliance_pep, &self.compliance_pep);
        set(&mut fields.compliance_tax_evasion, &self.compliance_tax_evasion);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
