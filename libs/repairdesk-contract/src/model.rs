use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a stored or submitted value is not a known enum member.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Generates `as_str`, `Display` and `FromStr` from the wire table so the
/// serde renames and the storage strings can never drift apart.
macro_rules! wire_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($ty::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Account role. Immutable once the account exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "teknisyen")]
    Technician,
    #[serde(rename = "musteri")]
    Customer,
}

wire_enum!(Role, "role", {
    Admin => "admin",
    Technician => "teknisyen",
    Customer => "musteri",
});

/// Repair ticket status. See [`crate::workflow`] for the allowed moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
pub enum TicketStatus {
    #[default]
    #[serde(rename = "beklemede")]
    Pending,
    #[serde(rename = "isleniyor")]
    InProgress,
    #[serde(rename = "tamamlandi")]
    Completed,
    #[serde(rename = "iptal")]
    Cancelled,
}

wire_enum!(TicketStatus, "status", {
    Pending => "beklemede",
    InProgress => "isleniyor",
    Completed => "tamamlandi",
    Cancelled => "iptal",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
pub enum Priority {
    #[serde(rename = "dusuk")]
    Low,
    #[default]
    #[serde(rename = "orta")]
    Medium,
    #[serde(rename = "yuksek")]
    High,
    #[serde(rename = "acil")]
    Urgent,
}

wire_enum!(Priority, "priority", {
    Low => "dusuk",
    Medium => "orta",
    High => "yuksek",
    Urgent => "acil",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "beklemede")]
    Pending,
    #[serde(rename = "kismi")]
    Partial,
    #[serde(rename = "odendi")]
    Paid,
}

wire_enum!(PaymentStatus, "payment_status", {
    Pending => "beklemede",
    Partial => "kismi",
    Paid => "odendi",
});
