use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// RECEIPT -> WAITING -> ANSWERED -> VISIT | REJECTED
str_enum!(DiagnosisStatus {
    Receipt => "RECEIPT",
    Waiting => "WAITING",
    Answered => "ANSWERED",
    Visit => "VISIT",
    Rejected => "REJECTED",
});

str_enum!(ReservationStatus {
    Pending => "PENDING",
    Confirmed => "CONFIRMED",
    Canceled => "CANCELED",
});

impl ReservationStatus {
    /// CONFIRMED and CANCELED admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

str_enum!(UserRole {
    User => "user",
    Expert => "expert",
    Admin => "admin",
});

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}
