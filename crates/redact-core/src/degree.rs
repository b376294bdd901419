//! Redaction degrees and the static category allowlist table.

use serde::{Deserialize, Serialize};

/// Ordinal redaction aggressiveness.
///
/// Degree `d` always redacts the categories of every degree `0..=d`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Degree {
    #[default]
    Minimal,
    Moderate,
    Maximum,
}

impl Degree {
    pub const ALL: [Degree; 3] = [Degree::Minimal, Degree::Moderate, Degree::Maximum];

    /// Clamp an arbitrary request integer into `[0, 2]`.
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=0 => Degree::Minimal,
            1 => Degree::Moderate,
            _ => Degree::Maximum,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Degree::Minimal => 0,
            Degree::Moderate => 1,
            Degree::Maximum => 2,
        }
    }

    pub fn is_maximum(self) -> bool {
        self == Degree::Maximum
    }
}

impl std::fmt::Display for Degree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Degree::Minimal => "minimal",
            Degree::Moderate => "moderate",
            Degree::Maximum => "maximum",
        };
        write!(f, "{} ({})", self.level(), name)
    }
}

const DEGREE0: &[&str] = &[
    "SSN",
    "PASSWORD",
    "CREDITCARDNUMBER",
    "CREDITCARDCVV",
    "ACCOUNTNUMBER",
    "IBAN",
    "BITCOINADDRESS",
    "ETHEREUMADDRESS",
    "LITECOINADDRESS",
    "PHONEIMEI",
    "MAC",
    "CREDITCARDISSUER",
    "VEHICLEVIN",
    "VEHICLEVRM",
    "ACCOUNTNAME",
];

const DEGREE1: &[&str] = &[
    "FIRSTNAME",
    "LASTNAME",
    "FULLNAME",
    "NAME",
    "JOBTITLE",
    "COMPANY_NAME",
    "EMAIL",
    "PHONE_NUMBER",
    "USERNAME",
    "ADDRESS",
    "IPV4",
    "IPV6",
    "STREETADDRESS",
    "CITY",
    "STATE",
    "ZIPCODE",
    "DATE",
    "TIME",
    "URL",
    "IP",
];

const DEGREE2: &[&str] = &[
    "JOBTYPE",
    "JOBDESCRIPTOR",
    "JOBAREA",
    "SEX",
    "GENDER",
    "COUNTY",
    "BUILDINGNUMBER",
    "SECONDARYADDRESS",
    "CURRENCY",
    "AMOUNT",
    "SEXTYPE",
    "ORDINALDIRECTION",
    "DISPLAYNAME",
    "NUMBER",
    "NEARBYGPSCOORDINATE",
    "CURRENCYCODE",
    "CURRENCYSYMBOL",
];

/// Category-to-degree membership, shared by every medium.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTable {
    tiers: [&'static [&'static str]; 3],
}

impl CategoryTable {
    /// The built-in table of classifier labels.
    pub const fn standard() -> Self {
        Self {
            tiers: [DEGREE0, DEGREE1, DEGREE2],
        }
    }

    /// Categories introduced at exactly this degree.
    pub fn tier(&self, degree: Degree) -> &'static [&'static str] {
        self.tiers[degree.level() as usize]
    }

    /// Lowest degree whose allowlist contains `category`.
    pub fn degree_of(&self, category: &str) -> Option<Degree> {
        Degree::ALL
            .into_iter()
            .find(|d| self.tier(*d).contains(&category))
    }

    /// Whether `category` is redacted at `degree`.
    pub fn allows(&self, degree: Degree, category: &str) -> bool {
        self.degree_of(category).is_some_and(|d| d <= degree)
    }

    /// Union of the tiers `0..=degree`, in table order.
    pub fn allowlist(&self, degree: Degree) -> Vec<&'static str> {
        Degree::ALL
            .into_iter()
            .filter(|d| *d <= degree)
            .flat_map(|d| self.tier(d).iter().copied())
            .collect()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}
