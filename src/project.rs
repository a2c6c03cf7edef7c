//! License project data model.
//!
//! A [`Project`] owns exactly one [`Product`]; the product owns its signing
//! [`KeyPair`] (absent until generated) and the ordered list of issued
//! [`License`]s.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::IssuanceConfig;
use crate::key_generation::KeyPair;

/// Kind of grant a license represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    Trial,
    Standard,
    Personal,
    Floating,
    Subscription,
}

impl LicenseType {
    pub const ALL: [LicenseType; 5] = [
        LicenseType::Trial,
        LicenseType::Standard,
        LicenseType::Personal,
        LicenseType::Floating,
        LicenseType::Subscription,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::Trial => "trial",
            LicenseType::Standard => "standard",
            LicenseType::Personal => "personal",
            LicenseType::Floating => "floating",
            LicenseType::Subscription => "subscription",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        LicenseType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown license type '{s}'"))
    }
}

/// A single issued grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub expiration_date: DateTime<Utc>,
    pub license_type: LicenseType,
    pub owner_name: String,
}

impl License {
    pub fn new(
        expiration_date: DateTime<Utc>,
        license_type: LicenseType,
        owner_name: impl Into<String>,
    ) -> Self {
        Self {
            expiration_date,
            license_type,
            owner_name: owner_name.into(),
        }
    }

    /// A fresh license with the configured defaults, issued at `now`.
    ///
    /// Returns `None` when the expiration date is not representable.
    pub fn issue_default(defaults: &IssuanceConfig, now: DateTime<Utc>) -> Option<Self> {
        let validity = Duration::try_days(defaults.trial_days)?;
        let expiration_date = now.checked_add_signed(validity)?;
        Some(Self::new(
            expiration_date,
            defaults.license_type(),
            defaults.default_owner.clone(),
        ))
    }

    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        self.expiration_date <= at
    }
}

/// The entity being licensed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key_pair: Option<KeyPair>,
    #[serde(default)]
    issued_licenses: Vec<License>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    pub fn public_key(&self) -> Option<&str> {
        self.key_pair.as_ref().map(KeyPair::public_key)
    }

    pub fn private_key(&self) -> Option<&str> {
        self.key_pair.as_ref().map(KeyPair::private_key)
    }

    /// Replace both key halves at once; returns the previous pair, if any.
    pub fn set_key_pair(&mut self, pair: KeyPair) -> Option<KeyPair> {
        self.key_pair.replace(pair)
    }

    pub fn issued_licenses(&self) -> &[License] {
        &self.issued_licenses
    }

    /// Mutable access to issued licenses for in-place edits (owner, expiry).
    pub fn issued_licenses_mut(&mut self) -> &mut [License] {
        &mut self.issued_licenses
    }

    /// Append to the end of the issued list.
    pub fn add_license(&mut self, license: License) {
        self.issued_licenses.push(license);
    }

    /// Licenses can only be issued once both key halves are present.
    pub fn can_issue_license(&self) -> bool {
        self.key_pair.as_ref().is_some_and(KeyPair::is_complete)
    }
}

/// The top-level saved unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub product: Product,
}

impl Project {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product: Product::new(product_name),
        }
    }

    /// A project is savable once its product has a name.
    pub fn can_persist(&self) -> bool {
        !self.product.name.trim().is_empty()
    }

    pub fn license_count(&self) -> usize {
        self.product.issued_licenses.len()
    }
}
