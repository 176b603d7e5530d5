use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Dirección de cuenta/contrato: 20 bytes en hexadecimal con prefijo `0x`.
///
/// Se normaliza a minúsculas, de modo que una dirección con checksum EIP-55
/// y su forma en minúsculas son iguales.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub const HEX_LEN: usize = 40;

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let hex = trimmed.strip_prefix("0x")
                         .or_else(|| trimmed.strip_prefix("0X"))
                         .ok_or_else(|| DomainError::InvalidAddress(format!("missing 0x prefix: {raw}")))?;
        if hex.len() != Self::HEX_LEN {
            return Err(DomainError::InvalidAddress(format!("expected 20 bytes, got {} hex chars: {raw}", hex.len())));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidAddress(format!("non-hex characters: {raw}")));
        }
        Ok(Address(format!("0x{}", hex.to_ascii_lowercase())))
    }

    pub fn zero() -> Self {
        Address(format!("0x{}", "0".repeat(Self::HEX_LEN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0[2..].chars().all(|c| c == '0')
    }
}

impl FromStr for Address {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = DomainError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
