//! Region flag set.
//!
//! The bit layout is fixed. The low three bits match the first published
//! revision of the plugin (ForcePvp = 1, Heal = 2, TempGroup = 4) so that
//! numeric tokens written by that revision still decode.

use std::fmt;

use bitflags::bitflags;
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PolicyError;

bitflags! {
    /// Behavioral rules attached to a region.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct RegionFlags: u32 {
        const FORCE_PVP = 1 << 0;
        const HEAL = 1 << 1;
        const TEMP_GROUP = 1 << 2;
        const FORCE_PVP_OFF = 1 << 3;
        const ITEM_BAN = 1 << 4;
        const PROJECTILE_BAN = 1 << 5;
        const NO_MOB = 1 << 6;
    }
}

/// Canonical token table, in bit order. Shared by commands and storage.
const TOKENS: [(RegionFlags, &str); 7] = [
    (RegionFlags::FORCE_PVP, "ForcePvp"),
    (RegionFlags::HEAL, "Heal"),
    (RegionFlags::TEMP_GROUP, "TempGroup"),
    (RegionFlags::FORCE_PVP_OFF, "ForcePvpOff"),
    (RegionFlags::ITEM_BAN, "ItemBan"),
    (RegionFlags::PROJECTILE_BAN, "ProjectileBan"),
    (RegionFlags::NO_MOB, "NoMob"),
];

/// Bits that existed in the first revision. Numeric tokens are read against
/// this mask only.
const LEGACY_MASK: u32 = 0b111;

impl RegionFlags {
    /// Canonical tokens, in bit order.
    pub fn valid_tokens() -> Vec<&'static str> {
        TOKENS.iter().map(|(_, token)| *token).collect()
    }

    /// Parse a single canonical token (ASCII case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::UnknownFlag` with the valid token list when the
    /// token is not in the table.
    pub fn parse_token(token: &str) -> Result<Self, PolicyError> {
        let token = token.trim();
        TOKENS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(token))
            .map(|(flag, _)| *flag)
            .ok_or_else(|| PolicyError::unknown_flag(token))
    }

    /// Parse a token read back from storage.
    ///
    /// Accepts everything [`parse_token`](Self::parse_token) does, plus the
    /// numeric form written by the first revision.
    pub fn parse_stored_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Ok(flag) = Self::parse_token(token) {
            return Some(flag);
        }
        let bits: u32 = token.parse().ok()?;
        let flags = Self::from_bits_truncate(bits & LEGACY_MASK);
        (!flags.is_empty()).then_some(flags)
    }

    /// Parse the comma-joined storage form. Unknown tokens are skipped.
    pub fn parse_list(value: &str) -> Self {
        value
            .split(',')
            .filter(|token| !token.trim().is_empty())
            .filter_map(Self::parse_stored_token)
            .fold(Self::empty(), |acc, flag| acc | flag)
    }

    /// Canonical tokens for the flags in this set, in bit order.
    pub fn tokens(&self) -> Vec<&'static str> {
        TOKENS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, token)| *token)
            .collect()
    }

    /// The comma-joined storage form.
    pub fn to_list_string(&self) -> String {
        self.tokens().join(",")
    }
}

impl fmt::Display for RegionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        write!(f, "{}", self.tokens().join(", "))
    }
}

impl Serialize for RegionFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let tokens = self.tokens();
        let mut seq = serializer.serialize_seq(Some(tokens.len()))?;
        for token in tokens {
            seq.serialize_element(token)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RegionFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TokensVisitor;

        impl<'de> Visitor<'de> for TokensVisitor {
            type Value = RegionFlags;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a sequence of region flag tokens")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut flags = RegionFlags::empty();
                while let Some(token) = seq.next_element::<String>()? {
                    if let Some(flag) = RegionFlags::parse_stored_token(&token) {
                        flags |= flag;
                    }
                }
                Ok(flags)
            }
        }

        deserializer.deserialize_seq(TokensVisitor)
    }
}
