// Uplink Ledger Library: deterministic accounting for fixed-supply
// on-chain assets
// Written in 2021 by
//     Uplink ledger developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the MIT License
// along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! Balances and fixed-point semantics.
//!
//! A balance is a signed 64-bit count of the smallest representable asset
//! units. How those units read as a quantity depends on the owning asset's
//! type: raw integers for discrete assets, a held/not-held flag for binary
//! assets, and a fixed-point number scaled by [`SCALE`] for fractional
//! assets. All consensus-path arithmetic stays in 64-bit integers; floating
//! point appears only in [`display_balance`], which exists for human output
//! and never feeds back into ledger state.

use core::fmt::{self, Display, Formatter};

use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A count of smallest asset units. Negative values never appear in a
/// committed holdings map; they occur transiently as debit amounts inside
/// the circulation algebra.
pub type Balance = i64;

/// Largest representable balance magnitude
pub const MAX_BALANCE: Balance = i64::MAX;

/// Fixed-point scaling divisor for fractional assets: every fractional
/// balance is stored at seven decimal places regardless of the declared
/// precision, giving a maximum displayable quantity of
/// `922_337_203_685.4775807` and a smallest fractional unit of `0.0000001`.
pub const SCALE: Balance = 10_000_000;

/// Declared decimal precision of a fractional asset.
///
/// Stored zero-indexed (`P1` is discriminant 0). Every external surface,
/// from the binary wire form to JSON and display, exposes the one-indexed
/// number of decimal places in 1..=7.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    FromPrimitive,
)]
#[repr(u8)]
pub enum Precision {
    P1 = 0,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
}

impl Precision {
    /// One-indexed number of decimal places, in 1..=7
    #[inline]
    pub fn decimals(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Precision::decimals`]; `None` outside 1..=7
    #[inline]
    pub fn from_decimals(decimals: u8) -> Option<Self> {
        decimals.checked_sub(1).and_then(Self::from_u8)
    }
}

impl Display for Precision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decimals())
    }
}

/// Semantics of an asset's balances
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AssetType {
    /// Integer quantities displayed as raw integers
    Discrete,
    /// Fixed-point quantities with a declared decimal precision
    Fractional(Precision),
    /// Held/not-held assets where only balances 0 and 1 are meaningful
    Binary,
}

impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Discrete => f.write_str("discrete"),
            AssetType::Fractional(precision) => {
                write!(f, "fractional-{}", precision)
            }
            AssetType::Binary => f.write_str("binary"),
        }
    }
}

/// Symbolic off-chain reference unit an asset may be denominated against
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display,
)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[display(Debug)]
pub enum Ref {
    USD,
    GBP,
    EUR,
    CHF,
    Token,
    Security,
}

impl Ref {
    /// The exact ASCII literal used on the wire
    pub fn wire_literal(self) -> &'static str {
        match self {
            Ref::USD => "USD",
            Ref::GBP => "GBP",
            Ref::EUR => "EUR",
            Ref::CHF => "CHF",
            Ref::Token => "Token",
            Ref::Security => "Security",
        }
    }

    fn from_wire_literal(literal: &str) -> Option<Self> {
        Some(match literal {
            "USD" => Ref::USD,
            "GBP" => Ref::GBP,
            "EUR" => Ref::EUR,
            "CHF" => Ref::CHF,
            "Token" => Ref::Token,
            "Security" => Ref::Security,
            _ => return None,
        })
    }
}

/// Renders a balance for human consumption under the given asset type.
///
/// Fractional balances divide by the full [`SCALE`] and keep one digit more
/// than the declared precision; operator tooling depends on this exact
/// width.
pub fn display_balance(asset_type: AssetType, balance: Balance) -> String {
    match asset_type {
        AssetType::Discrete => balance.to_string(),
        AssetType::Binary => {
            if balance > 0 {
                s!("held")
            } else {
                s!("not-held")
            }
        }
        AssetType::Fractional(precision) => {
            let digits = precision.decimals() as usize + 1;
            format!("{:.*}", digits, balance as f64 / SCALE as f64)
        }
    }
}

mod strict_encoding {
    use super::*;
    use crate::strict_encoding::{Error, StrictDecode, StrictEncode};
    use std::io;

    impl StrictEncode for Precision {
        #[inline]
        fn strict_encode<E: io::Write>(&self, e: E) -> Result<usize, Error> {
            self.decimals().strict_encode(e)
        }
    }

    impl StrictDecode for Precision {
        fn strict_decode<D: io::Read>(d: D) -> Result<Self, Error> {
            let decimals = u8::strict_decode(d)?;
            Precision::from_decimals(decimals)
                .ok_or(Error::EnumValueNotKnown("Precision", decimals))
        }
    }

    impl StrictEncode for Ref {
        #[inline]
        fn strict_encode<E: io::Write>(&self, e: E) -> Result<usize, Error> {
            self.wire_literal().strict_encode(e)
        }
    }

    impl StrictDecode for Ref {
        fn strict_decode<D: io::Read>(d: D) -> Result<Self, Error> {
            let literal = String::strict_decode(d)?;
            Ref::from_wire_literal(&literal).ok_or_else(|| {
                Error::DataIntegrityError(format!(
                    "unknown reference unit literal `{}`",
                    literal
                ))
            })
        }
    }

    impl StrictEncode for AssetType {
        fn strict_encode<E: io::Write>(
            &self,
            mut e: E,
        ) -> Result<usize, Error> {
            Ok(match self {
                AssetType::Discrete => "Discrete".strict_encode(&mut e)?,
                AssetType::Binary => "Binary".strict_encode(&mut e)?,
                AssetType::Fractional(precision) => {
                    strict_encode_list!(e; "Fractional", precision)
                }
            })
        }
    }

    impl StrictDecode for AssetType {
        fn strict_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
            let tag = String::strict_decode(&mut d)?;
            Ok(match tag.as_str() {
                "Discrete" => AssetType::Discrete,
                "Binary" => AssetType::Binary,
                "Fractional" => {
                    AssetType::Fractional(Precision::strict_decode(&mut d)?)
                }
                unknown => Err(Error::DataIntegrityError(format!(
                    "unknown asset type tag `{}`",
                    unknown
                )))?,
            })
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::de;
    use serde::ser::SerializeStruct;
    use serde::{Deserialize, Deserializer, Serializer};

    /// The JSON shape is a tagged object `{"tag": ..., "contents": ...}`
    /// with `contents` carrying the one-indexed precision for fractional
    /// assets and `null` otherwise.
    impl Serialize for AssetType {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut s = serializer.serialize_struct("AssetType", 2)?;
            match self {
                AssetType::Discrete => {
                    s.serialize_field("tag", "Discrete")?;
                    s.serialize_field("contents", &None::<u8>)?;
                }
                AssetType::Binary => {
                    s.serialize_field("tag", "Binary")?;
                    s.serialize_field("contents", &None::<u8>)?;
                }
                AssetType::Fractional(precision) => {
                    s.serialize_field("tag", "Fractional")?;
                    s.serialize_field("contents", &Some(precision.decimals()))?;
                }
            }
            s.end()
        }
    }

    #[derive(Deserialize)]
    #[serde(crate = "serde_crate")]
    struct TaggedAssetType {
        tag: String,
        #[serde(default)]
        contents: Option<u8>,
    }

    impl<'de> Deserialize<'de> for AssetType {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let raw = TaggedAssetType::deserialize(deserializer)?;
            match (raw.tag.as_str(), raw.contents) {
                ("Discrete", None) => Ok(AssetType::Discrete),
                ("Binary", None) => Ok(AssetType::Binary),
                ("Fractional", Some(decimals)) => {
                    Precision::from_decimals(decimals)
                        .map(AssetType::Fractional)
                        .ok_or_else(|| {
                            de::Error::custom(format!(
                                "fractional precision {} out of range 1..=7",
                                decimals
                            ))
                        })
                }
                (tag, _) => Err(de::Error::custom(format!(
                    "malformed asset type object with tag `{}`",
                    tag
                ))),
            }
        }
    }
}
