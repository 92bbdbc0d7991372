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

//! Typed addresses and the holder union.
//!
//! An address is an opaque 32-byte identifier refined at the type level by
//! the kind of entity it refers to: an asset, an account or a contract. The
//! refinement has no runtime footprint; all three kinds share the same byte
//! representation and the same wire form. The only place where the kind
//! becomes observable at runtime is [`Holder`], the tagged union keying the
//! holdings map.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash as StdHash, Hasher};
use core::marker::PhantomData;
use core::str::FromStr;

use bitcoin_hashes::hex::{FromHex, ToHex};
use bitcoin_hashes::{sha256, Hash, HashEngine};
use chrono::NaiveDateTime;

/// Byte width shared by all address kinds
pub const ADDRESS_LEN: usize = 32;

/// Marker for addresses referring to assets
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum AAsset {}

/// Marker for addresses referring to accounts
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum AAccount {}

/// Marker for addresses referring to contracts
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum AContract {}

/// Type-level discriminator implemented by the address kind markers. The
/// trait carries no operations: it exists so that [`Address`] can only be
/// instantiated at one of the three known kinds.
pub trait AddressKind {}

impl AddressKind for AAsset {}
impl AddressKind for AAccount {}
impl AddressKind for AContract {}

/// An opaque fixed-width identifier with a phantom kind tag.
///
/// Equality, ordering and hashing operate on the underlying bytes only;
/// two addresses of different kinds never meet in the same comparison
/// because the kind is part of the type.
pub struct Address<K: AddressKind>([u8; ADDRESS_LEN], PhantomData<K>);

/// Address of an on-chain asset
pub type AssetAddress = Address<AAsset>;
/// Address of an account
pub type AccountAddress = Address<AAccount>;
/// Address of a deployed contract
pub type ContractAddress = Address<AContract>;

/// Errors from constructing an address out of raw bytes or text
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, From, Error)]
#[display(doc_comments)]
pub enum AddressParseError {
    /// address has wrong byte length {_0}, expected 32 bytes
    WrongLength(usize),

    /// address is not a valid hex string
    #[from(bitcoin_hashes::hex::Error)]
    Hex,
}

impl<K: AddressKind> Address<K> {
    /// Constructs an address from an owned byte array
    #[inline]
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes, PhantomData)
    }

    /// Constructs an address from a byte slice, validating its length
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressParseError> {
        if slice.len() != ADDRESS_LEN {
            return Err(AddressParseError::WrongLength(slice.len()));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(slice);
        Ok(Self::from_bytes(bytes))
    }

    /// Returns a reference to the underlying bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Copies out the underlying bytes
    #[inline]
    pub fn to_bytes(&self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    // Reinterprets the same bytes under a different kind. Deliberately not
    // public: the only sanctioned tag-discarding views are the projections
    // on `Holder`.
    #[inline]
    pub(crate) fn retag<L: AddressKind>(self) -> Address<L> {
        Address(self.0, PhantomData)
    }
}

impl AssetAddress {
    /// Content-addresses a new asset from the identity of its issuer, its
    /// name and the moment of issuance. The same creation parameters always
    /// produce the same address on every node.
    pub fn derive(
        issuer: &AccountAddress,
        name: &str,
        issued_on: NaiveDateTime,
    ) -> Self {
        let mut engine = sha256::Hash::engine();
        engine.input(issuer.as_bytes());
        engine.input(name.as_bytes());
        engine.input(&issued_on.timestamp().to_be_bytes());
        Self::from_bytes(sha256::Hash::from_engine(engine).into_inner())
    }
}

// Manual implementations: derives would place unnecessary bounds on the
// phantom kind parameter.
impl<K: AddressKind> Clone for Address<K> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0, PhantomData)
    }
}

impl<K: AddressKind> Copy for Address<K> {}

impl<K: AddressKind> PartialEq for Address<K> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K: AddressKind> Eq for Address<K> {}

impl<K: AddressKind> PartialOrd for Address<K> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: AddressKind> Ord for Address<K> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<K: AddressKind> StdHash for Address<K> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<K: AddressKind> AsRef<[u8]> for Address<K> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<K: AddressKind> Debug for Address<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0.to_hex())
    }
}

impl<K: AddressKind> Display for Address<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl<K: AddressKind> FromStr for Address<K> {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = Vec::<u8>::from_hex(s)?;
        Self::from_slice(&bytes)
    }
}

/// A balance owner: either an account or a contract.
///
/// Two holders are equal iff both the variant and the address bytes match.
/// Ordering is by (variant, address bytes), accounts before contracts, so
/// the holdings map iterates deterministically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, From)]
pub enum Holder {
    /// Units held by an account
    #[from]
    Account(AccountAddress),

    /// Units held by a contract
    #[from]
    Contract(ContractAddress),
}

impl Holder {
    /// Returns the underlying address bytes irrespective of the variant
    #[inline]
    pub fn address_bytes(&self) -> &[u8; ADDRESS_LEN] {
        match self {
            Holder::Account(address) => address.as_bytes(),
            Holder::Contract(address) => address.as_bytes(),
        }
    }

    /// Views the holder as an account address, discarding the tag.
    ///
    /// This is a "view as" operation, not a safe cast: applied to a
    /// contract holder it yields an account address with the contract's
    /// bytes. It exists for RPC and JSON boundaries where the caller knows
    /// the intended kind out of band; misuse is a caller bug.
    #[inline]
    pub fn to_account(&self) -> AccountAddress {
        match self {
            Holder::Account(address) => *address,
            Holder::Contract(address) => address.retag(),
        }
    }

    /// Views the holder as a contract address, discarding the tag. The same
    /// caveats as for [`Holder::to_account`] apply.
    #[inline]
    pub fn to_contract(&self) -> ContractAddress {
        match self {
            Holder::Account(address) => address.retag(),
            Holder::Contract(address) => *address,
        }
    }
}

/// The textual form shows only the address; the variant is lost. Parsing
/// the text back always yields an account holder.
impl Display for Holder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address_bytes().to_hex())
    }
}

impl FromStr for Holder {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountAddress::from_str(s).map(Holder::Account)
    }
}

mod strict_encoding {
    use super::*;
    use crate::strict_encoding::{Error, StrictDecode, StrictEncode};
    use std::io;

    impl<K: AddressKind> StrictEncode for Address<K> {
        #[inline]
        fn strict_encode<E: io::Write>(
            &self,
            mut e: E,
        ) -> Result<usize, Error> {
            e.write_all(self.as_bytes())?;
            Ok(ADDRESS_LEN)
        }
    }

    impl<K: AddressKind> StrictDecode for Address<K> {
        #[inline]
        fn strict_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
            let mut buf = [0u8; ADDRESS_LEN];
            d.read_exact(&mut buf)?;
            Ok(Address::from_bytes(buf))
        }
    }

    /// Holders serialize as the bytes of the contained address; the variant
    /// tag is not part of the wire form. Decoding reconstructs an account
    /// holder and relies on context for the distinction. Account and
    /// contract holders with identical bytes are therefore
    /// indistinguishable on the wire, which the ledger treats as
    /// equivalent.
    impl StrictEncode for Holder {
        #[inline]
        fn strict_encode<E: io::Write>(
            &self,
            mut e: E,
        ) -> Result<usize, Error> {
            e.write_all(self.address_bytes())?;
            Ok(ADDRESS_LEN)
        }
    }

    impl StrictDecode for Holder {
        #[inline]
        fn strict_decode<D: io::Read>(d: D) -> Result<Self, Error> {
            Ok(Holder::Account(AccountAddress::strict_decode(d)?))
        }
    }
}
