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

//! The asset ledger data model: addresses and holders, balances and asset
//! types, the holdings map and the supply-preserving transfer algebra.
//!
//! Every mutating operation is a pure function from an asset to either an
//! error or a new asset; no operation ever modifies its input, so callers
//! keep a consistent pre-call state on failure.

pub mod address;
pub mod asset;
pub mod balance;
pub mod holdings;

pub use address::{
    AccountAddress, Address, AddressKind, AssetAddress, ContractAddress,
    Holder, ADDRESS_LEN,
};
pub use asset::{Asset, AssetError};
pub use balance::{
    display_balance, AssetType, Balance, Precision, Ref, MAX_BALANCE, SCALE,
};
pub use holdings::Holdings;
