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

#![recursion_limit = "256"]
// Coding conventions
#![deny(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    unused_mut,
    unused_imports,
    dead_code,
    //missing_docs
)]

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate amplify_derive;
#[macro_use]
extern crate num_derive;

#[cfg(feature = "serde")]
extern crate serde_crate as serde;

#[cfg(feature = "fs")]
#[macro_use]
extern crate log;

#[macro_use]
pub mod strict_encoding;
pub mod ledger;

#[cfg(feature = "fs")]
pub mod fs;

pub mod prelude {
    use super::*;

    pub use ledger::address::{
        AAccount, AAsset, AContract, AccountAddress, Address, AddressKind,
        AddressParseError, AssetAddress, ContractAddress, Holder, ADDRESS_LEN,
    };
    pub use ledger::asset::{Asset, AssetError, Metadata};
    pub use ledger::balance::{
        display_balance, AssetType, Balance, Precision, Ref, MAX_BALANCE,
        SCALE,
    };
    pub use ledger::holdings::Holdings;
    pub use strict_encoding::{
        strict_deserialize, strict_serialize, StrictDecode, StrictEncode,
    };

    #[cfg(feature = "fs")]
    pub use fs::{load_asset, load_preallocated, save_asset, FileError};
}

pub use prelude::*;
