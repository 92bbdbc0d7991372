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

//! The asset record and the supply-preserving circulation algebra.
//!
//! The stored `supply` field counts the *remaining uncirculated* units:
//! circulation moves units between this pool and holder balances, so
//! `supply + Σ holdings` stays constant across every circulation and
//! transfer. Assets are never destroyed and supply is never increased
//! after creation.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::{As, DisplayFromStr};

use super::address::{AccountAddress, AssetAddress, Holder};
use super::balance::{AssetType, Balance, Ref};
use super::holdings::Holdings;

/// Free-form key/value annotations attached to an asset at creation
pub type Metadata = BTreeMap<String, String>;

/// Errors produced by the circulation algebra. Every operation returns the
/// error as a value and leaves its input untouched, so a failed call never
/// corrupts ledger state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum AssetError {
    /// holder {_0} holds only {_1} units, not enough for the transfer
    InsufficientHoldings(Holder, Balance),

    /// asset {_0} has only {_1} uncirculated units left
    InsufficientSupply(AssetAddress, Balance),

    /// holder {_0} is not the issuer of asset {_1} and may not circulate
    /// its supply
    CirculatorIsNotIssuer(Holder, AssetAddress),

    /// transfer from holder {_0} back to itself
    SelfTransfer(Holder),

    /// holder {_0} has no entry in the holdings ledger
    HolderDoesNotExist(Holder),
}

/// A named, fixed-supply on-chain asset.
///
/// The field order is load-bearing: the binary wire form serializes fields
/// in declaration order and every node must agree on it byte for byte.
#[derive(Clone, Getters, PartialEq, Debug, Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[display("{name} ({address})")]
pub struct Asset {
    /// Human-readable asset name
    name: String,

    /// Account that created the asset; the only party allowed to circulate
    /// supply under the issuer policy
    #[cfg_attr(feature = "serde", serde(with = "As::<DisplayFromStr>"))]
    issuer: AccountAddress,

    /// Moment of issuance
    issued_on: NaiveDateTime,

    /// Remaining uncirculated units
    supply: Balance,

    /// Units currently in circulation, per holder
    holdings: Holdings,

    /// Optional off-chain reference unit
    reference: Option<Ref>,

    /// Balance semantics of the asset
    asset_type: AssetType,

    /// Content-derived address identifying the asset on chain
    #[cfg_attr(feature = "serde", serde(with = "As::<DisplayFromStr>"))]
    address: AssetAddress,

    metadata: Metadata,
}

impl Asset {
    /// Pure constructor with empty holdings. Performs no validation: the
    /// caller pre-validates the supply sign and the address derivation.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        issuer: AccountAddress,
        supply: Balance,
        reference: Option<Ref>,
        asset_type: AssetType,
        issued_on: NaiveDateTime,
        address: AssetAddress,
        metadata: Metadata,
    ) -> Asset {
        Asset {
            name,
            issuer,
            issued_on,
            supply,
            holdings: Holdings::new(),
            reference,
            asset_type,
            address,
            metadata,
        }
    }

    /// Installs an initial holdings map at genesis, replacing whatever was
    /// there. The supply is deliberately not adjusted: this is the only
    /// path that sets holdings without a matching supply movement, and it
    /// is permitted solely at asset creation. Keeping the installed total
    /// within the created supply is the genesis loader's contract, not
    /// enforced here.
    pub fn preallocate(mut self, holdings: Holdings) -> Asset {
        self.holdings = holdings;
        self
    }

    /// Balance held by `holder`; `None` when the holder has no entry.
    /// `Some(0)` is never returned because zero entries are pruned on
    /// every update.
    #[inline]
    pub fn balance(&self, holder: &Holder) -> Option<Balance> {
        self.holdings.get(holder)
    }

    /// Total units currently in circulation
    #[inline]
    pub fn circulation(&self) -> Balance {
        self.holdings.total()
    }

    /// Checks the circulated total against the remaining supply.
    ///
    /// Note that this compares against the *current* supply, not the
    /// supply at creation (which the record does not store), so an asset
    /// with circulated units reads as invalid once more than the remaining
    /// pool is held. Validators must apply this check consistently.
    pub fn validate(&self) -> bool {
        let held: i128 =
            self.holdings.iter().map(|(_, balance)| *balance as i128).sum();
        held <= self.supply as i128
    }

    /// Key under which the asset is stored in the node's key-value store;
    /// the stored value is the strict encoding
    #[inline]
    pub fn storage_key(&self) -> &[u8] {
        self.address.as_ref()
    }

    /// Moves `amount` units from the uncirculated pool into the holder's
    /// balance, decrementing the supply to match. A negative `amount`
    /// moves units back out of circulation; the caller guarantees the
    /// resulting holding stays non-negative.
    pub fn circulate_supply(
        &self,
        holder: Holder,
        amount: Balance,
    ) -> Result<Asset, AssetError> {
        if self.supply < amount {
            return Err(AssetError::InsufficientSupply(
                self.address,
                self.supply,
            ));
        }
        let mut asset = self.clone();
        let balance = asset.holdings.apply(holder, amount);
        debug_assert!(balance >= 0, "circulation drove a holding negative");
        asset.supply -= amount;
        debug_assert!(asset.supply >= 0, "circulation drove supply negative");
        Ok(asset)
    }

    /// Issuer-policy wrapper around [`Asset::circulate_supply`]: only the
    /// issuing account may move supply in or out of circulation.
    pub fn circulate_supply_as(
        &self,
        circulator: &AccountAddress,
        holder: Holder,
        amount: Balance,
    ) -> Result<Asset, AssetError> {
        if circulator != &self.issuer {
            return Err(AssetError::CirculatorIsNotIssuer(
                Holder::Account(*circulator),
                self.address,
            ));
        }
        self.circulate_supply(holder, amount)
    }

    /// Moves `amount` units from one holder to another as a pair of
    /// circulations: a debit of `from` followed by a credit of `to`, with
    /// no net supply impact. Transferring zero between distinct parties
    /// succeeds as a no-op.
    pub fn transfer_holdings(
        &self,
        from: Holder,
        to: Holder,
        amount: Balance,
    ) -> Result<Asset, AssetError> {
        if from == to {
            return Err(AssetError::SelfTransfer(from));
        }
        let balance = self
            .balance(&from)
            .ok_or(AssetError::HolderDoesNotExist(from))?;
        if amount < 0 || amount > balance {
            return Err(AssetError::InsufficientHoldings(from, balance));
        }
        self.circulate_supply(from, -amount)?
            .circulate_supply(to, amount)
    }
}

mod strict_encoding {
    use super::*;
    use crate::strict_encoding::{Error, StrictDecode, StrictEncode};
    use std::io;

    impl StrictEncode for Asset {
        fn strict_encode<E: io::Write>(
            &self,
            mut e: E,
        ) -> Result<usize, Error> {
            Ok(strict_encode_list!(e;
                self.name,
                self.issuer,
                self.issued_on,
                self.supply,
                self.holdings,
                self.reference,
                self.asset_type,
                self.address,
                self.metadata
            ))
        }
    }

    impl StrictDecode for Asset {
        fn strict_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
            let asset: Asset = strict_decode_self!(d;
                name,
                issuer,
                issued_on,
                supply,
                holdings,
                reference,
                asset_type,
                address,
                metadata
            );
            if asset.supply < 0 {
                Err(Error::DataIntegrityError(s!(
                    "asset with a negative supply"
                )))?;
            }
            Ok(asset)
        }
    }
}
