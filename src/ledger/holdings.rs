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

//! The holdings ledger: an ordered map from holder to balance.
//!
//! Invariants maintained on every update: no entry carries a zero balance
//! (such entries are pruned immediately), and no committed entry is
//! negative. The type deliberately exposes no general-purpose merge or
//! insert: every mutation flows through the circulation algebra in
//! [`crate::ledger::asset`], which is the only place the invariants are
//! allowed to be enforced.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::FromIterator;

use super::address::Holder;
use super::balance::Balance;

/// Ordered map from holder to balance with no zero entries
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Holdings(BTreeMap<Holder, Balance>);

impl Holdings {
    /// An empty holdings map
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance held by the given holder; `None` when the holder has no
    /// entry. `Some(0)` never occurs since zero entries are pruned.
    #[inline]
    pub fn get(&self, holder: &Holder) -> Option<Balance> {
        self.0.get(holder).copied()
    }

    /// Number of holders with a non-zero balance
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in ascending holder order
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<Holder, Balance> {
        self.0.iter()
    }

    /// Sum of all held balances
    pub fn total(&self) -> Balance {
        self.0.values().sum()
    }

    // Adds `delta` to the holder's entry, inserting it when absent and
    // pruning it when the result is zero. Returns the resulting balance.
    pub(crate) fn apply(&mut self, holder: Holder, delta: Balance) -> Balance {
        let balance = self.0.get(&holder).copied().unwrap_or(0) + delta;
        if balance == 0 {
            self.0.remove(&holder);
        } else {
            self.0.insert(holder, balance);
        }
        balance
    }
}

impl FromIterator<(Holder, Balance)> for Holdings {
    /// Collects entries, dropping zero balances so the no-zero-entry
    /// invariant holds from construction
    fn from_iter<I: IntoIterator<Item = (Holder, Balance)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter(|(_, balance)| *balance != 0)
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Holdings {
    type Item = (&'a Holder, &'a Balance);
    type IntoIter = btree_map::Iter<'a, Holder, Balance>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

mod strict_encoding {
    use super::*;
    use crate::strict_encoding::{Error, StrictDecode, StrictEncode};
    use std::io;

    impl StrictEncode for Holdings {
        #[inline]
        fn strict_encode<E: io::Write>(&self, e: E) -> Result<usize, Error> {
            self.0.strict_encode(e)
        }
    }

    /// Committed holdings never contain zero or negative balances, so both
    /// are rejected on decode: accepting them would give the same ledger
    /// state two distinct byte forms. Pairs are read without an ordering
    /// check: the wire form orders entries by holder, and once the holder
    /// tag is dropped that order is not necessarily the byte order the
    /// decoded account keys sort into. Byte-identical keys still collide
    /// and are rejected.
    impl StrictDecode for Holdings {
        fn strict_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
            let len = u64::strict_decode(&mut d)?;
            let mut map = BTreeMap::<Holder, Balance>::new();
            for _ in 0..len {
                let holder = Holder::strict_decode(&mut d)?;
                let balance = Balance::strict_decode(&mut d)?;
                if balance <= 0 {
                    Err(Error::DataIntegrityError(s!(
                        "holdings entry with a zero or negative balance"
                    )))?;
                }
                if map.insert(holder, balance).is_some() {
                    Err(Error::DataIntegrityError(s!(
                        "repeated holder in holdings encoding"
                    )))?;
                }
            }
            Ok(Holdings(map))
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::ser::SerializeMap;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for Holdings {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.0.len()))?;
            for (holder, balance) in &self.0 {
                map.serialize_entry(&holder.to_string(), balance)?;
            }
            map.end()
        }
    }

    impl<'de> Deserialize<'de> for Holdings {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let raw = BTreeMap::<String, Balance>::deserialize(deserializer)?;
            raw.into_iter()
                .map(|(key, balance)| {
                    Holder::from_str(&key)
                        .map(|holder| (holder, balance))
                        .map_err(de::Error::custom)
                })
                .collect::<Result<_, _>>()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ledger::address::{
        AccountAddress, ContractAddress, ADDRESS_LEN,
    };
    use crate::strict_encoding::{Error, StrictDecode, StrictEncode};

    fn account(fill: u8) -> Holder {
        Holder::Account(AccountAddress::from_bytes([fill; ADDRESS_LEN]))
    }

    fn contract(fill: u8) -> Holder {
        Holder::Contract(ContractAddress::from_bytes([fill; ADDRESS_LEN]))
    }

    #[test]
    fn construction_prunes_zero_entries() {
        let holdings: Holdings =
            vec![(account(1), 600), (account(2), 0), (account(3), 400)]
                .into_iter()
                .collect();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings.get(&account(2)), None);
        assert_eq!(holdings.total(), 1000);
    }

    #[test]
    fn apply_inserts_updates_and_prunes() {
        let mut holdings = Holdings::new();
        assert_eq!(holdings.apply(account(1), 100), 100);
        assert_eq!(holdings.apply(account(1), -40), 60);
        assert_eq!(holdings.get(&account(1)), Some(60));

        assert_eq!(holdings.apply(account(1), -60), 0);
        assert_eq!(holdings.get(&account(1)), None);
        assert!(holdings.is_empty());
    }

    #[test]
    fn encoding_is_insertion_order_independent() {
        let forward: Holdings =
            vec![(account(1), 10), (contract(2), 20), (account(3), 30)]
                .into_iter()
                .collect();
        let backward: Holdings =
            vec![(account(3), 30), (account(1), 10), (contract(2), 20)]
                .into_iter()
                .collect();
        assert_eq!(
            forward.strict_serialize().unwrap(),
            backward.strict_serialize().unwrap()
        );
    }

    #[test]
    fn wire_form_counts_with_64_bits() {
        let holdings: Holdings = vec![(account(0xAA), 600)].into_iter().collect();
        let mut expected = vec![0u8, 0, 0, 0, 0, 0, 0, 1];
        expected.extend_from_slice(&[0xAA; ADDRESS_LEN]);
        expected.extend_from_slice(&600i64.to_be_bytes());
        assert_eq!(holdings.strict_serialize().unwrap(), expected);

        let decoded = Holdings::strict_decode(&expected[..]).unwrap();
        assert_eq!(decoded, holdings);
    }

    #[test]
    fn decode_rejects_zero_and_negative_entries() {
        for balance in [0i64, -5i64].iter() {
            let mut bytes = vec![0u8, 0, 0, 0, 0, 0, 0, 1];
            bytes.extend_from_slice(&[0x01; ADDRESS_LEN]);
            bytes.extend_from_slice(&balance.to_be_bytes());
            assert_eq!(
                Holdings::strict_decode(&bytes[..]).unwrap_err(),
                Error::DataIntegrityError(s!(
                    "holdings entry with a zero or negative balance"
                ))
            );
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_keys_are_address_strings() {
        let holdings: Holdings = vec![(account(0xAB), 600)].into_iter().collect();
        let value = serde_json::to_value(&holdings).unwrap();
        let expected_key = "ab".repeat(ADDRESS_LEN);
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object.get(&expected_key), Some(&serde_json::json!(600)));

        let back: Holdings = serde_json::from_value(value).unwrap();
        assert_eq!(back.get(&account(0xAB)), Some(600));
    }
}
