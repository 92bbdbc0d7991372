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

use amplify::IoError;
use std::io;

/// Binary encoding according to the strict rules that apply to
/// consensus-critical data structures: the same value must always produce
/// the same byte sequence, independent of platform, map ordering or
/// insertion history. The resulting bytes are the input to ledger hashing
/// and inter-node transmission, so any ambiguity here splits consensus.
///
/// All integers are encoded big-endian. Variable-length byte strings carry
/// a 16-bit length prefix; maps carry a 64-bit element count and their
/// entries are emitted in ascending key order.
pub trait StrictEncode {
    /// Encode with the given [`std::io::Write`] instance; must return result
    /// with either amount of bytes encoded – or implementation-specific
    /// error type.
    fn strict_encode<E: io::Write>(&self, e: E) -> Result<usize, Error>;

    /// Serializes data as a byte array using [`StrictEncode::strict_encode`]
    fn strict_serialize(&self) -> Result<Vec<u8>, Error> {
        let mut e = vec![];
        let _ = self.strict_encode(&mut e)?;
        Ok(e)
    }
}

/// Binary decoding according to the strict rules; the inverse of
/// [`StrictEncode`]. Malformed input (unknown tags, truncated buffers,
/// non-canonical forms) is reported through [`Error`], never by panicking.
pub trait StrictDecode: Sized {
    /// Decode with the given [`std::io::Read`] instance; must either
    /// construct an instance or return implementation-specific error type.
    fn strict_decode<D: io::Read>(d: D) -> Result<Self, Error>;

    /// Tries to deserialize byte array into the current type using
    /// [`StrictDecode::strict_decode`]
    fn strict_deserialize(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        Self::strict_decode(data.as_ref())
    }
}

/// Convenience method for strict encoding of data structures implementing
/// [`StrictEncode`] into a byte vector.
pub fn strict_serialize<T>(data: &T) -> Result<Vec<u8>, Error>
where
    T: StrictEncode,
{
    let mut encoder = io::Cursor::new(vec![]);
    data.strict_encode(&mut encoder)?;
    Ok(encoder.into_inner())
}

/// Convenience method for strict decoding of data structures implementing
/// [`StrictDecode`] from any byte data source.
pub fn strict_deserialize<T>(data: &impl AsRef<[u8]>) -> Result<T, Error>
where
    T: StrictDecode,
{
    let mut decoder = io::Cursor::new(data);
    let rv = T::strict_decode(&mut decoder)?;
    let consumed = decoder.position() as usize;

    // Fail if data are not consumed entirely.
    if consumed == data.as_ref().len() {
        Ok(rv)
    } else {
        Err(Error::DataNotEntirelyConsumed)?
    }
}

/// Possible errors during strict encoding and decoding process
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, From, Error)]
#[display(doc_comments)]
pub enum Error {
    /// I/O error during data strict encoding: {_0}
    #[from(io::Error)]
    #[from(io::ErrorKind)]
    Io(IoError),

    /// String data are not in valid UTF-8 encoding
    #[from(std::str::Utf8Error)]
    #[from(std::string::FromUtf8Error)]
    Utf8Conversion,

    /// A collection (slice, vector or other type) has more items ({_0})
    /// than 2^16, the maximum which fits the 16-bit length prefix
    ExceedMaxItems(usize),

    /// In terms of strict encoding, `Option` is represented by a
    /// *significator byte*, which must be either `0` (no value) or `1`
    /// followed by the value encoding. An attempt to read any other
    /// significator results in `Error::WrongOptionalEncoding`.
    #[display(
        "Invalid value {_0} met as an optional type byte, which must be \
         equal to either 0 (no value) or 1"
    )]
    WrongOptionalEncoding(u8),

    /// An unsupported value `{_1}` for enum `{_0}` encountered during decode
    /// operation
    EnumValueNotKnown(&'static str, u8),

    /// Returned by the convenience method [`strict_deserialize`] if not all
    /// provided data were consumed during decoding process
    #[display(
        "Data were not consumed entirely during strict decoding procedure"
    )]
    DataNotEntirelyConsumed,

    /// Data integrity problem during strict decoding operation: {_0}
    DataIntegrityError(String),
}

#[macro_export]
macro_rules! strict_encode_list {
    ( $encoder:ident; $($item:expr),+ ) => {
        {
            let mut len = 0usize;
            $(
                len += $item.strict_encode(&mut $encoder)?;
            )+
            len
        }
    };
}

#[macro_export]
macro_rules! strict_decode_self {
    ( $decoder:ident; $($item:ident),+ ) => {
        {
            Self {
            $(
                $item: StrictDecode::strict_decode(&mut $decoder)?,
            )+
            }
        }
    };
}

/// Big-endian integer encodings of natural width
mod number_big_endian {
    use chrono::NaiveDateTime;
    use std::io;

    use super::{Error, StrictDecode, StrictEncode};

    macro_rules! impl_big_endian {
        ($ty:ty) => {
            impl StrictEncode for $ty {
                #[inline]
                fn strict_encode<E: io::Write>(
                    &self,
                    mut e: E,
                ) -> Result<usize, Error> {
                    let bytes = self.to_be_bytes();
                    e.write_all(&bytes)?;
                    Ok(bytes.len())
                }
            }

            impl StrictDecode for $ty {
                #[inline]
                fn strict_decode<D: io::Read>(
                    mut d: D,
                ) -> Result<Self, Error> {
                    let mut buf = [0u8; core::mem::size_of::<$ty>()];
                    d.read_exact(&mut buf)?;
                    Ok(<$ty>::from_be_bytes(buf))
                }
            }
        };
    }

    impl_big_endian!(u8);
    impl_big_endian!(u16);
    impl_big_endian!(u32);
    impl_big_endian!(u64);
    impl_big_endian!(i8);
    impl_big_endian!(i16);
    impl_big_endian!(i32);
    impl_big_endian!(i64);

    impl StrictEncode for usize {
        fn strict_encode<E: io::Write>(
            &self,
            mut e: E,
        ) -> Result<usize, Error> {
            if *self > core::u16::MAX as usize {
                Err(Error::ExceedMaxItems(*self))?;
            }
            let size = *self as u16;
            size.strict_encode(&mut e)
        }
    }

    impl StrictDecode for usize {
        fn strict_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
            u16::strict_decode(&mut d).map(|val| val as usize)
        }
    }

    impl StrictEncode for NaiveDateTime {
        #[inline]
        fn strict_encode<E: io::Write>(&self, e: E) -> Result<usize, Error> {
            self.timestamp().strict_encode(e)
        }
    }

    impl StrictDecode for NaiveDateTime {
        fn strict_decode<D: io::Read>(d: D) -> Result<Self, Error> {
            let seconds = i64::strict_decode(d)?;
            Self::from_timestamp_opt(seconds, 0).ok_or_else(|| {
                Error::DataIntegrityError(format!(
                    "timestamp {} out of the representable range",
                    seconds
                ))
            })
        }
    }
}

mod byte_strings {
    use super::{Error, StrictDecode, StrictEncode};
    use std::io;
    use std::ops::Deref;

    impl StrictEncode for &[u8] {
        fn strict_encode<E: io::Write>(
            &self,
            mut e: E,
        ) -> Result<usize, Error> {
            let mut len = self.len();
            // Oversize is handled at the level of `usize` value serialization
            len += len.strict_encode(&mut e)?;
            e.write_all(self)?;
            Ok(len)
        }
    }

    impl StrictEncode for Vec<u8> {
        fn strict_encode<E: io::Write>(&self, e: E) -> Result<usize, Error> {
            self.deref().strict_encode(e)
        }
    }

    impl StrictDecode for Vec<u8> {
        fn strict_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
            let len = usize::strict_decode(&mut d)?;
            let mut ret = vec![0u8; len];
            d.read_exact(&mut ret)?;
            Ok(ret)
        }
    }

    impl StrictEncode for &str {
        fn strict_encode<E: io::Write>(&self, e: E) -> Result<usize, Error> {
            self.as_bytes().strict_encode(e)
        }
    }

    impl StrictEncode for String {
        fn strict_encode<E: io::Write>(&self, e: E) -> Result<usize, Error> {
            self.as_bytes().strict_encode(e)
        }
    }

    impl StrictDecode for String {
        fn strict_decode<D: io::Read>(d: D) -> Result<Self, Error> {
            String::from_utf8(Vec::<u8>::strict_decode(d)?).map_err(Error::from)
        }
    }
}

mod compositional_types {
    use super::{Error, StrictDecode, StrictEncode};
    use std::collections::BTreeMap;
    use std::io;

    /// In terms of strict encoding, `Option` (optional values) are
    /// represented by a *significator byte*, which MUST be either `0` (for no
    /// value present) or `1`, followed by the value strict encoding.
    impl<T> StrictEncode for Option<T>
    where
        T: StrictEncode,
    {
        fn strict_encode<E: io::Write>(
            &self,
            mut e: E,
        ) -> Result<usize, Error> {
            Ok(match self {
                None => strict_encode_list!(e; 0u8),
                Some(val) => strict_encode_list!(e; 1u8, val),
            })
        }
    }

    impl<T> StrictDecode for Option<T>
    where
        T: StrictDecode,
    {
        fn strict_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
            let significator = u8::strict_decode(&mut d)?;
            match significator {
                0 => Ok(None),
                1 => Ok(Some(T::strict_decode(&mut d)?)),
                invalid => Err(Error::WrongOptionalEncoding(invalid))?,
            }
        }
    }

    /// Maps are encoded as a 64-bit big-endian element count followed by
    /// consecutively-encoded (key, value) pairs in ascending key order. The
    /// rust `BTreeMap` iterates its entries sorted by key, which gives the
    /// deterministic ordering for free; any other map type must be converted
    /// into a `BTreeMap` before encoding.
    impl<K, V> StrictEncode for BTreeMap<K, V>
    where
        K: StrictEncode + Ord + Clone,
        V: StrictEncode + Clone,
    {
        fn strict_encode<E: io::Write>(
            &self,
            mut e: E,
        ) -> Result<usize, Error> {
            let mut encoded = (self.len() as u64).strict_encode(&mut e)?;
            for (key, val) in self {
                encoded += key.strict_encode(&mut e)?;
                encoded += val.strict_encode(&mut e)?;
            }
            Ok(encoded)
        }
    }

    /// Decoding rejects entries arriving out of ascending key order: a
    /// non-canonical byte stream must never silently normalize into a value
    /// whose re-encoding differs from the input.
    impl<K, V> StrictDecode for BTreeMap<K, V>
    where
        K: StrictDecode + Ord + Clone,
        V: StrictDecode + Clone,
    {
        fn strict_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
            let len = u64::strict_decode(&mut d)?;
            let mut map = BTreeMap::<K, V>::new();
            for _ in 0..len {
                let key = K::strict_decode(&mut d)?;
                let val = V::strict_decode(&mut d)?;
                if let Some((last, _)) = map.iter().next_back() {
                    if last >= &key {
                        Err(Error::DataIntegrityError(s!(
                            "map entries are not in ascending key order"
                        )))?;
                    }
                }
                map.insert(key, val);
            }
            Ok(map)
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use std::fmt::Debug;

    /// Test suite function to test against the vectors
    pub fn test_suite<T: StrictEncode + StrictDecode + PartialEq + Debug>(
        object: &T,
        test_vec: &[u8],
        test_size: usize,
    ) -> T {
        let mut encoded_object: Vec<u8> = vec![];
        let write_1 = object.strict_encode(&mut encoded_object).unwrap();
        let decoded_object = T::strict_decode(&encoded_object[..]).unwrap();
        assert_eq!(write_1, test_size);
        assert_eq!(decoded_object, *object);
        encoded_object.clear();
        let write_2 =
            decoded_object.strict_encode(&mut encoded_object).unwrap();
        assert_eq!(encoded_object, test_vec);
        assert_eq!(write_2, test_size);
        decoded_object
    }

    #[test]
    fn test_u16_big_endian() {
        assert_eq!(strict_serialize(&0x0103u16).unwrap(), &[0x01, 0x03]);
        assert_eq!(strict_serialize(&0xFF00u16).unwrap(), &[0xFF, 0x00]);
        assert_eq!(u16::strict_decode(&[0x01, 0x03][..]).unwrap(), 0x0103);
    }

    #[test]
    fn test_u64_big_endian() {
        let value = 0x0102030405060708u64;
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(strict_serialize(&value).unwrap(), &bytes);
        assert_eq!(u64::strict_decode(&bytes[..]).unwrap(), value);
    }

    #[test]
    fn test_i64_negative() {
        let value = -2i64;
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE];
        assert_eq!(strict_serialize(&value).unwrap(), &bytes);
        assert_eq!(i64::strict_decode(&bytes[..]).unwrap(), value);
    }

    #[test]
    fn test_string_length_prefix() {
        let s = s!("USD");
        let bytes = [0x00, 0x03, b'U', b'S', b'D'];
        assert_eq!(strict_serialize(&s).unwrap(), &bytes);
        let decoded = String::strict_decode(&bytes[..]).unwrap();
        assert_eq!(decoded, s);
    }

    #[test]
    fn test_string_empty() {
        let s = String::new();
        assert_eq!(strict_serialize(&s).unwrap(), &[0x00, 0x00]);
    }

    #[test]
    fn test_option_encoding() {
        let none: Option<u8> = None;
        let some: Option<u8> = Some(13);
        assert_eq!(strict_serialize(&none).unwrap(), &[0x00]);
        assert_eq!(strict_serialize(&some).unwrap(), &[0x01, 13]);

        assert_eq!(Option::<u8>::strict_decode(&[0x00][..]).unwrap(), None);
        assert_eq!(
            Option::<u8>::strict_decode(&[0x01, 13][..]).unwrap(),
            Some(13)
        );
        assert_eq!(
            Option::<u8>::strict_decode(&[0x02, 13][..]).unwrap_err(),
            Error::WrongOptionalEncoding(2)
        );
    }

    #[test]
    fn test_map_count_width() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(s!("k"), 1u8);
        let encoded = strict_serialize(&map).unwrap();
        // u64 count, u16 key length, key byte, value byte
        assert_eq!(
            encoded,
            vec![0, 0, 0, 0, 0, 0, 0, 1, 0x00, 0x01, b'k', 1]
        );
    }

    #[test]
    fn test_map_rejects_unordered() {
        let mut bytes = vec![0, 0, 0, 0, 0, 0, 0, 2];
        bytes.extend_from_slice(&[0x00, 0x01, b'b', 2]);
        bytes.extend_from_slice(&[0x00, 0x01, b'a', 1]);
        let err =
            std::collections::BTreeMap::<String, u8>::strict_decode(&bytes[..])
                .unwrap_err();
        assert_eq!(
            err,
            Error::DataIntegrityError(s!(
                "map entries are not in ascending key order"
            ))
        );
    }

    #[test]
    fn test_consumation() {
        let mut bytes = strict_serialize(&s!("tail")).unwrap();
        bytes.extend_from_slice(b"data");
        let result: Result<String, _> = strict_deserialize(&bytes);
        assert_eq!(result.unwrap_err(), Error::DataNotEntirelyConsumed);
    }

    #[test]
    fn test_error_propagation() {
        let bytes = strict_serialize(&s!("truncated")).unwrap();
        let result: Result<String, _> = strict_deserialize(&bytes[..1].to_vec());
        assert!(result.is_err());
    }
}
