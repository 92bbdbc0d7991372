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

//! JSON file persistence for operator tooling and genesis preallocation.
//!
//! The JSON form is not consensus-critical; it exists so that operators can
//! inspect assets, persist them to disk and preallocate holdings in genesis
//! files. The strict binary encoding stays the authoritative wire form.

use std::fs::File;
use std::io;
use std::path::Path;

use amplify::IoError;

use crate::ledger::asset::Asset;

/// Errors reading or writing asset files
#[derive(Debug, Display, From, Error)]
#[display(doc_comments)]
pub enum FileError {
    /// I/O failure accessing an asset file: {_0}
    #[from(io::Error)]
    Io(IoError),

    /// asset JSON is malformed: {_0}
    #[from]
    Json(serde_json::Error),
}

/// Writes the asset as pretty-printed JSON. The file handle is held only
/// for the duration of the call and released on every exit path.
pub fn save_asset(
    asset: &Asset,
    path: impl AsRef<Path>,
) -> Result<(), FileError> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, asset)?;
    debug!("saved asset {} to {}", asset, path.as_ref().display());
    Ok(())
}

/// Reads back an asset written by [`save_asset`] (or by genesis tooling).
/// Holder variants are not represented in JSON, so every holder loads as
/// an account.
pub fn load_asset(path: impl AsRef<Path>) -> Result<Asset, FileError> {
    let file = File::open(path.as_ref())?;
    let asset: Asset = serde_json::from_reader(io::BufReader::new(file))?;
    debug!("loaded asset {} from {}", asset, path.as_ref().display());
    Ok(asset)
}

/// Loads every `*.json` file in the preallocation directory configured by
/// `network.preallocated`, one asset per file, in lexicographic path order
/// so all nodes observe the same genesis sequence. Files with other
/// extensions are skipped; a malformed JSON file aborts the load with its
/// path reported in the log.
pub fn load_preallocated(
    dir: impl AsRef<Path>,
) -> Result<Vec<Asset>, FileError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut assets = Vec::with_capacity(paths.len());
    for path in paths {
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            trace!("skipping non-JSON genesis entry {}", path.display());
            continue;
        }
        match load_asset(&path) {
            Ok(asset) => {
                debug!(
                    "preallocated asset {} from {}",
                    asset,
                    path.display()
                );
                assets.push(asset);
            }
            Err(err) => {
                error!(
                    "failed to load preallocated asset from {}: {}",
                    path.display(),
                    err
                );
                return Err(err);
            }
        }
    }
    Ok(assets)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ledger::address::{
        AccountAddress, AssetAddress, Holder, ADDRESS_LEN,
    };
    use crate::ledger::asset::Metadata;
    use crate::ledger::balance::{AssetType, Ref};
    use crate::ledger::holdings::Holdings;
    use chrono::NaiveDateTime;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("uplink-ledger-tests")
            .join(format!("{}-{}", name, std::process::id()));
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_asset(name: &str, supply: i64) -> Asset {
        let issuer = AccountAddress::from_bytes([0xAA; ADDRESS_LEN]);
        let holder =
            Holder::Account(AccountAddress::from_bytes([0x01; ADDRESS_LEN]));
        Asset::new(
            name.to_string(),
            issuer,
            supply,
            Some(Ref::USD),
            AssetType::Discrete,
            NaiveDateTime::from_timestamp(1_600_000_000, 0),
            AssetAddress::from_bytes([0xBB; ADDRESS_LEN]),
            Metadata::new(),
        )
        .preallocate(vec![(holder, supply)].into_iter().collect::<Holdings>())
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("gil.json");

        let asset = sample_asset("GIL", 1000);
        save_asset(&asset, &path).unwrap();
        let loaded = load_asset(&path).unwrap();
        assert_eq!(loaded, asset);
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let dir = scratch_dir("missing");
        let err = load_asset(dir.join("absent.json")).unwrap_err();
        assert!(matches!(err, FileError::Io(_)));
    }

    #[test]
    fn load_malformed_file_is_a_json_error() {
        let dir = scratch_dir("malformed");
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_asset(&path).unwrap_err();
        assert!(matches!(err, FileError::Json(_)));
    }

    #[test]
    fn preallocation_loads_json_files_in_path_order() {
        let dir = scratch_dir("genesis");
        save_asset(&sample_asset("SECOND", 20), dir.join("b.json")).unwrap();
        save_asset(&sample_asset("FIRST", 10), dir.join("a.json")).unwrap();
        fs::write(dir.join("notes.txt"), "operator notes").unwrap();

        let assets = load_preallocated(&dir).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].name(), "FIRST");
        assert_eq!(assets[1].name(), "SECOND");
    }

    #[test]
    fn preallocation_aborts_on_malformed_entries() {
        let dir = scratch_dir("genesis-broken");
        save_asset(&sample_asset("OK", 5), dir.join("ok.json")).unwrap();
        fs::write(dir.join("zz-broken.json"), "[oops").unwrap();

        assert!(load_preallocated(&dir).is_err());
    }
}
