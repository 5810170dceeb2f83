//! Dataset fingerprinting.
//!
//! The hash covers the header and the raw cell text of every in-scope row.
//! Unit/record separators delimit cells so `["ab","c"]` and `["a","bc"]`
//! hash differently.

use csv::StringRecord;

use crate::domain::DatasetHash;

const UNIT_SEPARATOR: u8 = 0x1f;
const RECORD_SEPARATOR: u8 = 0x1e;

fn feed(hasher: &mut blake3::Hasher, record: &StringRecord) {
    for field in record.iter() {
        hasher.update(field.as_bytes());
        hasher.update(&[UNIT_SEPARATOR]);
    }
    hasher.update(&[RECORD_SEPARATOR]);
}

/// BLAKE3 over header + rows.
pub fn snapshot_hash(headers: &StringRecord, rows: &[StringRecord]) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();
    feed(&mut hasher, headers);
    for row in rows {
        feed(&mut hasher, row);
    }
    DatasetHash(hasher.finalize().to_hex().to_string())
}
