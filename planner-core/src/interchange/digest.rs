//! Fingerprint of the station-sharing facts interchange costs are built from.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::persist::{Cacheable, PersistError};
use crate::repository::RouteStations;
use crate::routes::RouteIndex;

/// Fixed seed, so digests compare across processes.
const SEED: u64 = 0x7261_696c_726f_7574;

/// Digest of every indexed route's calling stations, in index order.
///
/// Persisted costs are only valid for the facts they were computed from;
/// a changed digest means a shared station appeared or disappeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationFactsDigest(pub u64);

impl StationFactsDigest {
    pub fn compute<S>(index: &RouteIndex, stations: &S) -> Self
    where
        S: RouteStations + ?Sized,
    {
        let mut hasher = XxHash64::with_seed(SEED);
        for (idx, id, _) in index.iter() {
            let mut calling = stations.stations_for(id);
            calling.sort();
            calling.dedup();

            hasher.write_u32(idx.0);
            hasher.write_u64(calling.len() as u64);
            for station in &calling {
                hasher.write(station.as_str().as_bytes());
                // 0xFF never occurs in UTF-8, so station boundaries are unambiguous
                hasher.write_u8(0xFF);
            }
        }
        Self(hasher.finish())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationFactsRecord {
    pub digest: u64,
}

impl Cacheable for StationFactsDigest {
    type Record = StationFactsRecord;
    const CACHE_NAME: &'static str = "route_station_digest";

    fn cache_to(&self, sink: &mut Vec<StationFactsRecord>) {
        sink.push(StationFactsRecord { digest: self.0 });
    }

    fn load_from(records: Vec<StationFactsRecord>) -> Result<Self, PersistError> {
        match records.as_slice() {
            [record] => Ok(Self(record.digest)),
            _ => Err(PersistError::Invalid(format!(
                "expected one station digest record, found {}",
                records.len()
            ))),
        }
    }
}
