//! Loading persisted route caches at process start.
//!
//! A persisted cache is only reused if it matches the live data exactly;
//! anything else (stale, unreadable, malformed) is discarded and rebuilt.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::CoreConfig;
use crate::domain::{Route, RouteId, TransportMode};
use crate::interchange::{InterchangeCosts, StationFactsDigest};
use crate::persist::{Cacheable, DataCache};
use crate::repository::{RouteRepository, RouteStations};
use crate::routes::RouteIndex;

/// The route index and interchange costs, ready to share across searches.
#[derive(Debug, Clone)]
pub struct RouteCaches {
    pub index: Arc<RouteIndex>,
    pub costs: Arc<InterchangeCosts>,
    reused_index: bool,
    reused_costs: bool,
}

impl RouteCaches {
    /// Build both caches in memory.
    pub fn build<N>(config: &CoreConfig, network: &N) -> Self
    where
        N: RouteRepository + RouteStations + ?Sized,
    {
        let index = RouteIndex::build(&network.routes());
        let costs = InterchangeCosts::build(&index, network, &config.interchange_filters);
        Self {
            index: Arc::new(index),
            costs: Arc::new(costs),
            reused_index: false,
            reused_costs: false,
        }
    }

    /// Reuse persisted caches that still match `network`, rebuilding and
    /// re-saving the rest.
    ///
    /// Interchange costs are only reused alongside a reused index, since
    /// they are addressed by its indices, and only while the routes'
    /// calling stations are unchanged. Without a configured cache
    /// directory this is [`RouteCaches::build`].
    pub fn load_or_build<N>(config: &CoreConfig, network: &N) -> Self
    where
        N: RouteRepository + RouteStations + ?Sized,
    {
        let Some(dir) = &config.cache_dir else {
            info!("No cache directory configured, building route caches in memory");
            return Self::build(config, network);
        };
        let cache = DataCache::new(dir, config.codec);
        let routes = network.routes();

        let (index, reused_index) = match load_valid(&cache, |index: &RouteIndex| {
            index_is_fresh(index, &routes)
        }) {
            Some(index) => (index, true),
            None => {
                let index = RouteIndex::build(&routes);
                save(&cache, &index);
                (index, false)
            }
        };

        let digest = StationFactsDigest::compute(&index, network);
        let facts_unchanged = reused_index
            && load_valid(&cache, |stored: &StationFactsDigest| *stored == digest).is_some();
        let loaded_costs = if facts_unchanged {
            load_valid(&cache, |costs: &InterchangeCosts| {
                costs.route_count() == index.len() && costs.has_filters(&config.interchange_filters)
            })
        } else {
            None
        };
        let (costs, reused_costs) = match loaded_costs {
            Some(costs) => (costs, true),
            None => {
                let costs = InterchangeCosts::build(&index, network, &config.interchange_filters);
                // Digest last: it marks the costs file as current
                discard::<StationFactsDigest>(&cache);
                if save(&cache, &costs) {
                    save(&cache, &digest);
                }
                (costs, false)
            }
        };

        info!(
            routes = index.len(),
            reused_index,
            reused_costs,
            "Route caches ready"
        );
        Self {
            index: Arc::new(index),
            costs: Arc::new(costs),
            reused_index,
            reused_costs,
        }
    }

    /// True if the index came from disk.
    pub fn reused_index(&self) -> bool {
        self.reused_index
    }

    /// True if the interchange costs came from disk.
    pub fn reused_costs(&self) -> bool {
        self.reused_costs
    }
}

/// True if `index` covers exactly the live routes, with the same modes.
pub fn index_is_fresh(index: &RouteIndex, routes: &[Route]) -> bool {
    let live: HashMap<&RouteId, TransportMode> = routes.iter().map(|r| (&r.id, r.mode)).collect();
    if live.len() != index.len() {
        return false;
    }
    index
        .iter()
        .all(|(_, id, mode)| live.get(id).is_some_and(|m| *m == mode))
}

/// Load `T` and keep it only if `is_valid` accepts it. Anything discarded
/// has its file removed.
fn load_valid<T, F>(cache: &DataCache, is_valid: F) -> Option<T>
where
    T: Cacheable,
    F: FnOnce(&T) -> bool,
{
    match cache.load::<T>() {
        Ok(Some(item)) if is_valid(&item) => Some(item),
        Ok(Some(_)) => {
            info!(cache = T::CACHE_NAME, "Discarding stale cache");
            discard::<T>(cache);
            None
        }
        Ok(None) => None,
        Err(e) => {
            warn!(cache = T::CACHE_NAME, error = %e, "Discarding unreadable cache");
            discard::<T>(cache);
            None
        }
    }
}

fn discard<T: Cacheable>(cache: &DataCache) {
    if let Err(e) = cache.remove::<T>() {
        warn!(cache = T::CACHE_NAME, error = %e, "Failed to remove cache file");
    }
}

/// Returns true if the file was written.
fn save<T: Cacheable>(cache: &DataCache, item: &T) -> bool {
    match cache.save(item) {
        Ok(()) => true,
        Err(e) => {
            warn!(cache = T::CACHE_NAME, error = %e, "Failed to save cache");
            false
        }
    }
}
