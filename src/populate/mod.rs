//! Populate fields across a collection of JSON records
//!
//! A populate call reads the value at a path from every item, optionally
//! reduces all read values to an aggregate with `use`, then computes a new
//! value per item with `each` and writes it back (at `as`, or over the read
//! path). With `unique` set, `each` runs once per distinct read value and the
//! result is reused for every other item holding that value.
//!
//! Items are processed strictly in order. A failing callback or an unusable
//! unique key stops the call; items written before the failure stay written.

mod config;
mod options;
mod unique;

pub use config::PopulateConfig;
pub use options::{
    AsyncAggregateFn, AsyncEachFn, AsyncPopulateOptions, NoAggregate, PopulateOptions,
};

use crate::accessor::FieldPath;
use crate::error::{PopulateError, PopulateResult};
use options::AggregateSource;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};
use unique::{unique_key, UniqueCache};

/// Populate `path` (or the `as` path) of every item using synchronous callbacks
///
/// Never suspends; the call runs to completion before returning.
pub fn populate<A, U, F>(
    items: &mut [Value],
    path: &str,
    options: PopulateOptions<A, U, F>,
) -> PopulateResult<()>
where
    U: FnMut(&[Option<Value>]) -> anyhow::Result<A>,
    F: FnMut(Option<&Value>, &A) -> anyhow::Result<Value>,
{
    let read_path = FieldPath::parse(path)?;
    let write_path = resolve_write_path(&read_path, options.write_as.as_deref())?;
    let PopulateOptions {
        unique,
        aggregate,
        mut each,
        ..
    } = options;

    debug!(
        "Populating {} items from '{}' into '{}' (unique: {})",
        items.len(),
        read_path,
        write_path,
        unique
    );

    let aggregate = match aggregate {
        AggregateSource::Fixed(value) => value,
        AggregateSource::Callback(mut use_fn) => {
            let values = collect_values(items, &read_path);
            debug!("Computing aggregate over {} values", values.len());
            use_fn(&values).map_err(PopulateError::use_failed)?
        }
    };

    let mut cache = unique.then(UniqueCache::new);
    for (index, item) in items.iter_mut().enumerate() {
        let value = read_path.get(item);

        let result = match cache.as_mut() {
            Some(cache) => {
                let key = unique_key(value).map_err(|kind| {
                    PopulateError::not_stringable(read_path.as_str(), index, kind)
                })?;
                match cache.lookup(&key) {
                    Some(hit) => {
                        trace!("Item {}: reusing result for key '{}'", index, key);
                        hit
                    }
                    None => {
                        let computed = each(value, &aggregate)
                            .map_err(|e| PopulateError::each_failed(index, e))?;
                        cache.store(key, computed.clone());
                        computed
                    }
                }
            }
            None => each(value, &aggregate).map_err(|e| PopulateError::each_failed(index, e))?,
        };

        write_path.set(item, result);
    }

    log_cache_stats(cache.as_ref());
    Ok(())
}

/// Populate `path` (or the `as` path) of every item, awaiting every callback
///
/// Callbacks run one at a time: item N+1's `each` starts only after item N's
/// result has been written.
pub async fn populate_async<'a, A>(
    items: &mut [Value],
    path: &str,
    options: AsyncPopulateOptions<'a, A>,
) -> PopulateResult<()>
where
    A: Send + Sync + 'a,
{
    let read_path = FieldPath::parse(path)?;
    let write_path = resolve_write_path(&read_path, options.write_as.as_deref())?;
    let AsyncPopulateOptions {
        unique,
        aggregate,
        mut each,
        ..
    } = options;

    debug!(
        "Populating {} items from '{}' into '{}' (unique: {}, async)",
        items.len(),
        read_path,
        write_path,
        unique
    );

    let aggregate = Arc::new(match aggregate {
        AggregateSource::Fixed(value) => value,
        AggregateSource::Callback(mut use_fn) => {
            let values = collect_values(items, &read_path);
            debug!("Computing aggregate over {} values", values.len());
            use_fn(values).await.map_err(PopulateError::use_failed)?
        }
    });

    let mut cache = unique.then(UniqueCache::new);
    for (index, item) in items.iter_mut().enumerate() {
        let value = read_path.get(item).cloned();

        let result = match cache.as_mut() {
            Some(cache) => {
                let key = unique_key(value.as_ref()).map_err(|kind| {
                    PopulateError::not_stringable(read_path.as_str(), index, kind)
                })?;
                match cache.lookup(&key) {
                    Some(hit) => {
                        trace!("Item {}: reusing result for key '{}'", index, key);
                        hit
                    }
                    None => {
                        let computed = each(value, Arc::clone(&aggregate))
                            .await
                            .map_err(|e| PopulateError::each_failed(index, e))?;
                        cache.store(key, computed.clone());
                        computed
                    }
                }
            }
            None => each(value, Arc::clone(&aggregate))
                .await
                .map_err(|e| PopulateError::each_failed(index, e))?,
        };

        write_path.set(item, result);
    }

    log_cache_stats(cache.as_ref());
    Ok(())
}

fn resolve_write_path(read_path: &FieldPath, write_as: Option<&str>) -> PopulateResult<FieldPath> {
    match write_as {
        Some(path) => FieldPath::parse(path),
        None => Ok(read_path.clone()),
    }
}

/// Read values at `path` for every item, in collection order
fn collect_values(items: &[Value], path: &FieldPath) -> Vec<Option<Value>> {
    items.iter().map(|item| path.get(item).cloned()).collect()
}

fn log_cache_stats(cache: Option<&UniqueCache>) {
    if let Some(cache) = cache {
        debug!(
            "Unique cache: {} distinct values, {} reused results",
            cache.len(),
            cache.hits()
        );
    }
}
