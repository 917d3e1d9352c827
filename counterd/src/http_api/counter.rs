use crate::{http_api::problem, storage::Storage};
use anyhow::Context;
use counter::{schema, CounterValue};
use std::sync::Arc;
use warp::{http::StatusCode, path::Tail, Rejection, Reply};

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("No value provided")]
pub struct NoValueProvided;

/// Fetch the current value of the counter.
pub async fn get_counter<S: Storage>(key: Tail, storage: Arc<S>) -> Result<impl Reply, Rejection> {
    handle_get_counter(key.as_str(), storage.as_ref())
        .await
        .map(|value| warp::reply::json(&value))
        .map_err(problem::from_anyhow)
        .map_err(warp::reject::custom)
}

/// Update the current value of the counter.
pub async fn put_counter<S: Storage>(
    key: Tail,
    update: CounterValue,
    storage: Arc<S>,
) -> Result<impl Reply, Rejection> {
    handle_put_counter(key.as_str(), update, storage.as_ref())
        .await
        .map(|()| warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT))
        .map_err(problem::from_anyhow)
        .map_err(warp::reject::custom)
}

async fn handle_get_counter<S: Storage>(segment: &str, storage: &S) -> anyhow::Result<CounterValue> {
    let key = parse_key(segment)?;
    let counter = storage
        .load(&key)
        .await
        .with_context(|| format!("failed to load counter {:?}", key))?;

    Ok(CounterValue { counter })
}

async fn handle_put_counter<S: Storage>(
    segment: &str,
    update: CounterValue,
    storage: &S,
) -> anyhow::Result<()> {
    let key = parse_key(segment)?;
    let value = update.counter.ok_or(NoValueProvided)?;

    storage
        .save(key.clone(), value)
        .await
        .with_context(|| format!("failed to save counter {:?}", key))?;
    tracing::debug!("counter {:?} set to {}", key, value);

    Ok(())
}

/// The key is everything after `/counter/`, which must be a single segment.
fn parse_key(segment: &str) -> Result<String, schema::UrlError> {
    if segment.contains('/') {
        return Err(schema::UrlError::InvalidKey(segment.to_owned()));
    }

    schema::decode_key(segment)
}
