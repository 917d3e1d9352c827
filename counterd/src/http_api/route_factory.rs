use crate::{
    http_api::{self, counter},
    storage::Storage,
};
use std::sync::Arc;
use warp::{self, filters::BoxedFilter, Filter, Reply};

pub fn create<S>(storage: Arc<S>) -> BoxedFilter<(impl Reply,)>
where
    S: Storage,
{
    let storage = warp::any().map(move || storage.clone());

    // path first, so that a known path with the wrong method is a 405
    let counter_key = warp::path(::counter::schema::COUNTER_PATH).and(warp::path::tail());

    let get_counter = counter_key
        .clone()
        .and(warp::get())
        .and(storage.clone())
        .and_then(counter::get_counter::<S>);

    let put_counter = counter_key
        .and(warp::put())
        .and(warp::body::content_length_limit(http_api::MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(storage)
        .and_then(counter::put_counter::<S>);

    let openapi = warp::path!("openapi.json")
        .and(warp::get())
        .map(|| warp::reply::json(&::counter::openapi::document()));

    get_counter
        .or(put_counter)
        .or(openapi)
        .recover(http_api::unpack_problem)
        .with(warp::log("http"))
        .boxed()
}
