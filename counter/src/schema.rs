//! Request and response shapes of the counter API.
//!
//! Both the client in this crate and the server in `counterd` use these
//! types, so the two sides cannot drift apart.

use percent_encoding::percent_decode_str;
use serde::{
    de::{value::MapAccessDeserializer, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use std::{fmt, marker::PhantomData};
use url::Url;

/// First path segment of the counter resource: `/counter/{key}`.
pub const COUNTER_PATH: &str = "counter";

/// Where a locally started `counterd` listens by default.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// The value of a counter, either as the response to a GET request or as
/// the body of a PUT request.
///
/// An unset counter is represented by `None`. On the wire it is either a
/// missing field or an explicit `null`; we always omit the field when
/// serializing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CounterValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<u32>,
}

impl<'de> Deserialize<'de> for CounterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire::CounterValue { counter } = deserialize_object(deserializer)?;

        Ok(Self { counter })
    }
}

impl CounterValue {
    pub fn new(counter: u32) -> Self {
        Self {
            counter: Some(counter),
        }
    }

    pub fn unset() -> Self {
        Self { counter: None }
    }
}

impl From<u32> for CounterValue {
    fn from(counter: u32) -> Self {
        Self::new(counter)
    }
}

impl From<Option<u32>> for CounterValue {
    fn from(counter: Option<u32>) -> Self {
        Self { counter }
    }
}

/// Error information returned with every 4xx and 5xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message} (request id: {request_id})")]
pub struct ErrorPayload {
    /// Stable, machine readable identifier of the error class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human readable description.
    pub message: String,
    /// Correlates the response with the server's logs.
    pub request_id: String,
}

impl ErrorPayload {
    pub fn new(
        error_code: Option<&str>,
        message: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            error_code: error_code.map(ToOwned::to_owned),
            message: message.into(),
            request_id: request_id.into(),
        }
    }
}

impl<'de> Deserialize<'de> for ErrorPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire::ErrorPayload {
            error_code,
            message,
            request_id,
        } = deserialize_object(deserializer)?;

        Ok(Self {
            error_code,
            message,
            request_id,
        })
    }
}

/// Derived `Deserialize` for structs also accepts a sequence of the field
/// values. The payloads are only ever JSON objects, so decoding goes
/// through a visitor that knows nothing but maps.
fn deserialize_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct ObjectVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for ObjectVisitor<T> {
        type Value = T;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<T, A::Error> {
            T::deserialize(MapAccessDeserializer::new(map))
        }
    }

    deserializer.deserialize_map(ObjectVisitor(PhantomData))
}

mod wire {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct CounterValue {
        #[serde(default)]
        pub counter: Option<u32>,
    }

    #[derive(Deserialize)]
    pub struct ErrorPayload {
        #[serde(default)]
        pub error_code: Option<String>,
        pub message: String,
        pub request_id: String,
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum UrlError {
    #[error("key {0:?} cannot be sent as a single path segment")]
    InvalidKey(String),
    #[error("{0} cannot be used as a base url")]
    CannotBeABase(Url),
}

/// Keys travel as one path segment. Path normalisation eats empty, `.` and
/// `..` segments, so those can never reach the server intact.
pub fn validate_key(key: &str) -> Result<(), UrlError> {
    match key {
        "" | "." | ".." => Err(UrlError::InvalidKey(key.to_owned())),
        _ => Ok(()),
    }
}

/// Returns `{base}/counter/{key}` with `key` percent-encoded as a single
/// path segment. Any path already present on `base` is kept as a prefix;
/// its query and fragment are dropped.
pub fn counter_url(base: &Url, key: &str) -> Result<Url, UrlError> {
    validate_key(key)?;

    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| UrlError::CannotBeABase(base.clone()))?
        .pop_if_empty()
        .push(COUNTER_PATH)
        .push(key);

    Ok(url)
}

/// Inverse of the encoding done by [`counter_url`] for the key segment.
pub fn decode_key(segment: &str) -> Result<String, UrlError> {
    let key = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|_| UrlError::InvalidKey(segment.to_owned()))?
        .into_owned();
    validate_key(&key)?;

    Ok(key)
}
