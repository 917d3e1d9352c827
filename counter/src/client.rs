use crate::schema::{self, CounterValue, ErrorPayload, UrlError};
use reqwest::{redirect, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("server reported an error: {0}")]
    Api(ErrorPayload),
    #[error("request failed")]
    Transport(#[source] reqwest::Error),
    #[error("response with status {status} does not match the counter api schema")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected status {status} for this operation")]
    UnexpectedStatus { status: StatusCode },
    #[error("key {0:?} cannot be sent as a single path segment")]
    InvalidKey(String),
    #[error("{0} cannot be used as a base url")]
    InvalidBaseUrl(Url),
}

impl Error {
    /// The payload of a server-reported error, if this is one.
    pub fn api_error(&self) -> Option<&ErrorPayload> {
        match self {
            Error::Api(payload) => Some(payload),
            _ => None,
        }
    }
}

impl From<UrlError> for Error {
    fn from(e: UrlError) -> Self {
        match e {
            UrlError::InvalidKey(key) => Error::InvalidKey(key),
            UrlError::CannotBeABase(url) => Error::InvalidBaseUrl(url),
        }
    }
}

/// HTTP client for the counter api.
///
/// Every call is exactly one request. Nothing is cached and nothing is
/// retried; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::Client,
    base_url: Url,
}

impl Client {
    pub fn new(base_url: Url) -> Result<Self, Error> {
        Self::with_timeout(base_url, None)
    }

    /// `timeout` bounds the whole request, from connecting until the body
    /// has been read. `None` leaves the transport default in place.
    pub fn with_timeout(base_url: Url, timeout: Option<Duration>) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url));
        }

        let mut builder = reqwest::Client::builder().redirect(redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build().map_err(Error::Transport)?;

        Ok(Self { inner, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the current value of the counter stored under `key`.
    pub async fn get_counter(&self, key: &str) -> Result<CounterValue, Error> {
        let url = schema::counter_url(&self.base_url, key)?;
        let (status, body) = self.send(self.inner.request(Method::GET, url)).await?;

        decode_get(status, &body)
    }

    /// Overwrite the value of the counter stored under `key`.
    pub async fn put_counter(&self, key: &str, value: &CounterValue) -> Result<(), Error> {
        let url = schema::counter_url(&self.base_url, key)?;
        let (status, body) = self
            .send(self.inner.request(Method::PUT, url).json(value))
            .await?;

        decode_put(status, &body)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, Vec<u8>), Error> {
        let request = request.build().map_err(Error::Transport)?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self
            .inner
            .execute(request)
            .await
            .map_err(Error::Transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(Error::Transport)?;

        tracing::debug!("{} {} -> {}", method, url, status);

        Ok((status, body.to_vec()))
    }
}

/// One-off `GET /counter/{key}` against `base_url`.
pub async fn fetch_counter(base_url: &Url, key: &str) -> Result<CounterValue, Error> {
    Client::new(base_url.clone())?.get_counter(key).await
}

/// One-off `PUT /counter/{key}` against `base_url`.
pub async fn update_counter(base_url: &Url, key: &str, value: &CounterValue) -> Result<(), Error> {
    Client::new(base_url.clone())?.put_counter(key, value).await
}

fn decode_get(status: StatusCode, body: &[u8]) -> Result<CounterValue, Error> {
    match status {
        StatusCode::OK => decode_json(status, body),
        status if is_error(status) => Err(decode_error(status, body)),
        status => Err(Error::UnexpectedStatus { status }),
    }
}

fn decode_put(status: StatusCode, body: &[u8]) -> Result<(), Error> {
    match status {
        StatusCode::NO_CONTENT => Ok(()),
        status if is_error(status) => Err(decode_error(status, body)),
        status => Err(Error::UnexpectedStatus { status }),
    }
}

fn is_error(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

fn decode_error(status: StatusCode, body: &[u8]) -> Error {
    match decode_json::<ErrorPayload>(status, body) {
        Ok(payload) => Error::Api(payload),
        Err(e) => e,
    }
}

fn decode_json<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|source| Error::Decode { status, source })
}
