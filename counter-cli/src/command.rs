use anyhow::Context;
use counter::{Client, CounterValue};
use std::io::Write;

/// Value written by the demo.
pub const DEMO_VALUE: u32 = 11;

pub async fn get<W: Write>(client: &Client, key: &str, out: &mut W) -> anyhow::Result<()> {
    let value = client
        .get_counter(key)
        .await
        .with_context(|| format!("failed to fetch counter {:?}", key))?;
    writeln!(out, "{}: {}", key, display(&value))?;

    Ok(())
}

pub async fn put<W: Write>(
    client: &Client,
    key: &str,
    value: u32,
    out: &mut W,
) -> anyhow::Result<()> {
    client
        .put_counter(key, &CounterValue::new(value))
        .await
        .with_context(|| format!("failed to update counter {:?}", key))?;
    writeln!(out, "{}: set to {}", key, value)?;

    Ok(())
}

/// Read, write, read. Every step prints its outcome, whether it succeeded
/// or not, and the demo carries on after a failed step.
pub async fn demo<W: Write>(client: &Client, key: &str, out: &mut W) -> anyhow::Result<()> {
    match client.get_counter(key).await {
        Ok(value) => writeln!(out, "GET {}: {}", key, display(&value))?,
        Err(e) => writeln!(out, "GET {}: error: {}", key, e)?,
    }

    match client.put_counter(key, &CounterValue::new(DEMO_VALUE)).await {
        Ok(()) => writeln!(out, "PUT {} = {}: ok", key, DEMO_VALUE)?,
        Err(e) => writeln!(out, "PUT {} = {}: error: {}", key, DEMO_VALUE, e)?,
    }

    match client.get_counter(key).await {
        Ok(value) => writeln!(out, "GET {}: {}", key, display(&value))?,
        Err(e) => writeln!(out, "GET {}: error: {}", key, e)?,
    }

    Ok(())
}

pub fn openapi<W: Write>(out: &mut W) -> anyhow::Result<()> {
    let document = serde_json::to_string_pretty(&counter::openapi::document())?;
    writeln!(out, "{}", document)?;

    Ok(())
}

fn display(value: &CounterValue) -> String {
    match value.counter {
        Some(counter) => counter.to_string(),
        None => "unset".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterd::storage::InMemoryStorage;
    use spectral::prelude::*;
    use std::{future, sync::Arc};
    use url::Url;

    fn start_server() -> Url {
        let (addr, server) = counterd::serve(
            ([127, 0, 0, 1], 0).into(),
            Arc::new(InMemoryStorage::default()),
            future::pending::<()>(),
        )
        .unwrap();
        tokio::spawn(server);

        format!("http://{}", addr).parse().unwrap()
    }

    fn output(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn demo_reads_writes_and_reads_again() {
        let client = Client::new(start_server()).unwrap();
        let mut out = Vec::new();

        demo(&client, "bdfdc549-f507-4405-836b-7901f35a8b0f", &mut out)
            .await
            .unwrap();

        assert_eq!(
            output(out),
            "GET bdfdc549-f507-4405-836b-7901f35a8b0f: unset\n\
             PUT bdfdc549-f507-4405-836b-7901f35a8b0f = 11: ok\n\
             GET bdfdc549-f507-4405-836b-7901f35a8b0f: 11\n"
        );
    }

    #[tokio::test]
    async fn demo_reports_failures_and_keeps_going() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let client = Client::new(format!("http://{}", addr).parse().unwrap()).unwrap();
        let mut out = Vec::new();

        demo(&client, "k1", &mut out).await.unwrap();

        let output = output(out);
        assert_eq!(output.lines().count(), 3);
        assert!(output.lines().all(|line| line.contains("error: connection error")));
    }

    #[tokio::test]
    async fn put_then_get_prints_values() {
        let client = Client::new(start_server()).unwrap();
        let mut out = Vec::new();

        put(&client, "k1", 7, &mut out).await.unwrap();
        get(&client, "k1", &mut out).await.unwrap();

        assert_eq!(output(out), "k1: set to 7\nk1: 7\n");
    }

    #[tokio::test]
    async fn get_fails_with_context_on_invalid_key() {
        let client = Client::new(start_server()).unwrap();
        let mut out = Vec::new();

        let result = get(&client, "..", &mut out).await;

        assert_that(&result).is_err();
        assert!(format!("{:#}", result.unwrap_err()).starts_with("failed to fetch counter \"..\""));
        assert!(out.is_empty());
    }

    #[test]
    fn openapi_prints_json_document() {
        let mut out = Vec::new();

        openapi(&mut out).unwrap();

        let document = serde_json::from_slice::<serde_json::Value>(&out).unwrap();
        assert_eq!(document, counter::openapi::document());
    }
}
