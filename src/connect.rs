// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The calling side of the service.

use crate::{Error, GreeterClient, HelloRequest};
use std::fmt;
use tarpc::{client, context, tokio_serde::formats::Json};
use tokio::net::ToSocketAddrs;
use tracing::Instrument;

/// The address the client calls unless told otherwise.
pub const DEFAULT_SERVER_ADDR: &str = "localhost:50051";

/// Connects to the server at `addr` and spawns the client's dispatch task. The connection lives
/// as long as the returned client.
pub async fn connect<A>(addr: A) -> Result<GreeterClient, Error>
where
    A: ToSocketAddrs + fmt::Display,
{
    let target = addr.to_string();
    let transport = tarpc::serde_transport::tcp::connect(addr, Json::default)
        .await
        .map_err(|source| Error::Connect {
            addr: target,
            source,
        })?;
    Ok(GreeterClient::new(client::Config::default(), transport).spawn())
}

/// Makes exactly one `hello` call to the server at `addr` and returns the greeting.
pub async fn say_hello<A>(addr: A, name: impl Into<String>) -> Result<String, Error>
where
    A: ToSocketAddrs + fmt::Display,
{
    let span = tracing::info_span!("say_hello", server = %addr);
    async move {
        let client = connect(addr).await?;
        let response = client
            .hello(context::current(), HelloRequest::new(name))
            .await?;
        Ok(response.value)
    }
    .instrument(span)
    .await
}
