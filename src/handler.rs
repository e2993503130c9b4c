// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{greeting::greet, Greeter, HelloRequest, HelloResponse};
use std::net::SocketAddr;
use tarpc::context;

/// This is the type that implements the generated Greeter trait. It is the business logic and
/// is used to start serving a connection. It holds the address of the peer it serves.
#[derive(Clone, Debug)]
pub struct HelloServer(pub SocketAddr);

impl Greeter for HelloServer {
    async fn hello(self, _: context::Context, request: HelloRequest) -> HelloResponse {
        tracing::debug!(peer = %self.0, len = request.value.len(), "hello");
        HelloResponse {
            value: greet(&request.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HelloServer;
    use crate::{Greeter, GreeterClient, HelloRequest};
    use assert_matches::assert_matches;
    use futures::prelude::*;
    use std::net::{Ipv6Addr, SocketAddr};
    use tarpc::{
        client, context,
        server::{BaseChannel, Channel},
        transport::channel,
    };

    fn loopback() -> SocketAddr {
        (Ipv6Addr::LOCALHOST, 0).into()
    }

    #[tokio::test]
    async fn answers_with_greeting() {
        let response = HelloServer(loopback())
            .hello(context::current(), HelloRequest::new("World"))
            .await;
        assert_eq!(response.value, "Hello, World");
    }

    #[tokio::test]
    async fn serves_over_in_memory_transport() -> anyhow::Result<()> {
        let (tx, rx) = channel::unbounded();
        tokio::spawn(
            BaseChannel::with_defaults(rx)
                .execute(HelloServer(loopback()).serve())
                .for_each(|response| async move {
                    tokio::spawn(response);
                }),
        );
        let client = GreeterClient::new(client::Config::default(), tx).spawn();

        assert_matches!(
            client.hello(context::current(), "World".into()).await,
            Ok(ref response) if response.value == "Hello, World"
        );
        assert_matches!(
            client.hello(context::current(), "".into()).await,
            Ok(ref response) if response.value == "Hello, "
        );
        Ok(())
    }
}
