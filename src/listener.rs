// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Accepts connections and serves the greeting service on them until told to stop.

use crate::{
    handler::HelloServer,
    pool::{WorkerPool, DEFAULT_WORKERS},
    Greeter, GreeterRequest, GreeterResponse,
};
use futures::{future, prelude::*, stream::BoxStream};
use std::{
    io,
    net::{IpAddr, Ipv6Addr, SocketAddr},
    pin::pin,
    time::Duration,
};
use tarpc::{
    serde_transport,
    server::{BaseChannel, Channel},
    tokio_serde::formats::Json,
    ClientMessage, Response,
};
use tokio::{net::TcpStream, task::JoinSet};
use tracing::{debug, info, warn};

/// The port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 50051;

type ServerCodec = Json<ClientMessage<GreeterRequest>, Response<GreeterResponse>>;
type ServerTransport = serde_transport::Transport<
    TcpStream,
    ClientMessage<GreeterRequest>,
    Response<GreeterResponse>,
    ServerCodec,
>;

/// Settings that control the behavior of the server.
#[derive(Clone, Debug)]
pub struct Config {
    /// The address to listen on. Port 0 picks any free port.
    pub addr: SocketAddr,
    /// The maximum number of requests handled at once, across all connections.
    pub workers: usize,
    /// How long requests already running at shutdown may take to finish. Zero stops
    /// immediately.
    pub grace_period: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: (IpAddr::V6(Ipv6Addr::UNSPECIFIED), DEFAULT_PORT).into(),
            workers: DEFAULT_WORKERS,
            grace_period: Duration::ZERO,
        }
    }
}

/// A bound, not yet running, greeting server.
pub struct Server {
    incoming: BoxStream<'static, io::Result<ServerTransport>>,
    local_addr: SocketAddr,
    pool: WorkerPool,
    grace_period: Duration,
}

impl Server {
    /// Binds the listening socket described by `config`.
    pub async fn bind(config: Config) -> io::Result<Self> {
        let incoming = serde_transport::tcp::listen(config.addr, Json::default).await?;
        let local_addr = incoming.local_addr();
        info!("Listening on {}", local_addr);
        Ok(Server {
            incoming: incoming.boxed(),
            local_addr,
            pool: WorkerPool::new(config.workers),
            grace_period: config.grace_period,
        })
    }

    /// Returns the address being listened on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves until the process is interrupted.
    pub async fn run(self) {
        self.run_until(shutdown_signal()).await
    }

    /// Serves until `shutdown` resolves.
    ///
    /// On shutdown the listening socket is closed first, so new connections are refused. Requests
    /// already running then get the configured grace period to finish. Requests still running
    /// after that are aborted and every remaining connection is dropped.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let Server {
            incoming,
            local_addr,
            pool,
            grace_period,
        } = self;
        let mut connections = JoinSet::new();

        accept(incoming, shutdown, &pool, &mut connections).await;
        info!("Stopped accepting connections on {}.", local_addr);

        // Either all requests finished or the grace period ran out; `close` aborts the rest.
        let _ = tokio::time::timeout(grace_period, pool.idle()).await;
        let aborted = pool.close();
        if aborted > 0 {
            warn!(
                "Aborted {} in-flight requests after {}.",
                aborted,
                humantime::format_duration(grace_period)
            );
        }
        connections.shutdown().await;
        info!("Server shut down.");
    }
}

// Returns when `shutdown` resolves, dropping the listener with it.
async fn accept<F>(
    incoming: BoxStream<'static, io::Result<ServerTransport>>,
    shutdown: F,
    pool: &WorkerPool,
    connections: &mut JoinSet<()>,
) where
    F: Future<Output = ()>,
{
    let mut incoming = pin!(incoming.take_until(shutdown));
    while let Some(transport) = incoming.next().await {
        match transport {
            Ok(transport) => {
                connections.spawn(serve_connection(transport, pool.clone()));
            }
            Err(e) => warn!("Failed to accept a connection: {}", e),
        }
        // Reap connections that already closed.
        while connections.try_join_next().is_some() {}
    }
}

async fn serve_connection(transport: ServerTransport, pool: WorkerPool) {
    let peer = match transport.peer_addr() {
        Ok(peer) => peer,
        Err(e) => {
            debug!("Dropping connection without a peer address: {}", e);
            return;
        }
    };
    info!(%peer, "Connection opened.");
    BaseChannel::with_defaults(transport)
        .execute(HelloServer(peer).serve())
        .for_each(|response| pool.spawn(response))
        .await;
    info!(%peer, "Connection closed.");
}

/// Resolves when the process receives an interrupt (Ctrl-C).
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupted; shutting down."),
        Err(e) => {
            warn!("Cannot listen for interrupts, serving until killed: {}", e);
            future::pending::<()>().await
        }
    }
}
