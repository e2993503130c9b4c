// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::Parser;
use greeter::{
    init_tracing,
    listener::{self, Server, DEFAULT_PORT},
    pool::DEFAULT_WORKERS,
};
use std::{
    net::{IpAddr, Ipv6Addr},
    time::Duration,
};

#[derive(Parser)]
#[clap(about = "Serves the greeting service until interrupted.")]
struct Flags {
    /// Sets the port number to listen on.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Sets the address to listen on.
    #[clap(long, default_value_t = IpAddr::V6(Ipv6Addr::UNSPECIFIED))]
    bind: IpAddr,
    /// Sets the number of requests served at once.
    #[clap(
        long,
        default_value_t = DEFAULT_WORKERS as u32,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    workers: u32,
    /// How long in-flight requests may run after an interrupt, e.g. "500ms" or "2s".
    #[clap(long, default_value = "0s", value_parser = humantime::parse_duration)]
    grace_period: Duration,
    /// Exports spans to an OTLP collector.
    #[clap(long)]
    otlp: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let flags = Flags::parse();
    let _tracing = init_tracing("greeter server", flags.otlp)?;

    let server = Server::bind(listener::Config {
        addr: (flags.bind, flags.port).into(),
        workers: flags.workers as usize,
        grace_period: flags.grace_period,
    })
    .await?;
    server.run().await;

    Ok(())
}
