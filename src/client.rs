// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::Parser;
use greeter::{
    connect::{say_hello, DEFAULT_SERVER_ADDR},
    init_tracing,
};

#[derive(Parser)]
#[clap(about = "Asks the greeting service for one greeting and prints it.")]
struct Flags {
    /// Sets the server address to connect to.
    #[clap(long, default_value = DEFAULT_SERVER_ADDR)]
    server_addr: String,
    /// Sets the name to greet.
    #[clap(long, default_value = "World")]
    name: String,
    /// Exports spans to an OTLP collector.
    #[clap(long)]
    otlp: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let flags = Flags::parse();
    let _tracing = init_tracing("greeter client", flags.otlp)?;

    let greeting = say_hello(flags.server_addr, flags.name).await?;
    println!("{greeting}");

    Ok(())
}
