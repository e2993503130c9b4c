// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::io;
use tarpc::client::RpcError;

/// Errors a caller of the greeting service can see. Both are transport failures; the service
/// itself has no failure path.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The connection to the server could not be established.
    #[error("could not connect to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    /// The connection was established but the call did not complete.
    #[error("the hello call failed")]
    Call(#[from] RpcError),
}
