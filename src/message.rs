// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The two messages exchanged by [`Greeter::hello`](crate::Greeter::hello).

use serde::{Deserialize, Serialize};

/// The argument of a `hello` call: the name to greet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HelloRequest {
    pub value: String,
}

impl HelloRequest {
    pub fn new(value: impl Into<String>) -> Self {
        HelloRequest {
            value: value.into(),
        }
    }
}

impl From<String> for HelloRequest {
    fn from(value: String) -> Self {
        HelloRequest { value }
    }
}

impl From<&str> for HelloRequest {
    fn from(value: &str) -> Self {
        HelloRequest::new(value)
    }
}

/// The result of a `hello` call: the greeting produced by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HelloResponse {
    pub value: String,
}
