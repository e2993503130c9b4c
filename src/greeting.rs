// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

const PREFIX: &str = "Hello, ";

/// Returns a greeting for `name`.
pub fn greet(name: &str) -> String {
    format!("{PREFIX}{name}")
}
