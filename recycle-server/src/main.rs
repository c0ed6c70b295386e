// Copyright 2026 Recycle Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Recycle server binary.
//!
//! Log verbosity follows `RUST_LOG`; without it the recycle crates log
//! their decisions and tower-http logs one line per response.

use anyhow::{Context, Result};
use recycle_server::{App, Config};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "recycle_api=debug,recycle_policy=info,recycle_core=info,recycle_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load().context("Failed to load configuration from environment")?;
    App::new(config).await?.run().await
}
