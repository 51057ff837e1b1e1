// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Log setup shared by the `checkmate` executables. The library only emits `tracing` events; installing a subscriber
//! is up to whoever runs it.

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable holding the log filter, in `tracing_subscriber::EnvFilter` syntax (e.g. `checkmate=debug`).
pub const LOG_ENV: &str = "CHECKMATE_LOG";

/// Installs a global subscriber writing to stderr. Without a usable `CHECKMATE_LOG`, only warnings and errors get
/// through.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(Level::WARN.into()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
