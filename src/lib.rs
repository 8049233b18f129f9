pub mod application;
pub mod cli;
pub mod domain;
pub mod io;

pub use application::{ExpenseService, SessionConfig, SharedExpenseService};
pub use domain::*;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Install the global tracing subscriber once. `RUST_LOG` wins over the
/// default level; logs go to stderr so stdout only carries command output.
pub fn init_tracing(verbose: bool) {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let default_directive = if verbose { "divvy=debug" } else { "divvy=warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
