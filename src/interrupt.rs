//! Process-wide interrupt handling
//!
//! Commands run to completion on the calling thread, so an interrupt is not
//! delivered into the running executor. Instead the process exits with
//! [`exitcode::CANCELED`] once SIGINT (Ctrl-C) arrives.

use tracing::warn;

use crate::exitcode;

/// Install the SIGINT handler. Only one handler per process is allowed.
pub fn install() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        warn!("interrupted");
        std::process::exit(exitcode::CANCELED);
    })
}
