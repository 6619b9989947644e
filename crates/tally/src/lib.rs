// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tally
//!
//! _Ask the server how many times it has been visited, and show it._
//!
//! **Tally** issues a single `POST /count`, reads `n` from the JSON reply
//! and writes it into the page. Depending on the value one of two other
//! elements, `other_browser` or `prisoner`, is made visible by switching
//! its class between `visible` and `hidden`. See [`count`] for the exact
//! rules.
//!
//! The request goes through a [`Transport`](transport::Transport) and the
//! page is reached through a [`Display`](display::Display), so the policy
//! can be exercised without a browser:
//!
//! ```no_run
//! use tally::prelude::*;
//!
//! fn main() {
//!     let transport = XhrTransport::detect().unwrap();
//!     let display = DomDisplay::from_window().unwrap();
//!
//!     Counter::new(transport, display).count();
//! }
//! ```
//!
//! In a page, [`start`](start) does the same with the panic hook installed.

mod util;

pub mod config;
pub mod count;
pub mod display;
pub mod error;
pub mod transport;

#[cfg(test)]
mod mock;

/// The prelude module with most commonly used types.
pub mod prelude {
    pub use crate::config::{Config, Elements};
    pub use crate::count::{Counter, Outcome};
    pub use crate::display::{Display, DomDisplay, Visibility};
    pub use crate::error::{Error, Result};
    pub use crate::transport::{Backend, Transport, XhrTransport};
}

use display::DomDisplay;
use transport::XhrTransport;

/// Detect the request backend, bind to the window's document, and request
/// the count once. The returned [`Counter`](count::Counter) can be kept
/// around to count again.
pub fn start() -> error::Result<count::Counter<XhrTransport, DomDisplay>> {
    init_panic_hook();

    let counter = count::Counter::new(XhrTransport::detect()?, DomDisplay::from_window()?);

    counter.count();

    Ok(counter)
}

fn init_panic_hook() {
    // Only enable console hook on debug builds
    #[cfg(debug_assertions)]
    {
        use std::cell::Cell;

        thread_local! {
            static INIT: Cell<bool> = Cell::new(false);
        }
        if !INIT.with(|init| init.get()) {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));

            INIT.with(|init| init.set(true));
        }
    }
}
