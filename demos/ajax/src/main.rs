// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::error;
use wasm_bindgen::throw_str;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());

    if let Err(err) = tally::start() {
        error!("{err}");
        throw_str(&err.to_string());
    }
}
