// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Where to request the count from and which elements to update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    pub elements: Elements,
}

/// Ids of the three elements the count handler writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elements {
    /// Receives the raw count as text.
    pub count: String,
    /// Shown when the count is 1.
    pub other_browser: String,
    /// Shown when the count is 6.
    pub prisoner: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: "/count".to_owned(),
            elements: Elements::default(),
        }
    }
}

impl Default for Elements {
    fn default() -> Self {
        Elements {
            count: "count".to_owned(),
            other_browser: "other_browser".to_owned(),
            prisoner: "prisoner".to_owned(),
        }
    }
}
