// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Requesting the count and reflecting it in the display.
//!
//! The server answers a POST to `/count` with `{"n": <value>}`. The raw
//! value is written to the `count` element as text, then converted to an
//! integer with browser `parseInt` rules to pick which of the two other
//! elements is visible:
//!
//! | integer         | `other_browser` | `prisoner`  |
//! |-----------------|-----------------|-------------|
//! | `1`             | visible         | unchanged   |
//! | `6`             | unchanged       | visible     |
//! | anything else   | hidden          | hidden      |

use std::rc::Rc;

use log::{debug, error, warn};
use serde_json::{Number, Value};

use crate::config::{Config, Elements};
use crate::display::{Display, Visibility};
use crate::error::{Error, Result};
use crate::transport::Transport;

/// Which branch of the display policy a count selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Count was 1: `other_browser` shown.
    OtherBrowser,
    /// Count was 6: `prisoner` shown.
    Prisoner,
    /// Any other count, or none at all: both hidden.
    Hidden,
}

/// The `n` field of a response, before any conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCount {
    /// No `n` field, or the payload isn't an object.
    Undefined,
    Value(Value),
}

impl RawCount {
    pub fn from_body(body: &str) -> Result<RawCount> {
        match serde_json::from_str::<Value>(body)? {
            Value::Null => Err(Error::NullPayload),
            Value::Object(mut fields) => Ok(match fields.remove("n") {
                Some(value) => RawCount::Value(value),
                None => RawCount::Undefined,
            }),
            _ => Ok(RawCount::Undefined),
        }
    }

    /// Text written into the `count` element.
    pub fn text(&self) -> String {
        match self {
            RawCount::Undefined => "undefined".to_owned(),
            RawCount::Value(Value::Null) => String::new(),
            RawCount::Value(value) => to_text(value),
        }
    }

    pub fn to_int(&self) -> Option<i64> {
        match self {
            RawCount::Undefined => None,
            RawCount::Value(value) => parse_int(&to_text(value)),
        }
    }
}

/// String conversion of a JSON value as a browser performs it.
fn to_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    item => to_text(item),
                })
                .collect();

            parts.join(",")
        }
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }

    let f = n.as_f64().unwrap_or(f64::NAN);
    let abs = f.abs();

    if f == 0.0 {
        "0".to_owned()
    } else if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{f:e}");

        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        }
    } else {
        format!("{f}")
    }
}

/// Parse a leading integer the way `parseInt(text)` does: leading
/// whitespace and a sign are skipped, `0x` switches to hex, and parsing
/// stops at the first non-digit. `None` stands for `NaN`.
///
/// Magnitudes beyond `i64` saturate.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim_start_matches(is_js_whitespace);

    let (negative, text) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = match text.get(..2) {
        Some("0x" | "0X") => (16, &text[2..]),
        _ => (10, text),
    };

    let mut value: Option<i64> = None;

    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        let acc = value.unwrap_or(0);

        value = Some(acc.saturating_mul(radix as i64).saturating_add(digit as i64));
    }

    value.map(|v| if negative { -v } else { v })
}

/// White space and line terminators as `parseInt` skips them. Narrower
/// than `char::is_whitespace`, which also accepts U+0085.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{b}' | '\u{c}' | '\r' | ' ' | '\u{a0}' | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}' | '\u{2029}' | '\u{202f}' | '\u{205f}' | '\u{3000}' | '\u{feff}'
    )
}

/// Pick the display branch for a converted count.
///
/// A count of 1 shows `other_browser` without hiding `prisoner`, so a
/// `prisoner` shown by an earlier 6 stays visible. The 6 branch is
/// likewise silent about `other_browser`.
pub fn decide(n: Option<i64>) -> Outcome {
    match n {
        Some(1) => Outcome::OtherBrowser,
        Some(6) => Outcome::Prisoner,
        _ => Outcome::Hidden,
    }
}

/// Apply a response body to the display.
///
/// Nothing is written if the body isn't valid JSON. Otherwise the raw
/// count text is always written first.
pub fn apply<D>(elements: &Elements, display: &D, body: &str) -> Result<Outcome>
where
    D: Display + ?Sized,
{
    let raw = RawCount::from_body(body)?;
    let outcome = decide(raw.to_int());

    display.set_text(&elements.count, &raw.text())?;

    match outcome {
        Outcome::OtherBrowser => {
            display.set_visibility(&elements.other_browser, Visibility::Visible)?;
        }
        Outcome::Prisoner => {
            display.set_visibility(&elements.prisoner, Visibility::Visible)?;
        }
        Outcome::Hidden => {
            display.set_visibility(&elements.other_browser, Visibility::Hidden)?;
            display.set_visibility(&elements.prisoner, Visibility::Hidden)?;
        }
    }

    Ok(outcome)
}

/// Issues count requests and applies their responses.
pub struct Counter<T, D> {
    transport: Rc<T>,
    display: Rc<D>,
    config: Rc<Config>,
}

impl<T, D> Clone for Counter<T, D> {
    fn clone(&self) -> Self {
        Counter {
            transport: self.transport.clone(),
            display: self.display.clone(),
            config: self.config.clone(),
        }
    }
}

impl<T, D> Counter<T, D>
where
    T: Transport + 'static,
    D: Display + 'static,
{
    pub fn new(transport: T, display: D) -> Self {
        Counter::with_config(transport, display, Config::default())
    }

    pub fn with_config(transport: T, display: D, config: Config) -> Self {
        Counter {
            transport: Rc::new(transport),
            display: Rc::new(display),
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Request the count and update the display once it arrives.
    /// Failures are logged and otherwise ignored.
    pub fn count(&self) {
        self.count_with(|_| {});
    }

    /// Like [`count`](Counter::count), handing the result to `done`.
    ///
    /// `done` is never called if the request never completes. Every
    /// call issues its own request; when several are in flight the last
    /// response to arrive determines what the display shows.
    pub fn count_with<F>(&self, done: F)
    where
        F: FnOnce(Result<Outcome>) + 'static,
    {
        let display = self.display.clone();
        let config = self.config.clone();

        self.transport.post(
            &self.config.endpoint,
            "",
            Box::new(move |response| {
                let result = response
                    .map_err(Error::from)
                    .and_then(|body| apply(&config.elements, &*display, &body));

                match &result {
                    Ok(outcome) => debug!("count applied: {outcome:?}"),
                    Err(err @ Error::Transport(_)) => warn!("POST {}: {err}", config.endpoint),
                    Err(err) => error!("could not apply count: {err}"),
                }

                done(result);
            }),
        );
    }
}
