// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types shared by the transport, display and count handler.

use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Neither `XMLHttpRequest` nor `ActiveXObject` is available.
    #[error("no HTTP request constructor available in this environment")]
    NoTransport,

    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Body parsed as JSON `null`, which has no fields to read.
    #[error("response body is null")]
    NullPayload,

    #[error("no element with id `{0}`")]
    MissingElement(String),

    #[error("no document available")]
    NoDocument,
}
