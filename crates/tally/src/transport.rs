// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP POST over `XMLHttpRequest`, with a fallback for environments that
//! only provide the legacy `ActiveXObject` constructor.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, trace};
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::XmlHttpRequest;

use crate::error::{Error, Result};
use crate::util;

/// `readyState` of a request that has finished, successfully or not.
const DONE: u16 = 4;

/// Callback receiving the outcome of a single request.
pub type Completion = Box<dyn FnOnce(Result<String, TransportError>)>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("server responded with status {0}")]
    Status(u16),
    /// The request completed without a status, e.g. connection refused.
    #[error("network error")]
    Network,
    #[error("{0}")]
    Js(String),
}

/// Something that can POST a body to an address.
///
/// Implementations must call `on_complete` at most once, and only after
/// `post` has returned or from within `post` when the request fails to
/// start.
pub trait Transport {
    fn post(&self, uri: &str, body: &str, on_complete: Completion);
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn post(&self, uri: &str, body: &str, on_complete: Completion) {
        (**self).post(uri, body, on_complete)
    }
}

/// Which request constructor the environment provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `new XMLHttpRequest()`
    Native,
    /// `new ActiveXObject("Microsoft.XMLHTTP")`
    Legacy,
}

impl Backend {
    /// Probe the global scope once. Prefers the native constructor.
    pub fn detect() -> Option<Backend> {
        if util::has_global("XMLHttpRequest") {
            Some(Backend::Native)
        } else if util::has_global("ActiveXObject") {
            Some(Backend::Legacy)
        } else {
            None
        }
    }

    fn create(self) -> Result<XmlHttpRequest, TransportError> {
        let request = match self {
            Backend::Native => XmlHttpRequest::new(),
            Backend::Legacy => util::__tally_legacy_request(),
        };

        request.map_err(|err| TransportError::Js(util::js_message(&err)))
    }
}

/// [`Transport`](Transport) backed by the browser's request object.
#[derive(Debug, Clone, Copy)]
pub struct XhrTransport {
    backend: Backend,
}

impl XhrTransport {
    pub fn new(backend: Backend) -> Self {
        XhrTransport { backend }
    }

    /// Pick the backend for this environment. Fails with
    /// [`Error::NoTransport`](Error::NoTransport) if there is none.
    pub fn detect() -> Result<Self> {
        let backend = Backend::detect().ok_or(Error::NoTransport)?;

        debug!("using {backend:?} request backend");

        Ok(XhrTransport::new(backend))
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }
}

impl Transport for XhrTransport {
    fn post(&self, uri: &str, body: &str, on_complete: Completion) {
        let xhr = match self.backend.create() {
            Ok(xhr) => xhr,
            Err(err) => return on_complete(Err(err)),
        };

        if let Err(err) = xhr.open("POST", uri) {
            return on_complete(Err(TransportError::Js(util::js_message(&err))));
        }

        let pending = Rc::new(Cell::new(Some(on_complete)));

        let handler = {
            let xhr = xhr.clone();
            let pending = pending.clone();

            Closure::wrap(Box::new(move || {
                if xhr.ready_state() != DONE {
                    return;
                }

                xhr.set_onreadystatechange(None);

                if let Some(on_complete) = pending.take() {
                    on_complete(finish(&xhr));
                }
            }) as Box<dyn FnMut()>)
            .into_js_value()
        };

        xhr.set_onreadystatechange(Some(handler.unchecked_ref()));

        trace!("POST {uri} ({} bytes)", body.len());

        if let Err(err) = xhr.send_with_opt_str(Some(body)) {
            xhr.set_onreadystatechange(None);

            if let Some(on_complete) = pending.take() {
                on_complete(Err(TransportError::Js(util::js_message(&err))));
            }
        }
    }
}

fn finish(xhr: &XmlHttpRequest) -> Result<String, TransportError> {
    let status = xhr
        .status()
        .map_err(|err| TransportError::Js(util::js_message(&err)))?;
    let text = xhr
        .response_text()
        .map_err(|err| TransportError::Js(util::js_message(&err)))?;

    classify(status, text)
}

/// Only a 200 counts as success. Status 0 means the request never got a
/// response at all.
fn classify(status: u16, text: Option<String>) -> Result<String, TransportError> {
    match status {
        200 => Ok(text.unwrap_or_default()),
        0 => Err(TransportError::Network),
        status => Err(TransportError::Status(status)),
    }
}
