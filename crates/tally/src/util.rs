use wasm_bindgen::prelude::*;
use web_sys::XmlHttpRequest;

#[wasm_bindgen(module = "/js/util.js")]
extern "C" {
    /// The legacy object answers to the same `open`/`send`/`readyState`
    /// surface as `XMLHttpRequest`, so it is typed as one.
    #[wasm_bindgen(catch)]
    pub(crate) fn __tally_legacy_request() -> Result<XmlHttpRequest, JsValue>;
}

/// Check whether the global scope has a binding named `name`.
pub(crate) fn has_global(name: &str) -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str(name)).unwrap_or(false)
}

pub(crate) fn js_message(err: &JsValue) -> String {
    match err.as_string() {
        Some(message) => message,
        None => format!("{err:?}"),
    }
}
