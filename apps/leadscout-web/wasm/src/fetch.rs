//! One-shot fetch of the bundled lead CSV

use crate::browser_store::js_error_message;
use leadscout_core::LeadError;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// GET `url` and return the body as text
///
/// Non-2xx responses count as failures. There is no retry.
pub async fn fetch_text(url: &str) -> Result<String, LeadError> {
    let fetch_err = |e: wasm_bindgen::JsValue| LeadError::Fetch(js_error_message(&e));

    let window = web_sys::window().ok_or_else(|| LeadError::Fetch("No window".into()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts).map_err(fetch_err)?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(fetch_err)?;
    let response: Response = response.dyn_into().map_err(fetch_err)?;

    if !response.ok() {
        return Err(LeadError::Fetch(format!(
            "{} returned HTTP {}",
            url,
            response.status()
        )));
    }

    let body = JsFuture::from(response.text().map_err(fetch_err)?)
        .await
        .map_err(fetch_err)?;

    body.as_string()
        .ok_or_else(|| LeadError::Fetch(format!("{} returned a non-text body", url)))
}
