//! Browser file download via a temporary object URL

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlElement, Url, Window};

/// Delay before the object URL is released, so the browser can start the download
pub const REVOKE_DELAY_MS: i32 = 1_000;

/// Offer `contents` as a file download named `filename`
pub fn download_text(contents: &str, filename: &str, mime_type: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let body = document.body().ok_or("No document body")?;

    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let link: HtmlElement = document.create_element("a")?.dyn_into()?;
    link.set_attribute("href", &url)?;
    link.set_attribute("download", filename)?;
    link.style().set_property("visibility", "hidden")?;

    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;

    revoke_later(&window, url, REVOKE_DELAY_MS)?;
    Ok(())
}

/// Release `url` after `delay_ms` on the window's timer queue
fn revoke_later(window: &Window, url: String, delay_ms: i32) -> Result<i32, JsValue> {
    let revoke = Closure::once_into_js(move || {
        if let Err(err) = Url::revoke_object_url(&url) {
            web_sys::console::warn_1(&err);
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), delay_ms)
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn fetch_status(url: &str) -> Result<u16, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let response = JsFuture::from(window.fetch_with_str(url)).await?;
        Ok(response.dyn_into::<web_sys::Response>()?.status())
    }

    #[wasm_bindgen_test]
    fn test_download_leaves_no_link() {
        download_text("id,name\nlead-1,Ada", "approved-leads.csv", "text/csv").unwrap();

        let document = web_sys::window().unwrap().document().unwrap();
        assert!(document.query_selector("a[download]").unwrap().is_none());
    }

    #[wasm_bindgen_test]
    async fn test_object_url_readable_until_timer_fires() {
        let window = web_sys::window().unwrap();
        let parts = js_sys::Array::of1(&JsValue::from_str("id,name"));
        let blob = Blob::new_with_str_sequence(&parts).unwrap();
        let url = Url::create_object_url_with_blob(&blob).unwrap();

        revoke_later(&window, url.clone(), REVOKE_DELAY_MS).unwrap();
        assert_eq!(fetch_status(&url).await.unwrap(), 200);
    }
}
