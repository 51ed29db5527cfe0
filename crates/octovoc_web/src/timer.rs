//! Browser timers for the feedback dwell.

use std::time::Duration;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Resolves after `duration` using the window's `setTimeout`.
///
/// Pass this to the engine's `settle_after`.
pub async fn sleep(duration: Duration) {
    let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            });
        if let Err(err) = scheduled {
            tracing::error!("Failed to set timeout: {err:?}");
            if let Err(err) = resolve.call0(&JsValue::NULL) {
                tracing::error!("Failed to resolve timer: {err:?}");
            }
        }
    });
    if let Err(err) = JsFuture::from(promise).await {
        tracing::error!("Timer failed: {err:?}");
    }
}
