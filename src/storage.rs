//! Browser LocalStorage slots
//!
//! Native builds have nowhere to persist to: reads find nothing and writes
//! report failure.

/// Stored string under `key`, if any
#[cfg(target_arch = "wasm32")]
pub fn read(key: &str) -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(key).ok()?
}

/// Returns true when the value was stored
#[cfg(target_arch = "wasm32")]
pub fn write(key: &str, value: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .is_some_and(|s| s.set_item(key, value).is_ok())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write(_key: &str, _value: &str) -> bool {
    false
}
