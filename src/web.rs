//! Browser binding
//!
//! JavaScript owns the DOM and the requestAnimationFrame loop; it forwards
//! pointer events here and applies the JSON frame it gets back.

use wasm_bindgen::prelude::*;

use crate::host::{FrameLoop, InputEvent};
use crate::settings::ArenaConfig;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (several arenas on one page) just keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebArena {
    inner: FrameLoop,
}

#[wasm_bindgen]
impl WebArena {
    /// `preset` is "buttons" or "cards"; a non-empty `storage_key` loads a
    /// saved config from LocalStorage when one exists.
    #[wasm_bindgen(constructor)]
    pub fn new(
        preset: &str,
        width: f32,
        height: f32,
        seed: f64,
        storage_key: &str,
    ) -> Result<WebArena, JsError> {
        let mut config = ArenaConfig::preset(preset, width, height).map_err(|e| JsError::new(&e.to_string()))?;
        if !storage_key.is_empty() {
            config = ArenaConfig::load(storage_key, config);
            config.width = width;
            config.height = height;
        }

        let inner = FrameLoop::new(config, seed as u64).map_err(|e| JsError::new(&e.to_string()))?;
        log::info!("Web arena '{}' ready", preset);
        Ok(WebArena { inner })
    }

    /// `body_id` < 0 means "whatever is under the pointer"
    pub fn pointer_down(&mut self, body_id: i32, x: f32, y: f32, time_ms: f64) -> bool {
        let body = u32::try_from(body_id).ok();
        self.inner.dispatch(InputEvent::PointerDown { body, x, y, time_ms })
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, time_ms: f64) -> bool {
        self.inner.dispatch(InputEvent::PointerMove { x, y, time_ms })
    }

    pub fn pointer_up(&mut self) -> bool {
        self.inner.dispatch(InputEvent::PointerUp)
    }

    pub fn click(&mut self, x: f32, y: f32) -> bool {
        self.inner.dispatch(InputEvent::Click { x, y })
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.inner.dispatch(InputEvent::Resize { width, height })
    }

    /// Step once; returns the frame as JSON, or `undefined` after `stop`
    pub fn frame(&mut self, now_ms: f64) -> Option<String> {
        let frame = self.inner.frame(now_ms)?;
        match frame.to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Failed to encode frame: {}", e);
                None
            }
        }
    }

    /// Pending game events as a JSON array
    pub fn events(&mut self) -> String {
        let events = self.inner.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Persist the current config under `key`
    pub fn save_config(&self, key: &str) {
        self.inner.arena().config.save(key);
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }
}
