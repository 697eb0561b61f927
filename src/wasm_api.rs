//! WASM API exports for JavaScript interop
//!
//! JavaScript builds up the starting garden and configuration, then hands
//! control to the Bevy render loop with [`JsGardenEditor::start`].

#![cfg(target_arch = "wasm32")]

use parking_lot::Mutex;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::garden::{PlantColor, PlantId, PlantPosition};
use crate::runtime::{run_editor, EditorLaunch};

fn warn_started(op: &str) {
    web_sys::console::warn_1(&format!("Garden editor already started; {op} ignored").into());
}

/// JavaScript-accessible editor wrapper
#[wasm_bindgen]
pub struct JsGardenEditor {
    setup: Arc<Mutex<EditorLaunch>>,
    canvas_id: String,
}

#[wasm_bindgen]
impl JsGardenEditor {
    /// Create an editor from a JSON `EditorConfig` (an empty string means defaults).
    ///
    /// # Arguments
    /// * `config_json` - JSON string representing the EditorConfig
    /// * `canvas_id` - HTML canvas element ID (without #)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, canvas_id: &str) -> Result<JsGardenEditor, JsValue> {
        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json_str(config_json)
                .map_err(|report| JsValue::from_str(&format!("{report:?}")))?
        };

        Ok(JsGardenEditor {
            setup: Arc::new(Mutex::new(EditorLaunch::new(config))),
            canvas_id: canvas_id.to_string(),
        })
    }

    /// Add a plant and return its id. `color` is packed `0xRRGGBB`.
    /// Fails once the editor has started.
    #[wasm_bindgen]
    pub fn add_plant(
        &mut self,
        name: &str,
        x: f32,
        y: f32,
        z: f32,
        color: Option<u32>,
    ) -> Result<String, JsValue> {
        self.setup
            .lock()
            .edit(|garden| {
                garden
                    .plants
                    .create_plant(name, PlantPosition::new(x, y, z), color.map(PlantColor))
                    .id()
                    .to_string()
            })
            .ok_or_else(|| JsValue::from_str("Garden editor already started; add_plant ignored"))
    }

    #[wasm_bindgen]
    pub fn remove_plant(&mut self, id: &str) -> bool {
        let removed = self
            .setup
            .lock()
            .edit(|garden| garden.plants.remove_plant(&PlantId::from(id)).is_some());
        removed.unwrap_or_else(|| {
            warn_started("remove_plant");
            false
        })
    }

    #[wasm_bindgen]
    pub fn select_plant(&mut self, id: &str) {
        let selected = self
            .setup
            .lock()
            .edit(|garden| garden.plants.select_plant(&PlantId::from(id)));
        if selected.is_none() {
            warn_started("select_plant");
        }
    }

    /// Ids of the starting plants in insertion order.
    #[wasm_bindgen]
    pub fn plant_ids(&self) -> js_sys::Array {
        self.setup
            .lock()
            .garden()
            .plants
            .ids()
            .map(|id| JsValue::from_str(id.as_str()))
            .collect()
    }

    /// Starting plants as a JSON array.
    #[wasm_bindgen]
    pub fn plants_json(&self) -> Result<String, JsValue> {
        let setup = self.setup.lock();
        let plants: Vec<_> = setup.garden().plants.plant_list().collect();
        serde_json::to_string(&plants)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize plants: {}", e)))
    }

    /// Start the Bevy render loop. Only the first call has an effect.
    #[wasm_bindgen]
    pub fn start(&mut self) {
        let Some((config, garden)) = self.setup.lock().launch() else {
            warn_started("start");
            return;
        };
        run_editor(config, garden, &self.canvas_id);
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_id(&self) -> String {
        self.canvas_id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn is_started(&self) -> bool {
        self.setup.lock().is_launched()
    }
}
