use bevy::log::LogPlugin;
use bevy::prelude::*;

use crate::config::EditorConfig;
use crate::garden::GardenContext;
use crate::layout::SplitLayout;
use crate::render::{EditorSettings, GardenRenderPlugin, GardenRes, SplitLayoutRes};

const WINDOW_TITLE: &str = "Garden Designer";

/// Configuration and starting garden assembled before the render loop runs.
///
/// [`EditorLaunch::launch`] hands a copy of the garden to the app exactly
/// once. Edits after that would never reach the running editor, so they are
/// refused.
#[derive(Clone, Debug)]
pub struct EditorLaunch {
    config: EditorConfig,
    garden: GardenContext,
    launched: bool,
}

impl EditorLaunch {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            garden: GardenContext::from_config(&config),
            config,
            launched: false,
        }
    }

    #[inline]
    pub fn is_launched(&self) -> bool {
        self.launched
    }

    /// The starting garden as it was (or will be) handed to the app.
    pub fn garden(&self) -> &GardenContext {
        &self.garden
    }

    /// Apply `f` to the starting garden. `None` once launched.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut GardenContext) -> R) -> Option<R> {
        if self.launched {
            return None;
        }
        Some(f(&mut self.garden))
    }

    /// `Some` on the first call only.
    pub fn launch(&mut self) -> Option<(EditorConfig, GardenContext)> {
        if self.launched {
            return None;
        }
        self.launched = true;
        Some((self.config.clone(), self.garden.clone()))
    }
}

fn editor_app(config: EditorConfig, garden: GardenContext, window: Window) -> App {
    let log_filter = config.log_filter.clone();
    let mut app = App::new();
    app.insert_resource(ClearColor(config.style.elevation_background.into()))
        .insert_resource(SplitLayoutRes(SplitLayout::from_config(&config.layout)))
        .insert_resource(GardenRes::new(garden))
        .insert_resource(EditorSettings(config))
        .add_plugins((
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(window),
                    ..default()
                })
                .set(LogPlugin {
                    filter: log_filter,
                    ..default()
                }),
            GardenRenderPlugin,
        ));
    app
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_editor(config: EditorConfig, garden: GardenContext) {
    let window = Window {
        title: WINDOW_TITLE.to_string(),
        ..default()
    };
    editor_app(config, garden, window).run();
}

#[cfg(target_arch = "wasm32")]
pub fn run_editor(config: EditorConfig, garden: GardenContext, canvas_id: &str) {
    let window = Window {
        title: WINDOW_TITLE.to_string(),
        canvas: Some(format!("#{}", canvas_id)),
        fit_canvas_to_parent: true,
        ..default()
    };
    editor_app(config, garden, window).run();
}
