/// Sierp Web - WASM bindings handing Sierpinski meshes to a browser renderer
///
/// The page owns the WebGL scene, camera and widgets; this module produces
/// the position/color/normal attribute arrays for each frame and keeps the
/// playback clock.
use log::{Level, LevelFilter, Log, Metadata, Record};
use sierp_core::{GeneratorConfig, MeshBuffers, MeshGenerator, Playback, PlaybackConfig};
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// Generator bound to one timeline, caching the copy layout between frames
#[wasm_bindgen]
pub struct SierpinskiGenerator {
    generator: MeshGenerator,
}

#[wasm_bindgen]
impl SierpinskiGenerator {
    #[wasm_bindgen(constructor)]
    pub fn new(max_time: f64) -> Result<SierpinskiGenerator, JsValue> {
        let config =
            GeneratorConfig::new(max_time).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            generator: MeshGenerator::new(config),
        })
    }

    /// Build the frame at `time`. Callers clamp with [`Self::clamp_time`].
    pub fn generate(&self, time: f64) -> Result<MeshFrame, JsValue> {
        self.generator
            .try_generate(time)
            .map(MeshFrame::from)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = clampTime)]
    pub fn clamp_time(&self, time: f64) -> f64 {
        self.generator.config().clamp_time(time)
    }

    #[wasm_bindgen(getter, js_name = maxTime)]
    pub fn max_time(&self) -> f64 {
        self.generator.config().max_time()
    }
}

/// Attribute arrays of one frame
#[wasm_bindgen]
pub struct MeshFrame {
    buffers: MeshBuffers,
}

#[wasm_bindgen]
impl MeshFrame {
    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f32> {
        self.buffers.positions.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn colors(&self) -> Vec<f32> {
        self.buffers.colors.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn normals(&self) -> Vec<f32> {
        self.buffers.normals.clone()
    }

    #[wasm_bindgen(getter, js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.buffers.vertex_count()
    }
}

impl From<MeshBuffers> for MeshFrame {
    fn from(buffers: MeshBuffers) -> Self {
        Self { buffers }
    }
}

/// Playback clock driven by `requestAnimationFrame` timestamps
#[wasm_bindgen]
pub struct PlaybackClock {
    playback: Playback,
    last_timestamp: Option<f64>,
}

#[wasm_bindgen]
impl PlaybackClock {
    #[wasm_bindgen(constructor)]
    pub fn new(max_time: f64) -> Result<PlaybackClock, JsValue> {
        let playback = Playback::new(PlaybackConfig {
            max_time,
            ..PlaybackConfig::default()
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from(playback))
    }

    /// Advance to the animation frame at `timestamp` milliseconds. Returns
    /// whether the timeline moved and the mesh needs regenerating.
    ///
    /// Non-finite timestamps are ignored.
    pub fn tick(&mut self, timestamp: f64) -> bool {
        if !timestamp.is_finite() {
            return false;
        }
        let last = self.last_timestamp.replace(timestamp).unwrap_or(timestamp);
        // Backwards or overflowing deltas count as no time passing
        let elapsed =
            Duration::try_from_secs_f64((timestamp - last) / 1000.0).unwrap_or(Duration::ZERO);
        self.playback.advance(elapsed)
    }

    #[wasm_bindgen(getter)]
    pub fn time(&self) -> f64 {
        self.playback.time()
    }

    #[wasm_bindgen(setter)]
    pub fn set_time(&mut self, time: f64) {
        self.playback.set_time(time);
    }

    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f64 {
        self.playback.speed()
    }

    #[wasm_bindgen(setter)]
    pub fn set_speed(&mut self, speed: f64) {
        self.playback.set_speed(speed);
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.playback.progress()
    }

    #[wasm_bindgen(getter)]
    pub fn playing(&self) -> bool {
        self.playback.is_playing()
    }

    #[wasm_bindgen(getter)]
    pub fn looping(&self) -> bool {
        self.playback.is_looping()
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) {
        self.playback.toggle_play();
    }

    #[wasm_bindgen(js_name = toggleLoop)]
    pub fn toggle_loop(&mut self) {
        self.playback.toggle_loop();
    }
}

impl From<Playback> for PlaybackClock {
    fn from(playback: Playback) -> Self {
        Self {
            playback,
            last_timestamp: None,
        }
    }
}

/// Forwards log records to the browser console
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Already set if the module is instantiated twice.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
    Ok(())
}
