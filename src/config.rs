use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ingest::CameraSettings;
use crate::overlay::DEFAULT_CONFIDENCE_THRESHOLD;

const DEFAULT_DEVICE: &str = "/dev/video0";
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_FPS: u32 = 30;
const DEFAULT_MODEL_PATH: &str = "yolov8n.onnx";
const DEFAULT_INPUT_SIZE: u32 = 640;
const DEFAULT_WINDOW_NAME: &str = "Real-Time AR Object Detection";

#[cfg(feature = "backend-tract")]
const DEFAULT_BACKEND: &str = "tract";
#[cfg(not(feature = "backend-tract"))]
const DEFAULT_BACKEND: &str = "stub";

#[derive(Debug, Deserialize, Default)]
struct AppConfigFile {
    camera: Option<CameraConfigFile>,
    detector: Option<DetectorConfigFile>,
    overlay: Option<OverlayConfigFile>,
    display: Option<DisplayConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    target_fps: Option<u32>,
    mirror: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    backend: Option<String>,
    model_path: Option<PathBuf>,
    input_size: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct OverlayConfigFile {
    confidence_threshold: Option<f32>,
    annotations_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct DisplayConfigFile {
    window_name: Option<String>,
    headless: Option<bool>,
}

/// Which detector backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Stub,
    Tract,
}

impl BackendKind {
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "stub" => Ok(Self::Stub),
            "tract" => Ok(Self::Tract),
            other => Err(anyhow!("unknown detector backend '{}' (stub|tract)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub camera: CameraSettings,
    pub mirror: bool,
    pub detector: DetectorSettings,
    pub overlay: OverlaySettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub backend: BackendKind,
    pub model_path: PathBuf,
    pub input_size: u32,
}

#[derive(Debug, Clone)]
pub struct OverlaySettings {
    pub confidence_threshold: f32,
    /// JSON annotation table; the built-in table when unset.
    pub annotations_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub window_name: String,
    pub headless: bool,
}

impl AppConfig {
    /// Defaults, then the file named by `AR_OVERLAY_CONFIG`, then env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("AR_OVERLAY_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AppConfigFile) -> Result<Self> {
        let camera = file.camera.unwrap_or_default();
        let detector = file.detector.unwrap_or_default();
        let overlay = file.overlay.unwrap_or_default();
        let display = file.display.unwrap_or_default();

        let backend = match detector.backend.as_deref() {
            Some(name) => BackendKind::parse(name)?,
            None => BackendKind::parse(DEFAULT_BACKEND)?,
        };

        Ok(Self {
            camera: CameraSettings {
                device: camera.device.unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
                width: camera.width.unwrap_or(DEFAULT_WIDTH),
                height: camera.height.unwrap_or(DEFAULT_HEIGHT),
                target_fps: camera.target_fps.unwrap_or(DEFAULT_FPS),
                frame_limit: None,
            },
            mirror: camera.mirror.unwrap_or(true),
            detector: DetectorSettings {
                backend,
                model_path: detector
                    .model_path
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
                input_size: detector.input_size.unwrap_or(DEFAULT_INPUT_SIZE),
            },
            overlay: OverlaySettings {
                confidence_threshold: overlay
                    .confidence_threshold
                    .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
                annotations_path: overlay.annotations_path,
            },
            display: DisplaySettings {
                window_name: display
                    .window_name
                    .unwrap_or_else(|| DEFAULT_WINDOW_NAME.to_string()),
                headless: display.headless.unwrap_or(false),
            },
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(device) = non_empty_env("AR_OVERLAY_DEVICE") {
            self.camera.device = device;
        }
        if let Some(backend) = non_empty_env("AR_OVERLAY_BACKEND") {
            self.detector.backend = BackendKind::parse(&backend)?;
        }
        if let Some(model) = non_empty_env("AR_OVERLAY_MODEL") {
            self.detector.model_path = PathBuf::from(model);
        }
        if let Some(threshold) = non_empty_env("AR_OVERLAY_CONFIDENCE") {
            self.overlay.confidence_threshold = threshold
                .trim()
                .parse()
                .map_err(|_| anyhow!("AR_OVERLAY_CONFIDENCE must be a number"))?;
        }
        if let Some(path) = non_empty_env("AR_OVERLAY_ANNOTATIONS") {
            self.overlay.annotations_path = Some(PathBuf::from(path));
        }
        if let Some(headless) = non_empty_env("AR_OVERLAY_HEADLESS") {
            self.display.headless = parse_bool(&headless)
                .ok_or_else(|| anyhow!("AR_OVERLAY_HEADLESS must be true or false"))?;
        }
        Ok(())
    }

    /// Check ranges. Called by `load`; call again after applying CLI overrides.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.overlay.confidence_threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(anyhow!(
                "confidence threshold must be between 0 and 1 (exclusive), got {}",
                threshold
            ));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera width and height must be greater than zero"));
        }
        if self.detector.input_size == 0 || self.detector.input_size % 32 != 0 {
            return Err(anyhow!(
                "detector input size must be a positive multiple of 32, got {}",
                self.detector.input_size
            ));
        }
        if self.camera.device.trim().is_empty() {
            return Err(anyhow!("camera device must not be empty"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<AppConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() -> Result<()> {
        let cfg = AppConfig::from_file(AppConfigFile::default())?;
        cfg.validate()?;
        assert_eq!(cfg.camera.device, "/dev/video0");
        assert_eq!((cfg.camera.width, cfg.camera.height), (640, 480));
        assert!(cfg.mirror);
        assert_eq!(cfg.overlay.confidence_threshold, 0.5);
        assert_eq!(cfg.display.window_name, "Real-Time AR Object Detection");
        assert!(!cfg.display.headless);
        Ok(())
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() -> Result<()> {
        let mut cfg = AppConfig::from_file(AppConfigFile::default())?;
        cfg.overlay.confidence_threshold = 1.0;
        assert!(cfg.validate().is_err());
        cfg.overlay.confidence_threshold = 0.0;
        assert!(cfg.validate().is_err());
        cfg.overlay.confidence_threshold = f32::NAN;
        assert!(cfg.validate().is_err());
        Ok(())
    }

    #[test]
    fn backend_names_are_case_insensitive() {
        assert_eq!(BackendKind::parse("Tract").unwrap(), BackendKind::Tract);
        assert_eq!(BackendKind::parse(" stub ").unwrap(), BackendKind::Stub);
        assert!(BackendKind::parse("onnxruntime").is_err());
    }

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
