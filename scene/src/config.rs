use std::fs;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use glam::{Vec2, Vec3};
use serde::Deserialize;

use picking::{DepthConvention, DepthFormat, ViewportSize};

use crate::camera::Camera;

/// A pick event recorded from a viewer session: the cursor position and the
/// raw depth texel that was read back under it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RecordedPick {
    pub position: [f32; 2],
    pub raw: u32,
}

impl RecordedPick {
    pub fn position(&self) -> Vec2 {
        Vec2::from(self.position)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub camera_eye: [f32; 3],
    pub camera_center: [f32; 3],
    pub camera_up: [f32; 3],
    pub camera_near_far: [f32; 2],
    pub camera_fov: f32,

    pub viewport: ViewportSize,
    pub depth_format: DepthFormat,
    pub depth_convention: DepthConvention,

    pub picks: Vec<RecordedPick>,
}

impl Default for Config {
    fn default() -> Self {
        // Scene of the simple polygons sample: a row of shapes along x.
        Self {
            camera_eye: [-0.5, 0.0, 5.0],
            camera_center: [-0.5, 0.0, 0.0],
            camera_up: [0.0, 1.0, 0.0],
            camera_near_far: [0.1, 100.0],
            camera_fov: Camera::DEFAULT_FOV,
            viewport: DEFAULT_VIEWPORT,
            depth_format: DepthFormat::Unorm24Packed32,
            depth_convention: DepthConvention::Standard,
            picks: Vec::new(),
        }
    }
}

const DEFAULT_VIEWPORT: ViewportSize = ViewportSize { width: 1280, height: 720 };

impl Config {
    pub fn new(config_path: &str) -> anyhow::Result<Self> {
        let toml_str = fs::read_to_string(config_path)
            .with_context(|| format!("Could not find/read config file: {config_path}"))?;
        toml_str.parse()
    }

    pub fn camera(&self) -> Camera {
        Camera::new(
            Vec3::from(self.camera_eye),
            Vec3::from(self.camera_center),
            Vec3::from(self.camera_up),
        )
        .with_fov(self.camera_fov)
        .with_clip_planes(self.camera_near_far[0], self.camera_near_far[1])
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let toml: toml::Value = toml::from_str(toml_str).context("Could not parse TOML")?;

        // Camera
        let toml_camera = toml.get("camera").ok_or_else(|| anyhow!("Missing camera section"))?;
        let camera_eye = parse_vec3(toml_camera.get("eye").ok_or_else(|| anyhow!("Missing camera eye"))?)
            .context("Invalid camera eye")?;
        let camera_center = parse_vec3(toml_camera.get("center").ok_or_else(|| anyhow!("Missing camera center"))?)
            .context("Invalid camera center")?;
        let camera_up = match toml_camera.get("up") {
            Some(value) => parse_vec3(value).context("Invalid camera up")?,
            None => [0.0, 1.0, 0.0],
        };
        // Clip planes only matter for depth precision, so they fall back to the defaults
        let camera_near_far = match toml_camera.get("near_far") {
            Some(value) => {
                let near_far = parse_array(value).context("Invalid camera near_far")?;
                match near_far[..] {
                    [near, far] if near > 0.0 && far > near => [near, far],
                    _ => bail!("Expected camera near_far as [near, far] with 0 < near < far"),
                }
            }
            None => {
                log::info!("No near_far defined in config, using default values");
                Camera::DEFAULT_CLIP_PLANES.to_array()
            }
        };
        let camera_fov = toml_camera
            .get("fov")
            .ok_or_else(|| anyhow!("Missing camera fov"))?
            .as_float()
            .ok_or_else(|| anyhow!("Expected float for camera fov"))? as f32;
        if !(camera_fov > 0.0 && camera_fov < 180.0) {
            bail!("Camera fov must be between 0 and 180 degrees, got {camera_fov}");
        }

        let viewport = load_viewport_config(toml.get("viewport"))?;
        let (depth_format, depth_convention) = load_depth_config(toml.get("depth"))?;
        let picks = load_picks_config(toml.get("picks"))?;

        Ok(Self {
            camera_eye,
            camera_center,
            camera_up,
            camera_near_far,
            camera_fov,

            viewport,
            depth_format,
            depth_convention,

            picks,
        })
    }
}

fn parse_array(value: &toml::Value) -> anyhow::Result<Vec<f32>> {
    let array = value.as_array().ok_or_else(|| anyhow!("Expected array"))?;
    array
        .iter()
        .map(|v| {
            // Accept integers too, `eye = [0, 0, 5]` is easy to write
            v.as_float()
                .or_else(|| v.as_integer().map(|i| i as f64))
                .map(|f| f as f32)
                .ok_or_else(|| anyhow!("Expected number, got {v}"))
        })
        .collect()
}

fn parse_vec3(value: &toml::Value) -> anyhow::Result<[f32; 3]> {
    let components = parse_array(value)?;
    match components[..] {
        [x, y, z] => Ok([x, y, z]),
        _ => bail!("Expected 3 components, got {}", components.len()),
    }
}

// makes the viewport optional in config
fn load_viewport_config(value: Option<&toml::Value>) -> anyhow::Result<ViewportSize> {
    let Some(value) = value else {
        log::info!("No viewport defined in config, using {}x{}", DEFAULT_VIEWPORT.width, DEFAULT_VIEWPORT.height);
        return Ok(DEFAULT_VIEWPORT);
    };
    let size = value
        .get("size")
        .ok_or_else(|| anyhow!("Missing viewport size"))?
        .as_array()
        .ok_or_else(|| anyhow!("Expected array for viewport size"))?
        .iter()
        .map(|v| {
            v.as_integer()
                .and_then(|i| u32::try_from(i).ok())
                .ok_or_else(|| anyhow!("Expected positive integer for viewport size, got {v}"))
        })
        .collect::<anyhow::Result<Vec<u32>>>()?;
    match size[..] {
        [width, height] if width > 0 && height > 0 => Ok(ViewportSize::new(width, height)),
        _ => bail!("Expected viewport size as [width, height] with both > 0"),
    }
}

// makes the depth section optional in config
fn load_depth_config(value: Option<&toml::Value>) -> anyhow::Result<(DepthFormat, DepthConvention)> {
    let defaults = Config::default();
    let Some(value) = value else {
        log::info!("No depth section defined in config, using {}", defaults.depth_format);
        return Ok((defaults.depth_format, defaults.depth_convention));
    };
    let format = match value.get("format") {
        Some(format) => format
            .as_str()
            .ok_or_else(|| anyhow!("Expected string for depth format"))?
            .parse::<DepthFormat>()?,
        None => defaults.depth_format,
    };
    let convention = match value.get("convention") {
        Some(convention) => convention
            .as_str()
            .ok_or_else(|| anyhow!("Expected string for depth convention"))?
            .parse::<DepthConvention>()
            .map_err(|e| anyhow!(e))?,
        None => defaults.depth_convention,
    };
    Ok((format, convention))
}

// makes recorded picks optional in config
fn load_picks_config(value: Option<&toml::Value>) -> anyhow::Result<Vec<RecordedPick>> {
    match value {
        Some(value) => value
            .as_array()
            .ok_or_else(|| anyhow!("Expected array for picks"))?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.clone()
                    .try_into::<RecordedPick>()
                    .with_context(|| format!("Could not convert pick {i}"))
            })
            .collect(),
        None => {
            log::debug!("No picks defined in config");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMERA: &str = "[camera]\neye = [-0.5, 0.0, 5.0]\ncenter = [-0.5, 0.0, 0.0]\nup = [0.0, 1.0, 0.0]\nnear_far = [0.1, 100.0]\nfov = 60.0\n";

    #[test]
    fn test_parse_via_from_str_trait() {
        let config: Config = CAMERA.parse().expect("Could not parse config");
        assert_eq!(config.camera_eye, [-0.5, 0.0, 5.0]);
        assert!("[camera]\neye = [0.0, 0.0, 1.0]".parse::<Config>().is_err());
    }

    #[test]
    fn test_camera_missing() {
        let config = Config::from_str("[viewport]\nsize = [800, 600]\n[depth]\nformat = \"d32_sfloat\"");
        assert!(config.is_err());
    }

    #[test]
    fn test_camera_missing_eye() {
        let config = Config::from_str("[camera]\ncenter = [0.0, 0.0, 0.0]\nfov = 45.0");
        assert!(config.is_err());
    }

    #[test]
    fn test_camera_missing_fov() {
        let config = Config::from_str("[camera]\neye = [0.0, 1.0, 2.0]\ncenter = [0.0, 0.0, 0.0]");
        assert!(config.is_err());
    }

    #[test]
    fn test_camera_bad_fov() {
        let config = Config::from_str("[camera]\neye = [0.0, 1.0, 2.0]\ncenter = [0.0, 0.0, 0.0]\nfov = 180.0");
        assert!(config.is_err());
    }

    #[test]
    fn test_camera_missing_near_far_and_up() {
        let config = Config::from_str("[camera]\neye = [0, 1, 2]\ncenter = [0.0, 0.0, 0.0]\nfov = 45.0");
        let config = config.expect("Could not unwrap config");
        assert_eq!(config.camera_near_far, [0.1, 100.0]);
        assert_eq!(config.camera_up, [0.0, 1.0, 0.0]);
        assert_eq!(config.camera_eye, [0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_camera_inverted_near_far() {
        let config = Config::from_str("[camera]\neye = [0.0, 1.0, 2.0]\ncenter = [0.0, 0.0, 0.0]\nnear_far = [10.0, 1.0]\nfov = 45.0");
        assert!(config.is_err());
    }

    #[test]
    fn test_camera_wrong_component_count() {
        let config = Config::from_str("[camera]\neye = [0.0, 1.0]\ncenter = [0.0, 0.0, 0.0]\nfov = 45.0");
        assert!(config.is_err());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let config = Config::from_str(CAMERA).expect("Could not unwrap config");
        assert_eq!(config.viewport, ViewportSize::new(1280, 720));
        assert_eq!(config.depth_format, DepthFormat::Unorm24Packed32);
        assert_eq!(config.depth_convention, DepthConvention::Standard);
        assert!(config.picks.is_empty());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_viewport_correct() {
        let config = Config::from_str(&format!("{CAMERA}[viewport]\nsize = [800, 600]")).expect("Could not unwrap config");
        assert_eq!(config.viewport, ViewportSize::new(800, 600));
    }

    #[test]
    fn test_viewport_empty() {
        let config = Config::from_str(&format!("{CAMERA}[viewport]\nsize = [800, 0]"));
        assert!(config.is_err());
        let config = Config::from_str(&format!("{CAMERA}[viewport]"));
        assert!(config.is_err());
    }

    #[test]
    fn test_depth_correct() {
        let config = Config::from_str(&format!("{CAMERA}[depth]\nformat = \"d24_unorm_s8_uint\"\nconvention = \"reversed\""))
            .expect("Could not unwrap config");
        assert_eq!(config.depth_format, DepthFormat::Unorm24Stencil8);
        assert_eq!(config.depth_convention, DepthConvention::Reversed);
    }

    #[test]
    fn test_depth_unsupported_format() {
        let config = Config::from_str(&format!("{CAMERA}[depth]\nformat = \"d16_unorm\""));
        let err = config.expect_err("Unsupported format should be rejected");
        assert!(err.to_string().contains("d16_unorm"));
    }

    #[test]
    fn test_picks_correct() {
        let config = Config::from_str(&format!(
            "{CAMERA}[[picks]]\nposition = [640.0, 360.0]\nraw = 16000000\n[[picks]]\nposition = [10.0, 20.0]\nraw = 16777215"
        ))
        .expect("Could not unwrap config");
        assert_eq!(config.picks.len(), 2);
        assert_eq!(config.picks[0].position(), Vec2::new(640.0, 360.0));
        assert_eq!(config.picks[1].raw, 0x00FF_FFFF);
    }

    #[test]
    fn test_picks_missing_fields() {
        let config = Config::from_str(&format!("{CAMERA}[[picks]]\nposition = [640.0, 360.0]"));
        assert!(config.is_err());
    }

    #[test]
    fn test_config_camera() {
        let config = Config::from_str(CAMERA).expect("Could not unwrap config");
        let camera = config.camera();
        assert_eq!(camera.eye, Vec3::new(-0.5, 0.0, 5.0));
        assert_eq!(camera.clip_planes, Vec2::new(0.1, 100.0));
        assert_eq!(camera.fov, 60.0);
    }
}
