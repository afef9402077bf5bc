/*!
# Simple Polygons Picking

Click-to-focus camera picking for a rasterized scene: the depth under the
cursor is read back, decoded, and unprojected into world space, and the
camera's point of interest moves onto the clicked surface.

## Overview

The renderer leaves a depth buffer behind every frame. Picking reads the one
texel under the cursor, turns the stored bits into a normalized depth (32 bit
float or 24 bit unsigned normalized storage), and runs the pixel back through
the inverse of `projection * view`. Nothing is picked when the cursor is
outside the viewport or the texel still holds the far-plane clear value.

## Modules

- [`picking`](../picking/index.html): Depth decoding, unprojection and the depth readback contract.
- [`scene`](../scene/index.html): Camera, projection, shader-facing structs and the TOML configuration.
- [`wgpu_utils`](../wgpu_utils/index.html): Reads depth texels back from a wgpu depth texture.

## Usage

Without a window, `run` replays the picks recorded in a configuration file
and logs where the camera ends up.

```rust no_run
use simple_polygons::run;

fn main() -> anyhow::Result<()> {
    run(Some("res/config.toml".to_string()))
}
```

Inside a render loop, a `PickSession` is driven with any `DepthReadback`:

```rust ignore
let mut readback = GpuDepthReadback::new(&device, &queue, &depth_texture)?;
if let Some(hit) = session.raster_picking(mouse, &mut readback)? {
    println!("Now looking at {hit:?}");
}
```
*/
mod logging;
mod replay;
mod session;

use anyhow::Context;

use scene::Config;

pub use logging::{init_logging, LoggingConfig};
pub use replay::{replay, RecordedDepth, ReplaySummary};
pub use session::PickSession;
pub use wgpu_utils::{depth_format, GpuDepthReadback};

const DEFAULT_CONFIG_PATH: &str = "res/config.toml";

/// Replays the recorded picks of a configuration file.
///
/// Initializes the logger, loads the configuration (`res/config.toml` when
/// no path is given), and feeds every recorded pick through a
/// [`PickSession`]. Individual picks that fail are logged and skipped.
///
/// # Errors
///
/// Fails when the configuration file cannot be read or parsed.
pub fn run(config_path: Option<String>) -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config_path = config_path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::new(&config_path).with_context(|| format!("Could not load config {config_path}"))?;
    log::info!(
        "Loaded {} recorded picks, viewport {}x{}, depth format {}",
        config.picks.len(),
        config.viewport.width,
        config.viewport.height,
        config.depth_format
    );

    let mut session = PickSession::from_config(&config);
    let summary = replay(&mut session, &config.picks, config.depth_format);

    log::info!(
        "Replay done: {} hits, {} misses, {} failures",
        summary.hits,
        summary.misses,
        summary.failures
    );
    let camera = session.camera();
    log::info!("Final camera: eye {:?}, center {:?}, up {:?}", camera.eye, camera.center, camera.up);

    Ok(())
}
