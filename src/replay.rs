use glam::UVec2;

use picking::{DepthFormat, DepthReadback, DepthTexel};
use scene::RecordedPick;

use crate::session::PickSession;

/// A readback that answers every pixel with one recorded texel.
pub struct RecordedDepth {
    texel: DepthTexel,
}

impl RecordedDepth {
    pub fn new(raw: u32, format: DepthFormat) -> Self {
        Self {
            texel: DepthTexel::new(raw, format),
        }
    }
}

impl DepthReadback for RecordedDepth {
    fn format(&self) -> DepthFormat {
        self.texel.format
    }

    fn read_depth(&mut self, _pixel: UVec2) -> anyhow::Result<DepthTexel> {
        Ok(self.texel)
    }
}

/// Outcome counts of a replayed pick sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub hits: usize,
    pub misses: usize,
    pub failures: usize,
}

/// Feeds recorded picks through the session in order.
///
/// A failing pick is logged and counted; the remaining picks still run.
pub fn replay(session: &mut PickSession, picks: &[RecordedPick], format: DepthFormat) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for (i, pick) in picks.iter().enumerate() {
        let mut readback = RecordedDepth::new(pick.raw, format);
        match session.raster_picking(pick.position(), &mut readback) {
            Ok(Some(hit)) => {
                log::info!("Pick {i} at {:?} hit {hit:?}", pick.position());
                summary.hits += 1;
            }
            Ok(None) => {
                log::info!("Pick {i} at {:?} hit nothing", pick.position());
                summary.misses += 1;
            }
            Err(err) => {
                log::warn!("Pick {i} failed: {err:#}");
                summary.failures += 1;
            }
        }
    }

    summary
}
