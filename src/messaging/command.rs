// Command types - Control thread -> audio callback

use crate::audio::CueSample;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Command {
    /// Replace whatever is sounding with `sample`, resampled by `playback_rate`
    PlayCue {
        sample: Arc<CueSample>,
        playback_rate: f64,
    },
    StopCue,
}
