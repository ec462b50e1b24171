// Cue bank - The decoded buffers for every cue plus the silence asset

use crate::audio::AudioError;
use crate::audio::loader::{CueSample, load_cue_sample};
use crate::sequencer::{AudioCueKey, SILENCE_ASSET};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Extensions tried, in order, when resolving an asset name
pub const EXTENSIONS: [&str; 3] = ["mp3", "wav", "flac"];

#[derive(Debug, Clone)]
pub struct CueBank {
    cues: HashMap<AudioCueKey, Arc<CueSample>>,
    silence: Arc<CueSample>,
}

impl CueBank {
    /// Decode every cue asset and the silence asset from `dir`
    ///
    /// Fails on the first missing or undecodable asset.
    pub fn load_all(dir: &Path) -> Result<Self, AudioError> {
        let mut cues = HashMap::with_capacity(AudioCueKey::ALL.len());
        for key in AudioCueKey::ALL {
            let path = resolve_asset(dir, key.asset_name())?;
            cues.insert(key, Arc::new(load_cue_sample(&path)?));
        }

        let silence = Arc::new(load_cue_sample(&resolve_asset(dir, SILENCE_ASSET)?)?);

        tracing::info!(dir = %dir.display(), cues = cues.len(), "Cue bank loaded");
        Ok(Self { cues, silence })
    }

    /// Build a bank from already decoded samples
    pub fn from_samples(
        cues: impl IntoIterator<Item = (AudioCueKey, CueSample)>,
        silence: CueSample,
    ) -> Self {
        Self {
            cues: cues
                .into_iter()
                .map(|(key, sample)| (key, Arc::new(sample)))
                .collect(),
            silence: Arc::new(silence),
        }
    }

    pub fn get(&self, key: AudioCueKey) -> Option<&Arc<CueSample>> {
        self.cues.get(&key)
    }

    pub fn silence(&self) -> &Arc<CueSample> {
        &self.silence
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

/// First existing `<dir>/<name>.<ext>` in `EXTENSIONS` order
pub fn resolve_asset(dir: &Path, name: &str) -> Result<PathBuf, AudioError> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|path| path.is_file())
        .ok_or_else(|| AudioError::MissingAsset {
            name: name.to_string(),
            dir: dir.display().to_string(),
        })
}

/// Loads a cue bank on a worker thread
///
/// The control thread polls once per frame until the result is available.
pub struct CueLoader {
    handle: Option<JoinHandle<Result<CueBank, AudioError>>>,
}

impl CueLoader {
    pub fn spawn(dir: PathBuf) -> Result<Self, AudioError> {
        let handle = std::thread::Builder::new()
            .name("cue-loader".into())
            .spawn(move || CueBank::load_all(&dir))?;
        Ok(Self {
            handle: Some(handle),
        })
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// The load result once, when the worker has finished
    pub fn poll(&mut self) -> Option<Result<CueBank, AudioError>> {
        if !self.handle.as_ref()?.is_finished() {
            return None;
        }
        self.handle.take().map(Self::join)
    }

    /// Block until the worker has finished
    pub fn wait(mut self) -> Result<CueBank, AudioError> {
        match self.handle.take() {
            Some(handle) => Self::join(handle),
            None => Err(AudioError::NotLoaded),
        }
    }

    fn join(handle: JoinHandle<Result<CueBank, AudioError>>) -> Result<CueBank, AudioError> {
        handle.join().unwrap_or(Err(AudioError::LoaderPanicked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn write_wav(dir: &Path, name: &str) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(dir.join(format!("{}.wav", name)), spec).unwrap();
        for _ in 0..800 {
            writer.write_sample(1000i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn write_full_set(dir: &Path) {
        for key in AudioCueKey::ALL {
            write_wav(dir, key.asset_name());
        }
        write_wav(dir, SILENCE_ASSET);
    }

    #[test]
    fn test_load_all_assets() {
        let dir = tempdir().unwrap();
        write_full_set(dir.path());

        let bank = CueBank::load_all(dir.path()).unwrap();
        assert_eq!(bank.len(), 4);
        for key in AudioCueKey::ALL {
            assert_eq!(bank.get(key).unwrap().name, key.asset_name());
        }
        assert_eq!(bank.silence().name, "silence");
        assert!((bank.silence().duration_secs() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_missing_asset_fails_whole_load() {
        let dir = tempdir().unwrap();
        write_wav(dir.path(), "nose-in");

        let err = CueBank::load_all(dir.path()).unwrap_err();
        assert!(matches!(err, AudioError::MissingAsset { name, .. } if name == "nose-out"));
    }

    #[test]
    fn test_resolve_prefers_mp3() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("nose-in.wav"), b"").unwrap();
        std::fs::write(dir.path().join("nose-in.mp3"), b"").unwrap();

        let path = resolve_asset(dir.path(), "nose-in").unwrap();
        assert_eq!(path.extension().unwrap(), "mp3");
    }

    #[test]
    fn test_loader_thread_delivers_once() {
        let dir = tempdir().unwrap();
        write_full_set(dir.path());

        let mut loader = CueLoader::spawn(dir.path().to_path_buf()).unwrap();
        let mut result = None;
        for _ in 0..500 {
            if let Some(r) = loader.poll() {
                result = Some(r);
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        assert!(result.unwrap().is_ok());
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_loader_reports_failure() {
        let dir = tempdir().unwrap();
        let loader = CueLoader::spawn(dir.path().to_path_buf()).unwrap();
        assert!(matches!(loader.wait(), Err(AudioError::MissingAsset { .. })));
    }
}
