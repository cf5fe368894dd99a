// Persists raw audio bytes from successful responses.

use std::io;
use std::path::PathBuf;

use speechload_core::Voice;

/// Default directory for saved audio files.
pub const DEFAULT_OUTPUT_DIR: &str = "test_output";

/// Writes one `.mp3` file per successful request, named
/// deterministically from sequence number and voice.
#[derive(Debug, Clone)]
pub struct AudioSink {
    dir: PathBuf,
}

impl AudioSink {
    /// Open the sink, creating `dir` if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Deterministic path for a request's audio dump.
    pub fn path_for(&self, sequence: u64, voice: Voice) -> PathBuf {
        self.dir.join(format!("test_{}_{}.mp3", sequence, voice))
    }

    /// Write the raw response bytes, untransformed.
    pub async fn save(&self, sequence: u64, voice: Voice, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(sequence, voice);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_sequence_and_voice() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = AudioSink::new(tmp.path()).unwrap();
        assert_eq!(
            sink.path_for(7, Voice::Onyx),
            tmp.path().join("test_7_onyx.mp3")
        );
    }

    #[tokio::test]
    async fn save_writes_bytes_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = AudioSink::new(tmp.path()).unwrap();

        let bytes = vec![0xffu8, 0xf3, 0x10, 0x20];
        let path = sink.save(1, Voice::Alloy, &bytes).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn new_creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        AudioSink::new(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
