use std::sync::Arc;

use crate::adapters::toml_config::SplitterConfig;
use crate::adapters::{FFmpegAdapter, FFprobeAdapter, JsonProjectStore};
use crate::app::session::EditorSession;
use crate::error::SplitterResult;
use crate::ports::{ExtractPort, ProbePort, ProjectPort};

pub trait AppContainer: Send + Sync {
    fn config(&self) -> &SplitterConfig;
    fn extract_port(&self) -> Arc<dyn ExtractPort>;
    fn probe_port(&self) -> Arc<dyn ProbePort>;
    fn project_port(&self) -> Arc<dyn ProjectPort>;

    /// Fresh editing session wired to this container's extractor
    fn session(&self) -> EditorSession {
        EditorSession::new(self.extract_port())
    }
}

pub struct DefaultAppContainer {
    config: SplitterConfig,
    extract_port: Arc<FFmpegAdapter>,
    probe_port: Arc<FFprobeAdapter>,
    project_port: Arc<JsonProjectStore>,
}

impl DefaultAppContainer {
    pub fn new(config: SplitterConfig) -> SplitterResult<Self> {
        config.validate()?;

        let extract_port = Arc::new(FFmpegAdapter::new(&config.ffmpeg_path, config.overwrite));
        let probe_port = Arc::new(FFprobeAdapter::new(&config.ffprobe_path));
        let project_port = Arc::new(JsonProjectStore::new());

        Ok(Self {
            config,
            extract_port,
            probe_port,
            project_port,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn config(&self) -> &SplitterConfig {
        &self.config
    }

    fn extract_port(&self) -> Arc<dyn ExtractPort> {
        Arc::clone(&self.extract_port) as Arc<dyn ExtractPort>
    }

    fn probe_port(&self) -> Arc<dyn ProbePort> {
        Arc::clone(&self.probe_port) as Arc<dyn ProbePort>
    }

    fn project_port(&self) -> Arc<dyn ProjectPort> {
        Arc::clone(&self.project_port) as Arc<dyn ProjectPort>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_rejects_invalid_config() {
        let config = SplitterConfig {
            output_extension: String::new(),
            ..SplitterConfig::default()
        };
        assert!(DefaultAppContainer::new(config).is_err());
    }

    #[test]
    fn test_container_builds_idle_session() {
        let container = DefaultAppContainer::new(SplitterConfig::default()).unwrap();
        let session = container.session();
        assert!(session.source().is_none());
        assert_eq!(container.config().output_extension, "mp4");
    }
}
