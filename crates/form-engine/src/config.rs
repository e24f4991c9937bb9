//! Engine configuration

use std::path::PathBuf;
use std::time::Duration;

use form_types::RESERVED_PREFIX;

use crate::fill::FillOptions;
use crate::render::RenderConfig;

pub const DEFAULT_CONVERTER: &str = "/usr/bin/soffice";
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_OUTPUT_ROOT: &str = "./storage/generated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Office converter invoked for PDF output
    pub converter_path: PathBuf,
    pub render_timeout: Duration,
    /// Generated files land in `<output_root>/<form_id>/`
    pub output_root: PathBuf,
    /// Data keys with this prefix are never filled
    pub reserved_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            converter_path: PathBuf::from(DEFAULT_CONVERTER),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            reserved_prefix: RESERVED_PREFIX.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            converter: self.converter_path.clone(),
            timeout: self.render_timeout,
        }
    }

    pub fn fill_options(&self) -> FillOptions {
        FillOptions {
            reserved_prefix: self.reserved_prefix.clone(),
        }
    }
}
