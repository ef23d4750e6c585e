//! Server configuration.
//!
//! Every option can be given as a flag or through the environment.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use carousel_renderer::{ExportConfig, FontConfig};

use crate::openai::{CopywriterError, OpenAiClient};

/// Default OpenAI-compatible API base.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Carousel server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "carousel-server", version, about = "Carousel copy and export server")]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "CAROUSEL_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to bind.
    #[arg(long, env = "CAROUSEL_PORT", default_value_t = 3000)]
    pub port: u16,

    /// OpenAI API key. Without it the generation endpoints answer 500.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// OpenAI-compatible API base URL.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// Chat model.
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_OPENAI_MODEL)]
    pub openai_model: String,

    /// Request body limit in megabytes. Decks carry images as data URIs.
    #[arg(long, env = "CAROUSEL_BODY_LIMIT_MB", default_value_t = 50)]
    pub body_limit_mb: usize,

    /// Load host fonts for text rendering.
    #[arg(long, env = "CAROUSEL_SYSTEM_FONTS", default_value_t = true, action = ArgAction::Set)]
    pub system_fonts: bool,

    /// Extra font directories (comma separated in the environment).
    #[arg(long = "font-dir", env = "CAROUSEL_FONT_DIRS", value_delimiter = ',')]
    pub font_dirs: Vec<PathBuf>,
}

impl ServerConfig {
    /// Socket address to bind.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Body limit in bytes.
    #[must_use]
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }

    /// Export configuration derived from the font options.
    #[must_use]
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            fonts: FontConfig {
                system_fonts: self.system_fonts,
                font_dirs: self.font_dirs.clone(),
            },
            ..ExportConfig::default()
        }
    }

    /// Build the OpenAI client, if a key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn openai_client(&self) -> Result<Option<OpenAiClient>, CopywriterError> {
        match self.openai_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Some(OpenAiClient::new(
                &self.openai_base_url,
                key,
                &self.openai_model,
            )?)),
            _ => Ok(None),
        }
    }
}
