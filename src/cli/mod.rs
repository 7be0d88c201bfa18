use clap::Parser;

use crate::infra::config::{Config, Mode};

#[derive(Parser, Debug, Default)]
#[command(name = "search-mcp-gateway")]
#[command(about = "Web-grounded Gemini search over HTTP or MCP stdio")]
#[command(version)]
pub struct Cli {
    /// The Gemini model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Your Gemini API key
    #[arg(short = 'k', long = "api-key", alias = "apiKey")]
    pub api_key: Option<String>,

    /// Run in MCP mode (JSON-RPC over stdio)
    #[arg(long)]
    pub mcp: bool,

    /// HTTP port for server mode
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Flags take precedence over every other configuration source.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(m) = &self.model {
            cfg.model = m.clone();
        }
        if let Some(k) = &self.api_key {
            cfg.api_key = Some(k.clone());
        }
        if self.mcp {
            cfg.mode = Mode::Stdio;
        }
        if let Some(p) = self.port {
            cfg.port = p;
        }
    }
}
