pub mod commands;

use std::path::PathBuf;

use clap::Parser;

use crate::config::BrowserBackend;

pub const DEFAULT_URL: &str =
    "https://vnexpress.net/tuoi-35-lam-sep-nhung-so-khong-xin-duoc-viec-neu-that-nghiep-dot-xuat-4866122.html";

#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(
    about = "Download and extract a VnExpress article with its comments",
    long_about = None
)]
pub struct Cli {
    /// Path to save/read the raw HTML
    #[arg(long, default_value = "page.html")]
    pub html_file: PathBuf,

    /// Download the article HTML to --html-file
    #[arg(long)]
    pub download: bool,

    /// Extract data from --html-file
    #[arg(long)]
    pub extract: bool,

    /// Path to save extracted JSON (default: stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Article URL to fetch
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Browser backend (default: from config, else webdriver)
    #[arg(long, value_enum)]
    pub browser: Option<BrowserBackend>,

    /// Config file (default: ~/.config/harvester/config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Which stages a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub download: bool,
    pub extract: bool,
}

impl Cli {
    /// Neither `--download` nor `--extract` means both.
    pub fn stages(&self) -> Stages {
        if !self.download && !self.extract {
            return Stages {
                download: true,
                extract: true,
            };
        }
        Stages {
            download: self.download,
            extract: self.extract,
        }
    }
}
