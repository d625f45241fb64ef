use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "faq-parity")]
#[command(about = "Generates FAQ structured data and checks it matches what pages show")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of page records (overrides config and PAGES_DIR)
    #[arg(long, global = true)]
    pub pages_dir: Option<PathBuf>,

    /// Directory of prerendered HTML (overrides config and PRERENDER_DIR)
    #[arg(long, global = true)]
    pub prerender_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check each record's structured data against its FAQ rows
    Validate {
        /// Record files, directories or slugs (default: the pages directory)
        inputs: Vec<String>,
    },

    /// Regenerate structured data from FAQ rows and store it
    Generate {
        /// Record files, directories or slugs (default: the pages directory)
        inputs: Vec<String>,

        /// Report what would change without writing; fails if anything would
        #[arg(long)]
        dry_run: bool,
    },

    /// Check rendered HTML carries structured data matching visible text
    CheckRendered {
        /// Record files, directories or slugs (default: the pages directory)
        inputs: Vec<String>,

        /// Render through WebDriver against the running site instead of
        /// reading prerendered files
        #[arg(long)]
        live: bool,

        /// Base URL of the running site (overrides config and PRERENDER_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Per-page render timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Report failing pages without failing the run
        #[arg(long)]
        warn_only: bool,
    },

    /// Write generated structured data into prerendered HTML files
    Inject {
        /// Record files, directories or slugs (default: the pages directory)
        inputs: Vec<String>,
    },
}
