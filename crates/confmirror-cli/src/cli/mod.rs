//! CLI for confmirror.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use confmirror_core::config;
use std::path::PathBuf;

use commands::{run_children, run_completions, run_config, run_mirror, run_page, MirrorArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "confmirror")]
#[command(
    about = "Export a Confluence page tree to Markdown with its images and attachments",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Export the root page and every descendant.
    Mirror {
        /// API base including the context path, e.g. https://acme.atlassian.net/wiki.
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
        /// Page to start from.
        #[arg(long, value_name = "PAGE_ID")]
        root: Option<String>,
        /// Directory the tree is written under.
        #[arg(long, short, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Abort on the first failing page instead of skipping its subtree.
        #[arg(long)]
        fail_fast: bool,
        /// Deepest level to export below the root (root = 0).
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
    },

    /// Export one page without its children.
    Page {
        /// Page identifier.
        id: String,
        /// Directory the page is written under.
        #[arg(long, short, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// List the direct children of a page.
    Children {
        /// Page identifier.
        id: String,
    },

    /// Show the config file path and the effective configuration.
    Config,

    /// Print a shell completion script to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = cli.command {
            return run_completions(shell);
        }

        let mut cfg = config::load_or_init()?;
        cfg.apply_env();
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Mirror {
                base_url,
                root,
                output,
                fail_fast,
                max_depth,
            } => {
                MirrorArgs {
                    base_url,
                    root,
                    output,
                    fail_fast,
                    max_depth,
                }
                .apply(&mut cfg);
                run_mirror(&cfg)?;
            }
            CliCommand::Page { id, output } => {
                if let Some(dir) = output {
                    cfg.output_dir = dir;
                }
                run_page(&cfg, &id)?;
            }
            CliCommand::Children { id } => run_children(&cfg, &id)?,
            CliCommand::Config => run_config(&cfg)?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
