//! mdtree: split markdown into a folder per heading and stitch it back together.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use mdtree::config::Config;
use mdtree::entries::leaf_extension;
use mdtree::{
    count_artifacts, parse, read_document, reconstruct, serialize, Error, LayoutKind, MergeScope,
    Pacer, RecompileOptions,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdtree")]
#[command(about = "Decompile markdown headings into a folder tree and back", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a markdown file into directories and leaf files
    Decompile {
        /// Markdown file to split
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Root folder to create the structure in
        #[arg(value_name = "DEST")]
        dest: PathBuf,

        /// On-disk layout
        #[arg(long, value_enum)]
        layout: Option<LayoutKind>,

        /// Mark titles repeated across the tree with `.combN`
        #[arg(long)]
        combine: bool,

        /// Pause after each write so the tree can be watched as it appears
        #[arg(long)]
        delay: bool,

        /// Leaf file extension
        #[arg(long, short = 'e', value_name = "EXT")]
        ext: Option<String>,
    },

    /// Rebuild a markdown file from a folder structure
    Recompile {
        /// Root of the folder structure
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Write the document here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Heading level of the top-level entries
        #[arg(long, short = 'l')]
        level: Option<usize>,

        /// Emit the root folder's name as the first heading
        #[arg(long)]
        root_heading: bool,

        /// On-disk layout
        #[arg(long, value_enum)]
        layout: Option<LayoutKind>,

        /// Whether `.combN` entries merge across the tree or only among siblings
        #[arg(long, value_enum)]
        scope: Option<MergeScope>,

        /// Leaf file extension
        #[arg(long, short = 'e', value_name = "EXT")]
        ext: Option<String>,
    },

    /// Print the heading tree of a markdown file
    Show {
        /// Markdown file to inspect
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// On-disk layout used for the artifact count
        #[arg(long, value_enum)]
        layout: Option<LayoutKind>,

        /// Leaf file extension
        #[arg(long, short = 'e', value_name = "EXT")]
        ext: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = Config::load();

    match run(args.command, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ Error::InputUnavailable { .. }) => {
            eprintln!("{e}. Exiting.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Leaf extension from the flag or the config, without a leading dot.
fn extension(flag: Option<String>, cfg: &Config) -> String {
    let ext = flag.unwrap_or_else(|| cfg.leaf_extension.clone());
    leaf_extension(&ext).to_string()
}

fn run(command: Command, cfg: &Config) -> mdtree::Result<()> {
    match command {
        Command::Decompile {
            input,
            dest,
            layout,
            combine,
            delay,
            ext,
        } => {
            let layout = layout.unwrap_or_else(|| cfg.layout_kind()).layout();
            let ext = extension(ext, cfg);

            let tree = parse(&read_document(&input)?);
            println!("Markdown Structure Tree:");
            print!("{}", tree.render_tree(&ext));

            let pacer = if delay {
                let total = count_artifacts(&tree, layout);
                let estimate = cfg.delay().saturating_mul(u32::try_from(total).unwrap_or(u32::MAX));
                println!("Estimated time with delay: {} seconds", estimate.as_secs());
                Pacer::new(Some(cfg.delay()))
            } else {
                Pacer::off()
            };

            println!("Creating folder structure...");
            serialize(&tree, &dest, layout, &ext, &pacer)?;
            println!("Folder structure created successfully in: {}", dest.display());

            if combine {
                let renamed = layout.combine(&dest, &ext)?;
                println!("Marked {renamed} repeated entries with `.combN` suffixes.");
            }
            Ok(())
        }
        Command::Recompile {
            root,
            output,
            level,
            root_heading,
            layout,
            scope,
            ext,
        } => {
            let layout = layout.unwrap_or_else(|| cfg.layout_kind()).layout();
            let options = RecompileOptions {
                start_level: level.unwrap_or(cfg.start_level),
                root_heading,
                scope: scope.unwrap_or_else(|| cfg.merge_scope()),
                extension: extension(ext, cfg),
            };

            let markdown = reconstruct(&root, layout, &options)?;
            match output {
                Some(path) => {
                    fs::write(&path, &markdown).map_err(|source| Error::Io {
                        action: "write",
                        path: path.clone(),
                        source,
                    })?;
                    eprintln!("Markdown file reconstructed and saved to: {}", path.display());
                }
                None => println!("{markdown}"),
            }
            Ok(())
        }
        Command::Show { input, layout, ext } => {
            let layout = layout.unwrap_or_else(|| cfg.layout_kind()).layout();
            let ext = extension(ext, cfg);

            let tree = parse(&read_document(&input)?);
            print!("{}", tree.render_tree(&ext));
            println!(
                "{} sections, {} folders and files to create",
                tree.count_nodes() - 1,
                count_artifacts(&tree, layout)
            );
            Ok(())
        }
    }
}
