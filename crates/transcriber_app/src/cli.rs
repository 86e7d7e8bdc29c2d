use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for the transcriber console controller.
#[derive(Parser, Debug)]
#[command(name = "transcriber")]
#[command(about = "Console controller for the transcription pipeline server")]
#[command(version)]
pub struct Args {
    /// Base URL of the pipeline server; overrides transcriber.ron
    #[arg(short, long, env = "TRANSCRIBER_BASE_URL")]
    pub base_url: Option<String>,

    /// Log to the terminal in addition to ./transcriber.log
    #[arg(long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a file to the pipeline and follow it to completion
    Run {
        /// Server-side path of the input, as returned by `upload`
        #[arg(long, required_unless_present = "upload", conflicts_with = "upload")]
        file_path: Option<String>,

        /// Display name; defaults to the file name portion of the path
        #[arg(long)]
        file_name: Option<String>,

        /// Local audio file to upload first, then submit
        #[arg(long)]
        upload: Option<PathBuf>,

        /// Chord recognition algorithm (nnls, vamp, madmom)
        #[arg(long)]
        chord_algorithm: Option<String>,

        /// Lyrics language hint
        #[arg(long)]
        language: Option<String>,

        /// Write the rendered result to this file as markdown
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload a local audio file and print the server-side path
    Upload {
        /// Local audio file
        file: PathBuf,
    },
}
