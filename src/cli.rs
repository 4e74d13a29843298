use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dir-sorter")]
#[command(about = "Sort a directory tree into images, video, documents, audio, archives and others", long_about = None)]
pub struct Cli {
    /// Directory to sort; emptied directories are removed afterwards
    pub source_folder: PathBuf,
    /// Directory receiving the six category folders
    pub destination_folder: PathBuf,
}
