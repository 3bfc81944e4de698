// CLI module for gemconvert
// Author: kelexine (https://github.com/kelexine)

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

/// gemconvert - Convert and explain source code with Gemini
#[derive(Parser, Debug)]
#[command(name = "gemconvert", version, about, long_about = None)]
pub struct Args {
    /// Config file to use instead of ~/.gemconvert/config.toml
    #[arg(long, global = true, env = "GEMCONVERT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,
        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Convert code from one language to another and print the result
    Convert {
        /// Language of the input code
        #[arg(long = "from")]
        from: String,
        /// Language to convert into
        #[arg(long)]
        to: String,
        /// Read code from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Explain a piece of code
    Explain {
        /// Language of the code
        #[arg(long)]
        language: String,
        /// Read code from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List the selectable languages
    Languages,
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Read source text from `file`, or from stdin when no file is given.
pub fn read_source(file: Option<&Path>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let args = Args::try_parse_from(["gemconvert"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn test_convert_arguments() {
        let args = Args::try_parse_from([
            "gemconvert", "convert", "--from", "C++", "--to", "Go", "--file", "main.cpp",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Convert {
                from: "C++".to_string(),
                to: "Go".to_string(),
                file: Some(PathBuf::from("main.cpp")),
            })
        );
    }

    #[test]
    fn test_convert_requires_languages() {
        assert!(Args::try_parse_from(["gemconvert", "convert", "--from", "Go"]).is_err());
    }

    #[test]
    fn test_read_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippet.py");
        std::fs::write(&path, "print(1)\n").unwrap();
        assert_eq!(read_source(Some(&path)).unwrap(), "print(1)\n");
    }
}
