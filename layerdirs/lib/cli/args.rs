use std::path::PathBuf;

use clap::Parser;

use crate::{cli::styles, config::DEFAULT_CONFIG_FILENAME};

//-------------------------------------------------------------------------------------------------
// Types
//-------------------------------------------------------------------------------------------------

/// layerdirs - inspect and materialize copy-on-write image layers
#[derive(Debug, Parser)]
#[command(name = "layerdirs", about, version, styles=styles::styles())]
pub struct LayerdirsArgs {
    /// The subcommand to run
    #[command(subcommand)]
    pub subcommand: Option<LayerdirsSubcommand>,

    /// Storage root, overriding the config file and LAYERDIRS_ROOT
    #[arg(short, long, global = true, value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true, value_name = "FILE", default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands for working with a storage root
#[derive(Debug, Parser)]
pub enum LayerdirsSubcommand {
    /// List layer ids
    #[command(name = "ids")]
    Ids {
        /// List ids that have an ancestry record instead of a mount point
        #[arg(long)]
        records: bool,
    },

    /// Show the ancestor chain of a layer
    #[command(name = "parents")]
    Parents {
        /// Layer id
        #[arg(required = true)]
        id: String,

        /// Print ancestor diff paths instead of ids
        #[arg(long)]
        diffs: bool,
    },

    /// Show where a layer's content lives
    #[command(name = "paths")]
    Paths {
        /// Layer id
        #[arg(required = true)]
        id: String,

        /// Also show the label-scoped diff path
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Copy a directory tree, skipping symlinks
    #[command(name = "copy")]
    Copy {
        /// Tree to copy from
        #[arg(required = true)]
        source: PathBuf,

        /// Path to create
        #[arg(required = true)]
        destination: PathBuf,

        /// Directory to create before copying
        #[arg(long, value_name = "DIR")]
        label_dir: Option<PathBuf>,

        /// Stage the copy and publish it with a rename
        #[arg(long)]
        atomic: bool,
    },

    /// Copy a layer's diff under a label
    #[command(name = "materialize")]
    Materialize {
        /// Layer id
        #[arg(required = true)]
        id: String,

        /// Label to copy under, defaults to the label in the config file
        #[arg(short, long)]
        label: Option<String>,

        /// Stage the copy and publish it with a rename
        #[arg(long)]
        atomic: bool,
    },
}

//-------------------------------------------------------------------------------------------------
// Tests
//-------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_debug_assert() {
        LayerdirsArgs::command().debug_assert();
    }

    #[test]
    fn test_args_parse_copy() {
        let args = LayerdirsArgs::parse_from([
            "layerdirs",
            "--root",
            "/r",
            "copy",
            "/src",
            "/dst",
            "--label-dir",
            "/r/diff/lbl",
            "--atomic",
        ]);

        assert_eq!(args.root, Some(PathBuf::from("/r")));
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILENAME));
        match args.subcommand {
            Some(LayerdirsSubcommand::Copy {
                source,
                destination,
                label_dir,
                atomic,
            }) => {
                assert_eq!(source, PathBuf::from("/src"));
                assert_eq!(destination, PathBuf::from("/dst"));
                assert_eq!(label_dir, Some(PathBuf::from("/r/diff/lbl")));
                assert!(atomic);
            }
            other => panic!("unexpected subcommand: {other:?}"),
        }
    }

    #[test]
    fn test_args_global_flags_after_subcommand() {
        let args = LayerdirsArgs::parse_from(["layerdirs", "parents", "L1", "-v", "-r", "/r"]);

        assert!(args.verbose);
        assert_eq!(args.root, Some(PathBuf::from("/r")));
        assert!(matches!(
            args.subcommand,
            Some(LayerdirsSubcommand::Parents { ref id, diffs: false }) if id == "L1"
        ));
    }
}
