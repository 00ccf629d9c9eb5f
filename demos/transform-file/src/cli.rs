use logger_call::TransformConfig;
use std::path::{Path, PathBuf};

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(arg_required_else_help = true)]
pub struct Args {
    /// Project root that root-absolute imports and the logger path are relative to
    #[clap(long, env = "LOGGER_CALL_ROOT", default_value = ".")]
    pub root: PathBuf,

    #[command(flatten)]
    pub config: TransformConfig,

    /// Write `<file>` and `<file>.map` here instead of printing to stdout
    #[clap(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Enable verbose informational messages.
    #[clap(long)]
    pub verbose: bool,

    /// JavaScript files to transform
    #[clap(required = true)]
    pub files: Vec<PathBuf>,
}

impl Args {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }
}
