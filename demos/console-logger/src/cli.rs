use logger_call::runtime::OutputSinkKind;

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Build mode; debug logs are only emitted when it contains "dev"
    #[clap(long, env = "MODE", default_value = "production")]
    pub mode: String,

    /// Where logger output goes: stdio or log
    #[clap(long, default_value = "stdio")]
    pub sink: OutputSinkKind,
}

impl Args {
    pub fn is_dev(&self) -> bool {
        self.mode.contains("dev")
    }
}
