use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "conformance-runner",
    about = "Run the vow conformance scenarios"
)]
pub struct Cli {
    /// Only run scenarios whose name contains this substring.
    pub filter: Option<String>,

    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Emit a machine-readable JSON report instead of the text summary.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
