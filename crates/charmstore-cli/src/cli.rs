use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List charms and bundles in a catalog snapshot
    #[clap(name = "list", visible_alias = "ls")]
    List {
        /// Query string, e.g. "type=charm&sort=-name&include=archive-size"
        #[arg(required = false, default_value = "")]
        query: String,

        /// Catalog snapshot to read instead of the configured one
        #[arg(required = false, long, value_hint = ValueHint::FilePath)]
        catalog: Option<String>,

        /// Directory holding archive blobs
        #[arg(required = false, long, value_hint = ValueHint::DirPath)]
        blobs: Option<String>,

        /// List as this user instead of anonymously
        #[arg(required = false, short, long)]
        user: Option<String>,

        /// Group membership of the user (repeatable)
        #[arg(required = false, short, long, requires = "user")]
        group: Vec<String>,

        /// List with administrative rights, bypassing access control
        #[arg(required = false, long, conflicts_with = "user")]
        admin: bool,
    },

    /// Print the effective configuration
    Config,

    /// Generate the default config file
    #[clap(name = "default-config")]
    DefConfig,
}
