use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "holocron",
    version,
    about = "terminal browser for the Star Wars catalog API",
    long_about = "Holocron browses the Star Wars catalog API from the terminal: paged category listings, free-text search within a category and full record details.\n\nExamples:\n  holocron /people\n  holocron /planets --page 3\n  holocron /people --search luke\n  holocron /starships/9 --output-format json\n  holocron --interactive\n\nTip: Use --config to persist the API base and HTTP settings."
)]
pub struct CliArgs {
    #[arg(
        value_name = "PATH",
        help = "Router path to render: /, /<category> or /<category>/<id>."
    )]
    pub path: Option<String>,

    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered page to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Browse",
        help = "Jump to this listing page (clamped to the available pages)."
    )]
    pub page: Option<u32>,

    #[arg(
        short = 's',
        long = "sr",
        visible_alias = "search",
        value_name = "TERM",
        help_heading = "Browse",
        help = "Search the category for TERM instead of listing it."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'i',
        long = "it",
        visible_alias = "interactive",
        help_heading = "Browse",
        help = "Start an interactive browsing session."
    )]
    pub interactive: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.holocron/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Config",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'b',
        long = "base",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Catalog API base URL."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'U',
        long = "ua",
        visible_alias = "user-agent",
        value_name = "AGENT",
        help_heading = "HTTP",
        help = "User-Agent header sent with every request."
    )]
    pub user_agent: Option<String>,

    #[arg(
        short = 'w',
        long = "wrk",
        visible_alias = "workers",
        value_name = "N",
        help_heading = "Performance",
        help = "Number of runtime worker threads."
    )]
    pub workers: Option<usize>,
}
