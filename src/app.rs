use std::collections::HashMap;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufReader};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::logger::Logger;
use crate::output::{self, OutputFormat};
use crate::router::Route;
use crate::runner::{Options, Runner, VisitOptions, DEFAULT_USER_AGENT};
use crate::shell::Shell;

fn print_banner() {
    const BANNER: &str = r#"
    __          __
   / /_  ____  / /___  ______________  ____
  / __ \/ __ \/ / __ \/ ___/ ___/ __ \/ __ \
 / / / / /_/ / / /_/ / /__/ /  / /_/ / / / /
/_/ /_/\____/_/\____/\___/_/   \____/_/ /_/
"#;
    eprint!("{}", BANNER.bold().yellow());
    eprintln!(
        "       v{} - star wars catalog browser\n",
        env!("CARGO_PKG_VERSION")
    );
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn format_opt_value<'a>(v: &'a str, default: &'a str) -> &'a str {
    if v.trim().is_empty() {
        default
    } else {
        v
    }
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    out.push_str(cmd.get_name());
    if let Some(version) = cmd.get_version() {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }

    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str("Usage: ");
    out.push_str(cmd.get_name());
    out.push_str(" [OPTIONS] [PATH]\n\n");

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();

    for arg in cmd.get_arguments() {
        if arg.is_hide_set() || arg.is_positional() {
            continue;
        }

        let heading = arg.get_help_heading().unwrap_or("Options").to_string();
        let idx = match section_idx.get(&heading).copied() {
            Some(i) => i,
            None => {
                sections.push((heading.clone(), Vec::new()));
                let i = sections.len() - 1;
                section_idx.insert(heading, i);
                i
            }
        };
        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");

        for arg in args {
            let mut parts: Vec<String> = Vec::new();

            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }
            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }
            if let Some(aliases) = arg.get_visible_aliases() {
                for alias in aliases {
                    let rendered = format!("--{alias}");
                    if !parts.iter().any(|p| p == &rendered) {
                        parts.push(rendered);
                    }
                }
            }

            let mut flags = parts.join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                flags.push_str(&format!(" <{value_name}>"));
            }

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');

            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }
            out.push('\n');
        }
    }

    out
}

#[derive(Debug)]
struct RunConfig {
    route: Route,
    page: Option<u32>,
    search: Option<String>,
    interactive: bool,
    base_url: String,
    timeout: usize,
    proxy: Option<String>,
    user_agent: String,
    workers: usize,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let base_url = args
        .base_url
        .or(cfg.base_url)
        .unwrap_or_else(|| crate::catalog::DEFAULT_API_BASE.to_string());
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    let workers = args.workers.or(cfg.workers).unwrap_or(2);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    if workers == 0 {
        return Err("invalid workers, expected positive integer".to_string());
    }

    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());
    let user_agent = args
        .user_agent
        .or(cfg.user_agent)
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let format_raw = args.output_format.or(cfg.output_format);
    let output_format = match format_raw.as_deref() {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text or json"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let route = Route::resolve(args.path.as_deref().unwrap_or("/"));

    Ok(RunConfig {
        route,
        page: args.page,
        search: args.search,
        interactive: args.interactive,
        base_url,
        timeout,
        proxy,
        user_agent,
        workers,
        output,
        output_format,
        no_color,
        verbose: args.verbose,
    })
}

fn spinner(route: &Route) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} :: Duration: [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress bar style: {e}"))?,
    );
    pb.set_message(format!("loading {}", route.path()));
    Ok(pb)
}

async fn write_output_file(path: &str, rendered: &[u8]) -> Result<(), String> {
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(rendered)
        .await
        .map_err(|_| "failed to write output file".to_string())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let logger = Logger::new(run.verbose);

    let options = Options {
        base_url: run.base_url.clone(),
        timeout_seconds: run.timeout,
        proxy: run.proxy.clone(),
        user_agent: run.user_agent.clone(),
    };
    let runner = Runner::new(options).map_err(|e| e.to_string())?;

    if run.verbose > 0 {
        print_banner();
        format_kv_line("API", &run.base_url);
        format_kv_line("Path", &run.route.path());
        format_kv_line("Timeout", &format!("{}s", run.timeout));
        format_kv_line(
            "Proxy",
            format_opt_value(run.proxy.as_deref().unwrap_or(""), "none"),
        );
        format_kv_line("Workers", &run.workers.to_string());
        eprintln!();
    }

    if run.interactive {
        let (shell, rx) = Shell::new(runner.api(), logger.clone(), run.output_format);
        logger.info("interactive session started, type 'help' for commands");
        let stdin = BufReader::new(tokio::io::stdin());
        return shell
            .run(run.route.clone(), stdin, tokio::io::stdout(), rx)
            .await;
    }

    let pb = spinner(&run.route)?;
    let runner = runner.with_logger(logger.with_progress(pb.clone()));
    let visit = runner
        .visit(
            &run.route,
            &VisitOptions {
                page: run.page,
                search: run.search.clone(),
            },
        )
        .await;
    pb.finish_and_clear();

    let rendered = output::render(&visit.view, run.output_format);
    match run.output.as_deref() {
        Some(path) => {
            write_output_file(path, &rendered).await?;
            logger.info(format!("wrote {} to {path}", visit.route.path()));
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write output: {e}"))?;
        }
    }

    logger.info(format!(
        "{} :: {} request(s) in {}ms",
        visit.route.path(),
        visit.fetches,
        visit.elapsed.as_millis()
    ));
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let default_config_path = config::default_config_path();

    if args.init_config {
        let path = user_config_path
            .or(default_config_path)
            .ok_or_else(|| "could not determine home directory for config".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!("wrote default config to {}", path.display());
        } else {
            println!("config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match (user_config_path.as_ref(), default_config_path.as_ref()) {
        (Some(path), _) => config::load_config(path, false)?,
        (None, Some(path)) => config::load_config(path, true)?,
        (None, None) => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(run.workers)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
