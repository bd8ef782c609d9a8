use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid page, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(workers) = args.workers {
        if workers == 0 {
            return Err("invalid workers, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        crate::output::OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid --output-format '{raw}', expected text or json"))?;
    }
    if args.interactive && (args.page.is_some() || args.search.is_some()) {
        return Err("--page and --search cannot be combined with --interactive".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn rejects_zero_page_and_bad_format() {
        let args = CliArgs::parse_from(["holocron", "/people", "--page", "0"]);
        assert!(validate(&args).is_err());
        let args = CliArgs::parse_from(["holocron", "/people", "--output-format", "xml"]);
        assert!(validate(&args).is_err());
        let args = CliArgs::parse_from(["holocron", "/people", "-p", "2", "-A", "json"]);
        assert!(validate(&args).is_ok());
    }

    #[test]
    fn interactive_excludes_one_shot_flags() {
        let args = CliArgs::parse_from(["holocron", "--interactive", "--search", "luke"]);
        assert!(validate(&args).is_err());
    }
}
