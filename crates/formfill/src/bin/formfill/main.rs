mod cli;

use anyhow::Context;
use formfill::config::Config;
use formfill::entry::Entry;
use formfill::payload::{format_entries, Payload};
use formfill::resolve::{NoPrompt, Prompter, ResolveError, Resolver};
use formfill::scrape::Form;
use formfill::transport::default_transport;
use std::io::Write;
use std::path::Path;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("FORMFILL_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let command_result = match cli.command {
        cli::Command::Submit(submit_cli) => submit(submit_cli),
        cli::Command::Check(check_cli) => check(check_cli),
        cli::Command::Convert(convert_cli) => convert(convert_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn submit(cli: cli::SubmitCommand) -> anyhow::Result<()> {
    let config = load(&cli.config)?;

    let mut resolver = Resolver::new(TerminalPrompter);
    let messages = resolver.resolve_all(&config.entries)?;
    let payload = format_entries(&config.entries, messages);

    if cli.dry_run {
        return output(&cli.output, &payload);
    }

    let Some(transport) = default_transport() else {
        tracing::warn!("no http transport available, payload is not submitted");
        eprintln!("Built without http support, showing the payload instead");
        return output(&cli.output, &payload);
    };

    tracing::info!(url = %config.url, fields = payload.len(), "submitting");
    let submission = transport
        .submit(&config.url, &payload)
        .with_context(|| format!("Failed to submit to {}", config.url))?;
    println!("{submission}");

    anyhow::ensure!(
        submission.is_success(),
        "Form did not accept the submission ({submission})"
    );
    Ok(())
}

pub fn check(cli: cli::CheckCommand) -> anyhow::Result<()> {
    let config = load(&cli.config)?;

    let mut resolver = Resolver::new(NoPrompt);
    for entry in config.entries.iter().filter(|entry| !entry.prompt) {
        resolver
            .resolve(entry)
            .with_context(|| format!("Invalid default value in \"{entry}\""))?;
    }

    println!("{}", config.url);
    for entry in &config.entries {
        println!("{entry}");
    }
    eprintln!(
        "{} entries, {} prompted",
        config.entries.len(),
        config.prompt_count()
    );

    Ok(())
}

pub fn convert(cli: cli::ConvertCommand) -> anyhow::Result<()> {
    let shortcut = Path::new(&cli.form);
    let reference = if shortcut.is_file() {
        formfill::url::url_from_shortcut(shortcut)?
    } else {
        cli.form.clone()
    };

    let view_url = formfill::url::to_view_url(&reference)?;
    let transport =
        default_transport().context("Built without http support, cannot fetch the form")?;

    let html = transport
        .fetch(&view_url)
        .with_context(|| format!("Failed to fetch {view_url}"))?;
    let form = Form::from_html(&reference, &html)?;
    let rendered = form.render_config();

    let Some(path) = cli.output else {
        print!("{rendered}");
        return Ok(());
    };

    if path.exists() && !cli.force && !confirm_overwrite(&path)? {
        eprintln!("Not overwriting {}", path.display());
        return Ok(());
    }

    std::fs::write(&path, rendered)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), questions = form.questions.len(), "config written");

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Config> {
    Config::load_file(path).with_context(|| format!("Failed to load config {}", path.display()))
}

fn output(output: &cli::OutputArgs, payload: &Payload) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), payload)?,
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), payload)?;
            println!();
        }
    };

    Ok(())
}

fn read_line() -> std::io::Result<String> {
    std::io::stdout().flush()?;

    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        return Err(std::io::ErrorKind::UnexpectedEof.into());
    }
    Ok(line.trim().to_string())
}

fn confirm_overwrite(path: &Path) -> std::io::Result<bool> {
    print!("{} already exists, overwrite? [y/N] ", path.display());
    let answer = read_line()?;
    Ok(matches!(answer.as_str(), "y" | "Y" | "yes"))
}

/// Asks on stdin, explains fallbacks and errors on stdout
struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, entry: &Entry) -> std::io::Result<String> {
        print!("{}: {} ", entry.title, entry.field_type.prompt_hint());
        let value = read_line()?;
        if !value.is_empty() {
            return Ok(value);
        }

        if !entry.default_value.is_empty() {
            println!("Using default value: {}", entry.default_value);
        } else if !entry.required {
            println!("Using empty value");
        }
        Ok(value)
    }

    fn report(&mut self, _entry: &Entry, error: &ResolveError) {
        let mut reason = error.to_string();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            reason.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        println!("{reason}");
    }
}
