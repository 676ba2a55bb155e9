use std::{
    fs::File,
    io::{BufWriter, Write},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use owo_colors::{OwoColorize, Stream};

use crate::{
    cli::{Cli, Command},
    report::Report,
    vocab::Vocabulary,
};

mod cli;
mod error;
mod merge;
mod report;
mod schema;
mod source;
mod vocab;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Cli::parse();
    let schema = args
        .from
        .load(Duration::from_secs(args.timeout))
        .with_context(|| format!("could not load schema from {}", args.from))?;
    let vocab = Vocabulary::new(&schema.csl).with_redirects(args.redirect.iter().cloned());
    let report = Report::build(&schema, &args.locale, &vocab, args.from.to_string())?;

    match args.command.unwrap_or(Command::Text) {
        Command::Text => {
            let stdout = std::io::stdout();
            report::text::write(&report, &mut stdout.lock())?;
        }
        Command::Html { output } => {
            let file = File::create(&output)
                .with_context(|| format!("could not create {}", output.display()))?;
            let mut out = BufWriter::new(file);
            report::html::write(&report, chrono::Utc::now(), &mut out)?;
            out.flush()?;
            eprintln!(
                "{} wrote {}",
                "✓".if_supports_color(Stream::Stderr, |t| t.green()),
                output.display()
            );
        }
    }

    log::info!(
        "{} item types, {} rows without a CSL mapping",
        report.sections.len(),
        report.unmapped()
    );
    Ok(())
}
