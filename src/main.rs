use std::{env, fs, io};

use anyhow::{Context, bail};
use seccfg::Document;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so stdout stays a valid config file. Level is overridden by
    // `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let path = args.next().context("expected path as first argument")?;
    let only_type = match args.next().as_deref() {
        Some("--type") => Some(args.next().context("expected a section type after --type")?),
        Some(other) => bail!("unexpected argument: {other:?}"),
        None => None,
    };

    let text = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    // Skipped lines are already logged as they are found.
    let (document, _) = Document::from_text(&text);

    match only_type {
        Some(kind) => {
            for (i, section) in document.sections_by_type(&kind).enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{section}");
            }
        }
        None => print!("{document}"),
    }

    Ok(())
}
