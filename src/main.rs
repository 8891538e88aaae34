use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use panelfit::catalog::load_catalog;
use panelfit::pricing::{default_prices, load_prices, PriceBook};
use panelfit::quote::{quote_to_json, submit, write_quote_atomic, DraftOrder, QuoteEngine};

const USAGE: &str =
    "usage: panelfit <draft.json> [--prices <file-or-dir>] [--catalog <file>] [--out <file>] [--submit]";

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    draft: PathBuf,
    prices: Option<PathBuf>,
    catalog: Option<PathBuf>,
    out: Option<PathBuf>,
    submit: bool,
}

impl CliArgs {
    fn parse(args: impl Iterator<Item = String>) -> Result<CliArgs> {
        let mut args = args;
        let mut draft: Option<PathBuf> = None;
        let mut parsed = CliArgs::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--prices" => parsed.prices = Some(flag_value(&mut args, "--prices")?),
                "--catalog" => parsed.catalog = Some(flag_value(&mut args, "--catalog")?),
                "--out" => parsed.out = Some(flag_value(&mut args, "--out")?),
                "--submit" => parsed.submit = true,
                other if other.starts_with("--") => {
                    bail!("unknown flag {:?}\n{}", other, USAGE)
                }
                other => {
                    if draft.is_some() {
                        bail!("unexpected argument {:?}\n{}", other, USAGE);
                    }
                    draft = Some(PathBuf::from(other));
                }
            }
        }

        parsed.draft = match draft {
            Some(path) => path,
            None => bail!("missing draft path\n{}", USAGE),
        };
        Ok(parsed)
    }
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf> {
    match args.next() {
        Some(value) if !value.starts_with("--") => Ok(PathBuf::from(value)),
        _ => bail!("{} requires a value\n{}", flag, USAGE),
    }
}

/// Price resolution order: embedded defaults, then the per-user override
/// file, then anything passed via `--prices` (a file or a directory of
/// files). Later sources win.
fn assemble_price_book(prices_arg: Option<&Path>) -> Result<PriceBook> {
    let mut book = default_prices();

    if let Some(config_dir) = dirs::config_dir() {
        let user_file = config_dir.join("panelfit").join("pricing.toml");
        if user_file.exists() {
            book.merge(
                load_prices(&user_file)
                    .with_context(|| format!("loading {}", user_file.display()))?,
            );
            info!("applied user price overrides from {:?}", user_file);
        }
    }

    if let Some(path) = prices_arg {
        let overlay = if path.is_dir() {
            PriceBook::load_dir(path)?
        } else {
            load_prices(path).with_context(|| format!("loading {}", path.display()))?
        };
        book.merge(overlay);
    }

    Ok(book)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse(std::env::args().skip(1))?;

    let engine = match &args.catalog {
        Some(path) => QuoteEngine::new(
            load_catalog(path).with_context(|| format!("loading catalog {}", path.display()))?,
        ),
        None => QuoteEngine::with_defaults(),
    };
    let book = assemble_price_book(args.prices.as_deref())?;

    let content = std::fs::read_to_string(&args.draft)
        .with_context(|| format!("reading draft {}", args.draft.display()))?;
    let draft: DraftOrder = serde_json::from_str(&content)
        .with_context(|| format!("parsing draft {}", args.draft.display()))?;

    let mut outcome = engine.price_draft(&draft, &book);
    for warning in &outcome.warnings {
        warn!("{}", warning.message);
    }

    let submission = if args.submit {
        Some(submit(&mut outcome)?)
    } else {
        None
    };

    match &args.out {
        Some(path) => write_quote_atomic(&outcome, path)?,
        None => print!("{}", quote_to_json(&outcome)?),
    }

    if let Some(submission) = submission {
        println!(
            "submitted {} ({:?}) at {}",
            submission.reference, submission.route, submission.submitted_at
        );
    }

    Ok(())
}
