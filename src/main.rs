//! Translate a key from the command line.
//!
//! Usage:
//!   locale-bundle <key> [name=value ...] [--count N] [--locale L]
//!   locale-bundle --coverage <locale>
//!   locale-bundle --validate <locale>
//!   locale-bundle --enable-verbose-session
//!
//! Optional environment variables:
//! - LOCALE, DEFAULT_LOCALE (defaults to en), FALLBACK_LOCALE
//! - NO_FALLBACKS, VERBOSE_LOCALIZATION
//! - CATALOG_PATH, EXTRAS_PATH (JSON bundles merged over the built-in data)
//! - SESSION_FILE (persists the verbose flag)

use anyhow::{bail, Context, Result};
use locale_bundle::config::Config;
use locale_bundle::i18n::{
    enable_verbose_localization_session, translator_from_config, FileSessionStore, I18n,
    Options, Scope, Translate, TranslationValidator,
};
use tracing::info;

#[derive(Debug)]
enum Command {
    Translate { scope: Scope, options: Options },
    Coverage(String),
    Validate(String),
    EnableVerboseSession,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut scope = None;
    let mut options = Options::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--coverage" => {
                let locale = iter.next().context("--coverage needs a locale")?;
                return Ok(Command::Coverage(locale.clone()));
            }
            "--validate" => {
                let locale = iter.next().context("--validate needs a locale")?;
                return Ok(Command::Validate(locale.clone()));
            }
            "--enable-verbose-session" => return Ok(Command::EnableVerboseSession),
            "--count" => {
                let count = iter.next().context("--count needs a number")?;
                let count: f64 = count
                    .parse()
                    .with_context(|| format!("Invalid count '{}'", count))?;
                options = options.with_count(count);
            }
            "--locale" => {
                let locale = iter.next().context("--locale needs a locale code")?;
                options = options.with_locale(locale.clone());
            }
            param if param.contains('=') => {
                if let Some((name, value)) = param.split_once('=') {
                    options = options.with_param(name, value);
                }
            }
            key => {
                if scope.is_some() {
                    bail!("Unexpected argument '{}'", key);
                }
                scope = Some(Scope::from(key));
            }
        }
    }

    match scope {
        Some(scope) => Ok(Command::Translate { scope, options }),
        None => bail!("Usage: locale-bundle <key> [name=value ...] [--count N] [--locale L]"),
    }
}

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_bundle=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match parse_args(&args)? {
        Command::Translate { scope, options } => {
            let translator = translator_from_config(&config)?;
            println!("{}", translator.translate(&scope, &options));

            if let Some(metrics) = translator.metrics() {
                let report = metrics.report();
                info!(
                    "Translation metrics: {} hits, {} fallback hits, {} misses, {} interpolation failures",
                    report.hits, report.fallback_hits, report.misses, report.interpolation_failures
                );
            }
        }
        Command::Coverage(locale) => {
            let i18n = I18n::from_config(&config)?;
            let report = i18n.coverage(&locale);
            info!(
                "Coverage for {}: {:.1}% ({} of {} keys)",
                locale, report.coverage, report.translated_keys, report.total_keys
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Validate(locale) => {
            let i18n = I18n::from_config(&config)?;
            let report = TranslationValidator::validate_catalog(
                i18n.catalog(),
                &locale,
                &i18n.config().default_locale,
            );
            for warning in &report.warnings {
                println!("warning: {}", warning);
            }
            for error in &report.errors {
                println!("error: {}", error);
            }
            if report.has_errors() {
                bail!("{} placeholder errors in locale {}", report.errors.len(), locale);
            }
        }
        Command::EnableVerboseSession => {
            let path = config
                .session_file
                .as_deref()
                .context("SESSION_FILE must be set to persist the verbose flag")?;
            let mut store = FileSessionStore::new(path);
            println!("{}", enable_verbose_localization_session(&mut store)?);
        }
    }

    Ok(())
}
