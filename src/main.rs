//! Campus Content - terminal client for the university content backend
//!
//! Entry point for the application. Handles CLI argument parsing,
//! logging initialization, and application bootstrap.

use anyhow::{anyhow, bail, Context};
use campus_content::app::ContentApp;
use campus_content::catalog::ResourceKind;
use campus_content::config::Config;
use campus_content::i18n::{self, Locale, ResolveContext};
use campus_content::message::{Message, ViewMessage};
use campus_content::render::render_text;
use campus_content::resource::{HttpFetcher, ResourceFetcher};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Application name for logging
const APP_NAME: &str = "campus-content";

/// Localized university content from the command line
#[derive(Debug, Parser)]
#[command(name = APP_NAME, version, about)]
struct Cli {
    /// Backend base URL, e.g. https://example.edu
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Let views with identical requests share one response
    #[arg(long, global = true)]
    shared_cache: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List available resources
    List,

    /// Fetch one resource and print it
    Show {
        /// Resource name, see `list`
        resource: String,

        /// Record id for detail resources
        #[arg(long)]
        id: Option<String>,

        /// Extra request parameter as key=value
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Content language (ru, en, kg)
        #[arg(long)]
        lang: Option<String>,
    },

    /// Keep views open and drive them from stdin
    Browse {
        /// Resource names, one view each
        #[arg(required = true)]
        resources: Vec<String>,

        /// Initial content language (ru, en, kg)
        #[arg(long)]
        lang: Option<String>,
    },

    /// Write the effective configuration to the config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    log::info!("Starting {} {}", APP_NAME, env!("CARGO_PKG_VERSION"));

    if let Command::InitConfig { force } = &cli.command {
        init_config(&cli, *force)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;

    match cli.command {
        Command::List => {
            print_catalog(config.locale.default);
            Ok(ExitCode::SUCCESS)
        }
        Command::Show {
            resource,
            id,
            params,
            lang,
        } => {
            let kind: ResourceKind = resource.parse()?;
            let locale = resolve_locale(&config, lang);
            let fetcher = HttpFetcher::new(&config.api)?;
            let params = params.into_iter().chain(id.map(|id| ("id".to_string(), id)));
            show(fetcher, &config, kind, params, locale).await
        }
        Command::Browse { resources, lang } => {
            let kinds = resources
                .iter()
                .map(|name| name.parse::<ResourceKind>())
                .collect::<Result<Vec<_>, _>>()?;
            let locale = resolve_locale(&config, lang);
            let fetcher = HttpFetcher::new(&config.api)?;
            browse(fetcher, &config, &kinds, locale).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::InitConfig { .. } => Ok(ExitCode::SUCCESS),
    }
}

/// Initialize the logging system
fn init_logging(verbose: bool) {
    // Set default log level if not specified
    if std::env::var("RUST_LOG").is_err() {
        let filter = if verbose { "debug" } else { "info,campus_content=debug" };
        std::env::set_var("RUST_LOG", filter);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}

/// Config file, then environment, then command line flags
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
        None => Config::load()?,
    };

    apply_flags(cli, &mut config);
    config.validate()?;
    log::debug!("Backend {}", config.api.base_url());
    Ok(config)
}

/// Command line flags override file and environment
fn apply_flags(cli: &Cli, config: &mut Config) {
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }
    if cli.shared_cache {
        config.cache.shared = true;
    }
}

/// Defaults plus environment and flags, saved to `--config` or the default location
fn init_config(cli: &Cli, force: bool) -> anyhow::Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_file()?,
    };
    if path.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", path.display());
    }

    let mut config = Config::default();
    config.apply_overrides(|key| std::env::var(key).ok());
    apply_flags(cli, &mut config);
    config.validate()?;
    config.save_to(&path)?;

    log::info!("Wrote configuration to {}", path.display());
    println!("{}", path.display());
    Ok(())
}

fn resolve_locale(config: &Config, explicit: Option<String>) -> Locale {
    let ctx = locale_context(config, explicit, i18n::env_locale());
    let locale = i18n::resolve(&ctx);
    log::debug!("Content language {}", locale);
    locale
}

/// Unrecognized or disabled codes fall through to the environment, then the default
fn locale_context(config: &Config, explicit: Option<String>, environment: Option<String>) -> ResolveContext {
    ResolveContext {
        explicit,
        environment,
        supported: config.locale.supported.clone(),
        default: config.locale.default,
        ..ResolveContext::default()
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

fn print_catalog(locale: Locale) {
    for kind in ResourceKind::all() {
        let spec = kind.spec();
        let params = spec.required_params();
        let usage = if params.is_empty() {
            String::new()
        } else {
            format!(" (needs {})", params.join(", "))
        };
        println!("{:<18} {}{}", spec.name, spec.title(locale), usage);
    }

    let languages: Vec<String> = Locale::ALL
        .iter()
        .map(|l| format!("{} ({})", l.code(), l.native_name()))
        .collect();
    println!("\nLanguages: {}", languages.join(", "));
}

/// Fetch once and print; non-zero exit when the view failed
async fn show<F, I>(
    fetcher: F,
    config: &Config,
    kind: ResourceKind,
    params: I,
    locale: Locale,
) -> anyhow::Result<ExitCode>
where
    F: ResourceFetcher,
    I: IntoIterator<Item = (String, String)>,
{
    let mut app = ContentApp::new(fetcher, locale, &config.cache);
    let id = app.add_view(kind, params);
    app.update(Message::View(ViewMessage::Mount(id)));
    app.settle().await;

    let node = app
        .render_view(id)
        .ok_or_else(|| anyhow!("view {} disappeared", id))?;
    print!("{}", render_text(&node));

    Ok(if node.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// What a line of browse input asks for
enum Input {
    Send(Message),
    Show,
    Help,
}

async fn browse<F: ResourceFetcher>(
    fetcher: F,
    config: &Config,
    kinds: &[ResourceKind],
    locale: Locale,
) -> anyhow::Result<()> {
    let mut app = ContentApp::new(fetcher, locale, &config.cache);
    let ids: Vec<_> = kinds
        .iter()
        .map(|kind| app.add_view(*kind, Vec::<(String, String)>::new()))
        .collect();
    for id in ids {
        app.update(Message::View(ViewMessage::Mount(id)));
    }

    print_help();
    print_views(&app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                match parse_input(&line, &app, config.locale.default) {
                    Ok(Input::Send(message)) => {
                        if !app.update(message) {
                            break;
                        }
                        if app.in_flight() == 0 {
                            print_views(&app);
                        }
                    }
                    Ok(Input::Show) => print_views(&app),
                    Ok(Input::Help) => print_help(),
                    Err(err) => eprintln!("{}", err),
                }
            }
            running = app.process_next() => {
                if !running {
                    break;
                }
                if app.in_flight() == 0 {
                    print_views(&app);
                }
            }
        }
    }

    log::info!("Browse session ended");
    Ok(())
}

fn parse_input<F: ResourceFetcher>(line: &str, app: &ContentApp<F>, fallback: Locale) -> anyhow::Result<Input> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let view = |arg: &str| {
        arg.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| app.view_at(i))
            .ok_or_else(|| anyhow!("No view #{}", arg))
    };

    let message = match words.as_slice() {
        [] => Message::None,
        ["show"] => return Ok(Input::Show),
        ["help"] => return Ok(Input::Help),
        ["quit"] | ["exit"] => Message::Quit,
        ["lang", tag] => {
            let locale = Locale::parse(tag).unwrap_or_else(|| {
                log::warn!("Language '{}' is not available, using {}", tag, fallback);
                fallback
            });
            Message::Locale(locale)
        }
        ["set", n, key, value] => Message::View(ViewMessage::SetParam {
            view: view(n)?,
            key: key.to_string(),
            value: value.to_string(),
        }),
        ["unset", n, key] => Message::View(ViewMessage::RemoveParam {
            view: view(n)?,
            key: key.to_string(),
        }),
        ["retry", n] => Message::View(ViewMessage::Retry(view(n)?)),
        _ => bail!("Unknown command '{}', type help", line.trim()),
    };
    Ok(Input::Send(message))
}

fn print_views<F: ResourceFetcher>(app: &ContentApp<F>) {
    for (i, node) in app.render().iter().enumerate() {
        println!("[{}] {}", i + 1, render_text(node));
    }
}

/// Print browse commands
fn print_help() {
    println!(
        r#"COMMANDS:
    lang <ru|en|kg>         Switch content language
    set <view#> <key> <v>   Set a request parameter
    unset <view#> <key>     Remove a request parameter
    retry <view#>           Repeat the view's request
    show                    Print all views
    quit                    Leave
"#
    );
}
