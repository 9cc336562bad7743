use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The site root (the directory containing quire.yaml)
    #[arg(short, long, global = true, default_value = ".")]
    site: PathBuf,

    /// Override the configured base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override a setting, e.g. `--set site_title=Docs`
    #[arg(long = "set", global = true, value_name = "KEY=VALUE", value_parser = parse_override)]
    set: Vec<(String, String)>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// The command to execute
    #[command(subcommand)]
    command: QuireCommand,
}

impl Args {
    /// Settings overrides from the command line, in precedence order.
    fn overrides(&self) -> Vec<(String, String)> {
        let mut overrides = self.set.clone();
        if let Some(base_url) = &self.base_url {
            overrides.push(("base_url".to_string(), base_url.clone()));
        }
        overrides
    }
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the site in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct RenderArgs {
    /// The route to render
    #[arg(default_value = "/")]
    route: String,

    /// Write the page to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct ServeArgs {
    /// The address to bind to
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// The port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Open the site in the default browser
    #[arg(short, long, default_value = "false")]
    open: bool,
}

#[derive(Subcommand)]
enum QuireCommand {
    /// Initialize a new quire site
    Init(InitArgs),

    /// Render a single route
    Render(RenderArgs),

    /// Serve the site on a local port
    Serve(ServeArgs),
}

/// Initialize tracing based on CLI flags. `RUST_LOG` takes precedence.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "quire=info",
        1 => "quire=debug",
        _ => "quire=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match &args.command {
        QuireCommand::Init(init) => {
            commands::init::run(init).await?;
        }
        QuireCommand::Render(render) => {
            commands::render::run(&args.site, args.overrides(), render).await?;
        }
        QuireCommand::Serve(serve) => {
            commands::serve::run(&args.site, args.overrides(), serve).await?;
        }
    }

    Ok(())
}
