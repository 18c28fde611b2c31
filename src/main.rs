use clap::{ArgAction, Parser, Subcommand};
use inkpost::{config, generate, load, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "inkpost")]
#[command(about = "Static blog generator for a directory of Markdown articles")]
#[command(long_about = "\
Static blog generator for a directory of Markdown articles

Directories become categories and every Markdown file becomes an article.
Images referenced from articles are fingerprinted and their references
rewritten to the published URLs.

Site structure:

  site/
  ├── config.toml                  # Site config (optional)
  ├── about.md                     # About page body (optional)
  ├── contact.md                   # Contact page body (optional)
  └── src/
      ├── assets/                  # Shared images (@/assets/logo.png)
      └── allDocuments/
          ├── 欢迎.md              # Uncategorized article
          ├── 工作总结/
          │   └── foo.md           # Category 工作总结, id 工作总结-foo
          └── 前端/
              └── vue/
                  ├── 响应式.md    # Category 前端/vue
                  └── img.png      # Referenced as ./img.png

Run 'inkpost gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".inkpost-temp", global = true)]
    temp_dir: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load articles and assets into a manifest
    Load,
    /// Produce the HTML site from the manifest
    Generate,
    /// Run the full pipeline: load → generate
    Build,
    /// Validate the site directory without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Load => {
            let manifest = load::load(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_load_output(&manifest);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let site = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&site);
        }
        Command::Build => {
            println!("==> Stage 1: Loading {}", cli.source.display());
            let manifest = load::load(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_load_output(&manifest);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let site = generate::generate_site(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&site);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = load::load(&cli.source)?;
            output::print_load_output(&manifest);
            println!("==> Site is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn write_manifest(manifest: &load::Manifest, temp_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)
}

/// Diagnostics go to stderr so stdout stays the content inventory.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "inkpost=info",
        1 => "inkpost=debug",
        _ => "inkpost=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
