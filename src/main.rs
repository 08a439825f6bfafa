use clap::{Parser, Subcommand};
use contact_sheet::{build, config, output, pandoc};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contact-sheet")]
#[command(about = "Static site compiler for markdown photo essays")]
#[command(long_about = "\
Static site compiler for markdown photo essays

Markdown pages reference photos by basename; the compiler resolves them
against a flat photo listing, rewrites the document tree (image paths,
printable link annotations, asides), and renders everything through
pandoc.

Project layout:

  contact-sheet.toml             # Config (optional; defaults shown by gen-config)
  list-of-all-photo.txt          # One photo source path per line, basenames unique
  markdown/
  ├── index.md                   # Index source with placeholder code blocks:
  │                              #   ```table of contents```  and
  │                              #   ```inject photo list```
  ├── 1.md                       # Essay pages, one h1 title each;
  └── 2.md                       #   asides are divs classed \"aside\"
  docs/                          # Output: N.html, index.html, media/ paths

Requires pandoc on PATH. Publishing expects the ImageMagick batch printed
by --convert-script to be run separately.")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "contact-sheet.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile all pages and the index
    Build {
        /// Resolve images to local file URLs (no conversion, fast preview)
        #[arg(long)]
        local_paths: bool,
        /// Print the ImageMagick conversion commands to stdout
        #[arg(long)]
        convert_script: bool,
    },
    /// Validate the photo listing and page sources without compiling
    Check,
    /// Print a stock contact-sheet.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let site_config = config::load_config(&cli.config)?;

    match cli.command {
        Command::Build {
            local_paths,
            convert_script,
        } => {
            let options = build::BuildOptions {
                local_paths,
                convert_script,
            };
            let converter = pandoc::Pandoc::new();
            let report = build::build(&site_config, &converter, &options)?;
            output::print_build_report(&report);
        }
        Command::Check => {
            let report = build::check(&site_config)?;
            output::print_check_report(&report, &site_config.photo_list);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
