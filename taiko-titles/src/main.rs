use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use taiko_common::GenerateResponse;
use taiko_titles::config::TitlesConfig;
use taiko_titles::logging::init_logging;
use taiko_titles::module::handler::TitleImageService;
use taiko_titles::module::scraper::TitleScraper;
use taiko_titles::module::store::TitleStore;

const RULE_WIDTH: usize = 50;

#[derive(Parser)]
#[command(name = "taiko-titles")]
#[command(about = "Taiko no Tatsujin title database and card generator", long_about = None)]
struct Cli {
    /// Path to the TOML config file; defaults apply if it does not exist
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the title list from the wiki and store it
    Scrape,
    /// Print database statistics
    Stats,
    /// Render title cards for matching titles
    Generate {
        /// Substring of the title name
        #[arg(short, long)]
        title: Option<String>,
        /// Exact rarity color, e.g. "#ded523"
        #[arg(short = 'C', long)]
        color: Option<String>,
        /// Output directory for the PNG files
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TitlesConfig::load_or_default(&cli.config)?;

    let _logging_guard = init_logging(&config.log_dir, "taiko-titles", &config.log_level)?;
    tracing::debug!("Loaded config from {}", cli.config.display());

    let store = TitleStore::new(&config.database_path);

    match cli.command {
        Commands::Scrape => {
            store.init()?;
            let scraper = TitleScraper::new(&config.source_url, &config.user_agent)?;
            let report = scraper
                .update(&store)
                .await
                .context("Failed to update the title list")?;
            println!("{}", report);
            print_stats(&store)?;
        }
        Commands::Stats => print_stats(&store)?,
        Commands::Generate {
            title,
            color,
            output,
            json,
        } => {
            let (title, color, output) = if title.is_none() && color.is_none() && output.is_none() {
                prompt_query(&config)?
            } else {
                (title, color, output.unwrap_or_else(|| config.output_dir.clone()))
            };

            let service = TitleImageService::from_config(&config);
            let response = service.generate(title.as_deref(), color.as_deref(), &output);

            if json {
                println!("{}", response.to_json()?);
            } else {
                print_response(&response);
            }
        }
    }

    Ok(())
}

/// Ask for title, color and output directory; empty answers mean no filter / default.
/// Prompts go to stderr so stdout only carries the result.
fn prompt_query(config: &TitlesConfig) -> Result<(Option<String>, Option<String>, PathBuf)> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompts = io::stderr();

    read_query(&mut input, &mut prompts, &config.output_dir)
}

fn read_query(
    input: &mut impl BufRead,
    prompts: &mut impl Write,
    default_output: &Path,
) -> Result<(Option<String>, Option<String>, PathBuf)> {
    let title = prompt(input, prompts, "Title name (empty for any): ")?;
    let color = prompt(input, prompts, "Rarity color (empty for any): ")?;
    let output = prompt(
        input,
        prompts,
        &format!("Output directory [{}]: ", default_output.display()),
    )?
    .map(PathBuf::from)
    .unwrap_or_else(|| default_output.to_path_buf());

    Ok((title, color, output))
}

fn prompt(input: &mut impl BufRead, prompts: &mut impl Write, label: &str) -> Result<Option<String>> {
    write!(prompts, "{}", label)?;
    prompts.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read input")?;
    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}

fn print_response(response: &GenerateResponse) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Success: {}", response.success);
    println!("Images:  {}", response.count);
    println!("Message: {}", response.message);
    for image in &response.images {
        println!("  - {}", image.display());
    }
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn print_stats(store: &TitleStore) -> Result<()> {
    let all = store.find_all()?;
    let available = store.find_available()?;
    let duplicates = store.find_duplicate_names()?;

    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Total titles:     {}", all.len());
    println!("Available titles: {}", available.len());

    if !all.is_empty() {
        println!("\nFirst titles:");
        for record in all.iter().take(5) {
            println!(
                "  [{}] {} ({}) - {}",
                record.id,
                record.name,
                record.rarity_color,
                if record.available { "available" } else { "unavailable" }
            );
        }
    }

    if !duplicates.is_empty() {
        println!("\nTitles with several versions: {}", duplicates.len());
        for dup in duplicates.iter().take(5) {
            println!("  {} ({} versions)", dup.name, dup.count);
            for version in store.find_by_name(&dup.name)? {
                println!(
                    "    - {}: {}",
                    version.rarity_color,
                    version.condition_preview(30)
                );
            }
        }
    }
    println!("{}", "=".repeat(RULE_WIDTH));

    Ok(())
}
