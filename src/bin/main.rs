use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use ui_verify::{Outcome, Runner};

#[derive(Parser)]
#[command(name = "ui-verify")]
#[command(about = "Config-based UI smoke verification")]
#[command(version)]
struct Cli {
    /// Config file to run
    config: PathBuf,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,

    /// Exit 1 on failure, 2 when the button is missing
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> ui_verify::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let mut config = ui_verify::Config::load(&cli.config)?;

    if cli.check {
        println!("Config valid: {}", config.name);
        println!("  Target: {}", config.target.url);
        println!(
            "  Ready: '{}' within {}ms",
            config.ready.text, config.ready.timeout_ms
        );
        println!("  Button: {}", config.button.css());
        match config.settle.title_becomes {
            Some(ref title) => println!(
                "  Settle: title becomes '{}' within {}ms",
                title, config.settle.timeout_ms
            ),
            None => println!("  Settle: fixed {}ms", config.settle.fallback_ms),
        }
        println!(
            "  Screenshots: {} / {}",
            config.screenshots.initial, config.screenshots.after_click
        );
        return Ok(());
    }

    // Override headless if specified
    if cli.headless {
        config.browser.headless = true;
    }

    println!("Running: {}", config.name);

    let mut runner = Runner::new(&config.browser).await?;
    let report = runner.verify(&config).await;

    match report.outcome {
        Outcome::Clicked => println!("{} found!", config.button.label),
        Outcome::ButtonMissing => println!("{} NOT found!", config.button.label),
        Outcome::Failed(ref kind) => println!("Error: {}", kind),
    }
    for path in &report.screenshots {
        println!("  Wrote: {}", path.display());
    }
    println!("  Duration: {}ms", report.duration_ms);

    runner.close().await?;

    if cli.strict {
        match report.outcome {
            Outcome::Clicked => {}
            Outcome::Failed(_) => std::process::exit(1),
            Outcome::ButtonMissing => std::process::exit(2),
        }
    }

    Ok(())
}
