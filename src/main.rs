use anyhow::Context;
use clap::Parser;
use codetotext::{Config, FileFilterConfig, Pipeline, ProfileKind, ProfileRegistry};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "codetotext",
    version,
    author,
    about = "Flatten a zipped code repository into LLM-friendly text exports",
    long_about = "Flatten a zipped code repository into LLM-friendly text exports.\n\n\
    The archive is filtered by a global rule base and an analysis profile, every kept \
    file is copied to the root of a new archive, and the directory tree, a full-code \
    dump and the thematic exports of the profile are added next to them.\n\n\
    USAGE EXAMPLES:\n  \
      # Textified export of a full-stack project\n  \
      codetotext --input projet.zip --profile fullstack\n\n  \
      # Keep original extensions and write to ./exports\n  \
      codetotext -i projet.zip -p scenario_builder --keep-original-extension --out ./exports\n\n  \
      # Drop fixtures and SQL dumps, print statistics as JSON\n  \
      codetotext -i projet.zip --exclude-dir '**/fixtures' --exclude '**/*.sql' --json"
)]
struct Cli {
    /// Zip archive to convert
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "list_profiles"
    )]
    input: Option<PathBuf>,

    /// Analysis profile
    #[arg(short, long, value_enum, default_value = "fullstack", env = "CODETOTEXT_PROFILE")]
    profile: CliProfile,

    /// Output directory for the converted archive
    #[arg(short, long, default_value = "out", value_name = "PATH")]
    out: PathBuf,

    /// Keep original extensions instead of appending .txt
    #[arg(short, long)]
    keep_original_extension: bool,

    /// Glob of files to exclude (can be used multiple times)
    #[arg(long = "exclude", value_name = "GLOB")]
    exclude_files: Vec<String>,

    /// Glob of directories to exclude (can be used multiple times)
    #[arg(long = "exclude-dir", value_name = "GLOB")]
    exclude_dirs: Vec<String>,

    /// Don't insert a timestamp in the output archive name
    #[arg(long)]
    no_timestamp: bool,

    /// Dry run (don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Print statistics as JSON instead of the summary box
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// List the available profiles and exit
    #[arg(long)]
    list_profiles: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
enum CliProfile {
    /// School administration project
    AdminScolaire,
    /// Scenario builder project
    ScenarioBuilder,
    /// Flask backend + React frontend project
    Fullstack,
}

impl From<CliProfile> for ProfileKind {
    fn from(p: CliProfile) -> Self {
        match p {
            CliProfile::AdminScolaire => Self::AdminScolaire,
            CliProfile::ScenarioBuilder => Self::ScenarioBuilder,
            CliProfile::Fullstack => Self::Fullstack,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    if cli.list_profiles {
        return list_profiles(cli.json);
    }

    let input = cli.input.context("An input archive is required")?;
    let profile = ProfileKind::from(cli.profile);

    let config = Config::builder()
        .input_path(input)
        .output_dir(cli.out)
        .profile(profile.id())
        .keep_original_extension(cli.keep_original_extension)
        .file_filter_config(
            FileFilterConfig::new()
                .exclude_files(cli.exclude_files)
                .exclude_directories(cli.exclude_dirs),
        )
        .timestamped_output(!cli.no_timestamp)
        .dry_run(cli.dry_run)
        .build()
        .context("Failed to build configuration")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Pipeline execution failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")?;
        println!("{json}");
    } else {
        stats.print_summary();
    }

    Ok(())
}

fn list_profiles(json: bool) -> anyhow::Result<()> {
    let infos = ProfileRegistry::global().infos();

    if json {
        let json = serde_json::to_string_pretty(&infos).context("Failed to serialize profiles")?;
        println!("{json}");
        return Ok(());
    }

    for info in infos {
        println!("{:<18} v{:<6} {}", info.id, info.version, info.name);
    }
    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("codetotext=info"),
        1 => EnvFilter::new("codetotext=debug"),
        _ => EnvFilter::new("codetotext=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
