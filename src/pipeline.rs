use crate::{
    config::Config,
    consolidate::consolidate,
    error::{Error, Result},
    filter::{EntryGate, FileFilterConfig},
    naming::{output_archive_name, with_timestamp},
    profile::AnalysisProfile,
    tree::generate_tree,
    walker::{WalkStats, Walker},
    writer::{OutputArchive, write_file_atomic},
};
use serde::Serialize;
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{info, instrument, warn};

const TIMESTAMP_FORMAT: &str = "%y-%m-%d_%Hh%M";

/// Per-call switches of [`process_archive`].
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Keep every original extension instead of appending `.txt`
    pub keep_original_extension: bool,

    /// Caller-level glob exclusions
    pub exclusions: FileFilterConfig,
}

/// Result of converting one archive in memory.
#[derive(Debug, Clone)]
pub struct ProcessedArchive {
    /// The rewritten zip
    pub bytes: Vec<u8>,

    /// Suggested file name, without timestamp
    pub suggested_name: String,

    /// Names of every entry in the rewritten zip, in write order
    pub entries: Vec<String>,

    /// Names of the generated text artifacts, in write order
    pub artifacts: Vec<&'static str>,

    /// Output name collisions resolved while assembling the zip
    pub name_collisions: usize,

    /// Walk counters
    pub stats: WalkStats,
}

/// Converts one zip archive in memory.
///
/// The output holds every kept file (possibly renamed), the tree artifact,
/// the two profile-agnostic aggregates and the profile's own exports.
///
/// # Errors
///
/// Returns:
/// - [`Error::InvalidArchive`] if `archive` is not a readable zip
/// - [`Error::NoProcessableFiles`] if filtering leaves no content block
/// - [`Error::InvalidPattern`] if an exclusion glob doesn't compile
/// - [`Error::Archive`] if the output zip cannot be assembled
pub fn process_archive(
    archive: &[u8],
    uploaded_name: &str,
    profile: Arc<dyn AnalysisProfile>,
    options: &ProcessOptions,
) -> Result<ProcessedArchive> {
    let tree = generate_tree(archive)?;

    let gate = EntryGate::new(
        Arc::clone(&profile),
        options.keep_original_extension,
        &options.exclusions,
    )?;
    let walk = Walker::new(gate).walk(archive)?;

    if walk.blocks.is_empty() {
        return Err(Error::no_processable_files(uploaded_name));
    }

    let mut output = OutputArchive::new();
    for file in walk.raw_files {
        output.add_raw(file.name, file.content);
    }

    let exports = consolidate(&tree, &walk.blocks, profile.as_ref());
    let artifacts: Vec<&'static str> = exports.iter().map(|f| f.name).collect();
    for export in exports {
        output.add_artifact(export.name, export.content);
    }

    let entries = output.names().map(str::to_string).collect();
    let name_collisions = output.collisions();
    let bytes = output.finish()?;

    Ok(ProcessedArchive {
        bytes,
        suggested_name: output_archive_name(uploaded_name, options.keep_original_extension),
        entries,
        artifacts,
        name_collisions,
        stats: walk.stats,
    })
}

/// Statistics collected during pipeline execution.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    /// Input archive file name
    pub input: String,

    /// Profile identifier used
    pub profile: String,

    /// Walk counters
    pub walk: WalkStats,

    /// Generated text artifacts
    pub artifacts: Vec<&'static str>,

    /// Entries in the output archive
    pub output_entries: usize,

    /// Output name collisions resolved
    pub name_collisions: usize,

    /// Size of the output archive in bytes
    pub output_bytes: usize,

    /// Where the output archive was written, `None` in dry run mode
    pub output_path: Option<PathBuf>,

    /// Total execution time
    pub duration: Duration,

    /// Time spent reading the input
    pub read_duration: Duration,

    /// Time spent converting in memory
    pub process_duration: Duration,

    /// Time spent writing the output
    pub write_duration: Duration,
}

impl PipelineStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║               Conversion Summary                      ║");
        println!("╠═══════════════════════════════════════════════════════╣");
        println!("║ Input:    {}", self.input);
        println!("║ Profile:  {}", self.profile);
        println!("║                                                       ║");
        println!(
            "║ Files in archive:     {:>8}                        ║",
            self.walk.total_files
        );
        println!(
            "║   - Kept:             {:>8}                        ║",
            self.walk.kept_files
        );
        println!(
            "║   - Content blocks:   {:>8}                        ║",
            self.walk.content_blocks
        );
        println!(
            "║   - Dropped:          {:>8}                        ║",
            self.walk.dropped_files()
        );
        for (reason, count) in &self.walk.dropped {
            println!("║       {reason:<16}{count:>8}                        ║");
        }
        println!("║                                                       ║");
        println!(
            "║ Output entries:       {:>8}                        ║",
            self.output_entries
        );
        println!(
            "║ Text exports:         {:>8}                        ║",
            self.artifacts.len()
        );
        match &self.output_path {
            Some(path) => println!("║ Output:   {}", path.display()),
            None => println!("║ ⚠ Nothing written (dry run mode)                      ║"),
        }
        println!("║                                                       ║");
        println!(
            "║ Total time:           {:>8.2}s                     ║",
            self.duration.as_secs_f64()
        );
        println!("╚═══════════════════════════════════════════════════════╝\n");
    }
}

/// Reads the input archive, converts it and writes the result to disk.
pub struct Pipeline {
    config: Config,
    profile: Arc<dyn AnalysisProfile>,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let profile = config.profile()?;
        Ok(Self { config, profile })
    }

    /// Executes the conversion and returns statistics.
    ///
    /// # Process
    ///
    /// 1. **Read**: loads the whole input archive in memory
    /// 2. **Convert**: filters, renames, labels and consolidates its entries
    /// 3. **Write**: stores the output archive under the output directory
    ///
    /// # Errors
    ///
    /// Returns an error if any stage fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use codetotext::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .input_path("./projet.zip")
    ///     .profile("scenario_builder")
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(input = %self.config.input_path.display(), profile = %self.config.profile_id))]
    pub fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        info!("Starting conversion");

        info!("Stage 1/3: Reading archive...");
        let read_start = Instant::now();
        let input = fs::read(&self.config.input_path)
            .map_err(|e| Error::io(&self.config.input_path, e))?;
        let read_duration = read_start.elapsed();
        info!("✓ Read {} bytes", input.len());

        info!("Stage 2/3: Converting with profile '{}'...", self.profile.id());
        let process_start = Instant::now();
        let options = ProcessOptions {
            keep_original_extension: self.config.keep_original_extension,
            exclusions: self.config.file_filter_config.clone(),
        };
        let processed = process_archive(
            &input,
            &self.config.input_name(),
            Arc::clone(&self.profile),
            &options,
        )?;
        let process_duration = process_start.elapsed();
        info!(
            "✓ Kept {} of {} files, {} content blocks, {} exports in {:.2}s",
            processed.stats.kept_files,
            processed.stats.total_files,
            processed.stats.content_blocks,
            processed.artifacts.len(),
            process_duration.as_secs_f64()
        );

        let write_start = Instant::now();
        let output_path = if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
            None
        } else {
            info!("Stage 3/3: Writing output archive...");
            let path = self.output_path(&processed.suggested_name);
            write_file_atomic(&path, &processed.bytes)?;
            info!("✓ Wrote {}", path.display());
            Some(path)
        };
        let write_duration = write_start.elapsed();

        let duration = start_time.elapsed();
        info!("✓ Conversion completed in {:.2}s", duration.as_secs_f64());

        Ok(PipelineStats {
            input: self.config.input_name(),
            profile: self.config.profile_id.clone(),
            output_entries: processed.entries.len(),
            output_bytes: processed.bytes.len(),
            name_collisions: processed.name_collisions,
            artifacts: processed.artifacts,
            walk: processed.stats,
            output_path,
            duration,
            read_duration,
            process_duration,
            write_duration,
        })
    }

    fn output_path(&self, suggested_name: &str) -> PathBuf {
        let name = if self.config.timestamped_output {
            let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
            with_timestamp(suggested_name, &timestamp)
        } else {
            suggested_name.to_string()
        };
        self.config.output_dir.join(name)
    }
}
