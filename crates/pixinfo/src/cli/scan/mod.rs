//! The `pixinfo scan`, `pixinfo files` and `pixinfo folder` commands.

mod report;
pub mod types;

pub use report::Reporter;
pub use types::OutputFormat;

use clap::Args;
use pixinfo_core::config::ProcessingConfig;
use pixinfo_core::{
    CollectInput, Config, DirectoryPicker, Entry, FileHandle, ImageRecord, Inspector,
    OutputFormat as CoreOutputFormat, OutputWriter, PathPicker, RunOutcome, RunStats,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::picker::PromptPicker;

/// Output options shared by the inspection commands.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputArgs {
    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl OutputArgs {
    /// The flag if given, otherwise the configured format.
    pub fn resolve_format(&self, config: &Config) -> CoreOutputFormat {
        match self.format {
            Some(format) => format.into(),
            None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Table),
        }
    }
}

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Files or folders to inspect
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `files` command.
#[derive(Args, Debug)]
pub struct FilesArgs {
    /// Files to inspect; non-image names are skipped
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `folder` command.
#[derive(Args, Debug)]
pub struct FolderArgs {
    /// Folder to inspect; prompts for one when omitted
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute the scan command: paths behave like dropped entries.
pub async fn scan(args: ScanArgs, config: Config) -> anyhow::Result<()> {
    let entries = entries_from_paths(&args.paths, &config.processing);
    let inspector = Inspector::new(config);

    let start = Instant::now();
    let outcome = inspector
        .inspect(CollectInput::Entries(entries), &mut Reporter::new())
        .await;
    finish(inspector.config(), outcome, start.elapsed(), &args.output)
}

/// Execute the files command: a flat list, filtered by name only.
pub async fn files(args: FilesArgs, config: Config) -> anyhow::Result<()> {
    let handles = handles_from_paths(&args.files);
    let inspector = Inspector::new(config);

    let start = Instant::now();
    let outcome = inspector
        .inspect(CollectInput::Files(handles), &mut Reporter::new())
        .await;
    finish(inspector.config(), outcome, start.elapsed(), &args.output)
}

/// Execute the folder command: direct image children of one folder.
pub async fn folder(args: FolderArgs, config: Config) -> anyhow::Result<()> {
    let picker: Box<dyn DirectoryPicker> = match &args.dir {
        Some(dir) => Box::new(PathPicker::new(dir, &config.processing)),
        None => Box::new(PromptPicker::new(&config.processing)),
    };
    let inspector = Inspector::new(config);

    let start = Instant::now();
    let outcome = inspector
        .select_folder(picker.as_ref(), &mut Reporter::new())
        .await?;
    finish(inspector.config(), outcome, start.elapsed(), &args.output)
}

/// Turn command-line paths into dropped entries.
pub fn entries_from_paths(paths: &[PathBuf], config: &ProcessingConfig) -> Vec<Entry> {
    paths
        .iter()
        .map(|path| Entry::from_path(path, config))
        .collect()
}

/// Turn command-line paths into file handles, skipping anything that isn't a file.
pub fn handles_from_paths(paths: &[PathBuf]) -> Vec<FileHandle> {
    paths
        .iter()
        .filter(|path| {
            let is_file = path.is_file();
            if !is_file {
                tracing::warn!("Skipping {:?}: not a file", path);
            }
            is_file
        })
        .map(FileHandle::from_path)
        .collect()
}

fn finish(
    config: &Config,
    outcome: RunOutcome,
    elapsed: Duration,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    match outcome {
        RunOutcome::Completed(records) => {
            let format = output.resolve_format(config);
            let pretty = output.pretty || config.output.pretty;
            write_records(&records, format, output.output.as_deref(), pretty)?;
            print_summary(&RunStats::from_records(&records, elapsed));
        }
        RunOutcome::NoImages => tracing::warn!("No image files found"),
        RunOutcome::Cancelled => tracing::info!("Folder selection cancelled"),
    }
    Ok(())
}

/// Write records to a file, or to stdout when no path is given.
pub(crate) fn write_records(
    records: &[ImageRecord],
    format: CoreOutputFormat,
    path: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = OutputWriter::new(BufWriter::new(file), format, pretty);
            writer.write_all(records)?;
            writer.flush()?;
            tracing::info!("Output written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = OutputWriter::new(stdout.lock(), format, pretty);
            writer.write_all(records)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Print a formatted summary after a run.
pub(crate) fn print_summary(stats: &RunStats) {
    let rate = if stats.elapsed_seconds > 0.0 {
        stats.processed as f64 / stats.elapsed_seconds
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Processed:    {:>8}", stats.processed);
    if stats.dimension_failures > 0 {
        eprintln!("    No size:      {:>8}", stats.dimension_failures);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", stats.elapsed_seconds);
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_flag_overrides_config() {
        let mut config = Config::default();
        config.output.format = "jsonl".to_string();

        let args = OutputArgs::default();
        assert_eq!(args.resolve_format(&config), CoreOutputFormat::JsonLines);

        let args = OutputArgs {
            format: Some(OutputFormat::Json),
            ..OutputArgs::default()
        };
        assert_eq!(args.resolve_format(&config), CoreOutputFormat::Json);
    }

    #[test]
    fn handles_skip_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("a.png");
        std::fs::write(&image, b"x").unwrap();

        let handles = handles_from_paths(&[
            image.clone(),
            dir.path().join("missing.png"),
            dir.path().to_path_buf(),
        ]);
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].name(), "a.png");
    }

    #[test]
    fn entries_keep_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("z.png"), b"x").unwrap();
        let entries = entries_from_paths(
            &[dir.path().join("z.png"), dir.path().to_path_buf()],
            &ProcessingConfig::default(),
        );
        assert!(matches!(entries[0], Entry::File(_)));
        assert!(matches!(entries[1], Entry::Directory(_)));
    }

    #[tokio::test]
    async fn scan_writes_jsonl_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        std::fs::create_dir(&images).unwrap();
        std::fs::write(images.join("broken.png"), b"not a png").unwrap();
        std::fs::write(images.join("notes.txt"), b"skip").unwrap();
        let out = dir.path().join("out.jsonl");

        let args = ScanArgs {
            paths: vec![images],
            output: OutputArgs {
                format: Some(OutputFormat::Jsonl),
                output: Some(out.clone()),
                pretty: false,
            },
        };
        scan(args, Config::default()).await.unwrap();

        let written = std::fs::read_to_string(out).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["name"], "broken.png");
        assert_eq!(value["compression"], "PNG");
        assert_eq!(value["color_depth"], 32);
    }
}
