use crate::aligner::{create_aligner, AlignerConfig, LocalAligner};
use crate::error::{Result, SeqrepError};
use crate::orientation::is_reverse;
use crate::overhang::{extend, DEFAULT_OVERHANG};
use crate::report::{report_filename, ReportDocument, ReportFormat};
use crate::sequence::load_sequence;
use crate::sheet::{load_sheet, write_sheet, ReadRecord, SHEET_NAME};
use crate::wrap::DEFAULT_LINE_LENGTH;
use clap::Parser;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name of the output directory created inside the sequencing directory.
pub const REPORTS_DIR: &str = "reports";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "seqrep",
    version,
    about = "Pair sequencing results with the template they should be aligned to \
             and generate an alignment report for each read."
)]
pub struct Args {
    /// Path to a directory containing nothing but sequence files
    pub sequencing_dir: PathBuf,

    /// Plaintext file containing the sequence the results are aligned to
    pub template_seq: PathBuf,

    /// Only write the pairing sheet so it can be edited before generating reports
    #[arg(short, long)]
    pub edit: bool,

    /// Number of alignment characters per report line
    #[arg(short, long, default_value_t = DEFAULT_LINE_LENGTH)]
    pub line_length: usize,

    /// Bases of flanking context shown on each side of the alignment
    #[arg(short, long, default_value_t = DEFAULT_OVERHANG)]
    pub overhang: usize,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Html)]
    pub format: ReportFormat,

    /// Number of threads
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    pub line_length: usize,
    pub overhang: usize,
    pub format: ReportFormat,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            line_length: DEFAULT_LINE_LENGTH,
            overhang: DEFAULT_OVERHANG,
            format: ReportFormat::Html,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Only the pairing sheet was written (edit mode).
    SheetWritten(PathBuf),
    /// Report files, in sheet order.
    Reports(Vec<PathBuf>),
}

/// Files in the sequencing directory that are reads. Hidden files, the
/// pairing sheet and the reports directory are left out.
pub fn discover_reads(sequencing_dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(sequencing_dir).map_err(|e| SeqrepError::io(sequencing_dir, e))?;
    let mut reads = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SeqrepError::io(sequencing_dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || name == SHEET_NAME || name == REPORTS_DIR {
            log::debug!("Skipping {}", name);
            continue;
        }
        reads.push(name);
    }
    reads.sort();
    Ok(reads)
}

/// Template identifier shown in the sheet and the reports.
fn template_name(template_path: &Path) -> String {
    template_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| template_path.display().to_string())
}

/// Load every read, decide its orientation and write the pairing sheet.
pub fn prepare_sheet(
    sequencing_dir: &Path,
    reads: &[String],
    template_path: &Path,
) -> Result<Vec<ReadRecord>> {
    let template_sequence = load_sequence(template_path)?;
    let template_name = template_name(template_path);

    log::info!("Reading files in {}...", sequencing_dir.display());
    let mut records = Vec::with_capacity(reads.len());
    for filename in reads {
        let sequence = load_sequence(&sequencing_dir.join(filename))?;
        let is_reverse = is_reverse(filename);
        log::debug!(
            "{}: {} bases, {}",
            filename,
            sequence.len(),
            if is_reverse { "reverse" } else { "forward" }
        );
        records.push(ReadRecord {
            filename: filename.clone(),
            is_reverse,
            template_name: template_name.clone(),
            sequence,
            template_sequence: template_sequence.clone(),
        });
    }

    let sheet_path = sequencing_dir.join(SHEET_NAME);
    log::info!("Generating {}...", sheet_path.display());
    write_sheet(&sheet_path, &records)?;
    Ok(records)
}

/// Align one read and render its report.
pub fn process_record(
    record: &ReadRecord,
    aligner: &dyn LocalAligner,
    options: &ReportOptions,
) -> Result<String> {
    let query = if record.is_reverse {
        record.sequence.reverse_complement()
    } else {
        record.sequence.clone()
    };

    log::info!("Aligning {} to {}", record.filename, record.template_name);
    let alignment = aligner
        .align(&query, &record.template_sequence)
        .map_err(|source| SeqrepError::Alignment {
            read: record.filename.clone(),
            source,
        })?;
    log::debug!(
        "{}: read {}..={} against template {}..={}",
        record.filename,
        alignment.query_begin + 1,
        alignment.query_end + 1,
        alignment.target_begin + 1,
        alignment.target_end + 1
    );

    let extended = extend(&alignment, options.overhang);
    let document = ReportDocument::new(
        &record.filename,
        &record.template_name,
        record.is_reverse,
        &extended,
        options.line_length,
    )?;
    document.render(options.format)
}

fn create_reports_dir(sequencing_dir: &Path) -> Result<PathBuf> {
    let reports_dir = sequencing_dir.join(REPORTS_DIR);
    log::info!("Generating {}", reports_dir.display());
    fs::create_dir(&reports_dir).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => SeqrepError::ReportsExist {
            dir: sequencing_dir.to_path_buf(),
        },
        _ => SeqrepError::io(&reports_dir, e),
    })?;
    Ok(reports_dir)
}

fn write_report(path: &Path, contents: &str) -> Result<()> {
    // Two reads sharing a file stem must not overwrite each other.
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| SeqrepError::io(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| SeqrepError::io(path, e))
}

/// Report file name for every record, in sheet order. Two reads that would
/// land on the same report name are a configuration error.
fn report_filenames(records: &[ReadRecord], format: ReportFormat) -> Result<Vec<String>> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(records.len());
    let mut names = Vec::with_capacity(records.len());
    for record in records {
        let name = report_filename(&record.filename, format);
        if let Some(previous) = seen.insert(name.clone(), &record.filename) {
            return Err(SeqrepError::Config(format!(
                "{} and {} would both be reported as {}",
                previous, record.filename, name
            )));
        }
        names.push(name);
    }
    Ok(names)
}

/// Remove reports written by a failed run, then the reports directory itself.
fn remove_partial_reports(reports_dir: &Path, written: &[PathBuf]) {
    for path in written {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
    if let Err(e) = fs::remove_dir(reports_dir) {
        log::warn!("Could not remove {}: {}", reports_dir.display(), e);
    }
}

/// Create the reports directory and write one report per record.
///
/// All reads are aligned before anything is written. If any read fails, or
/// any report cannot be written, the run stops and the reports directory is
/// removed together with whatever was already written to it.
pub fn generate_reports(
    sequencing_dir: &Path,
    records: &[ReadRecord],
    aligner: &dyn LocalAligner,
    options: &ReportOptions,
    threads: usize,
) -> Result<Vec<PathBuf>> {
    let names = report_filenames(records, options.format)?;
    let reports_dir = create_reports_dir(sequencing_dir)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| SeqrepError::Config(format!("could not start {} threads: {}", threads, e)));
    let rendered = pool.and_then(|pool| {
        pool.install(|| {
            records
                .par_iter()
                .map(|record| process_record(record, aligner, options))
                .collect::<Result<Vec<String>>>()
        })
    });

    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(e) => {
            remove_partial_reports(&reports_dir, &[]);
            return Err(e);
        }
    };

    let mut written = Vec::with_capacity(records.len());
    for (name, contents) in names.iter().zip(&rendered) {
        let path = reports_dir.join(name);
        if let Err(e) = write_report(&path, contents) {
            // A failed create_new leaves nothing behind; a failed write may.
            if path.exists() {
                written.push(path);
            }
            remove_partial_reports(&reports_dir, &written);
            return Err(e);
        }
        log::debug!("Wrote {}", path.display());
        written.push(path);
    }
    log::info!("Wrote {} reports to {}", written.len(), reports_dir.display());
    Ok(written)
}

pub fn run_seqrep(args: Args) -> Result<RunOutcome> {
    let dir = args.sequencing_dir.as_path();
    if !dir.is_dir() {
        return Err(SeqrepError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    if dir.join(REPORTS_DIR).exists() {
        return Err(SeqrepError::ReportsExist {
            dir: dir.to_path_buf(),
        });
    }
    if args.line_length == 0 {
        return Err(SeqrepError::Config("--line-length must be at least 1".to_string()));
    }
    if args.threads == 0 {
        return Err(SeqrepError::Config("--threads must be at least 1".to_string()));
    }

    let options = ReportOptions {
        line_length: args.line_length,
        overhang: args.overhang,
        format: args.format,
    };
    let aligner = create_aligner(AlignerConfig {
        log_alignments: args.verbose,
        ..AlignerConfig::default()
    });

    let sheet_path = dir.join(SHEET_NAME);
    let records = if sheet_path.is_file() {
        log::info!("Using pairing sheet {}", sheet_path.display());
        load_sheet(&sheet_path)?
    } else {
        let reads = discover_reads(dir)?;
        let records = prepare_sheet(dir, &reads, &args.template_seq)?;
        if args.edit {
            log::info!(
                "Edit {} and run again to generate the reports",
                sheet_path.display()
            );
            return Ok(RunOutcome::SheetWritten(sheet_path));
        }
        records
    };

    let written = generate_reports(dir, &records, aligner.as_ref(), &options, args.threads)?;
    Ok(RunOutcome::Reports(written))
}
