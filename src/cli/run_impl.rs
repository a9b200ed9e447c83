use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use yamlsort::{codec, report, sorter};

use super::Args;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Output {
    Stdout,
    File(PathBuf),
    /// Replace this file once the sorted document is fully encoded.
    InPlace(PathBuf),
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn plan(args: &Args) -> (Input, Output) {
    if let Some(ref path) = args.in_place {
        return (Input::File(path.clone()), Output::InPlace(path.clone()));
    }
    let input = match args.infile {
        Some(ref p) if !is_stdio(p) => Input::File(p.clone()),
        _ => Input::Stdin,
    };
    let output = match args.outfile {
        Some(ref p) if !is_stdio(p) => Output::File(p.clone()),
        _ => Output::Stdout,
    };
    (input, output)
}

pub fn run_with_args(args: &Args) -> Result<()> {
    let (input, output) = plan(args);
    debug!(?input, ?output, "resolved input and output");

    let doc = match input {
        Input::Stdin => codec::decode_reader(io::stdin().lock())?,
        Input::File(ref path) => {
            let file = File::open(path)
                .with_context(|| format!("open input file: {}", path.display()))?;
            codec::decode_reader(BufReader::new(file))
                .with_context(|| format!("read {}", path.display()))?
        }
    };

    let sorted = sorter::sort(doc)?;
    for w in &sorted.warnings {
        warn!(path = %w.path, kind = %w.kind, "value left unsorted");
    }
    info!(warnings = sorted.warnings.len(), "sorted document");

    // Encode everything before touching the destination.
    let mut text = String::new();
    if args.annotate {
        text.push_str(&report::comments(&sorted.warnings));
    }
    text.push_str(&codec::encode_string(&sorted.document)?);

    match output {
        Output::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .context("write sorted yaml to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
        Output::File(ref path) => {
            fs::write(path, &text)
                .with_context(|| format!("write output file: {}", path.display()))?;
        }
        Output::InPlace(ref path) => replace_file(path, &text)?,
    }
    debug!("done");
    Ok(())
}

/// Writes `contents` to a temp file next to `path` and renames it over `path`.
/// The original keeps its contents if anything fails before the rename.
fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let perms = fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .permissions();

    let mut tmp = tempfile::Builder::new()
        .prefix(".yamlsort-")
        .suffix(".yaml")
        .tempfile_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .context("write temp file")?;
    tmp.as_file().sync_all().context("sync temp file")?;
    fs::set_permissions(tmp.path(), perms).context("copy permissions to temp file")?;

    debug!(tmp = %tmp.path().display(), target = %path.display(), "replacing file");
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
