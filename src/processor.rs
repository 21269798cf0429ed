/*!
 * Two-pass aggregation of selected files
 *
 * The first pass only counts admitted files. The second pass streams
 * each admitted file into the sink, using that count to leave out the
 * blank separator after the last file. Both passes apply the same
 * selection policy to independent walks of the tree.
 */

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::debug;

use crate::comments::is_line_comment;
use crate::config::Config;
use crate::error::{Result, ScopyError};
use crate::filter::{Selector, Verdict};
use crate::gitignore::IgnoreRules;
use crate::types::Stats;
use crate::walker::{WalkAction, Walker};
use crate::writer::OutputSink;

/// Aggregates the content of selected files into one output
pub struct Processor {
    /// Run configuration
    config: Config,
    /// Where output lines go
    sink: OutputSink,
    /// Stats of the last successful run
    stats: Stats,
    /// Progress bar, hidden unless one is supplied
    progress: Arc<ProgressBar>,
}

impl Processor {
    /// Create a processor whose sink follows `config.output_to_memory`
    pub fn new(config: Config) -> Self {
        let sink = if config.output_to_memory {
            OutputSink::memory()
        } else {
            OutputSink::stdout()
        };

        Self {
            config,
            sink,
            stats: Stats::default(),
            progress: Arc::new(ProgressBar::hidden()),
        }
    }

    /// Replace the output sink
    pub fn with_sink(mut self, sink: OutputSink) -> Self {
        self.sink = sink;
        self
    }

    /// Report progress on `progress`
    pub fn with_progress(mut self, progress: Arc<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    /// Stats of the last successful run
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Aggregated text of the last run; empty for streaming sinks
    pub fn output(&self) -> &str {
        self.sink.contents().unwrap_or_default()
    }

    /// Aggregate every admitted file under `root`.
    ///
    /// Any error aborts the run; lines already written to a streaming
    /// sink stay written.
    pub fn process(&mut self, root: &Path) -> Result<Stats> {
        let ignore = IgnoreRules::load_from_root(root)?;
        let selector = Selector::new(&self.config, &ignore);
        let walker = Walker::new(self.config.follow_symlinks);

        let total = count_admitted(&walker, &selector, root)?;
        debug!("counting pass admitted {} files under {}", total, root.display());
        self.progress.set_length(total as u64);

        self.sink.clear();
        let mut stats = Stats::default();
        let mut index = 0;

        walker.walk(root, |entry| match selector.verdict(entry) {
            Verdict::Prune => Ok(WalkAction::SkipSubtree),
            Verdict::Skip(_) => Ok(WalkAction::Continue),
            Verdict::Admit { ext } => {
                stats.record_file(&ext, entry.size);
                index += 1;

                self.progress.set_message(entry.path.display().to_string());
                append_file(
                    &self.config,
                    &mut self.sink,
                    &mut stats,
                    &entry.path,
                    index < total,
                )?;
                self.progress.inc(1);

                Ok(WalkAction::Continue)
            }
        })?;

        self.sink.flush()?;
        debug!(
            "content pass wrote {} files, {} lines",
            stats.total_files, stats.total_lines
        );

        self.stats = stats.clone();
        Ok(stats)
    }
}

fn count_admitted(walker: &Walker, selector: &Selector<'_>, root: &Path) -> Result<usize> {
    let mut count = 0;
    walker.walk(root, |entry| {
        Ok(match selector.verdict(entry) {
            Verdict::Admit { .. } => {
                count += 1;
                WalkAction::Continue
            }
            Verdict::Skip(_) => WalkAction::Continue,
            Verdict::Prune => WalkAction::SkipSubtree,
        })
    })?;
    Ok(count)
}

/// Write the header, the (possibly comment-stripped) lines and, unless
/// this is the last file, one blank separator line.
fn append_file(
    config: &Config,
    sink: &mut OutputSink,
    stats: &mut Stats,
    path: &Path,
    separator: bool,
) -> Result<()> {
    let read_error = |source| ScopyError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut reader = BufReader::new(file);

    sink.write_line(&config.format_header(&path.to_string_lossy()))?;
    stats.total_lines += 1;

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(read_error)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(trim_line_ending(&buf));
        if config.strip_comments && is_line_comment(&line) {
            stats.comments_removed += 1;
            continue;
        }

        sink.write_line(&line)?;
        stats.total_lines += 1;
    }

    if separator {
        sink.write_line("")?;
        stats.total_lines += 1;
    }

    Ok(())
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending(b"code\n"), b"code");
        assert_eq!(trim_line_ending(b"code\r\n"), b"code");
        assert_eq!(trim_line_ending(b"last"), b"last");
        assert_eq!(trim_line_ending(b"\n"), b"");
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let config = Config::default();
        let mut sink = OutputSink::memory();
        let mut stats = Stats::default();

        let err = append_file(
            &config,
            &mut sink,
            &mut stats,
            Path::new("/nonexistent/scopy/a.go"),
            false,
        )
        .unwrap_err();

        assert!(matches!(err, ScopyError::Read { .. }));
        assert_eq!(sink.contents(), Some(""));
    }
}
