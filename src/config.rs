/*!
 * Configuration handling for scopy
 */

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::utils::normalize_extension;
use crate::{bail, ensure};

/// Default header placed before each file's content
pub const DEFAULT_HEADER_FORMAT: &str = "// file: %s";

/// Placeholder replaced by the file path in the header format
pub const PATH_PLACEHOLDER: &str = "%s";

/// Format of the summary printed after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SummaryFormat {
    /// Plain `key: value` lines
    #[default]
    Plain,
    /// Rounded console tables
    Table,
    /// Stats serialised as JSON
    Json,
    /// No summary
    None,
}

/// Command-line arguments for scopy
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "scopy",
    version = env!("CARGO_PKG_VERSION"),
    disable_version_flag = true,
    about = "Smart Copy - Copy content from files with specific extensions",
    long_about = "Concatenates the content of every file with one of the given extensions \
                  under a directory, each preceded by a header line. Respects .gitignore, \
                  exclusion patterns and a maximum file size. Output goes to the clipboard \
                  on a terminal and to stdout when redirected.",
    after_help = "Examples:\n  \
        scopy go js                          Copy .go and .js files\n  \
        scopy --header-format '/* %s */' go  Customize header format\n  \
        scopy --exclude vendor,dist go js    Ignore vendor and dist directories\n  \
        scopy --max-size 500KB go            Ignore .go files larger than 500KB\n  \
        scopy --strip-comments go js         Remove comment lines\n  \
        scopy --all go                       Include dot files\n  \
        scopy --follow go                    Follow symbolic links"
)]
pub struct Args {
    /// File extensions to copy (leading dot optional, case-insensitive)
    #[clap(required_unless_present = "generate")]
    pub extensions: Vec<String>,

    /// Format of the header that precedes each file
    #[clap(
        short = 'f',
        long,
        env = "SCOPY_HEADER_FORMAT",
        default_value = DEFAULT_HEADER_FORMAT
    )]
    pub header_format: String,

    /// Patterns to exclude files/directories (comma-separated)
    #[clap(short, long, env = "SCOPY_EXCLUDE", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Maximum size of files to be included (e.g. 500, 10KB, 2MB)
    #[clap(short = 's', long, env = "SCOPY_MAX_SIZE")]
    pub max_size: Option<String>,

    /// Remove comment lines from copied files
    #[clap(short = 'c', long)]
    pub strip_comments: bool,

    /// Include files & directories beginning with a dot (.)
    #[clap(short = 'a', long = "all")]
    pub include_dot_files: bool,

    /// Follow symbolic links
    #[clap(short = 'F', long = "follow")]
    pub follow_symlinks: bool,

    /// Directory to copy from
    #[clap(short = 'C', long = "dir", env = "SCOPY_DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Stream to stdout even when it is a terminal
    #[clap(long)]
    pub stdout: bool,

    /// Summary printed on stderr after the run
    #[clap(long, value_enum, env = "SCOPY_SUMMARY", default_value_t = SummaryFormat::default())]
    pub summary: SummaryFormat,

    /// Enable debug logging
    #[clap(long)]
    pub verbose: bool,

    /// Print version
    #[clap(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Resolved run configuration, immutable for the duration of a run
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory the traversal starts from
    pub root: PathBuf,

    /// Header template with one `%s` placeholder for the path
    pub header_format: String,

    /// Substrings that exclude any path containing them
    pub exclude_patterns: Vec<String>,

    /// Maximum admitted file size in bytes, 0 for unlimited
    pub max_size: u64,

    /// Drop whole-line comments from the output
    pub strip_comments: bool,

    /// Accepted extensions, normalised (lower-case, no leading dot)
    pub extensions: Vec<String>,

    /// Keep output in memory instead of streaming it to stdout
    pub output_to_memory: bool,

    /// Admit dotfiles and descend into dot-directories
    pub include_dot_files: bool,

    /// Resolve symbolic links and walk symlinked directories
    pub follow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            header_format: DEFAULT_HEADER_FORMAT.to_string(),
            exclude_patterns: Vec::new(),
            max_size: 0,
            strip_comments: false,
            extensions: Vec::new(),
            output_to_memory: true,
            include_dot_files: false,
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments.
    ///
    /// `output_to_memory` is decided by the caller, which knows whether
    /// stdout is a terminal.
    pub fn from_args(args: &Args, output_to_memory: bool) -> Result<Self> {
        let max_size = match args.max_size.as_deref() {
            Some(size) => parse_size(size)?,
            None => 0,
        };

        Ok(Self::default()
            .with_root(args.directory.clone())
            .with_header_format(args.header_format.clone())
            .with_exclude_patterns(args.exclude.iter().cloned())
            .with_extensions(args.extensions.iter().map(String::as_str))
            .with_max_size(max_size)
            .with_strip_comments(args.strip_comments)
            .with_include_dot_files(args.include_dot_files)
            .with_follow_symlinks(args.follow_symlinks)
            .with_output_to_memory(output_to_memory))
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_header_format(mut self, format: impl Into<String>) -> Self {
        self.header_format = format.into();
        self
    }

    /// Set exclusion substrings; empty entries are dropped
    pub fn with_exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.is_empty())
            .collect();
        self
    }

    /// Set accepted extensions, normalising each one
    pub fn with_extensions<'a, I>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.extensions = extensions.into_iter().map(normalize_extension).collect();
        self
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_strip_comments(mut self, strip: bool) -> Self {
        self.strip_comments = strip;
        self
    }

    pub fn with_output_to_memory(mut self, to_memory: bool) -> Self {
        self.output_to_memory = to_memory;
        self
    }

    pub fn with_include_dot_files(mut self, include: bool) -> Self {
        self.include_dot_files = include;
        self
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Whether `ext` (already normalised) is accepted
    pub fn accepts_extension(&self, ext: &str) -> bool {
        !ext.is_empty() && self.extensions.iter().any(|e| e == ext)
    }

    /// Render the header line for `path`.
    ///
    /// The first `%s` becomes the path and `%%` renders as `%`.
    pub fn format_header(&self, path: &str) -> String {
        let mut header = String::with_capacity(self.header_format.len() + path.len());
        let mut substituted = false;
        let mut chars = self.header_format.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                header.push(c);
                continue;
            }
            match chars.peek() {
                Some('%') => {
                    chars.next();
                    header.push('%');
                }
                Some('s') if !substituted => {
                    chars.next();
                    header.push_str(path);
                    substituted = true;
                }
                _ => header.push('%'),
            }
        }

        header
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.extensions.iter().all(String::is_empty),
            Config,
            "at least one file extension is required"
        );

        ensure!(
            self.header_format.contains(PATH_PLACEHOLDER),
            Config,
            "header format {:?} has no {} placeholder",
            self.header_format,
            PATH_PLACEHOLDER
        );

        ensure!(
            self.root.is_dir(),
            Config,
            "directory not found: {}",
            self.root.display()
        );

        Ok(())
    }
}

static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d+)\s*(KB|MB|GB)?\s*$").expect("size regex is valid"));

/// Parse a size such as `500`, `10KB`, `2mb` or `1GB` into bytes.
///
/// Suffixes are binary multiples of 1024.
pub fn parse_size(size: &str) -> Result<u64> {
    let Some(caps) = SIZE_RE.captures(size) else {
        bail!(Config, "invalid size {:?}", size);
    };

    let multiplier: u64 = match caps.get(2).map(|m| m.as_str().to_ascii_uppercase()) {
        Some(unit) if unit == "KB" => 1024,
        Some(unit) if unit == "MB" => 1024 * 1024,
        Some(unit) if unit == "GB" => 1024 * 1024 * 1024,
        _ => 1,
    };

    let Ok(value) = caps[1].parse::<u64>() else {
        bail!(Config, "invalid size {:?}", size);
    };

    match value.checked_mul(multiplier) {
        Some(bytes) => Ok(bytes),
        None => bail!(Config, "size {:?} is too large", size),
    }
}
