/*!
 * Output sinks for aggregated content
 */

use std::fmt;
use std::io::{self, Write};

/// Destination of the aggregated lines.
///
/// Lines are handed over one at a time; nothing is held back for a
/// final flush, so memory use of the streaming sink does not grow with
/// file size.
pub enum OutputSink {
    /// Growable in-memory buffer
    Memory(String),
    /// Pass-through writer, normally the process's stdout
    Stream(Box<dyn Write>),
}

impl OutputSink {
    /// An empty in-memory buffer
    pub fn memory() -> Self {
        Self::Memory(String::new())
    }

    /// Pass-through to the process's standard output
    pub fn stdout() -> Self {
        Self::Stream(Box::new(io::stdout()))
    }

    /// Pass-through to an arbitrary writer
    pub fn stream<W: Write + 'static>(writer: W) -> Self {
        Self::Stream(Box::new(writer))
    }

    /// Append one line, terminated with `\n`
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            Self::Memory(buf) => {
                buf.push_str(line);
                buf.push('\n');
                Ok(())
            }
            Self::Stream(writer) => {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")
            }
        }
    }

    /// Flush a streaming sink; no-op for memory
    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Stream(writer) => writer.flush(),
        }
    }

    /// Drop whatever an in-memory buffer holds
    pub fn clear(&mut self) {
        if let Self::Memory(buf) = self {
            buf.clear();
        }
    }

    /// Buffered text, `None` for streaming sinks
    pub fn contents(&self) -> Option<&str> {
        match self {
            Self::Memory(buf) => Some(buf),
            Self::Stream(_) => None,
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(buf) => f.debug_tuple("Memory").field(&buf.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
        }
    }
}
