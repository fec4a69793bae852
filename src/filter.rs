use parking_lot::{Once, RwLock};
use std::collections::HashMap;
use std::io::{self, Write};

/// A per-level line rewrite, e.g. a terminal colorizer. Receives one whole
/// line (trailing newline included) and returns the bytes to forward.
pub type Transform = Box<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;

/// An [`io::Write`] that sits in front of a sink and drops log lines tagged
/// below a minimum severity.
///
/// Severity is read from the first bracketed token of each line, e.g.
/// `"[WARN] disk nearly full"`. Levels are positional: the label at index 0
/// of the configured list is the least severe. Lines that carry no tag, or a
/// tag that was never declared, pass through unmodified — continuation lines
/// and untagged diagnostics must not be silently lost.
///
/// ```no_run
/// use log_sieve::LevelFilter;
/// use std::io;
///
/// let filter = LevelFilter::new(io::stderr())
///     .with_levels(["DEBUG", "WARN", "ERROR"])
///     .with_min_level("WARN");
/// ```
pub struct LevelFilter<W> {
    levels: Vec<String>,
    transforms: Vec<Option<Transform>>,
    sink: W,
    table: RwLock<Table>,
    init: Once,
}

/// Derived lookup state: the threshold plus the label map built from it.
/// Always rebuilt in full and swapped under the write guard, so concurrent
/// readers never see a half-updated map.
struct Table {
    min_level: String,
    entries: HashMap<Vec<u8>, LevelEntry>,
}

#[derive(Debug, Clone, Copy)]
struct LevelEntry {
    enabled: bool,
    /// Index into `LevelFilter::transforms`; recorded only when a transform
    /// is registered at that position.
    transform: Option<usize>,
}

enum Verdict {
    Forward,
    Rewrite(usize),
    Drop,
}

impl<W> LevelFilter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            levels: Vec::new(),
            transforms: Vec::new(),
            sink,
            table: RwLock::new(Table {
                min_level: String::new(),
                entries: HashMap::new(),
            }),
            init: Once::new(),
        }
    }

    /// Severity labels from least to most severe, e.g.
    /// `["DEBUG", "WARN", "ERROR"]`. Labels are case-sensitive and compared
    /// byte-for-byte against the extracted tag.
    pub fn with_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = levels.into_iter().map(Into::into).collect();
        self
    }

    /// Transforms aligned positionally with the level list. The list may be
    /// shorter than the levels (or empty); unmatched levels forward their
    /// lines unmodified.
    pub fn with_transforms(mut self, transforms: Vec<Option<Transform>>) -> Self {
        self.transforms = transforms;
        self
    }

    /// The lowest severity allowed through. A label that does not appear in
    /// the level list disables filtering entirely.
    pub fn with_min_level(mut self, min_level: impl Into<String>) -> Self {
        self.table.get_mut().min_level = min_level.into();
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Reports whether `line` would currently be forwarded to the sink,
    /// without writing it. Shares the write path's extraction and lookup, so
    /// the two cannot disagree; callers use this to skip formatting work for
    /// lines that will be dropped anyway.
    pub fn check(&self, line: &[u8]) -> bool {
        !matches!(self.verdict(line), Verdict::Drop)
    }

    /// Replaces the minimum level and rebuilds the lookup table before
    /// returning; subsequent writes observe the new threshold immediately.
    ///
    /// Not safe to call concurrently with itself or with the very first
    /// write without external synchronization. Concurrent [`check`] calls
    /// are fine: the new table is built off to the side and published in one
    /// swap under the write guard.
    ///
    /// [`check`]: LevelFilter::check
    pub fn set_min_level(&self, min_level: impl Into<String>) {
        let min_level = min_level.into();
        let entries = self.build_entries(&min_level);
        {
            let mut table = self.table.write();
            table.min_level = min_level;
            table.entries = entries;
        }
        // Mark initialization done so a later first write cannot rebuild
        // over an explicit update.
        self.init.call_once(|| {});
    }

    fn ensure_table(&self) {
        self.init.call_once(|| {
            let mut table = self.table.write();
            let min_level = table.min_level.clone();
            table.entries = self.build_entries(&min_level);
        });
    }

    /// Builds the full label → (enabled, transform) map from scratch.
    /// Labels ordered below the threshold are disabled; a threshold absent
    /// from the level list leaves every label enabled.
    fn build_entries(&self, min_level: &str) -> HashMap<Vec<u8>, LevelEntry> {
        let mut entries = HashMap::with_capacity(self.levels.len());
        for (i, level) in self.levels.iter().enumerate() {
            let transform = match self.transforms.get(i) {
                Some(Some(_)) => Some(i),
                _ => None,
            };
            entries.insert(
                level.clone().into_bytes(),
                LevelEntry {
                    enabled: true,
                    transform,
                },
            );
        }
        if let Some(cutoff) = self.levels.iter().position(|l| l == min_level) {
            for level in &self.levels[..cutoff] {
                if let Some(entry) = entries.get_mut(level.as_bytes()) {
                    entry.enabled = false;
                }
            }
        }
        entries
    }

    fn verdict(&self, line: &[u8]) -> Verdict {
        self.ensure_table();
        let Some(tag) = extract_tag(line) else {
            return Verdict::Forward;
        };
        match self.table.read().entries.get(tag) {
            None => Verdict::Forward,
            Some(entry) if !entry.enabled => Verdict::Drop,
            Some(entry) => match entry.transform {
                Some(i) => Verdict::Rewrite(i),
                None => Verdict::Forward,
            },
        }
    }
}

impl<W: std::fmt::Debug> std::fmt::Debug for LevelFilter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelFilter")
            .field("levels", &self.levels)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

impl<W: Write> Write for LevelFilter<W> {
    /// Expects one complete log line per call, which line-oriented logging
    /// frontends guarantee.
    ///
    /// Dropped lines report the full input length with nothing forwarded, so
    /// callers never see a short write or an error caused by filtering
    /// alone. When a transform grows or shrinks the line, the transformed
    /// bytes go to the sink but the reported count stays `line.len()`, per
    /// the `io::Write` contract.
    fn write(&mut self, line: &[u8]) -> io::Result<usize> {
        match self.verdict(line) {
            Verdict::Drop => Ok(line.len()),
            Verdict::Forward => {
                self.sink.write_all(line)?;
                Ok(line.len())
            }
            Verdict::Rewrite(i) => {
                match self.transforms.get(i).and_then(Option::as_ref) {
                    Some(transform) => self.sink.write_all(&transform(line))?,
                    None => self.sink.write_all(line)?,
                }
                Ok(line.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// Extracts the severity tag: the bytes strictly between the first `[` and
/// the first `]` after it. Single forward scan; the first close bracket wins
/// regardless of nesting. Returns `None` when either bracket is missing.
fn extract_tag(line: &[u8]) -> Option<&[u8]> {
    let open = line.iter().position(|&b| b == b'[')?;
    let close = line[open..].iter().position(|&b| b == b']')?;
    Some(&line[open + 1..open + close])
}
