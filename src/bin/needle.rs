//! Print the byte offset of every occurrence of a pattern in a file.

use std::{
    cmp,
    fs::File,
    io::{self, BufWriter, ErrorKind, Read, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use memchr::memmem;

use spinney::Array;

/// Print the 0-based byte offset of every occurrence of a pattern in a file, one per line.
///
/// The file is streamed in bounded reads, so arbitrarily large inputs are fine; occurrences
/// that cross a read boundary are still found, and occurrences may overlap each other.
#[derive(Debug, clap::Parser)]
struct Args {
    /// File to scan
    file: PathBuf,

    /// Pattern to look for
    pattern: String,

    /// Read size in bytes; never used below the pattern length
    #[arg(long, default_value_t = 64 * 1024)]
    chunk: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut env = env_logger::Env::default();
    if args.verbose {
        env = env.default_filter_or("debug");
    }
    env_logger::Builder::from_env(env).init();

    anyhow::ensure!(!args.pattern.is_empty(), "the pattern must not be empty");

    let file = File::open(&args.file)
        .with_context(|| format!("cannot open {}", args.file.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    scan(file, args.pattern.as_bytes(), args.chunk, &mut out)
        .with_context(|| format!("cannot scan {}", args.file.display()))?;

    out.flush()?;
    Ok(())
}

// Report every occurrence of `pattern` in `input`, one 0-based byte offset per line, ascending.
//
// The scan keeps a window holding the last `pattern.len() - 1` bytes of what came before the
// current read. The carry alone is one byte too short for a full occurrence, so every match in
// the window ends in the newly read bytes: each occurrence is reported exactly once, including
// the ones straddling a read boundary. Overlapping occurrences are all found because the search
// resumes one byte past the start of each match.
fn scan<R, W>(mut input: R, pattern: &[u8], chunk: usize, out: &mut W) -> io::Result<()>
where
    R: Read,
    W: Write,
{
    debug_assert!(!pattern.is_empty());

    let finder = memmem::Finder::new(pattern);
    let keep = pattern.len() - 1;

    let chunk = cmp::max(chunk, pattern.len());
    let mut buf = vec![0u8; chunk];

    // `base` is the offset of window[0] within the whole input
    let mut window: Array<u8> = Array::new();
    let mut base: u64 = 0;

    loop {
        let got = match input.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(got) => got,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        log::debug!("read {} bytes at offset {}", got, base + window.len() as u64);
        window.extend(buf[..got].iter().copied());

        let mut from = 0;
        while let Some(found) = finder.find(&window.as_slice()[from..]) {
            let at = from + found;
            writeln!(out, "{}", base + at as u64)?;
            from = at + 1;
        }

        // Carry only the bytes a future occurrence could still start in
        if window.len() > keep {
            let cut = window.len() - keep;
            window.erase_range(0..cut);
            base += cut as u64;
        }
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
fn offsets(haystack: &[u8], pattern: &str, chunk: usize) -> Vec<u64> {
    let mut out = Vec::new();
    scan(io::Cursor::new(haystack), pattern.as_bytes(), chunk, &mut out).unwrap();

    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| line.parse().unwrap())
        .collect()
}

#[test]
// Occurrences within one read are reported in order
fn test_scan_basic() {
    assert_eq!(offsets(b"hello world hello", "hello", 1024), vec![0, 12]);
    assert_eq!(offsets(b"hello world hello", "o w", 1024), vec![4]);
}

#[test]
// An occurrence crossing a read boundary is still found
fn test_scan_straddle() {
    assert_eq!(offsets(b"xxxabcxx", "abc", 4), vec![3]);
    assert_eq!(offsets(b"abcdefgh", "cdef", 4), vec![2]);
}

#[test]
// An occurrence ending exactly on a read boundary is reported once, not twice
fn test_scan_boundary_end() {
    assert_eq!(offsets(b"xxabyyyy", "ab", 4), vec![2]);
}

#[test]
// Overlapping occurrences are all reported
fn test_scan_overlapping() {
    assert_eq!(offsets(b"aaaa", "aa", 2), vec![0, 1, 2]);
    assert_eq!(offsets(b"abababa", "aba", 3), vec![0, 2, 4]);
}

#[test]
// A pattern longer than the input never matches, and the read size is floored to fit it
fn test_scan_pattern_longer() {
    assert_eq!(offsets(b"ab", "abc", 1), Vec::<u64>::new());
    assert_eq!(offsets(b"abcabc", "abc", 1), vec![0, 3]);
}

#[test]
// A pattern covering the whole input matches at zero
fn test_scan_whole_input() {
    assert_eq!(offsets(b"needle", "needle", 4), vec![0]);
}

#[test]
// An empty input yields nothing
fn test_scan_empty_input() {
    assert_eq!(offsets(b"", "x", 16), Vec::<u64>::new());
}
