//! Reads lines from stdin and prints the unique ones in sorted order
//!
//! `printf 'b\na\nb\n' | cargo run --bin sort_lines`

use std::io::{self, BufRead, Write};

use log::{debug, LevelFilter};
use testcrate::{init_logging, LineSorter};

fn main() -> io::Result<()> {
    init_logging(LevelFilter::Warn);
    let mut sorter = LineSorter::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !sorter
            .push(&line)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
        {
            debug!("skipping duplicate {line:?}");
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Sorted lines:")?;
    for line in sorter.into_sorted() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
