//! Split a file into lines, grouping indented continuation lines.
//!
//! Run with:
//!     cargo run --example sync_file -- <path>

use std::fs::File;

use recsplit::{GroupingAssembler, RecordSplitter, SplitConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: sync_file <path>")?;

    let config = SplitConfig::default().with_skip_empty(true);
    let read_size = config.read_size();

    // A line starting with whitespace continues the previous entry
    let assembler = GroupingAssembler::new(config, |piece: &[u8]| {
        !piece.first().is_some_and(u8::is_ascii_whitespace)
    });
    let splitter = RecordSplitter::new(assembler)?;

    let mut entries = 0;
    let mut largest = 0;
    for record in splitter.split(File::open(&path)?, read_size)? {
        let record = record?;
        entries += 1;
        largest = largest.max(record.len());
        if record.pieces > 1 {
            println!("{record}");
        }
    }

    println!("\n{path}: {entries} entries, largest {largest} bytes");
    Ok(())
}
