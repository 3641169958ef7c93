//! Basic push-based splitting example.
//!
//! Run with:
//!     cargo run --example sync_basic

use bytes::Bytes;
use recsplit::{PieceAssembler, RecordSplitter, SplitConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create some sample data: CRLF-framed lines
    let data: Vec<u8> = (0..1_000)
        .flat_map(|i| format!("event={i} status=ok\r\n").into_bytes())
        .collect();

    let config = SplitConfig::new(&b"\r\n"[..])?;
    let mut splitter = RecordSplitter::new(PieceAssembler::new(config))?;

    println!("Splitting {} bytes of data...\n", data.len());

    let mut total_records = 0;
    let mut total_bytes = 0;

    // Simulate streaming data in small batches that cut lines apart
    let batch_size = 100;
    for batch in data.chunks(batch_size) {
        for record in splitter.process(Bytes::copy_from_slice(batch))? {
            total_records += 1;
            total_bytes += record.len();
            if total_records <= 5 {
                println!("{record}: {}", String::from_utf8_lossy(&record.data));
            }
        }
    }

    // Finalize stream
    for record in splitter.finalize()? {
        total_records += 1;
        total_bytes += record.len();
    }

    println!("\nTotal: {total_records} records, {total_bytes} payload bytes");
    if total_records > 0 {
        println!("Average record size: {} bytes", total_bytes / total_records);
    }

    Ok(())
}
