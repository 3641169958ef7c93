//! Async splitting with tokio.
//!
//! Demonstrates feeding a tokio reader through `tokio_util::compat`.
//! Multiple streams are split concurrently.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io

use futures_util::StreamExt;
use recsplit::{PieceAssembler, RecordSplitter, SplitConfig, SplitError, split_async};
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create multiple data streams
    let streams: Vec<Vec<u8>> = (0..3)
        .map(|id| {
            (0..10_000)
                .flat_map(|i| format!("stream {id} line {i}\n").into_bytes())
                .collect()
        })
        .collect();

    println!("Processing {} streams concurrently...\n", streams.len());

    let handles: Vec<_> = streams
        .into_iter()
        .enumerate()
        .map(|(stream_id, data)| tokio::spawn(process_stream(stream_id, data)))
        .collect();

    // Wait for all streams to complete
    for handle in handles {
        let (stream_id, record_count, total_bytes) = handle.await??;
        println!("Stream {stream_id}: {record_count} records, {total_bytes} bytes");
    }

    Ok(())
}

async fn process_stream(stream_id: usize, data: Vec<u8>) -> Result<(usize, usize, usize), SplitError> {
    let config = SplitConfig::default().with_read_size(4096);
    let read_size = config.read_size();
    let splitter = RecordSplitter::new(PieceAssembler::new(config))?;

    // tokio::io::AsyncRead -> futures_io::AsyncRead
    let reader = std::io::Cursor::new(data).compat();
    let mut stream = split_async(reader, splitter, read_size)?;

    let mut record_count = 0;
    let mut total_bytes = 0;
    while let Some(record) = stream.next().await {
        let record = record?;
        record_count += 1;
        total_bytes += record.len();
    }

    Ok((stream_id, record_count, total_bytes))
}
