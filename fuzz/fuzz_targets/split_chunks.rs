#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use recsplit::{PieceAssembler, Record, RecordSplitter, SplitConfig, split_bytes};

fn feed(config: &SplitConfig, chunks: &[&[u8]]) -> Vec<Record> {
    let mut splitter = RecordSplitter::new(PieceAssembler::new(config.clone())).unwrap();
    let mut records = Vec::new();
    for chunk in chunks {
        records.extend(splitter.process(Bytes::copy_from_slice(chunk)).unwrap());
    }
    records.extend(splitter.finalize().unwrap());
    records
}

fuzz_target!(|input: (u8, Vec<u8>)| {
    let (step, data) = input;
    let delimiters: [&'static [u8]; 3] = [b"\n", b"\r\n", b"abab"];

    for delimiter in delimiters {
        let config = SplitConfig::new(delimiter).unwrap();
        let whole = split_bytes(data.clone(), config.clone()).unwrap();

        // Chunks never shorter than the delimiter, except the last one
        let size = (step as usize % 16).max(delimiter.len());
        let chunks: Vec<&[u8]> = data.chunks(size).collect();
        let pieces = feed(&config, &chunks);

        // Verify: chunking does not change the outcome
        assert_eq!(whole.len(), pieces.len());
        for (a, b) in whole.iter().zip(pieces.iter()) {
            assert_eq!(a.data, b.data);
            assert_eq!(a.offset, b.offset);
        }
    }
});
