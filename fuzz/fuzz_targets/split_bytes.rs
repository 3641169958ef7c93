#![no_main]

use libfuzzer_sys::fuzz_target;
use recsplit::{SplitConfig, split_bytes};

fuzz_target!(|data: Vec<u8>| {
    let delimiters: [&'static [u8]; 4] = [b"\n", b"\r\n", b"aab", b"<|>"];

    for delimiter in delimiters {
        // Keep the delimiter attached so the records concatenate to the input
        let config = SplitConfig::new(delimiter)
            .unwrap()
            .with_strip_delimiter(false);
        let records = split_bytes(data.clone(), config).unwrap();

        // Verify: no byte lost, duplicated or reordered
        let joined: Vec<u8> = records.iter().flat_map(|r| r.data.iter().copied()).collect();
        assert_eq!(joined, data);

        // Verify: offsets are contiguous
        let mut expected_offset = 0u64;
        for record in &records {
            assert_eq!(record.offset, expected_offset);
            expected_offset += record.len() as u64;
        }

        // Verify: only the last record may lack the delimiter
        for (i, record) in records.iter().enumerate() {
            if i + 1 < records.len() {
                assert!(record.data.ends_with(delimiter));
            }
        }
    }
});
