#![no_main]

use libfuzzer_sys::fuzz_target;
use md_blocks::{check_list_depths, parse, serialize};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let blocks = parse(&input);
    assert!(check_list_depths(&blocks).is_ok());
    let output = serialize(&blocks);
    let _ = parse(&output);
});
