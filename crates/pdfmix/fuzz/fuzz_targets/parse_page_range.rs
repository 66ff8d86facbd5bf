#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfmix::range::parse_page_ranges;

fuzz_target!(|data: &[u8]| {
    let Some((&total, expression)) = data.split_first() else {
        return;
    };
    let total = usize::from(total);
    let expression = String::from_utf8_lossy(expression);

    let indices = parse_page_ranges(&expression, total);

    // Every index is in bounds and appears once.
    assert!(indices.len() <= total);
    let mut seen = vec![false; total];
    for index in indices {
        assert!(index < total);
        assert!(!seen[index]);
        seen[index] = true;
    }
});
