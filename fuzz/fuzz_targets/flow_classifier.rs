#![no_main]

use libfuzzer_sys::fuzz_target;
use flowtag_tagger::{LookupRow, LookupTable, RecordClassifier};

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let table = LookupTable::build([LookupRow::new("443", "tcp", "web")]);
        let classifier = RecordClassifier::new(&table);
        if let Ok(result) = classifier.classify(line) {
            assert!(!result.tag.is_empty());
            assert_eq!(result.port(), result.port().trim());
        }
    }
});
