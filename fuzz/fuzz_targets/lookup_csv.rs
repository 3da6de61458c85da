#![no_main]

use libfuzzer_sys::fuzz_target;
use flowtag_tagger::LookupTable;

fuzz_target!(|data: &[u8]| {
    if let Ok(table) = LookupTable::from_reader(data) {
        for (key, tag) in table.iter() {
            assert_eq!(key.port(), key.port().trim());
            assert_eq!(tag, tag.trim().to_lowercase());
        }
    }
});
