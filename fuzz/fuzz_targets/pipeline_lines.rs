#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use flowtag_tagger::{LookupRow, LookupTable, TaggerConfigBuilder, TaggingPipeline};

#[derive(Debug, Arbitrary)]
struct Input {
    lines: Vec<String>,
    workers: u8,
}

fuzz_target!(|input: Input| {
    let table = LookupTable::build([
        LookupRow::new("443", "tcp", "web"),
        LookupRow::new("53", "udp", "dns"),
    ]);

    let sequential = TaggingPipeline::new(&table, Default::default()).run(&input.lines);
    assert!(sequential.is_consistent());

    let workers = usize::from(input.workers % 8) + 1;
    if let Ok(config) = TaggerConfigBuilder::new().workers(workers).build() {
        let partitioned = TaggingPipeline::new(&table, config).run_partitioned(&input.lines);
        assert_eq!(partitioned, sequential);
    }
});
