#![no_main]

use libfuzzer_sys::fuzz_target;
use work_impact_git::commit::enrich;
use work_impact_git::parser::parse_log;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let commits = parse_log(&raw);
    for commit in &commits {
        let added = commit
            .files
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.lines_added));
        assert_eq!(commit.lines_added, added);
        assert_eq!(commit.files_changed, commit.files.len());
    }
    let _ = std::hint::black_box(enrich(commits));
});
