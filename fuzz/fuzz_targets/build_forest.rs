#![no_main]

use libfuzzer_sys::fuzz_target;
use thicket_core::export::parse_export;
use thicket_core::graph::{BuildError, RowOptions, build_forest};

// Arbitrary export bytes must either fail to parse, fail with a closed
// cycle path, or yield a forest whose rows and stats stay consistent.
fuzz_target!(|data: &[u8]| {
    let Ok(issues) = parse_export(data) else {
        return;
    };

    match build_forest(&issues) {
        Ok(mut forest) => {
            let stats = forest.stats();
            assert_eq!(stats.roots, forest.roots().len());
            assert!(stats.total <= issues.len());

            forest.collapse_all();
            assert_eq!(forest.rows(RowOptions::default()).len(), forest.roots().len());
            // Fully expanded rows can grow with the number of paths, so only
            // the flags are checked here.
            forest.expand_all();
            assert!(forest.nodes().all(|(_, n)| n.is_expanded() == n.has_children()));
        }
        Err(BuildError::Cycle(cycle)) => {
            assert!(cycle.path.len() >= 2);
            assert_eq!(cycle.path.first(), cycle.path.last());
        }
    }
});
