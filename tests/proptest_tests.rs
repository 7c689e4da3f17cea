//! Property-based tests for the containment and matching invariants.

mod common;

use proptest::prelude::*;
use tempfile::TempDir;
use unpak::Extractor;

use common::zip_files;

/// Strategy for benign path components: no separators, no dots-only names.
fn component() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,11}".prop_filter("no traversal tokens", |s| {
        s != "." && s != ".."
    })
}

/// Strategy for arbitrary hostile-ish names.
fn wild_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./\\\\-]{1,40}"
}

proptest! {
    /// Containment: every file an accepted archive produces lies strictly
    /// inside the destination.
    #[test]
    fn prop_extracted_files_stay_inside_root(
        parts in prop::collection::vec(component(), 1..5),
        payload in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let name = parts.join("/");
        let archive = zip_files(&[(&name, payload.as_slice())]);
        let dest = TempDir::new().unwrap();

        let report = Extractor::new(dest.path()).extract_zip_bytes(&archive).unwrap();
        prop_assert_eq!(report.files_extracted, 1);

        let target = dest.path().join(&name);
        let canonical = target.canonicalize().unwrap();
        let root = dest.path().canonicalize().unwrap();
        prop_assert!(canonical.starts_with(&root));
        prop_assert!(canonical != root);
    }

    /// Soundness: whatever the name, extraction either succeeds with the
    /// file inside the root, or fails without writing outside it.
    #[test]
    fn prop_no_name_escapes_the_sandbox(
        name in wild_name(),
        payload in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let sandbox = TempDir::new().unwrap();
        let dest = sandbox.path().join("dest");
        std::fs::create_dir(&dest).unwrap();

        let archive = zip_files(&[(&name, payload.as_slice())]);
        let _ = Extractor::new(&dest).extract_zip_bytes(&archive);

        // Nothing may appear in the sandbox outside dest/.
        for entry in std::fs::read_dir(sandbox.path()).unwrap() {
            let entry = entry.unwrap();
            prop_assert_eq!(entry.file_name(), "dest");
        }
    }

    /// The report's byte counter always equals the bytes on disk.
    #[test]
    fn prop_report_bytes_match_disk(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..512), 1..4),
    ) {
        let names: Vec<String> = (0..payloads.len()).map(|i| format!("f{}", i)).collect();
        let entries: Vec<(&str, &[u8])> = names
            .iter()
            .map(|n| n.as_str())
            .zip(payloads.iter().map(|p| p.as_slice()))
            .collect();
        let archive = zip_files(&entries);

        let dest = TempDir::new().unwrap();
        let report = Extractor::new(dest.path()).extract_zip_bytes(&archive).unwrap();

        let expected: u64 = payloads.iter().map(|p| p.len() as u64).sum();
        prop_assert_eq!(report.bytes_written, expected);
    }

    /// Quota soundness: under a byte cap, on-disk usage never exceeds it.
    #[test]
    fn prop_total_cap_bounds_disk_usage(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..2048), 1..5),
        cap in 0u64..4096,
    ) {
        let names: Vec<String> = (0..payloads.len()).map(|i| format!("f{}", i)).collect();
        let entries: Vec<(&str, &[u8])> = names
            .iter()
            .map(|n| n.as_str())
            .zip(payloads.iter().map(|p| p.as_slice()))
            .collect();
        let archive = zip_files(&entries);

        let dest = TempDir::new().unwrap();
        let _ = Extractor::new(dest.path())
            .max_total_bytes(cap)
            .extract_zip_bytes(&archive);

        let on_disk: u64 = std::fs::read_dir(dest.path())
            .unwrap()
            .map(|e| e.unwrap().metadata().unwrap().len())
            .sum();
        prop_assert!(on_disk <= cap, "{} bytes on disk under a cap of {}", on_disk, cap);
    }
}
