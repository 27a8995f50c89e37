//! End-to-end tests for the name-lexicon extraction pipeline.
//!
//! Tests build a small dataset directory in a `TempDir`, then drive the
//! library (load → aggregate → build → emit) and the compiled binaries.
//!
//! # Sample Data
//!
//! - `US.csv`: male and female first names, last names; "Jordan" is both a
//!   first and a last name
//! - `FR.csv.bz2`: BZ2-compressed, male first names and last names
//! - `JP.csv`: female first names only, so the male lookup fails
//! - `notes.txt`: ignored, not a country file

use bzip2::write::BzEncoder;
use bzip2::Compression;
use name_lexicon::cache::DatasetCache;
use name_lexicon::dataset::{FrequencyDataset, NameDataset};
use name_lexicon::extract::{load_dataset, run_extraction};
use name_lexicon::models::{Gender, NameTag};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const US_ROWS: &str = "\
John,Smith,M,US
John,Smith,M,US
Jordan,Brown,M,US
Mary,Jordan,F,US
Mary,Jordan,F,US
Alice,Smith,F,US
";

const FR_ROWS: &str = "\
Jean,Martin,M,FR
Jean,Bernard,M,FR
Élie,Martin,M,FR
";

const JP_ROWS: &str = "\
Yui,,F,JP
Aoi,,F,JP
";

fn create_dataset(root: &Path) -> PathBuf {
    let dir = root.join("data");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("US.csv"), US_ROWS).unwrap();
    fs::write(dir.join("JP.csv"), JP_ROWS).unwrap();
    fs::write(dir.join("notes.txt"), "not a country file").unwrap();

    let mut encoder = BzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(FR_ROWS.as_bytes()).unwrap();
    fs::write(dir.join("FR.csv.bz2"), encoder.finish().unwrap()).unwrap();
    dir
}

/// Extracts the JSON object literal from a generated artifact.
fn decode_artifact(path: &Path) -> Map<String, Value> {
    let content = fs::read_to_string(path).unwrap();
    let start = content.find('{').unwrap();
    let value = serde_json::Deserializer::from_str(&content[start..])
        .into_iter::<Value>()
        .next()
        .unwrap()
        .unwrap();
    match value {
        Value::Object(map) => map,
        other => panic!("expected object in {}, got {other}", path.display()),
    }
}

fn artifact_paths(out: &Path) -> Vec<PathBuf> {
    ["json", "ts", "mjs", "cjs"]
        .iter()
        .map(|ext| out.join(format!("names-lexicon.{ext}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Dataset loading
// ---------------------------------------------------------------------------

#[test]
fn dataset_covers_plain_and_compressed_files() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let ds = FrequencyDataset::load(&data).unwrap();

    assert_eq!(ds.country_codes(), vec!["FR", "JP", "US"]);
    assert_eq!(
        ds.top_first_names("FR", Gender::Male, 1).unwrap(),
        vec!["Jean"]
    );
    assert_eq!(
        ds.top_last_names("US", 2).unwrap(),
        vec!["Smith", "Jordan"]
    );
    assert!(ds.top_first_names("JP", Gender::Male, 10).is_err());
    assert!(ds.top_last_names("JP", 10).is_err());
}

#[test]
fn invalid_utf8_names_are_kept_lossily() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("US.csv"), b"John,Smith,M,US\n\xff\xfe,Bad,M,US\n").unwrap();

    let ds = FrequencyDataset::load(&data).unwrap();
    assert_eq!(ds.top_last_names("US", 10).unwrap(), vec!["Bad", "Smith"]);
    assert_eq!(
        ds.top_first_names("US", Gender::Male, 10).unwrap(),
        vec!["John", "\u{FFFD}\u{FFFD}"]
    );
}

#[test]
fn corrupt_compressed_file_fails_load() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("US.csv.bz2"), "not bzip2 at all").unwrap();

    assert!(FrequencyDataset::load(&data).is_err());
}

#[test]
fn reload_without_cache_sees_same_size_edit() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("US.csv"), "John,Smith,M,US\n").unwrap();

    let before = load_dataset(&data, None).unwrap();
    assert_eq!(before.top_last_names("US", 5).unwrap(), vec!["Smith"]);

    fs::write(data.join("US.csv"), "Paul,Jones,M,US\n").unwrap();
    let after = load_dataset(&data, None).unwrap();
    assert_eq!(after.top_last_names("US", 5).unwrap(), vec!["Jones"]);
}

#[test]
fn opt_in_cache_is_written_and_reused() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let cache = DatasetCache::new(tmp.path().join("cache").join("rankings.bin"));

    let fresh = load_dataset(&data, Some(&cache)).unwrap();
    assert!(cache.path().exists());

    let cached = cache.load(&data).unwrap().unwrap();
    assert_eq!(cached.rankings(), fresh.rankings());

    let reloaded = load_dataset(&data, Some(&cache)).unwrap();
    assert_eq!(reloaded.rankings(), fresh.rankings());
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn pipeline_builds_expected_lexicon() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let out = tmp.path().join("out");

    let ds = load_dataset(&data, None).unwrap();
    let report = run_extraction(&ds, 500, &out).unwrap();
    let lexicon = &report.lexicon;

    assert_eq!(lexicon.get("john"), Some(NameTag::FirstName));
    assert_eq!(lexicon.get("jordan"), Some(NameTag::FirstName));
    assert_eq!(lexicon.get("élie"), Some(NameTag::FirstName));
    assert_eq!(lexicon.get("yui"), Some(NameTag::FirstName));
    assert_eq!(lexicon.get("smith"), Some(NameTag::LastName));
    assert_eq!(lexicon.get("martin"), Some(NameTag::LastName));
    assert_eq!(lexicon.get("Smith"), None);

    // first: John Jordan Mary Alice Jean Élie Yui Aoi
    // last: Smith Brown Jordan Martin Bernard
    let stats = &report.stats;
    assert_eq!(stats.countries, 3);
    assert_eq!(stats.first_names, 8);
    assert_eq!(stats.last_names, 5);
    assert_eq!(stats.ambiguous, 1);
    assert_eq!(stats.lexicon_entries, 12);
    assert_eq!(stats.tagged_first, 8);
    assert_eq!(stats.tagged_last, 4);
    // FR female, JP male, JP last
    assert_eq!(stats.lookups.failed, 3);
    assert_eq!(stats.lookups.succeeded, 6);
}

#[test]
fn top_n_limits_names_per_country() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let out = tmp.path().join("out");

    let ds = load_dataset(&data, None).unwrap();
    let report = run_extraction(&ds, 1, &out).unwrap();

    // US: John (M), Mary (F); FR: Jean (M); JP: Aoi (F, tie broken by name)
    assert_eq!(report.stats.first_names, 4);
    assert_eq!(report.lexicon.get("aoi"), Some(NameTag::FirstName));
    assert_eq!(report.lexicon.get("yui"), None);
    // US: Smith; FR: Martin
    assert_eq!(report.stats.last_names, 2);
}

#[test]
fn all_artifacts_decode_to_same_mapping() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let out = tmp.path().join("nested").join("out");

    let ds = load_dataset(&data, None).unwrap();
    let report = run_extraction(&ds, 500, &out).unwrap();
    assert_eq!(report.written, artifact_paths(&out));

    let decoded: Vec<_> = artifact_paths(&out).iter().map(|p| decode_artifact(p)).collect();
    for map in &decoded[1..] {
        assert_eq!(map, &decoded[0]);
    }

    let json = &decoded[0];
    assert_eq!(json.len(), report.lexicon.len());
    for (name, tag) in report.lexicon.iter() {
        let expected = serde_json::to_value(tag).unwrap();
        assert_eq!(json.get(name), Some(&expected));
    }
}

#[test]
fn rerun_produces_identical_files() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let out = tmp.path().join("out");

    let ds = load_dataset(&data, None).unwrap();
    run_extraction(&ds, 500, &out).unwrap();
    let first: Vec<_> = artifact_paths(&out).iter().map(|p| fs::read(p).unwrap()).collect();

    run_extraction(&ds, 500, &out).unwrap();
    let second: Vec<_> = artifact_paths(&out).iter().map(|p| fs::read(p).unwrap()).collect();

    assert_eq!(first, second);
}

#[test]
fn cjs_artifact_has_module_exports() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let out = tmp.path().join("out");

    let ds = load_dataset(&data, None).unwrap();
    run_extraction(&ds, 500, &out).unwrap();

    let cjs = fs::read_to_string(out.join("names-lexicon.cjs")).unwrap();
    assert!(cjs.starts_with("// Auto-generated name lexicon"));
    assert!(cjs.ends_with("module.exports = { nameLexicon };\n"));
}

// ---------------------------------------------------------------------------
// Binaries
// ---------------------------------------------------------------------------

fn name_lexicon() -> Command {
    Command::new(env!("CARGO_BIN_EXE_name-lexicon"))
}

#[test]
fn cli_rejects_non_positive_top_n_before_loading() {
    for value in ["0", "-3"] {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");

        let output = name_lexicon()
            .arg(format!("--top-n={value}"))
            .arg("--output")
            .arg(&out)
            .arg("--dataset")
            .arg(tmp.path().join("does-not-exist"))
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Error: --top-n must be a positive integer"));
        assert!(!stderr.contains("dataset directory"));
        assert!(!out.exists());
    }
}

#[test]
fn cli_fails_on_missing_dataset() {
    let tmp = TempDir::new().unwrap();

    let output = name_lexicon()
        .arg("-o")
        .arg(tmp.path().join("out"))
        .arg("-d")
        .arg(tmp.path().join("does-not-exist"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Failed to read dataset directory"));
}

#[test]
fn cli_runs_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let out = tmp.path().join("out");

    let output = name_lexicon()
        .args(["-n", "500"])
        .arg("-o")
        .arg(&out)
        .arg("-d")
        .arg(&data)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("EXTRACTION SUMMARY"));
    assert!(stdout.contains("  - Ambiguous (both): 1"));
    assert!(stdout.contains("  - Total entries: 12"));

    // JP has no male names: one warning for that pair, the run still succeeds
    let stderr = String::from_utf8_lossy(&output.stderr);
    let jp_first: Vec<_> = stderr
        .lines()
        .filter(|l| l.contains("Could not get first names") && l.contains("country=JP"))
        .collect();
    assert_eq!(jp_first.len(), 1, "stderr was:\n{stderr}");
    assert!(jp_first[0].contains("gender=male"));
    assert!(jp_first[0].contains("no male first names for JP"));
    assert!(stderr.contains("country=FR gender=female"));

    // A default run leaves exactly the four artifacts behind
    let mut entries: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(
        entries,
        vec![
            "names-lexicon.cjs",
            "names-lexicon.json",
            "names-lexicon.mjs",
            "names-lexicon.ts",
        ]
    );
}

#[test]
fn cli_cache_flag_writes_outside_output() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let out = tmp.path().join("out");
    let cache_file = tmp.path().join("rankings.bin");

    for _ in 0..2 {
        let output = name_lexicon()
            .arg("-o")
            .arg(&out)
            .arg("-d")
            .arg(&data)
            .arg("--cache")
            .arg(&cache_file)
            .output()
            .unwrap();
        assert!(output.status.success());
    }

    assert!(cache_file.exists());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 4);
}

#[test]
fn cli_rejects_cache_inside_output() {
    let tmp = TempDir::new().unwrap();
    let data = create_dataset(tmp.path());
    let out = tmp.path().join("out");

    let output = name_lexicon()
        .arg("-o")
        .arg(&out)
        .arg("-d")
        .arg(&data)
        .arg("--cache")
        .arg(out.join("rankings.bin"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--cache must not point inside the output directory"));
    assert!(!out.exists());
}

#[test]
fn greet_prints_greeting() {
    let output = Command::new(env!("CARGO_BIN_EXE_greet"))
        .args(["--name", "Ada"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello, Ada!\n");
}
