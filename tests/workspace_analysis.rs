/// Integration tests driving the whole usecase against fixture projects
/// on disk: load, measure, export, cache, store.

use metricraft::application::AnalyzeUsecase;
use metricraft::domain::store::{MemoryRecordStore, RecordStore};
use metricraft::domain::unit::parse_units;
use metricraft::infrastructure::{
    CsvExporter, JsonExporter, MetricsEngine, ProjectLoader, ReportCache,
};
use std::fs;
use tempfile::tempdir;

fn write_fixture_crate(root: &std::path::Path) {
    let src = root.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("lib.rs"),
        r#"
        pub struct Engine {
            rpm: u32,
        }

        impl Engine {
            pub fn rev(&mut self) {
                if self.rpm < 9000 {
                    self.rpm += 500;
                }
            }
        }

        pub trait Vehicle {
            fn wheels(&self) -> u8;
        }
        "#,
    )
    .unwrap();
    fs::write(
        src.join("car.rs"),
        r#"
        pub struct Car {
            engine: Engine,
        }

        impl Vehicle for Car {
            fn wheels(&self) -> u8 { 4 }
        }
        "#,
    )
    .unwrap();
}

#[test]
fn folder_analysis_to_csv() {
    let dir = tempdir().unwrap();
    write_fixture_crate(dir.path());

    let loader = ProjectLoader::default();
    let sources = loader.load_folder(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(sources.len(), 2);

    let units = parse_units(&sources);
    let engine = MetricsEngine::default();
    let output = dir.path().join("report.csv");

    let usecase = AnalyzeUsecase {
        builder: &engine,
        exporter: &CsvExporter,
        store: None,
    };
    let report = usecase.run(&units, output.to_str().unwrap()).unwrap();

    assert_eq!(report.len(), 3);

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4); // header + 3 types
    assert!(lines[0].starts_with("crate,type,kind"));
    assert!(csv.contains("Engine"));
    assert!(csv.contains("Vehicle"));
}

#[test]
fn records_are_persisted_into_the_store() {
    let dir = tempdir().unwrap();
    write_fixture_crate(dir.path());

    let loader = ProjectLoader::default();
    let sources = loader.load_folder(dir.path().to_str().unwrap()).unwrap();
    let units = parse_units(&sources);

    let engine = MetricsEngine::default();
    let store = MemoryRecordStore::default();
    let output = dir.path().join("report.json");

    let usecase = AnalyzeUsecase {
        builder: &engine,
        exporter: &JsonExporter,
        store: Some(&store),
    };
    usecase.run(&units, output.to_str().unwrap()).unwrap();

    let crate_name = dir
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    let engine_record = store
        .get(&format!("{}::Engine", crate_name))
        .unwrap()
        .expect("Engine record should be stored");
    assert_eq!(engine_record.nof, 1);
    assert_eq!(store.all().unwrap().len(), 3);
}

#[test]
fn cached_report_round_trips() {
    let dir = tempdir().unwrap();
    write_fixture_crate(dir.path());

    let loader = ProjectLoader::default();
    let sources = loader.load_folder(dir.path().to_str().unwrap()).unwrap();
    let source_paths: Vec<String> = sources.iter().map(|(_, path, _)| path.clone()).collect();

    let units = parse_units(&sources);
    let report = metricraft::ports::ReportBuilder::build_report(&MetricsEngine::default(), &units);

    let cache = ReportCache::new(dir.path());
    cache.store_report(&report, &source_paths).unwrap();

    let cached = cache.get_valid_report().expect("cache should be valid");
    assert_eq!(cached.len(), report.len());

    // Rewriting the metadata with stale mtimes invalidates the cache.
    let meta_path = dir.path().join("metricraft-report.json.meta");
    let meta = fs::read_to_string(&meta_path).unwrap();
    let mut parsed: serde_json::Value = serde_json::from_str(&meta).unwrap();
    for (_, mtime) in parsed["source_files"].as_object_mut().unwrap().iter_mut() {
        *mtime = serde_json::json!(0);
    }
    fs::write(&meta_path, serde_json::to_string_pretty(&parsed).unwrap()).unwrap();

    assert!(cache.get_valid_report().is_none());
}
