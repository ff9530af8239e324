use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use cadre_core::date::exif::{ExifRecord, ExifSource};
use cadre_core::geo::PlaceTable;
use cadre_core::media::MediaFile;
use cadre_core::probe::DurationProbe;
use cadre_core::render::PhotoRenderer;
use cadre_core::sidecar::read_sidecar;
use cadre_core::{process, CadreError, Config, Result, Services};
use rand::rngs::StdRng;
use rand::SeedableRng;

const KB: usize = 1024;

struct NoExif;

impl ExifSource for NoExif {
    fn read(&self, _path: &Path) -> Result<ExifRecord> {
        Ok(ExifRecord::default())
    }
}

/// Writes a marker file; refuses anything with "broken" in its path.
struct StubRenderer;

impl PhotoRenderer for StubRenderer {
    fn render(&self, src: &MediaFile, dest: &Path, _orientation: Option<u16>) -> Result<()> {
        if src.path.to_string_lossy().contains("broken") {
            return Err(CadreError::Transcode {
                path: src.path.clone(),
                reason: "stub refuses".to_string(),
            });
        }
        fs::write(dest, b"jpeg").map_err(|e| CadreError::io(dest, e))
    }
}

struct FixedDuration(&'static str);

impl DurationProbe for FixedDuration {
    fn duration(&self, _path: &Path) -> String {
        self.0.to_string()
    }
}

struct Tree {
    _root: tempfile::TempDir,
    config: Config,
}

fn touch(path: &Path, len: usize) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, vec![0u8; len]).unwrap();
}

fn tree() -> Tree {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("source");
    let dest = root.path().join("frame/images");
    let videos = root.path().join("frame/videos");
    fs::create_dir_all(&dest).unwrap();

    touch(&source.join("2022-07-04 Plage/IMG_1.jpg"), 10);
    touch(&source.join("2022-07-04 Plage/IMG_2.JPG"), 10);
    touch(&source.join("Bretagne/Camera Roll/IMG_3.jpeg"), 10);
    touch(&source.join("Photos 2019/IMG_4.heic"), 10);
    touch(&source.join("Année/IMG_5.jpg"), 10);
    touch(&source.join("notes/readme.txt"), 10);

    touch(&source.join("2020-12-24 Noël/clip1.mp4"), 300 * KB);
    touch(&source.join("Année/clip2.MOV"), 500 * KB);
    touch(&source.join("2021/huge.mkv"), 3 * 1024 * KB);
    touch(&source.join("2021/tiny.avi"), 0);

    // leftovers from a previous run
    touch(&videos.join("001.mp4"), 5);
    touch(&videos.join("old/002.txt"), 5);

    let config = Config {
        source_dir: source,
        dest_dir: dest,
        video_dest_dir: videos,
        screen_w: 800,
        screen_h: 480,
        nb_images: 3,
        video_limit_mb: 1,
        generic_folders: vec!["camera roll".to_string()],
        video_min_mb: 0,
        jpeg_quality: 90,
        places: vec![],
        seed: None,
    };
    Tree { _root: root, config }
}

fn run_with(config: &Config, renderer: &dyn PhotoRenderer, seed: u64) -> Result<cadre_core::RunReport> {
    let geo = PlaceTable::default();
    let probe = FixedDuration("0:42");
    let services = Services {
        exif: &NoExif,
        geo: &geo,
        renderer,
        probe: &probe,
    };
    process(config, &services, &mut StdRng::seed_from_u64(seed), &|_, _, _, _| {})
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn photos_are_rendered_with_sidecars() {
    let t = tree();
    let report = run_with(&t.config, &StubRenderer, 1).unwrap();

    assert_eq!(report.photos_found, 5);
    assert_eq!(report.photos_selected, 3);
    assert_eq!(report.photos_written, 3);
    assert_eq!(
        sorted_names(&t.config.dest_dir),
        ["001.jpg", "001.txt", "002.jpg", "002.txt", "003.jpg", "003.txt"]
    );

    let allowed_captions = ["Plage - Juillet 2022", "Bretagne", "Photos - 2019", ""];
    let mut sources = Vec::new();
    for id in ["001", "002", "003"] {
        let sidecar = read_sidecar(&t.config.dest_dir.join(format!("{}.txt", id))).unwrap();
        assert!(allowed_captions.contains(&sidecar.caption.as_str()), "{:?}", sidecar.caption);
        assert!(PathBuf::from(&sidecar.source_path).starts_with(&t.config.source_dir));
        sources.push(sidecar.source_path);
    }
    sources.sort();
    sources.dedup();
    assert_eq!(sources.len(), 3);
}

#[test]
fn videos_fill_budget_and_replace_old_content() {
    let t = tree();
    let report = run_with(&t.config, &StubRenderer, 2).unwrap();

    assert_eq!(report.videos_found, 4);
    assert!(report.video_bytes <= 1024 * 1024);
    // the two small clips always fit together; the huge one never does
    assert_eq!(report.videos_copied, report.videos_selected);
    assert!(report.videos_copied >= 2);

    let names = sorted_names(&t.config.video_dest_dir);
    assert!(!names.iter().any(|n| n == "old"));
    assert!(!names.iter().any(|n| n.ends_with(".mkv")));

    for i in 1..=report.videos_copied {
        let id = format!("{:03}", i);
        let sidecar = read_sidecar(&t.config.video_dest_dir.join(format!("{}.txt", id))).unwrap();
        assert_eq!(sidecar.date, "0:42");
        let expected = if sidecar.source_path.ends_with("clip1.mp4") {
            "Noël - Décembre 2020"
        } else if sidecar.source_path.ends_with("clip2.MOV") {
            "Vidéo Perso"
        } else {
            "2021"
        };
        assert_eq!(sidecar.caption, expected);
        let ext = Path::new(&sidecar.source_path).extension().unwrap().to_string_lossy().into_owned();
        assert!(t.config.video_dest_dir.join(format!("{}.{}", id, ext)).is_file());
    }
}

#[test]
fn failed_render_skips_only_that_item() {
    let t = tree();
    touch(&t.config.source_dir.join("broken/IMG_9.jpg"), 10);
    let mut config = t.config.clone();
    config.nb_images = 100;

    let report = run_with(&config, &StubRenderer, 3).unwrap();
    assert_eq!(report.photos_selected, 6);
    assert_eq!(report.photos_written, 5);
    assert_eq!(report.photos_failed, 1);
    assert_eq!(report.warnings.len(), 1);

    let names = sorted_names(&config.dest_dir);
    assert_eq!(names.iter().filter(|n| n.ends_with(".jpg")).count(), 5);
    assert_eq!(names.iter().filter(|n| n.ends_with(".txt")).count(), 5);
    for name in names.iter().filter(|n| n.ends_with(".txt")) {
        let sidecar = read_sidecar(&config.dest_dir.join(name)).unwrap();
        assert!(!sidecar.source_path.contains("broken"));
        let jpg = name.replace(".txt", ".jpg");
        assert!(config.dest_dir.join(jpg).is_file());
    }
}

#[test]
fn missing_destination_stops_before_anything_is_written() {
    let t = tree();
    let mut config = t.config.clone();
    config.dest_dir = config.dest_dir.join("does-not-exist");

    let err = run_with(&config, &StubRenderer, 4).unwrap_err();
    assert!(matches!(err, CadreError::DestinationMissing { .. }));
    // video leftovers untouched: no selection or cleanup happened
    assert!(config.video_dest_dir.join("001.mp4").is_file());
}

#[test]
fn same_seed_same_selection() {
    let a = tree();
    let b = tree();
    run_with(&a.config, &StubRenderer, 42).unwrap();
    run_with(&b.config, &StubRenderer, 42).unwrap();

    for id in ["001", "002", "003"] {
        let sa = read_sidecar(&a.config.dest_dir.join(format!("{}.txt", id))).unwrap();
        let sb = read_sidecar(&b.config.dest_dir.join(format!("{}.txt", id))).unwrap();
        let rel_a = Path::new(&sa.source_path).strip_prefix(&a.config.source_dir).unwrap().to_path_buf();
        let rel_b = Path::new(&sb.source_path).strip_prefix(&b.config.source_dir).unwrap().to_path_buf();
        assert_eq!(rel_a, rel_b);
        assert_eq!(sa.caption, sb.caption);
    }
}

#[test]
fn progress_callback_may_borrow_local_state() {
    let t = tree();
    let stages = RefCell::new(Vec::new());
    let geo = PlaceTable::default();
    let services = Services {
        exif: &NoExif,
        geo: &geo,
        renderer: &StubRenderer,
        probe: &FixedDuration("0:42"),
    };
    let callback = |stage: &str, current: u64, total: u64, _msg: &str| {
        stages.borrow_mut().push((stage.to_string(), current, total));
    };
    process(&t.config, &services, &mut StdRng::seed_from_u64(5), &callback).unwrap();

    let stages = stages.borrow();
    assert!(stages.contains(&("photos".to_string(), 3, 3)));
    assert!(stages.iter().any(|(stage, current, total)| stage == "videos" && current == total));
}
