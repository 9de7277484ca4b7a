use stamp::config::{Settings, TargetCandidate};
use stamp::error::Error;
use stamp::generator::{GenerateOutcome, Generator};
use stamp::model::{Depth, SessionModel};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    project: TempDir,
    templates: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let project = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join("src")).unwrap();
        fs::write(project.path().join("README.md"), "# greeter\n<% raw %>\n").unwrap();
        fs::write(project.path().join("src/greeter.rs"), "pub struct Greeter;\n").unwrap();
        Self { project, templates: TempDir::new().unwrap() }
    }

    fn model(&self) -> SessionModel {
        let settings = Settings::default().with_target_dir(self.templates.path());
        let mut model = SessionModel::new(settings);
        model.load_if_exists(self.project.path()).unwrap();
        if !model.is_active() {
            model.start("hello-gen").unwrap();
            model.use_name("greeter").unwrap();
            let targets = [self.project.path().join("README.md"), self.project.path().join("src")];
            model.add(&targets, Depth::Recursive).unwrap();
            model.save_if_changed().unwrap();
        }
        model
    }

    fn generator_dir(&self) -> PathBuf {
        self.templates.path().join("hello-gen")
    }
}

fn generated(outcome: GenerateOutcome) -> (PathBuf, Vec<PathBuf>, Option<PathBuf>) {
    match outcome {
        GenerateOutcome::Generated { generator_dir, files, backup } => {
            (generator_dir, files, backup)
        }
        other => panic!("Expected Generated, got {other:?}"),
    }
}

#[test_log::test]
fn test_generate_writes_templates() {
    let fixture = Fixture::new();
    let model = fixture.model();

    let (generator_dir, files, backup) = generated(model.generate(false).unwrap());
    assert_eq!(generator_dir, fixture.generator_dir());
    assert_eq!(files.len(), 3);
    assert!(backup.is_none());

    let action_dir = generator_dir.join("new");
    assert_eq!(
        fs::read_to_string(action_dir.join("README.md.ejs.t")).unwrap(),
        "---\nto: README.md\n---\n# <%= name %>\n<%% raw %>\n"
    );
    assert_eq!(
        fs::read_to_string(action_dir.join("src_greeter.rs.ejs.t")).unwrap(),
        "---\nto: src/<%= name %>.rs\n---\npub struct <%= h.capitalize(name) %>;\n"
    );
    let session_template = fs::read_to_string(action_dir.join("stamp.json.ejs.t")).unwrap();
    assert!(session_template.starts_with("---\nto: stamp.json\n---\n"));
    assert!(session_template.contains("\"subjectWord\": \"<%= name %>\""));
}

#[test]
fn test_generate_twice_is_unchanged() {
    let fixture = Fixture::new();
    let model = fixture.model();
    model.generate(false).unwrap();

    match model.generate(false).unwrap() {
        GenerateOutcome::Unchanged { generator_dir } => {
            assert_eq!(generator_dir, fixture.generator_dir())
        }
        other => panic!("Expected Unchanged, got {other:?}"),
    }
    assert!(!fixture.templates.path().join("hello-gen.1").exists());
}

#[test]
fn test_changed_content_moves_previous_generator() {
    let fixture = Fixture::new();
    let model = fixture.model();
    model.generate(false).unwrap();
    let first = fs::read_to_string(fixture.generator_dir().join("new/README.md.ejs.t")).unwrap();

    fs::write(fixture.project.path().join("README.md"), "# greeter, changed\n").unwrap();
    let (generator_dir, _, backup) = generated(model.generate(false).unwrap());

    let backup = backup.unwrap();
    assert_eq!(backup, fixture.templates.path().join("hello-gen.1"));
    assert_eq!(fs::read_to_string(backup.join("new/README.md.ejs.t")).unwrap(), first);
    assert!(dir_diff::is_different(&backup, &generator_dir).unwrap());

    fs::write(fixture.project.path().join("README.md"), "# greeter, again\n").unwrap();
    let (_, _, backup) = generated(model.generate(false).unwrap());
    assert_eq!(backup.unwrap(), fixture.templates.path().join("hello-gen.2"));
}

#[test]
fn test_extra_file_on_disk_counts_as_change() {
    let fixture = Fixture::new();
    let model = fixture.model();
    model.generate(false).unwrap();
    fs::write(fixture.generator_dir().join("new/stray.ejs.t"), "---\nto: stray\n---\n").unwrap();

    let (generator_dir, _, backup) = generated(model.generate(false).unwrap());
    assert!(backup.unwrap().join("new/stray.ejs.t").exists());
    assert!(!generator_dir.join("new/stray.ejs.t").exists());
}

#[test]
fn test_removed_file_counts_as_change() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    model.generate(false).unwrap();

    model.remove(&[fixture.project.path().join("src")]).unwrap();
    model.save_if_changed().unwrap();
    let (_, files, backup) = generated(model.generate(false).unwrap());
    assert_eq!(files.len(), 2);
    assert!(backup.is_some());
}

#[test]
fn test_force_replaces_without_backup() {
    let fixture = Fixture::new();
    let model = fixture.model();
    model.generate(false).unwrap();
    fs::write(fixture.generator_dir().join("new/stray.ejs.t"), "stray").unwrap();

    let (generator_dir, _, backup) = generated(model.generate(true).unwrap());
    assert!(backup.is_none());
    assert!(!generator_dir.join("new/stray.ejs.t").exists());
    assert!(!fixture.templates.path().join("hello-gen.1").exists());
}

#[test]
fn test_same_session_generates_identical_output() {
    let fixture = Fixture::new();
    let other_root = TempDir::new().unwrap();
    fixture.model().generate(false).unwrap();

    let settings = Settings::default().with_target_dir(other_root.path());
    let mut model = SessionModel::new(settings);
    model.load_if_exists(fixture.project.path()).unwrap();
    model.generate(false).unwrap();

    assert!(!dir_diff::is_different(fixture.generator_dir(), other_root.path().join("hello-gen"))
        .unwrap());
}

#[test]
fn test_next_backup_dir_uses_highest_suffix() {
    let root = TempDir::new().unwrap();
    for name in ["gen", "gen.3", "gen.10", "gen.x", "general.20"] {
        fs::create_dir_all(root.path().join(name)).unwrap();
    }
    let generator = Generator::new(root.path(), "gen", "new");
    assert_eq!(generator.next_backup_dir().unwrap(), root.path().join("gen.11"));

    let empty = TempDir::new().unwrap();
    let generator = Generator::new(empty.path(), "gen", "new");
    assert_eq!(generator.next_backup_dir().unwrap(), empty.path().join("gen.1"));
}

#[test]
fn test_target_root_resolution_order() {
    let base = TempDir::new().unwrap();
    let env_dir = TempDir::new().unwrap();
    fs::create_dir_all(base.path().join("_templates")).unwrap();

    let env = |value: Option<&Path>| TargetCandidate::Env {
        var: "STAMP_TMPLS".to_string(),
        value: value.map(|p| p.display().to_string()),
    };
    let local = TargetCandidate::Local(PathBuf::from("_templates"));

    let settings = Settings {
        target_candidates: vec![env(Some(env_dir.path())), local.clone()],
        ..Settings::default()
    };
    assert_eq!(settings.resolve_target_root(base.path()).unwrap(), env_dir.path());

    let settings =
        Settings { target_candidates: vec![env(None), local.clone()], ..Settings::default() };
    assert_eq!(
        settings.resolve_target_root(base.path()).unwrap(),
        base.path().join("_templates")
    );

    let missing = base.path().join("missing");
    let settings = Settings {
        target_candidates: vec![
            env(Some(missing.as_path())),
            TargetCandidate::Local(PathBuf::from("nope")),
        ],
        ..Settings::default()
    };
    match settings.resolve_target_root(base.path()) {
        Err(Error::TargetPathNotSet { sources }) => {
            assert!(sources.contains("$STAMP_TMPLS"));
            assert!(sources.contains("'nope'"));
        }
        other => panic!("Expected TargetPathNotSet, got {other:?}"),
    }
}

#[test]
fn test_colliding_template_names_are_rejected() {
    let fixture = Fixture::new();
    let project = fixture.project.path();
    fs::create_dir_all(project.join("a")).unwrap();
    fs::write(project.join("a/b.txt"), "nested\n").unwrap();
    fs::write(project.join("a_b.txt"), "flat\n").unwrap();
    let mut model = fixture.model();
    model.add(&[project.join("a/b.txt"), project.join("a_b.txt")], Depth::Shallow).unwrap();
    model.save_if_changed().unwrap();

    match model.generate(false) {
        Err(Error::DuplicateTemplateName { file_name, first, second }) => {
            assert_eq!(file_name, "a_b.txt.ejs.t");
            assert_eq!(first, "a/b.txt");
            assert_eq!(second, "a_b.txt");
        }
        other => panic!("Expected DuplicateTemplateName, got {other:?}"),
    }
    assert!(!fixture.generator_dir().exists());
}
