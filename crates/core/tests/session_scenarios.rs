use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use prism_core::{
    DecodePolicy, EditorConfig, EditorError, EditorState, Launcher, SaveOutcome, ScriptedPrompt,
    DocumentError, SAVED_STATUS_KEY,
};
use prism_highlight::HighlightKind;
use prism_project::CreateOutcome;
use prism_settings::AppPaths;
use tempfile::tempdir;

fn seed_demo(dir: &Path) -> std::path::PathBuf {
    let demo = dir.join("demo");
    fs::create_dir(&demo).unwrap();
    fs::write(demo.join("a.py"), "def f():\n    return 1\n").unwrap();
    let projects = projects_json(&demo);
    fs::write(dir.join("projects.json"), projects).unwrap();
    demo
}

fn projects_json(demo: &Path) -> String {
    format!(
        "[{{\"name\": \"demo\", \"path\": {:?}}}]",
        demo.display().to_string()
    )
}

#[test]
fn open_edit_and_save_a_project_file() {
    let dir = tempdir().unwrap();
    let demo = seed_demo(dir.path());
    let mut launcher = Launcher::load(&AppPaths::in_dir(dir.path()), EditorConfig::default()).unwrap();

    let index = launcher.resolve_project("demo").unwrap();
    let session = launcher.open_project(index).unwrap();
    assert_eq!(session.state(), EditorState::NoFileOpen);

    let text = session.open_file(Path::new("a.py")).unwrap();
    assert_eq!(text, "def f():\n    return 1\n");
    assert_eq!(session.state(), EditorState::FileOpen);

    session.buffer_mut().push_str("# comment");
    let outcome = session.save(Instant::now()).unwrap();
    assert_eq!(outcome, SaveOutcome::Saved(demo.join("a.py")));
    assert_eq!(
        fs::read_to_string(demo.join("a.py")).unwrap(),
        "def f():\n    return 1\n# comment"
    );
}

#[test]
fn buffer_highlighting_marks_definition_and_comment() {
    let dir = tempdir().unwrap();
    seed_demo(dir.path());
    let mut launcher = Launcher::load(&AppPaths::in_dir(dir.path()), EditorConfig::default()).unwrap();
    let session = launcher.open_project(0).unwrap();
    session.open_file(Path::new("a.py")).unwrap();
    session.buffer_mut().push_str("# comment");

    let kinds: Vec<_> = session.highlight_buffer().iter().map(|span| span.kind).collect();
    assert_eq!(kinds.first(), Some(&HighlightKind::Definition));
    assert_eq!(kinds.last(), Some(&HighlightKind::Comment));
}

#[test]
fn reopening_a_project_reuses_its_session() {
    let dir = tempdir().unwrap();
    let demo = seed_demo(dir.path());
    let mut launcher = Launcher::load(&AppPaths::in_dir(dir.path()), EditorConfig::default()).unwrap();

    launcher
        .open_project(0)
        .unwrap()
        .open_file(Path::new("a.py"))
        .unwrap();
    let again = launcher.open_project(0).unwrap();
    assert_eq!(again.current_file(), Some(demo.join("a.py").as_path()));
    assert_eq!(launcher.open_editor_paths().count(), 1);
}

#[test]
fn deleting_the_open_file_returns_to_no_file_open() {
    let dir = tempdir().unwrap();
    let demo = seed_demo(dir.path());
    let mut launcher = Launcher::load(&AppPaths::in_dir(dir.path()), EditorConfig::default()).unwrap();
    let session = launcher.open_project(0).unwrap();
    session.open_file(Path::new("a.py")).unwrap();

    let outcome = session.delete(&demo.join("a.py")).unwrap();
    assert!(outcome.closed_current);
    assert_eq!(session.state(), EditorState::NoFileOpen);
    assert_eq!(session.buffer(), "");
    assert_eq!(session.save(Instant::now()).unwrap(), SaveOutcome::NothingOpen);
    assert!(!demo.join("a.py").exists());
}

#[test]
fn create_through_the_prompt_is_idempotent() {
    let dir = tempdir().unwrap();
    let demo = seed_demo(dir.path());
    let mut launcher = Launcher::load(&AppPaths::in_dir(dir.path()), EditorConfig::default()).unwrap();
    let localizer = *launcher.localizer();
    let session = launcher.open_project(0).unwrap();

    let mut prompt = ScriptedPrompt::new().with_text("main.py").with_text("a.py");
    let created = session.create_file(&mut prompt, &localizer).unwrap();
    assert_eq!(created, Some(CreateOutcome::Created(demo.join("main.py"))));
    assert_eq!(fs::read_to_string(demo.join("main.py")).unwrap(), "");

    let existing = session.create_file(&mut prompt, &localizer).unwrap();
    assert_eq!(existing, Some(CreateOutcome::AlreadyExists(demo.join("a.py"))));
    assert_eq!(
        fs::read_to_string(demo.join("a.py")).unwrap(),
        "def f():\n    return 1\n"
    );
    assert_eq!(prompt.asked(), ["Создать файл", "Создать файл"]);
}

#[test]
fn decode_policy_controls_invalid_bytes() {
    let dir = tempdir().unwrap();
    let demo = seed_demo(dir.path());
    fs::write(demo.join("latin.txt"), b"caf\xe9 ok").unwrap();
    let paths = AppPaths::in_dir(dir.path());

    let mut lossy = Launcher::load(&paths, EditorConfig::default()).unwrap();
    let session = lossy.open_project(0).unwrap();
    assert_eq!(session.open_file(Path::new("latin.txt")).unwrap(), "caf ok");

    let strict_config = EditorConfig {
        decode: DecodePolicy::Strict,
        ..EditorConfig::default()
    };
    let mut strict = Launcher::load(&paths, strict_config).unwrap();
    let session = strict.open_project(0).unwrap();
    let err = session.open_file(Path::new("latin.txt")).unwrap_err();
    assert!(matches!(
        err,
        EditorError::Document(DocumentError::InvalidUtf8 { offset: 3, .. })
    ));
    assert_eq!(session.state(), EditorState::NoFileOpen);
}

#[test]
fn save_confirmation_expires_after_the_ttl() {
    let dir = tempdir().unwrap();
    seed_demo(dir.path());
    let config = EditorConfig {
        status_ttl: Duration::from_millis(500),
        ..EditorConfig::default()
    };
    let mut launcher = Launcher::load(&AppPaths::in_dir(dir.path()), config).unwrap();
    let session = launcher.open_project(0).unwrap();
    session.open_file(Path::new("a.py")).unwrap();

    let saved_at = Instant::now();
    session.save(saved_at).unwrap();
    assert_eq!(session.status(saved_at), Some(SAVED_STATUS_KEY));
    assert_eq!(
        session.status(saved_at + Duration::from_millis(499)),
        Some(SAVED_STATUS_KEY)
    );
    assert_eq!(session.status(saved_at + Duration::from_millis(500)), None);
}

#[test]
fn language_toggle_relabels_the_launcher() {
    let dir = tempdir().unwrap();
    let mut launcher = Launcher::load(&AppPaths::in_dir(dir.path()), EditorConfig::default()).unwrap();
    let before = launcher.labels();

    launcher.toggle_language().unwrap();
    assert_eq!(launcher.localizer().text("launcher.add_project"), "Add project");
    launcher.toggle_language().unwrap();
    assert_eq!(launcher.labels(), before);

    let reloaded = Launcher::load(&AppPaths::in_dir(dir.path()), EditorConfig::default()).unwrap();
    assert_eq!(reloaded.language(), launcher.language());
}
