//! Integration tests for project instantiation

use projgen::error::ErrorKind;
use projgen::placeholder::{VariableMapping, VariableResolver};
use projgen::template::{DirectoryMover, TemplateInstantiator};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn acme_mapping() -> VariableMapping {
    VariableMapping::new().with("%project_name%", "Acme").unwrap()
}

/// Template root `[%project_name%]` with a notes file and a README
fn build_template(base: &Path) -> PathBuf {
    let root = base.join("[%project_name%]");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("%project_name%_notes.txt"), "notes for %project_name%").unwrap();
    fs::write(root.join("README.md"), "Hello %project_name%").unwrap();
    root
}

fn target_base(temp: &TempDir) -> String {
    temp.path().join("out").to_string_lossy().into_owned()
}

/// List every path below `root`, relative and sorted
fn tree(root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| {
            e.unwrap()
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    paths.sort();
    paths
}

#[test]
fn test_end_to_end_with_readme_replacement() {
    let temp = TempDir::new().unwrap();
    let template = build_template(temp.path());

    let instantiator = TemplateInstantiator::new(acme_mapping(), true).unwrap();
    let report = instantiator
        .create_project(&template, &target_base(&temp))
        .unwrap();

    let dest = temp.path().join("out").join("[Acme]");
    assert_eq!(report.destination, dest);
    assert_eq!(tree(&dest), vec!["Acme_notes.txt", "README.md"]);
    assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "Hello Acme");
    // only the marker file has its content rewritten
    assert_eq!(
        fs::read_to_string(dest.join("Acme_notes.txt")).unwrap(),
        "notes for %project_name%"
    );
    assert_eq!(report.files_renamed, 1);
    assert_eq!(report.readmes_rewritten, 1);

    // template left untouched
    assert_eq!(
        tree(&template),
        vec!["%project_name%_notes.txt", "README.md"]
    );
}

#[test]
fn test_end_to_end_without_readme_replacement() {
    let temp = TempDir::new().unwrap();
    let template = build_template(temp.path());

    let instantiator = TemplateInstantiator::new(acme_mapping(), false).unwrap();
    let report = instantiator
        .create_project(&template, &target_base(&temp))
        .unwrap();

    assert_eq!(report.readmes_rewritten, 0);
    assert_eq!(
        fs::read_to_string(report.destination.join("README.md")).unwrap(),
        "Hello %project_name%"
    );
    assert!(report.destination.join("Acme_notes.txt").is_file());
}

#[test]
fn test_renamed_file_matching_marker_is_rewritten() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("tpl");
    fs::create_dir_all(template.join("docs/sub")).unwrap();
    fs::write(template.join("docs/%doc%.md"), "by %project_name%").unwrap();
    fs::write(template.join("docs/sub/readme.MD"), "lower %project_name%").unwrap();

    let mapping = acme_mapping().with("%doc%", "README").unwrap();
    let report = TemplateInstantiator::new(mapping, true)
        .unwrap()
        .create_project(&template, &target_base(&temp))
        .unwrap();

    let docs = report.destination.join("docs");
    assert_eq!(fs::read_to_string(docs.join("README.md")).unwrap(), "by Acme");
    assert_eq!(
        fs::read_to_string(docs.join("sub/readme.MD")).unwrap(),
        "lower Acme"
    );
    assert_eq!(report.readmes_rewritten, 2);
}

#[test]
fn test_nested_directories_are_renamed_post_order() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("tpl");
    let deep = template.join("%project_name%/%year%/src");
    fs::create_dir_all(&deep).unwrap();
    fs::write(deep.join("%project_name%.rs"), "fn main() {}").unwrap();
    fs::write(template.join("%project_name%/README.md"), "%year%").unwrap();

    let mapping = acme_mapping().with("%year%", "2025").unwrap();
    let report = TemplateInstantiator::new(mapping, true)
        .unwrap()
        .create_project(&template, &target_base(&temp))
        .unwrap();

    assert_eq!(
        tree(&report.destination),
        vec![
            "Acme",
            "Acme/2025",
            "Acme/2025/src",
            "Acme/2025/src/Acme.rs",
            "Acme/README.md",
        ]
    );
    assert_eq!(report.directories_renamed, 2);
    assert_eq!(report.files_renamed, 1);
    assert_eq!(
        fs::read_to_string(report.destination.join("Acme/README.md")).unwrap(),
        "2025"
    );
}

#[test]
fn test_target_base_tokens_are_resolved_and_created() {
    let temp = TempDir::new().unwrap();
    let template = build_template(temp.path());
    let base = format!("{}/out/%year%/%month%", temp.path().display());

    let mapping = acme_mapping()
        .with("%year%", "2025")
        .unwrap()
        .with("%month%", "10")
        .unwrap();
    let report = TemplateInstantiator::new(mapping, true)
        .unwrap()
        .create_project(&template, &base)
        .unwrap();

    assert_eq!(
        report.destination,
        temp.path().join("out").join("2025").join("10").join("[Acme]")
    );
    assert!(report.destination.is_dir());
}

#[test]
fn test_missing_source_is_not_found_without_mutation() {
    let temp = TempDir::new().unwrap();
    let instantiator = TemplateInstantiator::new(acme_mapping(), true).unwrap();

    let err = instantiator
        .create_project(&temp.path().join("missing"), &target_base(&temp))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(tree(temp.path()).is_empty());
}

#[test]
fn test_source_that_is_a_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("template.txt");
    fs::write(&file, "not a dir").unwrap();

    let err = TemplateInstantiator::new(acme_mapping(), true)
        .unwrap()
        .create_project(&file, &target_base(&temp))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_existing_project_folder_is_already_exists() {
    let temp = TempDir::new().unwrap();
    let template = build_template(temp.path());
    let existing = temp.path().join("out").join("[Acme]");
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("keep.txt"), "mine").unwrap();

    let err = TemplateInstantiator::new(acme_mapping(), true)
        .unwrap()
        .create_project(&template, &target_base(&temp))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(tree(&existing), vec!["keep.txt"]);
}

#[test]
fn test_already_exists_only_creates_destination_parent() {
    let temp = TempDir::new().unwrap();
    let template = build_template(temp.path());
    let instantiator = TemplateInstantiator::new(acme_mapping(), true).unwrap();
    let base = target_base(&temp);

    instantiator.create_project(&template, &base).unwrap();
    let before = tree(&temp.path().join("out"));

    let err = instantiator.create_project(&template, &base).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(tree(&temp.path().join("out")), before);
}

/// Denies moves of directories whose name contains `locked`
#[derive(Debug)]
struct LockingMover;

impl DirectoryMover for LockingMover {
    fn move_dir(&self, from: &Path, to: &Path) -> io::Result<()> {
        let name = from.file_name().unwrap().to_string_lossy();
        if name.contains("locked") {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Access is denied",
            ));
        }
        fs::rename(from, to)
    }
}

#[test]
fn test_access_denied_directory_keeps_name_but_contents_are_processed() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("tpl");
    let locked = template.join("locked_%project_name%");
    fs::create_dir_all(locked.join("%project_name%_inner")).unwrap();
    fs::write(locked.join("%project_name%.txt"), "x").unwrap();
    fs::write(locked.join("README.md"), "Hi %project_name%").unwrap();
    fs::create_dir_all(template.join("%project_name%_open")).unwrap();

    let report = TemplateInstantiator::new(acme_mapping(), true)
        .unwrap()
        .with_mover(LockingMover)
        .create_project(&template, &target_base(&temp))
        .unwrap();

    assert_eq!(
        tree(&report.destination),
        vec![
            "Acme_open",
            "locked_%project_name%",
            "locked_%project_name%/Acme.txt",
            "locked_%project_name%/Acme_inner",
            "locked_%project_name%/README.md",
        ]
    );
    assert_eq!(
        fs::read_to_string(report.destination.join("locked_%project_name%/README.md")).unwrap(),
        "Hi Acme"
    );
    assert_eq!(
        report.unrenamed_directories,
        vec![report.destination.join("locked_%project_name%")]
    );
    assert_eq!(report.directories_renamed, 2);
}

/// Fails every move with a non-permission error
#[derive(Debug)]
struct BrokenMover;

impl DirectoryMover for BrokenMover {
    fn move_dir(&self, _from: &Path, _to: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "device busy"))
    }
}

#[test]
fn test_other_directory_rename_failures_abort() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("tpl");
    fs::create_dir_all(template.join("%project_name%")).unwrap();

    let err = TemplateInstantiator::new(acme_mapping(), true)
        .unwrap()
        .with_mover(BrokenMover)
        .create_project(&template, &target_base(&temp))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    // partial state is left behind
    assert!(temp.path().join("out/tpl/%project_name%").is_dir());
}

#[test]
fn test_guid_differs_between_runs() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("tpl");
    fs::create_dir_all(&template).unwrap();
    fs::write(template.join("%guid%.id"), "").unwrap();

    let resolver = VariableResolver::new();
    let mut names = Vec::new();
    for run in ["a", "b"] {
        let mapping = resolver.preset_mapping();
        let base = temp.path().join(run).to_string_lossy().into_owned();
        let report = TemplateInstantiator::new(mapping, false)
            .unwrap()
            .create_project(&template, &base)
            .unwrap();
        names.extend(tree(&report.destination));
    }

    assert_eq!(names.len(), 2);
    assert_ne!(names[0], names[1]);
    assert!(!names[0].contains("%guid%"));
}

#[test]
fn test_one_mapping_gives_one_instant_per_run() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("tpl");
    fs::create_dir_all(template.join("%guid%")).unwrap();
    fs::write(template.join("%guid%/%guid%.txt"), "").unwrap();
    fs::write(template.join("README.md"), "%guid% %datetime_iso%").unwrap();

    let mapping = VariableResolver::new().preset_mapping();
    let guid = mapping.get("%guid%").unwrap().to_string();
    let stamp = mapping.get("%datetime_iso%").unwrap().to_string();
    let report = TemplateInstantiator::new(mapping, true)
        .unwrap()
        .create_project(&template, &target_base(&temp))
        .unwrap();

    assert!(report
        .destination
        .join(&guid)
        .join(format!("{guid}.txt"))
        .is_file());
    assert_eq!(
        fs::read_to_string(report.destination.join("README.md")).unwrap(),
        format!("{guid} {stamp}")
    );
}

#[test]
fn test_merged_mapping_order_controls_nested_expansion() {
    let resolver = VariableResolver::new();
    let preset = VariableMapping::new()
        .with("%year%", "2025")
        .unwrap()
        .with("%tag%", "v-%client%")
        .unwrap();
    let user = VariableMapping::new()
        .with("%client%", "Acme-%year%")
        .unwrap();
    let merged = resolver.merged_mapping(&preset, &user);

    // preset value holding a user token is expanded; user value holding a
    // preset token is not, because presets run first
    assert_eq!(
        projgen::substitute("%tag%", &merged).unwrap(),
        "v-Acme-%year%"
    );
    assert_eq!(
        projgen::substitute("%client%", &merged).unwrap(),
        "Acme-%year%"
    );
}
