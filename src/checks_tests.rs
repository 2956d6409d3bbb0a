use super::*;
use tempfile::TempDir;

fn package(files: &[&str], dirs: &[&str]) -> (TempDir, ProjectPaths) {
    let dir = tempfile::tempdir().expect("create temp dir");
    for rel in dirs {
        std::fs::create_dir_all(dir.path().join(rel)).expect("create dir");
    }
    for rel in files {
        std::fs::write(dir.path().join(rel), "").expect("write file");
    }
    let paths = ProjectPaths::new(dir.path().to_path_buf());
    (dir, paths)
}

#[test]
fn phpcs_is_discovered_once_when_both_configs_exist() {
    let (_dir, paths) = package(&["phpcs.xml", "phpcs.xml.dist"], &[]);
    let checks = discover_checks(&CheckSource::Discover, &Requirements::ALL, &paths);
    assert_eq!(checks, vec![PHPCS]);
}

#[test]
fn discovery_follows_table_order() {
    let (_dir, paths) = package(
        &["phpbench.json", "psalm.xml", "phpcs.xml.dist", "mkdocs.yml"],
        &["doc/book", "docs/book"],
    );
    let checks = discover_checks(&CheckSource::Discover, &Requirements::ALL, &paths);
    assert_eq!(
        checks,
        vec![
            PHPCS,
            PSALM,
            PHPBENCH,
            YAMLLINT_MKDOCS,
            MARKDOWNLINT_DOC,
            MARKDOWNLINT_DOCS
        ]
    );
}

#[test]
fn disabled_requirements_skip_their_checks() {
    let (_dir, paths) = package(&["phpcs.xml", "mkdocs.yml"], &["docs/book"]);

    let docs_only = Requirements {
        code_checks: false,
        doc_linting: true,
    };
    assert_eq!(
        discover_checks(&CheckSource::Discover, &docs_only, &paths),
        vec![YAMLLINT_MKDOCS, MARKDOWNLINT_DOCS]
    );

    let code_only = Requirements {
        code_checks: true,
        doc_linting: false,
    };
    assert_eq!(
        discover_checks(&CheckSource::Discover, &code_only, &paths),
        vec![PHPCS]
    );

    assert!(discover_checks(&CheckSource::Discover, &Requirements::NONE, &paths).is_empty());
}

#[test]
fn book_probe_requires_a_directory() {
    let (_dir, paths) = package(&["doc"], &[]);
    std::fs::create_dir_all(paths.root().join("docs")).expect("create docs");
    std::fs::write(paths.root().join("docs/book"), "").expect("write book file");
    let checks = discover_checks(&CheckSource::Discover, &Requirements::ALL, &paths);
    assert!(checks.is_empty());
}

#[test]
fn explicit_checks_bypass_discovery() {
    let (_dir, paths) = package(&["phpcs.xml", "psalm.xml"], &[]);
    let source = CheckSource::Explicit(vec!["custom-cmd".to_string()]);
    let checks = discover_checks(&source, &Requirements::NONE, &paths);
    assert_eq!(checks, vec!["custom-cmd"]);
}

#[test]
fn shared_commands_are_deduplicated_across_rows() {
    let (_dir, paths) = package(&["a.json", "b.json"], &[]);
    let table = [
        CheckDefinition {
            command: "lint",
            governed: Governed::Code,
            probes: &[Probe::File("a.json")],
        },
        CheckDefinition {
            command: "lint",
            governed: Governed::Code,
            probes: &[Probe::File("b.json")],
        },
    ];
    let checks = discover_from_table(&table, &Requirements::ALL, &paths);
    assert_eq!(checks, vec!["lint"]);
}

#[test]
fn phpunit_config_detection() {
    let (_dir, paths) = package(&[], &[]);
    assert!(!has_phpunit_config(&paths));

    let (_dir, paths) = package(&["phpunit.xml"], &[]);
    assert!(has_phpunit_config(&paths));

    let (_dir, paths) = package(&["phpunit.xml.dist"], &[]);
    assert!(has_phpunit_config(&paths));
}
