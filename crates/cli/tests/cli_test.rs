//! Integration tests for the CLI plumbing

use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use xamlgen::init::init_settings;
use xamlgen::{build_project, load_settings, read_document, render_output, Caret, Session};
use xamlgen_core::output::OutputType;

const PERSON: &str = "namespace Demo\n{\n    public class Person : EntityBase\n    {\n        public string FirstName { get; set; }\n    }\n}\n";

const ENTITY_BASE: &str = "Namespace Demo\n    Public MustInherit Class EntityBase\n        Public ReadOnly Property Id As Integer\n    End Class\nEnd Namespace\n";

#[test]
fn test_init_writes_loadable_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.toml");

    let written = init_settings(Some(&path), false).unwrap();
    assert_eq!(written, path);

    let settings = load_settings(Some(&path), None).unwrap();
    assert_eq!(settings.active_profile, "UWP");
    assert_eq!(settings.profile_names(), vec!["UWP", "UWP Grid"]);
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "active_profile = \"UWP\"\n").unwrap();

    let err = init_settings(Some(&path), false).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "active_profile = \"UWP\"\n");

    init_settings(Some(&path), true).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("[[profiles]]"));
}

#[test]
fn test_profile_override_must_exist() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");

    let settings = load_settings(Some(&path), Some("uwp grid")).unwrap();
    assert_eq!(settings.active().unwrap().name, "UWP Grid");

    assert!(load_settings(Some(&path), Some("WPF")).is_err());
}

#[test]
fn test_unsupported_source_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("MainPage.xaml");
    fs::write(&path, "<Page />").unwrap();

    let err = read_document(&path).unwrap_err();
    assert!(err.to_string().contains("Unsupported source file"));
}

#[test]
fn test_generate_with_cross_language_reference() {
    let dir = TempDir::new().unwrap();
    let person = dir.path().join("Person.cs");
    let entity = dir.path().join("EntityBase.vb");
    fs::write(&person, PERSON).unwrap();
    fs::write(&entity, ENTITY_BASE).unwrap();

    let settings = load_settings(Some(&dir.path().join("settings.toml")), None).unwrap();
    let project = build_project(&[entity], &[]).unwrap();
    assert_eq!(project.len(), 1);

    let session = Session::new(settings, project);
    let document = read_document(&person).unwrap();

    let output = session
        .generate(&document, Caret::LineColumn { line: 3, column: 10 })
        .unwrap();
    assert_eq!(output.output_type, OutputType::Class);
    assert_eq!(
        output.output,
        [
            "<StackPanel>",
            "    <TextBox Header=\"First Name\" Text=\"{x:Bind ViewModel.FirstName, Mode=TwoWay}\" />",
            "    <TextBlock Text=\"{x:Bind ViewModel.Id}\" />",
            "</StackPanel>",
        ]
        .join("\n")
    );

    let start = Caret::LineColumn { line: 5, column: 1 };
    let end = Caret::LineColumn { line: 5, column: 20 };
    let selection = session.selection(&document, start, end).unwrap();
    assert_eq!(selection.name, "FirstName");
    assert_eq!(selection.output_type, OutputType::Selection);
}

#[test]
fn test_render_output_as_json() {
    let output = xamlgen_core::output::AnalyzerOutput::new(
        "Title",
        "<TextBox />",
        OutputType::Property,
    );

    assert_eq!(render_output(&output, false).unwrap(), "<TextBox />");

    let json: serde_json::Value =
        serde_json::from_str(&render_output(&output, true).unwrap()).unwrap();
    assert_eq!(json["name"], "Title");
    assert_eq!(json["output_type"], "property");
}
