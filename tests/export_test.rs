use hilite::annotate::{AnnotationStore, Span};
use hilite::decision::Decision;
use hilite::export::{ExportOptions, export_decision};
use hilite::{ColorDepth, ExportFormat};

fn annotated_fixture() -> (Decision, AnnotationStore) {
    let decision = Decision::from_text("21-12347", "The veteran appeals the denial.");
    let mut store = AnnotationStore::for_text(&decision.body);
    store
        .add_highlight(Span::new(4, 11), "veteran".to_string())
        .expect("fixture span is valid");
    store
        .add_note("follow up on the effective date")
        .expect("fixture note is non-empty");
    (decision, store)
}

#[test]
fn test_text_export_contains_body_and_notes() {
    let (decision, store) = annotated_fixture();
    let options = ExportOptions::default();

    let output = export_decision(&decision, &store, &ExportFormat::Text, &options).unwrap();
    assert!(output.contains("Decision Citation: 21-12347"));
    assert!(output.contains("The veteran appeals the denial."));
    assert!(output.contains("follow up on the effective date"));
}

#[test]
fn test_markdown_export_marks_highlights() {
    let (decision, store) = annotated_fixture();
    let options = ExportOptions::default();

    let output = export_decision(&decision, &store, &ExportFormat::Markdown, &options).unwrap();
    assert!(output.contains("# Decision 21-12347"));
    assert!(output.contains("==veteran=="), "highlights become ==marks==");
    assert!(output.contains("## Highlights"));
    assert!(output.contains("> veteran"));
    assert!(output.contains("## Notes"));
}

#[test]
fn test_json_export_parses_back() {
    let (decision, store) = annotated_fixture();
    let options = ExportOptions::default();

    let output = export_decision(&decision, &store, &ExportFormat::Json, &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).expect("export must be valid JSON");

    assert_eq!(value["citation"], "21-12347");
    assert_eq!(value["highlights"].as_array().unwrap().len(), 1);
    assert_eq!(value["highlights"][0]["text"], "veteran");
    assert_eq!(value["notes"].as_array().unwrap().len(), 1);
}

#[test]
fn test_ansi_export_basic() {
    let (decision, store) = annotated_fixture();
    let options = ExportOptions {
        terminal_width: 80,
        color_depth: ColorDepth::TrueColor,
    };

    let output = export_decision(&decision, &store, &ExportFormat::Ansi, &options).unwrap();
    assert!(output.contains("Decision Citation: 21-12347"));
    assert!(output.contains("veteran"));
    assert!(output.contains("[1m"), "header should be bold");
    assert!(output.contains("[48;2;"), "highlight should set an RGB background");
    assert!(output.contains("[0m"), "styles must reset");
}

#[test]
fn test_ansi_export_color_depths() {
    let (decision, store) = annotated_fixture();

    // Monochrome: no color escapes at all
    let mono_options = ExportOptions {
        terminal_width: 80,
        color_depth: ColorDepth::Monochrome,
    };
    let mono_output =
        export_decision(&decision, &store, &ExportFormat::Ansi, &mono_options).unwrap();
    assert!(!mono_output.contains("[48;2;"));
    assert!(!mono_output.contains("[48;5;"));

    // 256 colors: indexed background, no RGB
    let extended_options = ExportOptions {
        terminal_width: 80,
        color_depth: ColorDepth::Extended,
    };
    let extended_output =
        export_decision(&decision, &store, &ExportFormat::Ansi, &extended_options).unwrap();
    assert!(extended_output.contains("[48;5;"));
    assert!(!extended_output.contains("[48;2;"));
}

#[test]
fn test_export_round_trips_body_without_annotations() {
    let decision = Decision::from_text("A19-0023", "Nothing is marked in this decision.");
    let store = AnnotationStore::for_text(&decision.body);
    let options = ExportOptions::default();

    let output = export_decision(&decision, &store, &ExportFormat::Markdown, &options).unwrap();
    assert!(output.contains("Nothing is marked in this decision."));
    assert!(!output.contains("=="), "no highlights, no marks");
    assert!(!output.contains("## Notes"));
}
