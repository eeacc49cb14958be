//! Integration tests for retagging sessions.
//!
//! Runs whole sessions over the in-memory and JSON file stores.

use pdf_tagtree::content::{ContentObject, FormGroup, ImageObject, Page, TextRun};
use pdf_tagtree::events::PageContentObserver;
use pdf_tagtree::session::{
    AutoTagger, DocumentStore, JsonDocumentStore, MarkedContentTagger, MemoryStore, Session,
};
use pdf_tagtree::structure::{find, find_all, StructNode, StructTree, StructType};
use pdf_tagtree::{Document, Error, RetagConfig, Result};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Recorder(RefCell<Vec<u32>>);

impl PageContentObserver for Recorder {
    fn on_page_content_changed(&self, page: u32) {
        self.0.borrow_mut().push(page);
    }
}

/// Three pages of text, no images, some content already marked.
fn report_without_figures() -> Document {
    Document::new(vec![
        Page::new(vec![
            ContentObject::Text(TextRun::new("Annual Report", "Arial-Black", 30.0).with_mcid(0)),
            ContentObject::Text(TextRun::new("Summary", "Arial-Bold", 18.0).with_mcid(1)),
        ]),
        Page::new(vec![ContentObject::Text(TextRun::new("Details", "Arial", 11.0))]),
        Page::new(vec![ContentObject::Form(FormGroup::new(vec![ContentObject::Text(
            TextRun::new("Closing", "Arial-Bold", 16.0),
        )]))]),
    ])
}

#[test]
fn test_missing_figure_does_not_abort() {
    let mut store = MemoryStore::new();
    store.insert("report", report_without_figures());

    let recorder = Rc::new(Recorder::default());
    let mut session = Session::new(store, MarkedContentTagger::new().with_page_type(StructType::NonStruct))
        .with_observer(recorder.clone());
    let report = session.run("report", "report-tagged").unwrap();

    assert!(report.figure_with_alt.is_none());
    assert_eq!(report.skipped.len(), 2);
    assert!(report.skipped.iter().any(|s| s.contains("Figure")));
    assert!(report.skipped.iter().any(|s| s.contains("Table")));
    assert_eq!(report.headings_promoted, 3);

    // page 0 cleared, then all three marked by the tagger
    assert_eq!(*recorder.0.borrow(), vec![0, 0, 1, 2]);
    assert_eq!(Rc::strong_count(&recorder), 2);

    let labeled: Vec<bool> = report.labeled.iter().map(|m| m.node.is_some()).collect();
    assert_eq!(labeled, vec![true, true]);

    let saved = session.store().get("report-tagged").unwrap();
    let tree = saved.struct_tree().unwrap();
    assert_eq!(find_all(tree, &StructType::H1, None).len(), 1);
    assert_eq!(find_all(tree, &StructType::H2, None).len(), 2);
    assert!(saved.info.mod_date.is_some());
    assert_eq!(saved.pages().outstanding(), 0);
}

#[test]
fn test_default_session_finds_labeled_pages() {
    let mut store = MemoryStore::new();
    store.insert("report", report_without_figures());
    let mut session = Session::new(store, MarkedContentTagger::new());
    let report = session.run("report", "report-tagged").unwrap();

    let tree = session.store().get("report-tagged").unwrap().struct_tree().unwrap();
    let page2 = find(tree, &StructType::NonStruct, Some("Page 2"));
    assert!(page2.is_some());
    assert_eq!(report.labeled[0].title, "Page 2");
    assert_eq!(report.labeled[0].node, page2);
    assert_eq!(report.labeled[1].node, find(tree, &StructType::NonStruct, Some("Page 3")));
    assert!(report.labeled[1].node.is_some());
}

#[test]
fn test_figure_gets_alt_text() {
    let mut store = MemoryStore::new();
    store.insert(
        "in",
        Document::new(vec![Page::new(vec![
            ContentObject::Image(ImageObject {
                width: 100,
                height: 50,
                mcid: None,
            }),
            ContentObject::Image(ImageObject {
                width: 10,
                height: 10,
                mcid: None,
            }),
        ])]),
    );
    let config = RetagConfig::new().with_figure_alt_text(Some("Quarterly revenue".to_string()));
    let mut session = Session::new(store, MarkedContentTagger::new()).with_config(config);
    let report = session.run("in", "out").unwrap();

    let saved = session.store().get("out").unwrap();
    let tree = saved.struct_tree().unwrap();
    let figures = find_all(tree, &StructType::Figure, None);
    assert_eq!(figures.len(), 2);
    assert_eq!(report.figure_with_alt, Some(figures[0]));
    assert_eq!(
        tree.node(figures[0]).unwrap().attributes.get("Alt").map(String::as_str),
        Some("Quarterly revenue")
    );
    assert!(tree.node(figures[1]).unwrap().attributes.is_empty());
}

/// Tagger producing a table whose first row has data cells.
struct TableTagger;

impl AutoTagger for TableTagger {
    fn auto_tag(&self, doc: &mut Document) -> Result<StructTree> {
        let base = MarkedContentTagger::new().auto_tag(doc)?;
        let mut tree = base;
        let root = tree.roots()[0];
        let table = tree.push_child(root, StructNode::new(StructType::Table))?;
        for _ in 0..2 {
            let row = tree.push_child(table, StructNode::new(StructType::TR))?;
            for _ in 0..3 {
                tree.push_child(row, StructNode::new(StructType::TD))?;
            }
        }
        Ok(tree)
    }
}

#[test]
fn test_table_header_row() {
    let mut store = MemoryStore::new();
    store.insert("in", report_without_figures());
    let mut session = Session::new(store, TableTagger);
    let report = session.run("in", "out").unwrap();

    assert_eq!(report.header_cells, 3);
    let tree = session.store().get("out").unwrap().struct_tree().unwrap();
    assert_eq!(find_all(tree, &StructType::TH, None).len(), 3);
    assert_eq!(find_all(tree, &StructType::TD, None).len(), 3);
}

#[test]
fn test_json_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    let output = dir.path().join("output.json");

    let mut store = JsonDocumentStore::new();
    store.save(&report_without_figures(), &input).unwrap();

    let config = RetagConfig::new().with_document_title("Annual Report 2024");
    let mut session = Session::new(JsonDocumentStore::new(), MarkedContentTagger::new()).with_config(config);
    let report = session.run(&input, &output).unwrap();
    assert_eq!(report.headings_promoted, 3);

    let saved = store.open(&output).unwrap();
    assert_eq!(saved.info.title.as_deref(), Some("Annual Report 2024"));
    let mut tree = saved.struct_tree().unwrap().clone();
    assert!(tree.is_parent_tree_stale());
    pdf_tagtree::structure::rebuild_parent_index(&mut tree, saved.page_count()).unwrap();
    assert_eq!(tree.parent_tree().unwrap().len(), report.parent_tree_entries);
    assert!(find(&tree, &StructType::NonStruct, Some("Page 3")).is_some());
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(JsonDocumentStore::new(), MarkedContentTagger::new());
    let err = session
        .run(dir.path().join("absent.json"), dir.path().join("out.json"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn test_invalid_config_is_rejected_before_opening() {
    let mut store = MemoryStore::new();
    store.insert("in", report_without_figures());
    let mut session =
        Session::new(store, MarkedContentTagger::new()).with_config(RetagConfig::new().with_max_depth(0));
    assert!(matches!(session.run("in", "out"), Err(Error::Config(_))));
    assert_eq!(session.store().len(), 1);
}
