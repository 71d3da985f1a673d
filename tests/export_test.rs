//! End-to-end export runs against a scripted page.

#![allow(clippy::expect_used)]

mod common;

use std::io::{Cursor, Read};

use common::{list_html, navigating, Click, Harness, ScriptedPage, LIST_URL};
use kb_exporter::{export_page, CollisionPolicy, Error, Options, StaticPage, Status};

fn names(artifacts: &[kb_exporter::Artifact]) -> Vec<&str> {
    artifacts.iter().map(|a| a.name.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn exports_every_document_in_order() {
    let page = ScriptedPage::new(
        LIST_URL,
        list_html(&["Plan A", "Notes", "Roadmap"]),
        navigating(&[]),
    );
    let harness = Harness::new(page, Options::default());

    let report = harness.session.trigger_export().await.expect("export succeeds");

    assert_eq!(report.located, 3);
    assert_eq!(report.artifacts, vec!["Plan_A.md", "Notes.md", "Roadmap.md"]);
    assert!(report.skipped.is_empty());
    assert!(report.bundle_name.starts_with("knowledge-base_"));
    assert!(report.bundle_name.ends_with(".zip"));
    assert!(!report.bundle_name.contains(':'));

    let bundled = harness.bundled();
    assert!(bundled[0].content.starts_with("---\ntitle: \"Plan A\"\n"));
    assert!(bundled[0].content.ends_with("\n---\n\nBody of Plan A"));
    assert!(bundled[2].content.ends_with("Body of Roadmap"));

    assert_eq!(*harness.downloader.calls.borrow(), vec![report.bundle_name.clone()]);
    assert_eq!(
        harness.session.page().clicks(),
        vec!["Plan A", "Back", "Notes", "Back", "Roadmap", "Back"]
    );
}

#[tokio::test(start_paused = true)]
async fn reports_progress_then_completion() {
    let page = ScriptedPage::new(LIST_URL, list_html(&["Plan A", "Notes"]), navigating(&[]));
    let harness = Harness::new(page, Options::default());

    harness.session.trigger_export().await.expect("export succeeds");

    assert_eq!(
        harness.statuses(),
        vec![
            Status::Located { count: 2 },
            Status::Progress { current: 1, total: 2 },
            Status::Progress { current: 2, total: 2 },
            Status::Complete { exported: 2, skipped: 0 },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn one_failing_document_of_five_is_skipped() {
    let page = ScriptedPage::new(
        LIST_URL,
        list_html(&["A", "B", "C", "D", "E"]),
        navigating(&["C"]),
    );
    let harness = Harness::new(page, Options::default());

    let report = harness.session.trigger_export().await.expect("export succeeds");

    assert_eq!(report.artifacts, vec!["A.md", "B.md", "D.md", "E.md"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].position, 2);
    assert!(report.skipped[0].reason.contains("C is detached"));
    assert_eq!(
        harness.statuses().last(),
        Some(&Status::Complete { exported: 4, skipped: 1 })
    );
}

#[tokio::test(start_paused = true)]
async fn failures_keep_survivor_order() {
    let titles = ["One", "Two", "Three", "Four", "Five", "Six"];
    let page = ScriptedPage::new(LIST_URL, list_html(&titles), navigating(&["Two", "Five"]));
    let harness = Harness::new(page, Options::default());

    harness.session.trigger_export().await.expect("export succeeds");

    assert_eq!(
        names(&harness.bundled()),
        vec!["One.md", "Three.md", "Four.md", "Six.md"]
    );
}

#[tokio::test(start_paused = true)]
async fn no_documents_never_reaches_archiver_or_downloader() {
    let page = ScriptedPage::new(
        "https://app.test/settings",
        "<html><body><p>Just a paragraph.</p></body></html>",
        |_| Click::Ignore,
    );
    let harness = Harness::new(page, Options::default());

    let err = harness.session.trigger_export().await.expect_err("nothing to export");

    assert!(matches!(err, Error::NoDocuments));
    assert!(harness.archiver.calls.borrow().is_empty());
    assert!(harness.downloader.calls.borrow().is_empty());
    assert!(harness.session.page().clicks().is_empty());
    assert_eq!(
        harness.statuses(),
        vec![Status::Failed("No documents found to export".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn every_document_failing_is_fatal() {
    let page = ScriptedPage::new(LIST_URL, list_html(&["A", "B"]), navigating(&["A", "B"]));
    let harness = Harness::new(page, Options::default());

    let err = harness.session.trigger_export().await.expect_err("no valid documents");

    assert!(matches!(err, Error::NoValidDocuments));
    assert!(harness.archiver.calls.borrow().is_empty());
    assert!(harness.downloader.calls.borrow().is_empty());
    assert!(matches!(harness.statuses().last(), Some(Status::Failed(_))));
}

#[tokio::test(start_paused = true)]
async fn duplicate_titles_keep_the_same_name_by_default() {
    let page = ScriptedPage::new(
        LIST_URL,
        list_html(&["Plan A", "Plan A", "Notes"]),
        navigating(&[]),
    );
    let harness = Harness::new(page, Options::default());

    harness.session.trigger_export().await.expect("export succeeds");

    assert_eq!(names(&harness.bundled()), vec!["Plan_A.md", "Plan_A.md", "Notes.md"]);
}

#[tokio::test(start_paused = true)]
async fn duplicate_titles_can_be_suffixed() {
    let page = ScriptedPage::new(
        LIST_URL,
        list_html(&["Plan A", "Plan A", "Notes"]),
        navigating(&[]),
    );
    let options = Options {
        collision_policy: CollisionPolicy::Suffix,
        ..Options::default()
    };
    let harness = Harness::new(page, options);

    harness.session.trigger_export().await.expect("export succeeds");

    assert_eq!(names(&harness.bundled()), vec!["Plan_A.md", "Plan_A_2.md", "Notes.md"]);
}

#[tokio::test(start_paused = true)]
async fn quoted_title_is_escaped_and_sanitized() {
    let page = ScriptedPage::new(LIST_URL, list_html(&[r#"Budget "2024""#]), navigating(&[]));
    let harness = Harness::new(page, Options::default());

    harness.session.trigger_export().await.expect("export succeeds");

    let bundled = harness.bundled();
    assert_eq!(bundled[0].name, "Budget_2024.md");
    assert!(bundled[0].content.contains("title: \"Budget \\\"2024\\\"\"\n"));

    let (head, _) = bundled[0].content.split_once("\n\n").expect("blank separator");
    assert_eq!(head.lines().filter(|line| *line == "---").count(), 2);
}

#[tokio::test(start_paused = true)]
async fn symbol_only_title_gets_generated_name_and_frontmatter() {
    let page = ScriptedPage::new(LIST_URL, list_html(&["???", "Notes"]), navigating(&[]));
    let harness = Harness::new(page, Options::default());

    harness.session.trigger_export().await.expect("export succeeds");

    let bundled = harness.bundled();
    assert!(bundled[0].name.starts_with("document_"));
    assert!(bundled[0].name.ends_with("_1.md"));
    assert!(bundled[0].content.starts_with("---\ntitle: \"???\"\n"));
    assert!(bundled[0].content.ends_with("\n---\n\nBody of ???"));
    assert_eq!(bundled[1].name, "Notes.md");
}

#[tokio::test(start_paused = true)]
async fn table_rows_take_their_title_cell() {
    let rows: String = [("Plan A", "12 KB"), ("Notes", "3 KB")]
        .iter()
        .map(|(title, size)| {
            format!(
                r#"<tr data-testid="project-document-item"><td class="title">{title}</td><td>{size}</td></tr>"#
            )
        })
        .collect();
    let html = format!(
        r#"<html><head><title>Acme Project</title></head><body><main><table><tbody>{rows}</tbody></table></main></body></html>"#
    );
    let page = ScriptedPage::new(LIST_URL, html, navigating(&[]));
    let harness = Harness::new(page, Options::default());

    harness.session.trigger_export().await.expect("export succeeds");

    let bundled = harness.bundled();
    assert_eq!(names(&bundled), vec!["Plan_A.md", "Notes.md"]);
    assert!(bundled[0].content.starts_with("---\ntitle: \"Plan A\"\n"));
    assert!(bundled[0].content.ends_with("Body of Plan A 12 KB"));
    assert_eq!(
        harness.session.page().clicks(),
        vec!["Plan A 12 KB", "Back", "Notes 3 KB", "Back"]
    );
}

#[tokio::test(start_paused = true)]
async fn modal_content_is_read_in_place() {
    let page = ScriptedPage::new(LIST_URL, list_html(&["Plan A"]), |element| {
        if element.text == "Back" {
            Click::Back
        } else {
            Click::Overlay(
                r#"<div role="dialog"><p>Modal body</p></div><button class="back-button">Back</button>"#
                    .to_string(),
            )
        }
    });
    let harness = Harness::new(page, Options::default());

    harness.session.trigger_export().await.expect("export succeeds");

    assert!(harness.bundled()[0].content.ends_with("\n\nModal body"));
    assert_eq!(harness.session.page().clicks(), vec!["Plan A", "Back"]);
}

#[tokio::test(start_paused = true)]
async fn list_text_is_used_when_documents_are_not_opened() {
    let page = ScriptedPage::new(LIST_URL, list_html(&["Plan A"]), navigating(&[]));
    let options = Options {
        open_documents: false,
        ..Options::default()
    };
    let harness = Harness::new(page, options);

    harness.session.trigger_export().await.expect("export succeeds");

    assert!(harness.bundled()[0].content.ends_with("\n\nPlan A"));
    assert!(harness.session.page().clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn empty_element_gets_placeholder_title_and_sentinel_content() {
    let html = r#"<html><body><ul><li data-testid="project-document-item"><img src="doc.png"></li></ul></body></html>"#;
    let page = ScriptedPage::new(LIST_URL, html, |_| Click::Ignore);
    let harness = Harness::new(page, Options::default());

    harness.session.trigger_export().await.expect("export succeeds");

    let bundled = harness.bundled();
    assert!(bundled[0].name.starts_with("Document_"));
    assert!(bundled[0].content.contains("title: \"Document "));
    assert!(bundled[0].content.ends_with("\n\nNo content available"));
}

#[tokio::test(start_paused = true)]
async fn second_trigger_is_rejected_while_running() {
    let page = ScriptedPage::new(LIST_URL, list_html(&["Plan A", "Notes"]), navigating(&[]));
    let harness = Harness::new(page, Options::default());
    let session = &harness.session;

    let (first, second) = tokio::join!(session.trigger_export(), async {
        assert!(session.is_exporting());
        session.trigger_export().await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(Error::ExportInProgress)));
    assert!(!session.is_exporting());
    assert_eq!(session.page().clicks().len(), 4);

    session.trigger_export().await.expect("a new run starts after the first ends");
}

#[tokio::test(start_paused = true)]
async fn download_failure_is_reported() {
    let page = ScriptedPage::new(LIST_URL, list_html(&["Plan A"]), navigating(&[]));
    let downloader = common::RecordingDownloader {
        fail: true,
        ..Default::default()
    };
    let harness = Harness::with_downloader(page, Options::default(), downloader);

    let err = harness.session.trigger_export().await.expect_err("download fails");

    assert!(matches!(err, Error::DownloadError(_)));
    assert_eq!(harness.archiver.calls.borrow().len(), 1);
    assert_eq!(
        harness.statuses().last(),
        Some(&Status::Failed("Download failed: disk full".to_string()))
    );
}

#[tokio::test]
async fn saved_page_exports_to_a_zip_on_disk() {
    let dir = std::env::temp_dir().join(format!("kb-exporter-e2e-{}", std::process::id()));
    let page = StaticPage::new(LIST_URL, list_html(&["Plan A", "Notes"]));
    let options = Options {
        open_documents: false,
        archive_label: "Acme".to_string(),
        ..Options::default()
    };

    let report = export_page(page, options, &dir).await.expect("export succeeds");
    let path = report.destination.expect("saved");
    assert!(path.starts_with(&dir));

    let bytes = std::fs::read(&path).expect("bundle on disk");
    assert_eq!(bytes.len(), report.bundle_bytes);

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut index = String::new();
    archive
        .by_name("knowledge-base/00-index.md")
        .expect("index entry")
        .read_to_string(&mut index)
        .expect("utf-8 index");
    assert!(index.starts_with("# Acme Index\n"));
    assert!(index.contains("- [[Plan_A]]\n- [[Notes]]\n"));

    let mut notes = String::new();
    archive
        .by_name("knowledge-base/Notes.md")
        .expect("document entry")
        .read_to_string(&mut notes)
        .expect("utf-8 document");
    assert!(notes.starts_with("---\ntitle: \"Notes\"\nproject: \"Knowledge Base\"\ndate: \""));
    assert!(notes.ends_with("\n---\n\nNotes"));

    let _ = std::fs::remove_dir_all(&dir);
}
