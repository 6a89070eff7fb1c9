//! Reconciler behaviour against in-memory collaborators.

use std::fs;

use blwiki_sync::mock::{MockSource, MockWiki, WikiCall};
use blwiki_sync::{
    AttachmentId, FsSource, PageId, PageOutcome, Reconciler, SyncError, SyncOptions, SyncReport,
};
use pretty_assertions::assert_eq;

fn run(wiki: &MockWiki, source: &MockSource, options: SyncOptions) -> SyncReport {
    Reconciler::new(wiki, wiki, source, source, options)
        .run()
        .unwrap()
}

fn with_delete() -> SyncOptions {
    SyncOptions {
        delete_mode: true,
        ..SyncOptions::default()
    }
}

/// `(logical name, failed?)` per document, in processing order.
fn failed_flags(report: &SyncReport) -> Vec<(&str, bool)> {
    report
        .documents
        .iter()
        .map(|d| {
            let failed = matches!(d.outcome, PageOutcome::Failed(_));
            (d.logical_name.as_str(), failed)
        })
        .collect()
}

#[test]
fn new_page_is_created_then_updated_with_rewritten_content() {
    let wiki = MockWiki::new();
    let source = MockSource::new()
        .with_document("a", "![pic](/files/pic.png)")
        .with_file("pic.png", b"png");

    let report = run(&wiki, &source, SyncOptions::default());

    let page = wiki.page_id("a").unwrap();
    let attachment = wiki.attachment_id(page, "pic.png").unwrap();
    assert_eq!(
        wiki.writes(),
        vec![
            WikiCall::CreatePage {
                name: "a".to_owned(),
                content: "![pic](/files/pic.png)".to_owned(),
            },
            WikiCall::UpdatePage {
                id: page,
                name: "a".to_owned(),
                content: format!("![pic][{attachment}]"),
            },
        ]
    );
    assert_eq!(wiki.upload_count(), 1);
    assert_eq!(report.documents[0].outcome, PageOutcome::Created(page));
}

#[test]
fn upload_happens_between_create_and_update() {
    let wiki = MockWiki::new();
    let source = MockSource::new()
        .with_document("a", "![pic](/files/pic.png)")
        .with_file("pic.png", b"png");

    run(&wiki, &source, SyncOptions::default());

    let page = wiki.page_id("a").unwrap();
    let calls: Vec<_> = wiki
        .calls()
        .into_iter()
        .filter(|c| !matches!(c, WikiCall::ListPages | WikiCall::ListAttachments(_)))
        .collect();
    assert!(matches!(calls[0], WikiCall::CreatePage { .. }));
    assert_eq!(
        calls[1],
        WikiCall::Upload {
            page,
            file_name: "pic.png".to_owned(),
        }
    );
    assert!(matches!(calls[2], WikiCall::UpdatePage { .. }));
}

#[test]
fn equivalent_page_is_not_updated() {
    let wiki = MockWiki::new()
        .with_page(PageId(1), "a", "# Title\n\n![pic][7]\n")
        .with_attachment(PageId(1), AttachmentId(7), "pic.png");
    let source = MockSource::new()
        .with_document("a", "#   Title\r\n\r\n  ![pic](/files/pic.png)  \r\n")
        .with_file("pic.png", b"png");

    let report = run(&wiki, &source, SyncOptions::default());

    assert!(wiki.writes().is_empty());
    assert_eq!(wiki.upload_count(), 0);
    assert_eq!(report.documents[0].outcome, PageOutcome::Unchanged);
}

#[test]
fn changed_page_is_updated_in_place() {
    let wiki = MockWiki::new().with_page(PageId(1), "guide", "old text");
    let source = MockSource::new().with_document("guide", "new text\n");

    let report = run(&wiki, &source, SyncOptions::default());

    assert_eq!(
        wiki.writes(),
        vec![WikiCall::UpdatePage {
            id: PageId(1),
            name: "guide".to_owned(),
            content: "new text\n".to_owned(),
        }]
    );
    assert_eq!(report.documents[0].outcome, PageOutcome::Updated);
}

#[test]
fn update_uploads_missing_attachment_and_reuses_existing() {
    let wiki = MockWiki::new()
        .with_page(PageId(1), "a", "![old][7]")
        .with_attachment(PageId(1), AttachmentId(7), "old.png");
    let source = MockSource::new()
        .with_document("a", "![old](/files/old.png)\n![new](/files/new.png)")
        .with_file("old.png", b"1")
        .with_file("new.png", b"2");

    run(&wiki, &source, SyncOptions::default());

    let new_id = wiki.attachment_id(PageId(1), "new.png").unwrap();
    assert_eq!(wiki.upload_count(), 1);
    assert_eq!(
        wiki.content_of(PageId(1)).unwrap(),
        format!("![old][7]\n![new][{new_id}]")
    );
}

#[test]
fn remote_content_with_raw_file_links_is_always_reported_changed() {
    // The remote side is compared as stored; raw `/files/` links on the
    // wiki never match a locally rewritten document.
    let wiki = MockWiki::new()
        .with_page(PageId(1), "a", "![pic](/files/pic.png)")
        .with_attachment(PageId(1), AttachmentId(7), "pic.png");
    let source = MockSource::new()
        .with_document("a", "![pic](/files/pic.png)")
        .with_file("pic.png", b"png");

    let report = run(&wiki, &source, SyncOptions::default());

    assert_eq!(report.documents[0].outcome, PageOutcome::Updated);
    assert_eq!(wiki.upload_count(), 0);
    assert_eq!(wiki.content_of(PageId(1)).unwrap(), "![pic][7]");
}

#[test]
fn orphan_is_deleted_in_delete_mode() {
    let wiki = MockWiki::new()
        .with_page(PageId(1), "a", "A")
        .with_page(PageId(2), "b", "B");
    let source = MockSource::new().with_document("a", "A");

    let report = run(&wiki, &source, with_delete());

    assert_eq!(wiki.writes(), vec![WikiCall::DeletePage(PageId(2))]);
    assert_eq!(report.deleted, vec!["b".to_owned()]);
}

#[test]
fn orphan_is_kept_without_delete_mode() {
    let wiki = MockWiki::new()
        .with_page(PageId(1), "a", "A")
        .with_page(PageId(2), "b", "B");
    let source = MockSource::new().with_document("a", "A");

    let report = run(&wiki, &source, SyncOptions::default());

    assert!(wiki.writes().is_empty());
    assert_eq!(report.orphans_kept, vec!["b".to_owned()]);
}

#[test]
fn failed_document_still_counts_as_processed() {
    let wiki = MockWiki::new()
        .with_page(PageId(1), "broken", "x")
        .with_failing_content(PageId(1));
    let source = MockSource::new().with_document("broken", "y");

    let report = run(&wiki, &source, with_delete());

    assert!(wiki.writes().is_empty());
    assert!(matches!(
        report.documents[0].outcome,
        PageOutcome::Failed(_)
    ));
}

#[test]
fn document_failure_does_not_stop_the_run() {
    let wiki = MockWiki::new()
        .with_page(PageId(1), "a", "old")
        .with_failing_attachments(PageId(1));
    let source = MockSource::new()
        .with_document("a", "new")
        .with_unreadable_document("b")
        .with_document("c", "C");

    let report = run(&wiki, &source, SyncOptions::default());

    assert_eq!(
        failed_flags(&report),
        vec![("a", true), ("b", true), ("c", false)]
    );
    assert!(wiki.page_id("c").is_some());
    assert!(report.has_failures());
}

#[test]
fn failed_deletion_does_not_stop_other_deletions() {
    let wiki = MockWiki::new()
        .with_page(PageId(1), "x", "")
        .with_page(PageId(2), "y", "")
        .with_failing_delete(PageId(1));
    let source = MockSource::new();

    let report = run(&wiki, &source, with_delete());

    assert_eq!(
        wiki.writes(),
        vec![
            WikiCall::DeletePage(PageId(1)),
            WikiCall::DeletePage(PageId(2))
        ]
    );
    assert_eq!(report.deleted, vec!["y".to_owned()]);
    assert_eq!(report.delete_failures.len(), 1);
    assert_eq!(report.delete_failures[0].0, "x");
}

#[test]
fn index_fetch_failure_aborts_without_writes() {
    let wiki = MockWiki::new().with_failing_list();
    let source = MockSource::new().with_document("a", "A");

    let result = Reconciler::new(&wiki, &wiki, &source, &source, with_delete()).run();

    assert!(matches!(result, Err(SyncError::Remote(_))));
    assert!(wiki.writes().is_empty());
}

#[test]
fn missing_documents_root_aborts_without_writes() {
    let wiki = MockWiki::new().with_page(PageId(1), "a", "A");
    let source = MockSource::new().with_missing_root();

    let result = Reconciler::new(&wiki, &wiki, &source, &source, with_delete()).run();

    assert!(matches!(result, Err(SyncError::Source(_))));
    assert!(wiki.writes().is_empty());
}

#[test]
fn index_is_fetched_once() {
    let wiki = MockWiki::new().with_page(PageId(1), "a", "A");
    let source = MockSource::new()
        .with_document("a", "A")
        .with_document("b", "B")
        .with_document("c", "C");

    run(&wiki, &source, with_delete());

    let listings = wiki
        .calls()
        .iter()
        .filter(|c| **c == WikiCall::ListPages)
        .count();
    assert_eq!(listings, 1);
}

#[test]
fn page_created_in_this_run_is_not_deleted() {
    let wiki = MockWiki::new();
    let source = MockSource::new().with_document("fresh", "F");

    run(&wiki, &source, with_delete());

    assert!(
        !wiki
            .writes()
            .iter()
            .any(|c| matches!(c, WikiCall::DeletePage(_)))
    );
}

#[test]
fn duplicate_logical_name_updates_page_created_earlier() {
    let wiki = MockWiki::new();
    let source = MockSource::new()
        .with_document("dup", "first")
        .with_document("dup", "first");

    run(&wiki, &source, SyncOptions::default());

    let creates = wiki
        .writes()
        .iter()
        .filter(|c| matches!(c, WikiCall::CreatePage { .. }))
        .count();
    assert_eq!(creates, 1);
}

#[test]
fn dry_run_reads_only() {
    let wiki = MockWiki::new()
        .with_page(PageId(1), "changed", "old")
        .with_page(PageId(2), "same", "same")
        .with_page(PageId(3), "orphan", "");
    let source = MockSource::new()
        .with_document("changed", "![pic](/files/pic.png)")
        .with_document("same", "same")
        .with_document("new", "N")
        .with_file("pic.png", b"png");
    let options = SyncOptions {
        delete_mode: true,
        dry_run: true,
    };

    let report = run(&wiki, &source, options);

    assert!(wiki.writes().is_empty());
    assert_eq!(wiki.upload_count(), 0);
    let outcomes: Vec<_> = report.documents.iter().map(|d| d.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![
            PageOutcome::WouldUpdate,
            PageOutcome::Unchanged,
            PageOutcome::WouldCreate
        ]
    );
    assert_eq!(report.would_delete, vec!["orphan".to_owned()]);
}

#[test]
fn failed_upload_on_new_page_leaves_raw_page_and_continues() {
    let wiki = MockWiki::new().with_failing_upload("pic.png");
    let source = MockSource::new()
        .with_document("a", "![pic](/files/pic.png)")
        .with_document("b", "B")
        .with_file("pic.png", b"png");

    let report = run(&wiki, &source, SyncOptions::default());

    let page = wiki.page_id("a").unwrap();
    let calls: Vec<_> = wiki
        .calls()
        .into_iter()
        .filter(|c| !matches!(c, WikiCall::ListPages | WikiCall::ListAttachments(_)))
        .take(2)
        .collect();
    assert_eq!(
        calls,
        vec![
            WikiCall::CreatePage {
                name: "a".to_owned(),
                content: "![pic](/files/pic.png)".to_owned(),
            },
            WikiCall::Upload {
                page,
                file_name: "pic.png".to_owned(),
            },
        ]
    );
    assert!(
        !wiki
            .writes()
            .iter()
            .any(|c| matches!(c, WikiCall::UpdatePage { id, .. } if *id == page))
    );
    assert_eq!(wiki.content_of(page).unwrap(), "![pic](/files/pic.png)");
    assert_eq!(failed_flags(&report), vec![("a", true), ("b", false)]);
    assert!(wiki.page_id("b").is_some());
}

#[test]
fn failed_upload_on_existing_page_skips_update() {
    let wiki = MockWiki::new()
        .with_page(PageId(1), "a", "old")
        .with_failing_upload("pic.png");
    let source = MockSource::new()
        .with_document("a", "![pic](/files/pic.png)")
        .with_file("pic.png", b"png");

    let report = run(&wiki, &source, SyncOptions::default());

    assert!(wiki.writes().is_empty());
    assert_eq!(wiki.upload_count(), 1);
    assert!(matches!(
        report.documents[0].outcome,
        PageOutcome::Failed(_)
    ));
}

#[test]
fn document_in_dot_directory_is_synced_not_deleted() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".notes")).unwrap();
    fs::write(dir.path().join(".notes/plan.md"), "plan").unwrap();
    fs::write(dir.path().join("guide.md"), "guide").unwrap();
    let docs = FsSource::new(dir.path().to_path_buf());
    let files = MockSource::new();
    let wiki = MockWiki::new()
        .with_page(PageId(1), "guide", "guide")
        .with_page(PageId(2), ".notes/plan", "plan");

    let report = Reconciler::new(&wiki, &wiki, &docs, &files, with_delete())
        .run()
        .unwrap();

    assert!(wiki.writes().is_empty());
    assert!(report.deleted.is_empty());
    assert_eq!(
        failed_flags(&report),
        vec![(".notes/plan", false), ("guide", false)]
    );
}
