mod helpers;

use anyhow::Result;
use helpers::FakeNotesServer;
use notedeck::application::{
    Debouncer, Intent, MutationKind, MutationState, NotesView, QueryClient, QueryState, ViewState,
};
use notedeck::domain::Field;
use notedeck::infrastructure::HttpNoteRepository;
use notedeck::util::testing::ManualClock;
use std::time::Duration;

type HttpView = NotesView<HttpNoteRepository, ManualClock>;

fn browse(server: &FakeNotesServer) -> Result<(HttpView, ManualClock)> {
    let clock = ManualClock::new();
    let repo = HttpNoteRepository::new(&server.base_url, Duration::from_secs(5))?;
    let client = QueryClient::new(repo, clock.clone());
    let mut view = NotesView::new(client, Debouncer::new(clock.clone()));
    view.refresh();
    Ok((view, clock))
}

fn list_requests(server: &FakeNotesServer) -> usize {
    server
        .requests()
        .iter()
        .filter(|r| r.method == "GET")
        .count()
}

#[test]
fn given_thirteen_remote_notes_when_paging_then_second_page_holds_one_note() -> Result<()> {
    // Arrange
    let server = FakeNotesServer::start().with_notes(13);
    let (mut view, _clock) = browse(&server)?;

    // Act
    view.dispatch(Intent::NextPage);
    view.refresh();

    // Assert
    let screen = view.screen();
    assert_eq!(screen.page, 2);
    assert_eq!(screen.total_pages, 2);
    assert_eq!(screen.notes.len(), 1);
    assert!(screen.show_pagination);
    Ok(())
}

#[test]
fn given_typing_when_pausing_between_keystrokes_then_fetches_once_per_settled_term() -> Result<()> {
    // Arrange
    let server = FakeNotesServer::start().with_notes(13);
    let (mut view, clock) = browse(&server)?;
    view.dispatch(Intent::NextPage);
    view.refresh();
    let before = list_requests(&server);

    // Act - "a", "ab" inside the window, then "abc" after a pause
    view.dispatch(Intent::Search("a".to_string()));
    clock.advance(Duration::from_millis(100));
    view.dispatch(Intent::Search("ab".to_string()));
    clock.advance(Duration::from_millis(299));
    view.dispatch(Intent::Tick);
    view.refresh();
    assert_eq!(list_requests(&server), before);

    clock.advance(Duration::from_millis(1));
    view.dispatch(Intent::Tick);
    view.refresh();

    // Assert
    assert_eq!(list_requests(&server), before + 1);
    assert_eq!(view.search(), "ab");
    assert_eq!(view.page(), 1);
    let last = server.requests().pop().expect("request recorded");
    assert_eq!(last.url, "/notes?page=1&perPage=12&search=ab");
    Ok(())
}

#[test]
fn given_cached_page_when_revisited_within_stale_time_then_served_without_request() -> Result<()> {
    // Arrange
    let server = FakeNotesServer::start().with_notes(13);
    let (mut view, clock) = browse(&server)?;
    view.dispatch(Intent::NextPage);
    view.refresh();
    let before = list_requests(&server);

    // Act
    clock.advance(Duration::from_secs(2));
    view.dispatch(Intent::PrevPage);
    view.refresh();

    // Assert
    assert_eq!(list_requests(&server), before);
    assert_eq!(view.screen().notes.len(), 12);
    Ok(())
}

#[test]
fn given_create_modal_when_submitting_valid_form_then_creates_and_refetches() -> Result<()> {
    // Arrange
    let server = FakeNotesServer::start().with_notes(2);
    let (mut view, _clock) = browse(&server)?;
    let before = list_requests(&server);

    // Act
    view.dispatch(Intent::Create);
    view.dispatch(Intent::EditField(Field::Title, "Buy milk".to_string()));
    view.dispatch(Intent::EditField(Field::Tag, "Shopping".to_string()));
    view.dispatch(Intent::Submit);
    view.refresh();

    // Assert
    assert_eq!(view.state(), &ViewState::Browsing);
    assert_eq!(
        view.last_mutation(),
        &MutationState::Success(MutationKind::Create)
    );
    assert_eq!(server.note_count(), 3);
    assert_eq!(list_requests(&server), before + 1);
    assert!(view.screen().notes.iter().any(|n| n.title == "Buy milk"));
    Ok(())
}

#[test]
fn given_edit_modal_when_submitting_then_patches_only_that_note() -> Result<()> {
    // Arrange
    let server = FakeNotesServer::start().with_notes(2);
    let (mut view, _clock) = browse(&server)?;
    let target = view.screen().notes[0].clone();

    // Act
    view.dispatch(Intent::Edit(target.clone()));
    view.dispatch(Intent::EditField(Field::Title, "Renamed".to_string()));
    view.dispatch(Intent::Submit);
    view.refresh();

    // Assert
    let mutations: Vec<_> = server
        .requests()
        .into_iter()
        .filter(|r| r.method != "GET")
        .collect();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].method, "PATCH");
    assert_eq!(mutations[0].url, format!("/notes/{}", target.id));
    assert_eq!(view.screen().notes[0].title, "Renamed");
    Ok(())
}

#[test]
fn given_short_title_when_submitting_then_stays_open_without_request() -> Result<()> {
    // Arrange
    let server = FakeNotesServer::start();
    let (mut view, _clock) = browse(&server)?;

    // Act
    view.dispatch(Intent::Create);
    view.dispatch(Intent::EditField(Field::Title, "ab".to_string()));
    view.dispatch(Intent::Submit);

    // Assert
    let screen = view.screen();
    let modal = screen.modal.expect("modal stays open");
    assert_eq!(
        modal.errors.get(Field::Title),
        Some("Title must be at least 3 characters")
    );
    assert!(server.requests().iter().all(|r| r.method == "GET"));
    Ok(())
}

#[test]
fn given_only_note_when_deleted_then_shows_empty_notice() -> Result<()> {
    // Arrange
    let server = FakeNotesServer::start().with_notes(1);
    let (mut view, _clock) = browse(&server)?;

    // Act
    view.dispatch(Intent::Delete("srv-1".to_string()));
    view.refresh();

    // Assert
    let screen = view.screen();
    assert!(screen.notes.is_empty());
    assert_eq!(screen.notice, Some("No notes found."));
    assert!(!screen.show_pagination);
    Ok(())
}

#[test]
fn given_server_outage_when_reloading_then_keeps_previous_notes_and_reports_error() -> Result<()> {
    // Arrange
    let server = FakeNotesServer::start().with_notes(3);
    let (mut view, clock) = browse(&server)?;

    // Act
    server.fail_with(500);
    clock.advance(Duration::from_secs(6));
    view.dispatch(Intent::Reload);
    view.refresh();

    // Assert
    let current = view.current();
    assert!(matches!(current.state, QueryState::Error(_)));
    assert_eq!(current.page.data.len(), 3);
    assert!(view.screen().error.is_some());
    Ok(())
}
