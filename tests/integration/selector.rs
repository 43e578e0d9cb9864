use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use assert_matches::assert_matches;
use poise::serenity_prelude::{self as serenity, MessageId, UserId};
use pretty_assertions::assert_eq;
use rstest::rstest;

use roxbot::utils::selector::surface::{ReactionSurface, SurfaceError};
use roxbot::utils::selector::{
    Action, CANCEL_GLYPH, NEXT_GLYPH, PREVIOUS_GLYPH, Selector, SelectorContext, SelectorError,
    SelectorOptions, Termination, keycap,
};

use crate::common::fixtures::{self, AUTHOR_ID, OTHER_USER_ID, PROMPT_MESSAGE_ID};
use crate::common::mocks::{MockSurface, ScriptedSurface, SurfaceCall};

const SHORT_TIMEOUT: Duration = Duration::from_millis(150);

fn rejected(reason: &'static str) -> SurfaceError {
    SurfaceError::Discord(serenity::Error::Other(reason))
}

fn context<S: ReactionSurface>(surface: Arc<S>) -> SelectorContext<S> {
    SelectorContext {
        author: UserId::new(AUTHOR_ID),
        surface,
        localizer: fixtures::localizer(),
        locale: "en".to_string(),
    }
}

fn options(num_selections: usize, terminate_on_select: bool) -> SelectorOptions {
    SelectorOptions {
        num_selections,
        terminate_on_select,
        timeout: SHORT_TIMEOUT,
        ..Default::default()
    }
}

/// Selector whose actions return their argument and count invocations.
fn counting_selector<S: ReactionSurface>(
    surface: Arc<S>,
    count: usize,
    options: SelectorOptions,
    calls: Arc<AtomicUsize>,
) -> Selector<S, usize, usize> {
    let actions = (0..count)
        .map(|_| {
            let calls = Arc::clone(&calls);
            Action::from_fn(move |index: usize| {
                calls.fetch_add(1, Ordering::SeqCst);
                index
            })
        })
        .collect();
    Selector::new(
        context(surface),
        fixtures::labels(count),
        actions,
        (0..count).collect(),
        options,
    )
    .unwrap()
}

#[tokio::test]
async fn single_page_selection_dispatches_and_cleans_up() {
    crate::test_utils::init();
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    surface.react(AUTHOR_ID, &keycap(2));

    let selector = counting_selector(Arc::clone(&surface), 3, options(3, true), calls.clone());
    let outcome = selector.start().await.unwrap().unwrap();

    assert_eq!(outcome.ended, Termination::Selected);
    assert_eq!(outcome.result, Some(1));
    assert_eq!(outcome.message, MessageId::new(PROMPT_MESSAGE_ID));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(
        surface.reactions_added(),
        vec![keycap(1), keycap(2), keycap(3), CANCEL_GLYPH.to_string()]
    );
    assert_eq!(surface.clear_count(), 1);
    assert!(surface.calls().contains(&SurfaceCall::RemoveReaction(
        surface.message_id(),
        keycap(2),
        UserId::new(AUTHOR_ID)
    )));
}

#[tokio::test]
async fn scrolling_then_picking_uses_the_absolute_index() {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    surface.react(AUTHOR_ID, NEXT_GLYPH);
    surface.react(AUTHOR_ID, &keycap(3));

    let selector = counting_selector(Arc::clone(&surface), 10, options(5, true), calls.clone());
    assert_eq!(selector.page_count(), 2);
    let outcome = selector.start().await.unwrap().unwrap();

    assert_eq!(outcome.result, Some(7));
    assert_eq!(outcome.page.footer.as_deref(), Some("Page 2/2"));
    assert_eq!(
        surface.reactions_added(),
        vec![
            keycap(1),
            keycap(2),
            keycap(3),
            keycap(4),
            keycap(5),
            PREVIOUS_GLYPH.to_string(),
            NEXT_GLYPH.to_string(),
            CANCEL_GLYPH.to_string(),
        ]
    );
    let edits = surface.edits();
    assert_eq!(edits.len(), 1);
    assert!(edits[0].starts_with(&format!("{} Result 5", keycap(1))));
}

#[tokio::test]
async fn unanswered_prompt_times_out() {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let selector = counting_selector(Arc::clone(&surface), 4, options(3, true), calls.clone());
    let outcome = selector.start().await.unwrap().unwrap();

    assert_eq!(outcome.ended, Termination::TimedOut);
    assert_eq!(outcome.result, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(surface.clear_count(), 1);
}

#[rstest]
#[case::other_user(OTHER_USER_ID, None)]
#[case::other_message(AUTHOR_ID, Some(MessageId::new(1)))]
#[tokio::test]
async fn foreign_reactions_are_ignored(#[case] user: u64, #[case] message: Option<MessageId>) {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    surface.react_on(message.unwrap_or(surface.message_id()), user, &keycap(1));

    let selector = counting_selector(Arc::clone(&surface), 3, options(3, true), calls.clone());
    let outcome = selector.start().await.unwrap().unwrap();

    assert_eq!(outcome.ended, Termination::TimedOut);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(
        !surface
            .calls()
            .iter()
            .any(|call| matches!(call, SurfaceCall::RemoveReaction(..)))
    );
}

#[tokio::test]
async fn cancel_ends_without_result() {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    surface.react(AUTHOR_ID, CANCEL_GLYPH);
    surface.react(AUTHOR_ID, &keycap(1));

    let selector = counting_selector(Arc::clone(&surface), 3, options(3, true), calls.clone());
    let outcome = selector.start().await.unwrap().unwrap();

    assert_eq!(outcome.ended, Termination::Cancelled);
    assert_eq!(outcome.result, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(surface.clear_count(), 1);
}

#[tokio::test]
async fn without_terminate_every_pick_runs_until_timeout() {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    surface.react(AUTHOR_ID, &keycap(1));
    surface.react(AUTHOR_ID, &keycap(3));

    let selector = counting_selector(Arc::clone(&surface), 3, options(3, false), calls.clone());
    let outcome = selector.start().await.unwrap().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(outcome.result, Some(2));
    assert_eq!(outcome.ended, Termination::TimedOut);
    assert_eq!(surface.clear_count(), 1);
}

#[tokio::test]
async fn paging_resets_the_last_result() {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    surface.react(AUTHOR_ID, &keycap(1));
    surface.react(AUTHOR_ID, NEXT_GLYPH);

    let selector = counting_selector(Arc::clone(&surface), 6, options(3, false), calls.clone());
    let outcome = selector.start().await.unwrap().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.result, None);
    assert_eq!(outcome.page.footer.as_deref(), Some("Page 2/2"));
}

#[tokio::test]
async fn keycap_past_the_last_choice_ends_a_terminating_session() {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    surface.react(AUTHOR_ID, NEXT_GLYPH);
    surface.react(AUTHOR_ID, &keycap(4));

    let long_wait = SelectorOptions {
        timeout: Duration::from_secs(5),
        ..options(5, true)
    };
    let selector = counting_selector(Arc::clone(&surface), 7, long_wait, calls.clone());
    let started = Instant::now();
    let outcome = selector.start().await.unwrap().unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(outcome.ended, Termination::Selected);
    assert_eq!(outcome.result, None);
    assert_eq!(outcome.page.footer.as_deref(), Some("Page 2/2"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(surface.clear_count(), 1);
    assert!(surface.calls().contains(&SurfaceCall::RemoveReaction(
        surface.message_id(),
        keycap(4),
        UserId::new(AUTHOR_ID)
    )));
}

#[tokio::test]
async fn keycap_past_the_last_choice_keeps_a_repeating_session_open() {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    surface.react(AUTHOR_ID, NEXT_GLYPH);
    surface.react(AUTHOR_ID, &keycap(4));
    surface.react(AUTHOR_ID, &keycap(2));

    let selector = counting_selector(Arc::clone(&surface), 7, options(5, false), calls.clone());
    let outcome = selector.start().await.unwrap().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.result, Some(6));
    assert_eq!(outcome.ended, Termination::TimedOut);
    assert_eq!(surface.clear_count(), 1);
}

#[tokio::test]
async fn previous_on_first_page_does_not_edit() {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    surface.react(AUTHOR_ID, PREVIOUS_GLYPH);
    surface.react(AUTHOR_ID, NEXT_GLYPH);
    surface.react(AUTHOR_ID, NEXT_GLYPH);

    let selector = counting_selector(Arc::clone(&surface), 4, options(2, true), calls.clone());
    let outcome = selector.start().await.unwrap().unwrap();

    // Only the first NEXT moves; the second is past the last page.
    assert_eq!(surface.edits().len(), 1);
    assert_eq!(outcome.page.footer.as_deref(), Some("Page 2/2"));
}

#[tokio::test]
async fn async_actions_are_awaited() {
    let surface = Arc::new(ScriptedSurface::new());
    surface.react(AUTHOR_ID, &keycap(2));

    let actions = (0..2)
        .map(|_| {
            Action::from_async(|name: String| async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                format!("queued {}", name)
            })
        })
        .collect();
    let selector: Selector<ScriptedSurface, String, String> = Selector::new(
        context(Arc::clone(&surface)),
        vec!["a".into(), "b".into()],
        actions,
        vec!["first".into(), "second".into()],
        options(3, true),
    )
    .unwrap();

    let outcome = selector.start().await.unwrap().unwrap();
    assert_eq!(outcome.result.as_deref(), Some("queued second"));
}

#[tokio::test]
async fn nothing_to_choose_sends_nothing() {
    let surface = Arc::new(ScriptedSurface::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let selector = counting_selector(Arc::clone(&surface), 0, options(3, true), calls);

    assert_matches!(selector.start().await, Ok(None));
    assert!(surface.calls().is_empty());
}

#[tokio::test]
async fn locale_changes_the_page_indicator() {
    let surface = Arc::new(ScriptedSurface::new());
    let mut ctx = context(Arc::clone(&surface));
    ctx.locale = "no".to_string();
    let selector: Selector<ScriptedSurface, usize, usize> = Selector::new(
        ctx,
        fixtures::labels(4),
        (0..4).map(|_| Action::from_fn(|i: usize| i)).collect(),
        (0..4).collect(),
        options(2, true),
    )
    .unwrap();

    let footers: Vec<_> = selector
        .pages()
        .iter()
        .map(|page| page.footer.clone().unwrap_or_default())
        .collect();
    assert_eq!(footers, vec!["Side 1/2", "Side 2/2"]);
}

#[tokio::test]
async fn failed_page_edit_is_an_error_after_cleanup() {
    let mut surface = MockSurface::new();
    surface
        .expect_send()
        .returning(|_| Ok(MessageId::new(PROMPT_MESSAGE_ID)));
    surface.expect_add_reaction().returning(|_, _| Ok(()));
    surface.expect_remove_reaction().returning(|_, _, _| Ok(()));
    surface.expect_next_reaction().returning(|message, _| {
        Some(roxbot::utils::selector::surface::ReactionEvent {
            message_id: message,
            user_id: Some(UserId::new(AUTHOR_ID)),
            glyph: NEXT_GLYPH.to_string(),
        })
    });
    surface
        .expect_edit()
        .times(1)
        .returning(|_, _| Err(rejected("missing permissions")));
    surface.expect_clear_reactions().times(1).returning(|_| Ok(()));

    let calls = Arc::new(AtomicUsize::new(0));
    let selector = counting_selector(Arc::new(surface), 6, options(3, true), calls);

    assert_matches!(
        selector.start().await,
        Err(SelectorError::Surface(SurfaceError::Discord(_)))
    );
}

#[tokio::test]
async fn failed_cleanup_is_swallowed() {
    let mut surface = MockSurface::new();
    surface
        .expect_send()
        .returning(|_| Ok(MessageId::new(PROMPT_MESSAGE_ID)));
    surface
        .expect_add_reaction()
        .returning(|_, _| Err(rejected("no reactions here")));
    surface
        .expect_remove_reaction()
        .returning(|_, _, _| Err(rejected("no permission")));
    surface.expect_next_reaction().returning(|message, _| {
        Some(roxbot::utils::selector::surface::ReactionEvent {
            message_id: message,
            user_id: Some(UserId::new(AUTHOR_ID)),
            glyph: keycap(1),
        })
    });
    surface
        .expect_clear_reactions()
        .times(1)
        .returning(|_| Err(rejected("no permission")));

    let calls = Arc::new(AtomicUsize::new(0));
    let selector = counting_selector(Arc::new(surface), 3, options(3, true), calls.clone());
    let outcome = tokio_test::assert_ok!(selector.start().await).unwrap();

    assert_eq!(outcome.result, Some(0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[case(0)]
#[case(11)]
fn selection_count_must_fit_the_keycaps(#[case] num_selections: usize) {
    let result: Result<Selector<ScriptedSurface, usize, usize>, _> = Selector::new(
        context(Arc::new(ScriptedSurface::new())),
        fixtures::labels(1),
        vec![Action::from_fn(|i: usize| i)],
        vec![0],
        options(num_selections, true),
    );
    assert_matches!(result.err(), Some(SelectorError::InvalidSelectionCount(n)) if n == num_selections);
}
