//! Reaction-driven, paginated multiple choice prompt.
//!
//! A [`Selector`] lays out labelled choices over one or more embed pages,
//! numbers them with keycap glyphs and waits for the invoking user to react.
//! Keycaps pick a choice and run its action, ◀/▶ flip pages and ❌ ends the
//! session. Every wait is bounded by a timeout.

pub mod surface;

use futures::future::BoxFuture;
use poise::serenity_prelude::{MessageId, UserId};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::utils::localizer::Localizer;
use crate::utils::paginator::{Page, PageStyle, PaginatorError, TextPaginator};
use surface::{ReactionEvent, ReactionSurface, SurfaceError, best_effort};

/// Number of distinct keycap glyphs, and so the most choices a page can hold.
pub const MAX_SELECTIONS: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Localized footer template applied to every page.
pub const PAGE_INDICATOR: &str = "{queue.pageindicator}";

pub const PREVIOUS_GLYPH: &str = "\u{25C0}\u{FE0F}";
pub const NEXT_GLYPH: &str = "\u{25B6}\u{FE0F}";
pub const CANCEL_GLYPH: &str = "\u{274C}";

/// Keycap glyph for `number` (1 through 10).
pub fn keycap(number: usize) -> String {
    match number {
        10 => "\u{1F51F}".to_string(),
        n => format!("{}\u{FE0F}\u{20E3}", n),
    }
}

// Gateway events may or may not carry the emoji variation selector.
fn same_glyph(a: &str, b: &str) -> bool {
    a.chars()
        .filter(|c| *c != '\u{FE0F}')
        .eq(b.chars().filter(|c| *c != '\u{FE0F}'))
}

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error(
        "Selection inputs differ in length: {labels} labels, {actions} actions, {args} argument sets"
    )]
    LengthMismatch {
        labels: usize,
        actions: usize,
        args: usize,
    },

    #[error("Selections per page must be between 1 and 10, got {0}")]
    InvalidSelectionCount(usize),

    #[error(transparent)]
    Paginator(#[from] PaginatorError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// A callback bound to a choice. Invoked with that choice's arguments.
pub enum Action<A, R> {
    Sync(Box<dyn Fn(A) -> R + Send + Sync>),
    Async(Box<dyn Fn(A) -> BoxFuture<'static, R> + Send + Sync>),
}

impl<A, R> Action<A, R> {
    pub fn from_fn(f: impl Fn(A) -> R + Send + Sync + 'static) -> Self {
        Action::Sync(Box::new(f))
    }

    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        Action::Async(Box::new(move |args| Box::pin(f(args))))
    }

    async fn invoke(&self, args: A) -> R {
        match self {
            Action::Sync(f) => f(args),
            Action::Async(f) => f(args).await,
        }
    }
}

pub struct Selection<A, R> {
    pub label: String,
    pub action: Action<A, R>,
    pub args: A,
}

/// What a qualifying reaction asks the selector to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorInput {
    /// Run the choice at this absolute index.
    Select(usize),
    /// A keycap with no choice behind it on the current page.
    Stray,
    PreviousPage,
    NextPage,
    Cancel,
}

impl SelectorInput {
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            SelectorInput::PreviousPage | SelectorInput::NextPage | SelectorInput::Cancel
        )
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A keycap was pressed, including one with no choice behind it.
    Selected,
    Cancelled,
    TimedOut,
}

#[derive(Debug)]
pub struct SelectorOutcome<R> {
    pub message: MessageId,
    /// The page on display when the session ended.
    pub page: Page,
    /// Value of the last dispatched action. Control inputs reset it to `None`.
    pub result: Option<R>,
    pub ended: Termination,
}

/// Who is choosing, where, and in which language.
pub struct SelectorContext<S> {
    pub author: UserId,
    pub surface: Arc<S>,
    pub localizer: Arc<Localizer>,
    pub locale: String,
}

#[derive(Debug, Clone)]
pub struct SelectorOptions {
    pub terminate_on_select: bool,
    pub num_selections: usize,
    pub max_size: usize,
    pub style: PageStyle,
    pub timeout: Duration,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            terminate_on_select: true,
            num_selections: 3,
            max_size: 2000,
            style: PageStyle::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct Selector<S, A, R> {
    surface: Arc<S>,
    author: UserId,
    selections: Vec<Selection<A, R>>,
    pages: Vec<Page>,
    num_selections: usize,
    terminate_on_select: bool,
    timeout: Duration,
    current_page: usize,
    message: Option<MessageId>,
    scrolling: bool,
    attaching: Option<JoinHandle<()>>,
}

impl<S, A, R> Selector<S, A, R>
where
    S: ReactionSurface,
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    /// Lay out the choices. `labels`, `actions` and `args` are matched up by position.
    pub fn new(
        ctx: SelectorContext<S>,
        labels: Vec<String>,
        actions: Vec<Action<A, R>>,
        args: Vec<A>,
        options: SelectorOptions,
    ) -> Result<Self, SelectorError> {
        if labels.len() != actions.len() || labels.len() != args.len() {
            return Err(SelectorError::LengthMismatch {
                labels: labels.len(),
                actions: actions.len(),
                args: args.len(),
            });
        }
        let per_page = options.num_selections;
        if per_page == 0 || per_page > MAX_SELECTIONS {
            return Err(SelectorError::InvalidSelectionCount(per_page));
        }

        let mut paginator = TextPaginator::new(options.max_size, Some(per_page), options.style);
        for (index, label) in labels.iter().enumerate() {
            paginator.add_line(format!("{} {}", keycap(index % per_page + 1), label))?;
        }
        paginator.close_page();
        paginator.add_page_indicator(&ctx.localizer, &ctx.locale, PAGE_INDICATOR);

        let selections = labels
            .into_iter()
            .zip(actions)
            .zip(args)
            .map(|((label, action), args)| Selection {
                label,
                action,
                args,
            })
            .collect();

        Ok(Self {
            surface: ctx.surface,
            author: ctx.author,
            selections,
            pages: paginator.into_pages(),
            num_selections: per_page,
            terminate_on_select: options.terminate_on_select,
            timeout: options.timeout,
            current_page: 0,
            message: None,
            scrolling: true,
            attaching: None,
        })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn selections(&self) -> &[Selection<A, R>] {
        &self.selections
    }

    pub fn is_multipage(&self) -> bool {
        self.pages.len() > 1
    }

    /// Reactions attached to the prompt, in order.
    pub fn reaction_glyphs(&self) -> Vec<String> {
        let shown = self.selections.len().min(self.num_selections);
        let mut glyphs: Vec<String> = (1..=shown).map(keycap).collect();
        if self.is_multipage() {
            glyphs.extend([PREVIOUS_GLYPH, NEXT_GLYPH, CANCEL_GLYPH].map(String::from));
        } else {
            glyphs.push(CANCEL_GLYPH.to_string());
        }
        glyphs
    }

    /// Interpret a reaction. Returns `None` unless it was added by the invoking
    /// user, on the prompt message, with one of the prompt's glyphs.
    pub fn match_reaction(&self, event: &ReactionEvent) -> Option<SelectorInput> {
        if event.user_id != Some(self.author) || Some(event.message_id) != self.message {
            return None;
        }

        if let Some(position) =
            (1..=self.num_selections).position(|n| same_glyph(&keycap(n), &event.glyph))
        {
            let choice = position + self.current_page * self.num_selections;
            // Keycaps stay attached on a partly filled last page; pressing one
            // with nothing behind it is acknowledged and otherwise ignored.
            if choice >= self.selections.len() {
                return Some(SelectorInput::Stray);
            }
            return Some(SelectorInput::Select(choice));
        }

        [
            (PREVIOUS_GLYPH, SelectorInput::PreviousPage),
            (NEXT_GLYPH, SelectorInput::NextPage),
            (CANCEL_GLYPH, SelectorInput::Cancel),
        ]
        .into_iter()
        .find(|(glyph, _)| same_glyph(glyph, &event.glyph))
        .map(|(_, input)| input)
    }

    /// Show `page` in place. Out-of-range pages are ignored.
    pub async fn scroll(&mut self, page: usize) -> Result<(), SelectorError> {
        if page >= self.pages.len() {
            return Ok(());
        }
        self.current_page = page;
        if let Some(message) = self.message {
            self.surface.edit(message, &self.pages[page]).await?;
        }
        Ok(())
    }

    pub async fn next_page(&mut self) -> Result<(), SelectorError> {
        self.scroll(self.current_page + 1).await
    }

    pub async fn previous_page(&mut self) -> Result<(), SelectorError> {
        match self.current_page.checked_sub(1) {
            Some(page) => self.scroll(page).await,
            None => Ok(()),
        }
    }

    pub async fn stop_scrolling(&mut self) {
        self.scrolling = false;
        self.clear_reactions().await;
    }

    /// Post the first page and start attaching reactions in the background.
    /// Returns `None` without posting anything when there are no pages.
    async fn send(&mut self) -> Result<Option<MessageId>, SelectorError> {
        self.current_page = 0;
        let Some(first) = self.pages.first() else {
            return Ok(None);
        };

        let message = self.surface.send(first).await?;
        self.message = Some(message);

        let glyphs = self.reaction_glyphs();
        let surface = Arc::clone(&self.surface);
        self.attaching = Some(tokio::spawn(async move {
            for glyph in glyphs {
                if let Err(e) = surface.add_reaction(message, &glyph).await {
                    debug!("Stopped attaching selector reactions: {}", e);
                    break;
                }
            }
        }));

        Ok(Some(message))
    }

    async fn clear_reactions(&mut self) {
        // Let the attach task finish so nothing is re-added after the clear.
        if let Some(task) = self.attaching.take() {
            let _ = task.await;
        }
        if let Some(message) = self.message {
            best_effort("reaction clear", self.surface.clear_reactions(message)).await;
        }
    }

    /// Wait for the next qualifying reaction. The timeout covers the whole
    /// wait, not each individual event.
    async fn wait_for_input(&self, message: MessageId) -> Option<(SelectorInput, ReactionEvent)> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .filter(|left| !left.is_zero())?;
            let event = self.surface.next_reaction(message, remaining).await?;
            if let Some(input) = self.match_reaction(&event) {
                return Some((input, event));
            }
        }
    }

    /// Run the session until a choice is made, it is cancelled or it times out.
    ///
    /// Returns `Ok(None)` if there was nothing to choose from.
    pub async fn start(mut self) -> Result<Option<SelectorOutcome<R>>, SelectorError> {
        let Some(message) = self.send().await? else {
            debug!("Selector has no pages, nothing to show");
            return Ok(None);
        };

        let mut result = None;
        let mut ended = Termination::TimedOut;

        while self.scrolling {
            let Some((input, event)) = self.wait_for_input(message).await else {
                debug!("Selector on message {} timed out", message);
                self.scrolling = false;
                self.clear_reactions().await;
                break;
            };

            if let Some(user) = event.user_id {
                best_effort(
                    "reaction removal",
                    self.surface.remove_reaction(message, &event.glyph, user),
                )
                .await;
            }

            match input {
                SelectorInput::Select(index) => {
                    let selection = &self.selections[index];
                    info!("Selector choice {} picked: {}", index + 1, selection.label);
                    result = Some(selection.action.invoke(selection.args.clone()).await);

                    if self.terminate_on_select {
                        ended = Termination::Selected;
                        self.scrolling = false;
                        self.clear_reactions().await;
                    }
                }
                SelectorInput::Stray => {
                    debug!("Keycap without a choice on page {}", self.current_page);
                    // Still counts as a pick: nothing runs, but a terminating
                    // selector ends here with whatever result it already had.
                    if self.terminate_on_select {
                        ended = Termination::Selected;
                        self.scrolling = false;
                        self.clear_reactions().await;
                    }
                }
                SelectorInput::PreviousPage => {
                    if let Err(e) = self.previous_page().await {
                        self.stop_scrolling().await;
                        return Err(e);
                    }
                    result = None;
                }
                SelectorInput::NextPage => {
                    if let Err(e) = self.next_page().await {
                        self.stop_scrolling().await;
                        return Err(e);
                    }
                    result = None;
                }
                SelectorInput::Cancel => {
                    self.stop_scrolling().await;
                    result = None;
                    ended = Termination::Cancelled;
                }
            }
        }

        Ok(Some(SelectorOutcome {
            message,
            page: self.pages[self.current_page].clone(),
            result,
            ended,
        }))
    }
}
