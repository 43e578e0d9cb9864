//! Line-oriented paginator that packs text lines into bounded embed pages.

use poise::serenity_prelude::CreateEmbed;
use thiserror::Error;

use super::localizer::Localizer;

/// Default colour used for paginated embeds (Discord blurple).
pub const BLURPLE: u32 = 0x5865f2;

#[derive(Error, Debug, PartialEq)]
pub enum PaginatorError {
    #[error("Line of {len} characters exceeds the page budget of {max_size}")]
    LineTooLong { len: usize, max_size: usize },
}

/// Presentation options shared by every page of a paginator.
#[derive(Debug, Clone, PartialEq)]
pub struct PageStyle {
    pub title: Option<String>,
    pub color: u32,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            title: None,
            color: BLURPLE,
        }
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: Option<String>,
    pub description: String,
    pub footer: Option<String>,
    pub color: u32,
}

impl Page {
    /// Build the serenity embed for this page.
    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .description(self.description.clone())
            .color(self.color);

        if let Some(title) = &self.title {
            embed = embed.title(title.clone());
        }
        if let Some(footer) = &self.footer {
            embed = embed.footer(poise::serenity_prelude::CreateEmbedFooter::new(footer.clone()));
        }
        embed
    }
}

/// Packs lines into pages holding at most `max_lines` lines and `max_size`
/// characters of description each.
#[derive(Debug, Clone)]
pub struct TextPaginator {
    max_size: usize,
    max_lines: Option<usize>,
    style: PageStyle,
    current: Vec<String>,
    current_len: usize,
    pages: Vec<Page>,
}

impl TextPaginator {
    pub fn new(max_size: usize, max_lines: Option<usize>, style: PageStyle) -> Self {
        Self {
            max_size,
            max_lines,
            style,
            current: Vec::new(),
            current_len: 0,
            pages: Vec::new(),
        }
    }

    /// Append a line, closing the current page first if the line would not fit.
    pub fn add_line(&mut self, line: impl Into<String>) -> Result<(), PaginatorError> {
        let line = line.into();
        let len = line.chars().count();
        if len > self.max_size {
            return Err(PaginatorError::LineTooLong {
                len,
                max_size: self.max_size,
            });
        }

        // +1 for the newline joining it to the previous line
        let separator = usize::from(!self.current.is_empty());
        if self.current_len + separator + len > self.max_size {
            self.close_page();
        }

        let separator = usize::from(!self.current.is_empty());
        self.current_len += separator + len;
        self.current.push(line);

        if self.max_lines.is_some_and(|max| self.current.len() >= max) {
            self.close_page();
        }
        Ok(())
    }

    /// Finish the page being built. Empty pages are never emitted.
    pub fn close_page(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let description = std::mem::take(&mut self.current).join("\n");
        self.current_len = 0;
        self.pages.push(Page {
            title: self.style.title.clone(),
            description,
            footer: None,
            color: self.style.color,
        });
    }

    /// Closed pages. Lines added since the last close are not included.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(mut self) -> Vec<Page> {
        self.close_page();
        self.pages
    }

    /// Set a localized "page N/M" footer on every closed page.
    ///
    /// `template` is localized first, then `{page}` and `{pages}` are filled in.
    pub fn add_page_indicator(&mut self, localizer: &Localizer, locale: &str, template: &str) {
        let template = localizer.localize(locale, template);
        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.footer = Some(
                template
                    .replace("{page}", &(index + 1).to_string())
                    .replace("{pages}", &total.to_string()),
            );
        }
    }
}
