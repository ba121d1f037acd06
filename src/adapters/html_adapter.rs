//! HTML display host implementing DisplayPort.
//!
//! Renders Askama templates: a standalone page (or, for partial refreshes,
//! just the content fragment) with a full-width table and inline per-cell
//! styles.

use askama::Template;

use crate::domain::error::CotError;
use crate::domain::presenter::{PageMeta, StyledTable};
use crate::ports::display_port::DisplayPort;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportPage<'a> {
    title: &'a str,
    wide: bool,
    poll: bool,
    refresh_url: &'a str,
    refresh_secs: u64,
    caption: Option<&'a str>,
    table: Option<&'a StyledTable>,
}

#[derive(Template)]
#[template(path = "report_content.html")]
struct ReportContent<'a> {
    caption: Option<&'a str>,
    table: Option<&'a StyledTable>,
}

/// Standalone error page; no table is shown when a load fails.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub title: &'a str,
    pub status: u16,
    pub message: &'a str,
}

fn template_error(e: askama::Error) -> CotError {
    CotError::Io(std::io::Error::other(format!("template render error: {e}")))
}

#[derive(Debug, Default)]
pub struct HtmlDisplay {
    meta: Option<PageMeta>,
    caption: Option<String>,
    table: Option<StyledTable>,
    refresh: Option<(String, u64)>,
}

impl HtmlDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll `url` every `secs` seconds with htmx and swap the content fragment.
    pub fn with_refresh(mut self, url: impl Into<String>, secs: u64) -> Self {
        self.refresh = Some((url.into(), secs));
        self
    }

    /// Caption and table, without the surrounding document.
    pub fn fragment(&self) -> Result<String, CotError> {
        ReportContent {
            caption: self.caption.as_deref(),
            table: self.table.as_ref(),
        }
        .render()
        .map_err(template_error)
    }

    pub fn into_html(self) -> Result<String, CotError> {
        let (title, wide) = match &self.meta {
            Some(meta) => (meta.title.as_str(), meta.wide),
            None => ("", true),
        };
        let (refresh_url, refresh_secs) = match &self.refresh {
            Some((url, secs)) => (url.as_str(), *secs),
            None => ("", 0),
        };
        ReportPage {
            title,
            wide,
            poll: self.refresh.is_some(),
            refresh_url,
            refresh_secs,
            caption: self.caption.as_deref(),
            table: self.table.as_ref(),
        }
        .render()
        .map_err(template_error)
    }
}

impl DisplayPort for HtmlDisplay {
    fn set_page(&mut self, meta: &PageMeta) -> Result<(), CotError> {
        self.meta = Some(meta.clone());
        Ok(())
    }

    fn caption(&mut self, text: &str) -> Result<(), CotError> {
        self.caption = Some(text.to_string());
        Ok(())
    }

    fn render_table(&mut self, table: &StyledTable) -> Result<(), CotError> {
        self.table = Some(table.clone());
        Ok(())
    }
}
