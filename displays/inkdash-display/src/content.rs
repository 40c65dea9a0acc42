//! Dashboard content model
//!
//! Each column shows one remote document. Documents are plain text with a
//! little markdown: an optional `# Title` first line, `#` subheaders, and
//! blank lines as vertical gaps.

/// One dashboard column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Panel<'a> {
    /// Title used when the document has no `# ` heading
    pub default_title: &'a str,
    /// Document text, if it was fetched
    pub content: Option<&'a str>,
    /// Fetch error; shown instead of the content
    pub error: Option<&'a str>,
}

/// What a column renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelBody<'a> {
    /// Fetch failed with this message
    Error(&'a str),
    /// Nothing to show
    Empty,
    /// A document with its resolved title and the lines below it
    Document {
        /// Heading text
        title: &'a str,
        /// Everything after the heading line
        rest: &'a str,
    },
}

/// Classified content line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentLine<'a> {
    /// Empty after trimming
    Blank,
    /// `#`-prefixed line with the markers stripped
    Subheader(&'a str),
    /// Regular text
    Body(&'a str),
}

impl<'a> Panel<'a> {
    /// Column with a document
    pub const fn new(default_title: &'a str, content: Option<&'a str>) -> Self {
        Self {
            default_title,
            content,
            error: None,
        }
    }

    /// Column showing a fetch error
    pub const fn failed(default_title: &'a str, error: &'a str) -> Self {
        Self {
            default_title,
            content: None,
            error: Some(error),
        }
    }

    /// Resolve what this column shows; errors win over content
    pub fn body(&self) -> PanelBody<'a> {
        if let Some(err) = self.error {
            return PanelBody::Error(err);
        }
        let content = match self.content {
            Some(content) if !content.is_empty() => content,
            _ => return PanelBody::Empty,
        };

        let (first, rest) = content.split_once('\n').unwrap_or((content, ""));
        match first.strip_prefix("# ") {
            Some(title) => PanelBody::Document {
                title: title.trim(),
                rest,
            },
            None => PanelBody::Document {
                title: self.default_title,
                rest: content,
            },
        }
    }
}

/// Split document text into classified lines
pub fn content_lines(rest: &str) -> impl Iterator<Item = ContentLine<'_>> {
    rest.lines().map(|line| {
        let line = line.trim();
        if line.is_empty() {
            ContentLine::Blank
        } else if line.starts_with('#') {
            ContentLine::Subheader(line.trim_start_matches('#').trim())
        } else {
            ContentLine::Body(line)
        }
    })
}
