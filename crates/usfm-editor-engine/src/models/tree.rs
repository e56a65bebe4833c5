use serde::{Deserialize, Serialize};
use usfm_editor_syntax::{Attribute, VerseLabel};

/// A whole book: header paragraphs (`\id`, `\h`, `\mt1`...) and chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub headers: Vec<Block>,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: ChapterNumber,
    /// Always starts with the front verse.
    pub verses: Vec<Verse>,
}

/// The text after `\c`, kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterNumber {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub label: VerseLabel,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    /// Verse content not under an explicit paragraph marker.
    Inline(InlineContainer),
    Paragraph(ParagraphBlock),
    /// A bare run. Only exists between an edit and the next normalizer pass.
    Text(TextRun),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineContainer {
    pub children: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphBlock {
    pub marker: String,
    pub children: Vec<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub marks: Marks,
}

/// A character style applied to a run: `\nd`, `\w ...|lemma="x"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    pub tag: String,
    pub attributes: Vec<Attribute>,
}

/// Ordered set of marks, outermost first, at most one mark per tag.
///
/// Two sets are identical only when they hold the same marks in the same
/// order; the order is the nesting order in the marker text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marks(Vec<Mark>);

/// The node kinds of the document tree, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Book,
    Chapter,
    ChapterNumber,
    Verse,
    VerseLabel,
    InlineContainer,
    ParagraphBlock,
    TextRun,
}

impl Book {
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    pub fn chapter_mut(&mut self, index: usize) -> Option<&mut Chapter> {
        self.chapters.get_mut(index)
    }
}

impl Chapter {
    /// A chapter holding only an empty front verse.
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: ChapterNumber {
                text: number.into(),
            },
            verses: vec![Verse::front()],
        }
    }
}

impl ChapterNumber {
    pub fn value(&self) -> Option<u32> {
        self.text.trim().parse().ok()
    }
}

impl Verse {
    pub fn front() -> Self {
        Self::empty(VerseLabel::Front)
    }

    /// A verse holding one empty inline container.
    pub fn empty(label: VerseLabel) -> Self {
        Self {
            label,
            children: vec![Block::Inline(InlineContainer::default())],
        }
    }

    /// Plain text of the verse, ignoring marks and paragraph breaks.
    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .flat_map(Block::runs)
            .map(|run| run.text.as_str())
            .collect()
    }
}

impl Block {
    pub fn inline(children: Vec<TextRun>) -> Self {
        Block::Inline(InlineContainer { children })
    }

    pub fn paragraph(marker: impl Into<String>, children: Vec<TextRun>) -> Self {
        Block::Paragraph(ParagraphBlock {
            marker: marker.into(),
            children,
        })
    }

    pub fn runs(&self) -> &[TextRun] {
        match self {
            Block::Inline(container) => &container.children,
            Block::Paragraph(paragraph) => &paragraph.children,
            Block::Text(run) => std::slice::from_ref(run),
        }
    }

    /// The run list of a wrapper, `None` for a bare run.
    pub fn runs_mut(&mut self) -> Option<&mut Vec<TextRun>> {
        match self {
            Block::Inline(container) => Some(&mut container.children),
            Block::Paragraph(paragraph) => Some(&mut paragraph.children),
            Block::Text(_) => None,
        }
    }

    pub fn paragraph_marker(&self) -> Option<&str> {
        match self {
            Block::Paragraph(paragraph) => Some(&paragraph.marker),
            _ => None,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Block::Inline(_))
    }

    /// Whether the block holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.runs().iter().all(|run| run.text.is_empty())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Block::Inline(_) => NodeKind::InlineContainer,
            Block::Paragraph(_) => NodeKind::ParagraphBlock,
            Block::Text(_) => NodeKind::TextRun,
        }
    }
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    pub fn marked(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }
}

impl Mark {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(tag: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
        }
    }
}

impl Marks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `mark` innermost. Returns `false` (and changes nothing) if a mark
    /// with the same tag is already present.
    pub fn push(&mut self, mark: Mark) -> bool {
        if self.contains_tag(&mark.tag) {
            return false;
        }
        self.0.push(mark);
        true
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.0.iter().any(|mark| mark.tag == tag)
    }

    pub fn as_slice(&self) -> &[Mark] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|mark| mark.tag.as_str())
    }
}

impl FromIterator<Mark> for Marks {
    /// Collect marks outermost first; later duplicates of a tag are dropped.
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut marks = Marks::new();
        for mark in iter {
            marks.push(mark);
        }
        marks
    }
}

impl<'a> IntoIterator for &'a Marks {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
