//! What the engine hands to a renderer.
//!
//! A renderer never sees locations or rules, only content blocks, action
//! views and notifications. All of them serialize to JSON so an external
//! front end can draw them.

use serde::Serialize;

/// One piece of displayable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A location heading.
    Heading {
        /// Heading text.
        text: String,
    },
    /// A paragraph of narrative. May contain inline markup and line breaks.
    Paragraph {
        /// Paragraph text.
        text: String,
    },
    /// A prompt nudging the player.
    Prompt {
        /// Logical id, when the source prompt had one.
        id: Option<String>,
        /// Prompt text.
        text: String,
    },
    /// A clickable element that replaced a placeholder in the text.
    Affordance {
        /// Button label.
        label: String,
        /// What the element opens.
        target: String,
    },
    /// A visual break between passages.
    Separator,
}

impl ContentBlock {
    /// A heading block.
    pub fn heading(text: impl Into<String>) -> Self {
        ContentBlock::Heading { text: text.into() }
    }

    /// A paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    /// A prompt block without an id.
    pub fn prompt(text: impl Into<String>) -> Self {
        ContentBlock::Prompt {
            id: None,
            text: text.into(),
        }
    }

    /// The block's text, if it has any.
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentBlock::Heading { text }
            | ContentBlock::Paragraph { text }
            | ContentBlock::Prompt { text, .. } => Some(text),
            ContentBlock::Affordance { label, .. } => Some(label),
            ContentBlock::Separator => None,
        }
    }

    /// True for separators.
    pub fn is_separator(&self) -> bool {
        matches!(self, ContentBlock::Separator)
    }
}

/// How serious a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Neutral information.
    Info,
    /// Something good happened.
    Success,
    /// Something the player should notice.
    Warning,
    /// A refused or failed request.
    Error,
}

/// A transient message for the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Message text.
    pub message: String,
    /// Severity.
    pub severity: Severity,
}

impl Notification {
    fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    /// An info notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    /// A warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }
}

/// Where an action came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSection {
    /// Declared directly on the location.
    Location,
    /// Exposed by a passing rule.
    Conditional,
    /// Exposed by a sequence.
    Sequence,
    /// The leave affordance.
    Exit,
}

/// A choice inside a choice group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    /// Dispatch id.
    pub id: String,
    /// Button label.
    pub label: String,
    /// Whether the choice is disabled.
    pub disabled: bool,
    /// Why it is disabled.
    pub disabled_reason: Option<String>,
}

/// An action as the player sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    /// Dispatch id.
    pub id: String,
    /// Button label, or the group prompt for a choice group.
    pub label: String,
    /// Whether the action is disabled.
    pub disabled: bool,
    /// Why it is disabled.
    pub disabled_reason: Option<String>,
    /// Where the action came from.
    pub section: ActionSection,
    /// Whether the group prompt is hidden (the choices still show).
    pub prompt_hidden: bool,
    /// Choices, for a choice group.
    pub choices: Vec<ChoiceView>,
}

impl ActionView {
    /// True if the view is a choice group.
    pub fn is_group(&self) -> bool {
        !self.choices.is_empty()
    }
}

/// Whether a result replaces the display or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Clear the display first.
    Replace,
    /// Append to what is shown.
    Append,
}

/// The outcome of a visit or action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderResult {
    /// Replace or append.
    pub mode: RenderMode,
    /// New content blocks.
    pub blocks: Vec<ContentBlock>,
    /// The complete list of actions now on offer.
    pub actions: Vec<ActionView>,
    /// Notices raised along the way.
    pub notifications: Vec<Notification>,
}

impl RenderResult {
    /// All block text joined by newlines.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(ContentBlock::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Find an action or choice by dispatch id.
    pub fn action(&self, id: &str) -> Option<&ActionView> {
        self.actions
            .iter()
            .find(|a| a.id == id || a.choices.iter().any(|c| c.id == id))
    }

    /// Whether any notification carries the message.
    pub fn has_notice(&self, message: &str) -> bool {
        self.notifications.iter().any(|n| n.message == message)
    }
}
