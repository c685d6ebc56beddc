/// Who a transcript line is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    /// Client-side progress or failure text, shown without a prefix.
    Notice,
    System,
    User,
    /// Raw dump of a response the protocol did not expect.
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub author: Author,
    pub text: String,
}

impl TranscriptLine {
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            author: Author::Notice,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            author: Author::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
        }
    }

    pub fn unexpected(text: impl Into<String>) -> Self {
        Self {
            author: Author::Unexpected,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.author {
            Author::Notice => write!(f, "{}", self.text),
            Author::System => write!(f, "System: {}", self.text),
            Author::User => write!(f, "User: {}", self.text),
            Author::Unexpected => write!(f, "Unexpected: {}", self.text),
        }
    }
}
