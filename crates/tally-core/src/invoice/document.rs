//! Plain document text as an ordered sequence of lines.

/// Text of one or more documents, split into lines in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Split extracted text into lines. A trailing `\r` is dropped from each line.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        Self { lines }
    }

    /// Concatenate the texts of several documents in the given order, each
    /// followed by a line break.
    ///
    /// Order matters: when an identifier occurs in more than one document,
    /// the earliest document wins.
    pub fn concat<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut combined = String::new();
        for text in texts {
            combined.push_str(text.as_ref());
            combined.push('\n');
        }
        Self::from_text(&combined)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Document {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}
