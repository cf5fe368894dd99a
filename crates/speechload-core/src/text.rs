// Fixed input-text presets of increasing length.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

const SHORT_TEXT: &str = "Hello, this is a short test message.";

const MEDIUM_TEXT: &str = "This is a medium length message that contains more words and \
     will generate a longer audio file. It should take more time to process than the \
     shorter message.";

const LONG_TEXT: &str = "This is a much longer message that will result in a significantly \
     larger audio output. It contains multiple sentences and will take more processing \
     time. When we test with longer inputs like this, we can better evaluate how the \
     server performs under more demanding conditions. This helps identify potential \
     bottlenecks in the processing pipeline. The server should be able to handle requests \
     of varying sizes without issues.";

/// Input-text size class for a run. Each class maps to one fixed
/// sample text, so payload size is the only thing that varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextLength {
    Short,
    Medium,
    Long,
}

impl TextLength {
    /// The preset input text for this class.
    pub fn sample_text(&self) -> &'static str {
        match self {
            TextLength::Short => SHORT_TEXT,
            TextLength::Medium => MEDIUM_TEXT,
            TextLength::Long => LONG_TEXT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextLength::Short => "short",
            TextLength::Medium => "medium",
            TextLength::Long => "long",
        }
    }
}

impl fmt::Display for TextLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_grow_with_class() {
        let short = TextLength::Short.sample_text().len();
        let medium = TextLength::Medium.sample_text().len();
        let long = TextLength::Long.sample_text().len();
        assert!(short < medium);
        assert!(medium < long);
    }
}
