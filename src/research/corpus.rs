//! The consolidated research corpus and its text layout.

use chrono::{DateTime, Local};
use serde::Serialize;

/// Returned when the search chain produced no results at all.
pub const NO_SOURCES_MESSAGE: &str = "The web search found no relevant sources for this query. \
     The analysis will be based only on the data provided.";

/// Returned when results were found but no page passed the quality gate.
pub const NO_USABLE_CONTENT_MESSAGE: &str = "The web search found sources, but no detailed \
     content could be extracted. The analysis may be limited.";

/// Shown when neither the search result nor the page has a title.
const UNTITLED: &str = "Not available";

/// Research context assembled from search results and extracted pages.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchCorpus {
    pub query: String,
    /// Search results the orchestrator attempted to extract.
    pub sources_considered: usize,
    /// Pages whose cleaned text passed the quality gate.
    pub sources_usable: usize,
    /// The annotated corpus, or one of the two fixed messages.
    pub combined_text: String,
    pub generated_at: DateTime<Local>,
    /// The deadline expired or the caller cancelled before all pages were
    /// extracted.
    pub timed_out: bool,
}

impl ResearchCorpus {
    /// Corpus for a search that returned nothing.
    pub(crate) fn no_sources(query: &str, timed_out: bool) -> Self {
        Self {
            query: query.to_owned(),
            sources_considered: 0,
            sources_usable: 0,
            combined_text: NO_SOURCES_MESSAGE.to_owned(),
            generated_at: Local::now(),
            timed_out,
        }
    }

    /// `true` when at least one page made it into the corpus.
    pub fn has_content(&self) -> bool {
        self.sources_usable > 0
    }
}

/// Accumulates source blocks in search order.
pub(crate) struct CorpusBuilder {
    query: String,
    text: String,
    usable: usize,
}

impl CorpusBuilder {
    pub(crate) fn new(query: &str) -> Self {
        Self {
            query: query.to_owned(),
            text: format!("WEB RESEARCH CONTEXT FOR QUERY: '{query}'\n\n"),
            usable: 0,
        }
    }

    /// Append one source block. The first non-blank title wins.
    pub(crate) fn push_source(&mut self, titles: &[&str], url: &str, content: &str) {
        let title = titles
            .iter()
            .map(|t| t.trim())
            .find(|t| !t.is_empty())
            .unwrap_or(UNTITLED);

        self.text.push_str("--- SOURCE START ---\n");
        self.text.push_str(&format!("Title: {title}\n"));
        self.text.push_str(&format!("URL: {url}\n"));
        let body = format!("Extracted Content:\n{content}\n");
        self.text.push_str(&body);
        self.text.push_str("--- SOURCE END ---\n\n");
        self.usable += 1;
    }

    /// Close the corpus with the summary block, or collapse it to the
    /// "no usable content" message when nothing was appended.
    pub(crate) fn finish(self, sources_considered: usize, timed_out: bool) -> ResearchCorpus {
        let generated_at = Local::now();
        let combined_text = if self.usable == 0 {
            NO_USABLE_CONTENT_MESSAGE.to_owned()
        } else {
            let mut text = self.text;
            text.push_str("--- RESEARCH SUMMARY ---\n");
            text.push_str(&format!("Search Date: {}\n", generated_at.format("%d/%m/%Y %H:%M")));
            text.push_str(&format!("Total Sources Found: {sources_considered}\n"));
            text.push_str(&format!("Pages With Relevant Content: {}\n", self.usable));
            text
        };

        ResearchCorpus {
            query: self.query,
            sources_considered,
            sources_usable: self.usable,
            combined_text,
            generated_at,
            timed_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_block_layout() {
        let mut builder = CorpusBuilder::new("market trends");
        builder.push_source(&["Retail 2024"], "https://a.example", "Body text.");
        let corpus = builder.finish(3, false);

        assert!(corpus.combined_text.starts_with(
            "WEB RESEARCH CONTEXT FOR QUERY: 'market trends'\n\n\
             --- SOURCE START ---\n\
             Title: Retail 2024\n\
             URL: https://a.example\n\
             Extracted Content:\n\
             Body text.\n\
             --- SOURCE END ---\n\n\
             --- RESEARCH SUMMARY ---\n"
        ));
        assert!(corpus.combined_text.ends_with(
            "Total Sources Found: 3\nPages With Relevant Content: 1\n"
        ));
        assert_eq!(corpus.sources_usable, 1);
        assert_eq!(corpus.sources_considered, 3);
        assert!(corpus.has_content());
    }

    #[test]
    fn summary_date_uses_day_month_year() {
        let mut builder = CorpusBuilder::new("q");
        builder.push_source(&["t"], "https://a.example", "x");
        let corpus = builder.finish(1, false);
        let expected = format!(
            "Search Date: {}\n",
            corpus.generated_at.format("%d/%m/%Y %H:%M")
        );
        assert!(corpus.combined_text.contains(&expected));
    }

    #[test]
    fn title_falls_back_in_order() {
        let mut builder = CorpusBuilder::new("q");
        builder.push_source(&["  ", "Page Title"], "https://a.example", "x");
        builder.push_source(&["", ""], "https://b.example", "y");
        let text = builder.finish(2, false).combined_text;
        assert!(text.contains("Title: Page Title\nURL: https://a.example"));
        assert!(text.contains("Title: Not available\nURL: https://b.example"));
    }

    #[test]
    fn nothing_usable_collapses_to_message() {
        let corpus = CorpusBuilder::new("q").finish(4, true);
        assert_eq!(corpus.combined_text, NO_USABLE_CONTENT_MESSAGE);
        assert_eq!(corpus.sources_considered, 4);
        assert!(corpus.timed_out);
        assert!(!corpus.has_content());
    }

    #[test]
    fn no_sources_corpus() {
        let corpus = ResearchCorpus::no_sources("q", false);
        assert_eq!(corpus.combined_text, NO_SOURCES_MESSAGE);
        assert_eq!(corpus.sources_considered, 0);
    }

    #[test]
    fn messages_are_distinct() {
        assert_ne!(NO_SOURCES_MESSAGE, NO_USABLE_CONTENT_MESSAGE);
    }
}
