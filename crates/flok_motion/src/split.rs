//! Word splitting
//!
//! [`split_words`] is the pure part: it turns a string into word fragments.
//! [`SplitText`] applies that to an element by replacing its text with one
//! child span per word, and puts everything back on [`SplitText::revert`].

use flok_core::{ElementId, ElementSpec, Scene};

/// One word of a split string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    /// Position among the fragments
    pub index: usize,
    /// Byte offset of the word in the source string
    pub offset: usize,
}

/// Split text into whitespace-separated words
pub fn split_words(text: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut start = None;

    for (offset, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (false, None) => start = Some(offset),
            (true, Some(begin)) => {
                fragments.push(Fragment {
                    text: text[begin..offset].to_string(),
                    index: fragments.len(),
                    offset: begin,
                });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(begin) = start {
        fragments.push(Fragment {
            text: text[begin..].to_string(),
            index: fragments.len(),
            offset: begin,
        });
    }
    fragments
}

/// An element whose text has been replaced by word spans
#[derive(Debug)]
pub struct SplitText {
    target: ElementId,
    original: String,
    words: Vec<ElementId>,
}

impl SplitText {
    /// Split the target's text into `span.word` children.
    ///
    /// Returns `None` if the element is missing or has no words.
    pub fn apply(scene: &mut Scene, target: ElementId) -> Option<SplitText> {
        let original = scene.text(target)?.to_string();
        let fragments = split_words(&original);
        if fragments.is_empty() {
            return None;
        }

        let mut words = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let spec = ElementSpec::new("span")
                .class("word")
                .data("word-index", fragment.index.to_string())
                .text(fragment.text);
            words.extend(scene.create(target, spec));
        }
        scene.set_text(target, "");

        tracing::trace!(?target, words = words.len(), "split text");
        Some(SplitText {
            target,
            original,
            words,
        })
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    /// The word elements, in reading order
    pub fn words(&self) -> &[ElementId] {
        &self.words
    }

    /// Remove the word spans and restore the original text
    pub fn revert(self, scene: &mut Scene) {
        for word in self.words {
            scene.remove(word);
        }
        scene.set_text(self.target, self.original);
    }
}
