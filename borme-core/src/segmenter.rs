// Segmenter - cleaned bulletin text → ordered paragraphs
//
// Records are delimited by their sequential codes. The first six characters
// of the text give the starting code; each following code is searched as a
// plain substring, so a code that happens to occur inside a record body
// splits that record early. That fragility is part of the bulletin format
// and is kept as is; short paragraphs are reported so it can be spotted.

use crate::config::{SegmenterConfig, TrailingParagraph};
use crate::error::PipelineError;
use crate::observer::Observer;
use crate::types::{Bulletin, Paragraph, RecordCode};
use std::sync::Arc;

/// Width of the code that opens every bulletin
pub const CODE_WIDTH: usize = 6;

pub struct Segmenter {
    config: SegmenterConfig,
    observer: Arc<dyn Observer>,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig, observer: Arc<dyn Observer>) -> Self {
        Self { config, observer }
    }

    /// Read the starting record code from the head of the text
    pub fn starting_code(bulletin: &Bulletin) -> Result<RecordCode, PipelineError> {
        let malformed = |reason: String| PipelineError::MalformedBulletin {
            bulletin: bulletin.id.clone(),
            reason,
        };

        let text = bulletin.text.trim_start();
        if text.is_empty() {
            return Err(malformed("text is empty".to_string()));
        }

        let head: String = text.chars().take(CODE_WIDTH).collect();
        if head.chars().count() < CODE_WIDTH || !head.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed(format!(
                "expected {CODE_WIDTH} leading digits, found {head:?}"
            )));
        }

        head.parse::<u64>()
            .map(RecordCode)
            .map_err(|e| malformed(e.to_string()))
    }

    /// Split a bulletin into one paragraph per sequential record code
    pub fn segment(&self, bulletin: &Bulletin) -> Result<Vec<Paragraph>, PipelineError> {
        let mut code = Self::starting_code(bulletin)?;
        let mut remaining = bulletin.text.trim_start();
        let mut paragraphs = Vec::new();

        loop {
            let current = code.to_string();
            let Some(found) = remaining.find(&current) else {
                break;
            };
            let body = &remaining[found + current.len()..];

            let Some(next) = code.next() else {
                self.observer.warn(
                    "Record code sequence overflowed, stopping segmentation",
                    &[("bulletin", bulletin.id.as_str()), ("code", current.as_str())],
                );
                break;
            };

            match body.find(&next.to_string()) {
                Some(end) => {
                    self.push(bulletin, &mut paragraphs, code, &body[..end]);
                    remaining = &body[end..];
                    code = next;
                }
                None => {
                    match self.config.trailing_paragraph {
                        TrailingParagraph::Keep => {
                            self.push(bulletin, &mut paragraphs, code, body);
                        }
                        TrailingParagraph::Discard => {
                            let dropped = (current.len() + body.len()).to_string();
                            self.observer.info(
                                "Discarding text after the last delimited record",
                                &[
                                    ("bulletin", bulletin.id.as_str()),
                                    ("code", current.as_str()),
                                    ("bytes", dropped.as_str()),
                                ],
                            );
                        }
                    }
                    break;
                }
            }
        }

        let count = paragraphs.len().to_string();
        self.observer.debug(
            "Segmented bulletin",
            &[("bulletin", bulletin.id.as_str()), ("paragraphs", count.as_str())],
        );
        Ok(paragraphs)
    }

    fn push(&self, bulletin: &Bulletin, paragraphs: &mut Vec<Paragraph>, code: RecordCode, body: &str) {
        let text = format!("{code}{body}");
        let chars = text.chars().count();
        if chars < self.config.min_paragraph_chars {
            self.observer.warn(
                "Paragraph shorter than expected, record code may occur inside a record body",
                &[
                    ("bulletin", bulletin.id.as_str()),
                    ("code", code.to_string().as_str()),
                    ("chars", chars.to_string().as_str()),
                ],
            );
        }
        paragraphs.push(Paragraph { code, text });
    }
}
