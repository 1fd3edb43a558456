use crate::error::GrammarError;

/// Forward-only view over the text a grammar has not consumed yet.
///
/// Each step names the anchor it expects; taking up to an anchor consumes
/// the anchor too, so the next step starts right after it.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    /// Text before the first `anchor`; the cursor moves past the anchor
    pub fn take_until(
        &mut self,
        step: &'static str,
        anchor: &'static str,
    ) -> Result<&'a str, GrammarError> {
        let (before, after) = self
            .rest
            .split_once(anchor)
            .ok_or(GrammarError::MissingAnchor { step, anchor })?;
        self.rest = after;
        Ok(before)
    }

    /// Like `take_until`, but an absent anchor is not an error
    pub fn try_take_until(&mut self, anchor: &str) -> Option<&'a str> {
        let (before, after) = self.rest.split_once(anchor)?;
        self.rest = after;
        Some(before)
    }

    pub fn rest(&self) -> &'a str {
        self.rest
    }
}

/// Trimmed value that must not be empty
pub fn required(
    value: &str,
    step: &'static str,
    field: &'static str,
) -> Result<String, GrammarError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GrammarError::EmptyField { step, field });
    }
    Ok(value.to_string())
}
