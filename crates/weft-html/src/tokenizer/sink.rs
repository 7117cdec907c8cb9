//! The consumer side of the tokenizer.

use weft_common::Result;

use super::state::TokenizerState;
use super::token::Token;

/// What the tokenizer should do after a token was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSinkResult {
    /// Keep tokenizing in the current state.
    Continue,
    /// Keep tokenizing, but switch to the given state first.
    ///
    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
    /// The tree builder uses this to put the tokenizer into the RCDATA,
    /// RAWTEXT, script data or PLAINTEXT state after the start tag of an
    /// element whose content is not markup.
    SwitchTo(TokenizerState),
    /// Stop tokenizing. Further input is rejected with
    /// [`weft_common::Status::Stopped`].
    Stop,
}

/// Receives tokens as the tokenizer produces them.
///
/// Tokens are handed over by value; a sink keeps whatever it needs.
pub trait TokenSink {
    /// Consume one token.
    ///
    /// # Errors
    /// Any error halts the tokenizer and is returned from the feeding call.
    fn process_token(&mut self, token: Token) -> Result<TokenSinkResult>;

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace", `<![CDATA[` starts a CDATA section. Only the tree
    /// builder knows this.
    fn adjusted_current_node_is_foreign(&self) -> bool {
        false
    }
}

/// Collects every token, for tooling and tests.
impl TokenSink for Vec<Token> {
    fn process_token(&mut self, token: Token) -> Result<TokenSinkResult> {
        weft_common::Status::reserve(self, 1)?;
        self.push(token);
        Ok(TokenSinkResult::Continue)
    }
}
