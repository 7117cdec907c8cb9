//! [§ 11.2.1 ISO-2022-JP decoder](https://encoding.spec.whatwg.org/#iso-2022-jp-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;
use crate::index;

const ESC: u8 = 0x1B;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum State {
    #[default]
    Ascii,
    Roman,
    Katakana,
    LeadByte,
    TrailByte,
    EscapeStart,
    Escape,
}

#[derive(Debug, Default)]
pub(crate) struct Iso2022JpDecoder {
    state: State,
    output_state: State,
    lead: u8,
    output: bool,
}

impl Iso2022JpDecoder {
    fn escape_start(&mut self) -> Handled {
        self.state = State::EscapeStart;
        Handled::Continue
    }
}

impl Handler for Iso2022JpDecoder {
    fn handle(&mut self, byte: Option<u8>, prepend: &mut Prepend) -> Handled {
        match self.state {
            State::Ascii => match byte {
                Some(ESC) => self.escape_start(),
                Some(b @ 0x00..=0x7F) if b != 0x0E && b != 0x0F => {
                    self.output = false;
                    Handled::Codepoint(u32::from(b))
                }
                None => Handled::Finished,
                Some(_) => {
                    self.output = false;
                    Handled::Error
                }
            },
            State::Roman => match byte {
                Some(ESC) => self.escape_start(),
                Some(0x5C) => {
                    self.output = false;
                    Handled::Codepoint(0x00A5)
                }
                Some(0x7E) => {
                    self.output = false;
                    Handled::Codepoint(0x203E)
                }
                Some(b @ 0x00..=0x7F) if b != 0x0E && b != 0x0F => {
                    self.output = false;
                    Handled::Codepoint(u32::from(b))
                }
                None => Handled::Finished,
                Some(_) => {
                    self.output = false;
                    Handled::Error
                }
            },
            State::Katakana => match byte {
                Some(ESC) => self.escape_start(),
                Some(b @ 0x21..=0x5F) => {
                    self.output = false;
                    Handled::Codepoint(0xFF61 - 0x21 + u32::from(b))
                }
                None => Handled::Finished,
                Some(_) => {
                    self.output = false;
                    Handled::Error
                }
            },
            State::LeadByte => match byte {
                Some(ESC) => self.escape_start(),
                Some(b @ 0x21..=0x7E) => {
                    self.output = false;
                    self.lead = b;
                    self.state = State::TrailByte;
                    Handled::Continue
                }
                None => Handled::Finished,
                Some(_) => {
                    self.output = false;
                    Handled::Error
                }
            },
            State::TrailByte => match byte {
                Some(ESC) => {
                    self.state = State::EscapeStart;
                    Handled::Error
                }
                Some(b @ 0x21..=0x7E) => {
                    self.state = State::LeadByte;
                    let pointer = (u32::from(self.lead) - 0x21) * 94 + u32::from(b) - 0x21;
                    index::jis0208(pointer).map_or(Handled::Error, Handled::Codepoint)
                }
                // End-of-queue goes back to the queue: the next call sees it
                // in the lead byte state and finishes.
                None => {
                    self.state = State::LeadByte;
                    Handled::Error
                }
                Some(_) => {
                    self.state = State::LeadByte;
                    Handled::Error
                }
            },
            State::EscapeStart => match byte {
                Some(b @ (0x24 | 0x28)) => {
                    self.lead = b;
                    self.state = State::Escape;
                    Handled::Continue
                }
                other => {
                    if let Some(b) = other {
                        prepend.push(&[b]);
                    }
                    self.output = false;
                    self.state = self.output_state;
                    Handled::Error
                }
            },
            State::Escape => {
                let lead = self.lead;
                self.lead = 0;

                let next = match (lead, byte) {
                    (0x28, Some(0x42)) => Some(State::Ascii),
                    (0x28, Some(0x4A)) => Some(State::Roman),
                    (0x28, Some(0x49)) => Some(State::Katakana),
                    (0x24, Some(0x40 | 0x42)) => Some(State::LeadByte),
                    _ => None,
                };

                if let Some(next) = next {
                    self.state = next;
                    self.output_state = next;
                    let output = self.output;
                    self.output = true;
                    return if output {
                        Handled::Error
                    } else {
                        Handled::Continue
                    };
                }

                match byte {
                    Some(b) => prepend.push(&[lead, b]),
                    None => prepend.push(&[lead]),
                }
                self.output = false;
                self.state = self.output_state;
                Handled::Error
            }
        }
    }
}
