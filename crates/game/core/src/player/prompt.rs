//! Prompt templates with named slots.
//!
//! Templates use `{slot}` placeholders; `{{` and `}}` produce literal braces.
//! Only the slots in [`PromptSlot`] are accepted, so a typo in a template is
//! caught when the template is parsed rather than when the first prompt is
//! rendered.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::Amount;

/// Named placeholders a template may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PromptSlot {
    NumPlayers,
    GamePot,
    StagesLeft,
    Profile,
    PreviousDecisions,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("unknown template slot `{name}` at byte {offset}")]
    UnknownSlot { name: String, offset: usize },

    #[error("unclosed `{{` at byte {offset}")]
    UnclosedBrace { offset: usize },

    #[error("single `}}` at byte {offset} (use `}}}}` for a literal brace)")]
    UnmatchedClosingBrace { offset: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(PromptSlot),
}

/// Parsed prompt template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

/// Values substituted into a template for one decision.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PromptContext {
    pub num_players: usize,
    pub game_pot: Amount,
    pub stages_left: i64,
    pub profile: String,
    /// Pre-rendered history of the other players, one line each.
    pub previous_decisions: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Result<Self, PromptError> {
        let source = source.into();
        let segments = parse(&source)?;
        Ok(Self { source, segments })
    }

    /// Original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Slots referenced by this template, in order of appearance.
    pub fn slots(&self) -> impl Iterator<Item = PromptSlot> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(slot) => Some(*slot),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, ctx: &PromptContext) -> String {
        let mut out = String::with_capacity(self.source.len() + ctx.previous_decisions.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(slot) => {
                    // Writing into a String cannot fail.
                    let _ = match slot {
                        PromptSlot::NumPlayers => write!(out, "{}", ctx.num_players),
                        PromptSlot::GamePot => write!(out, "{}", ctx.game_pot),
                        PromptSlot::StagesLeft => write!(out, "{}", ctx.stages_left),
                        PromptSlot::Profile => write!(out, "{}", ctx.profile),
                        PromptSlot::PreviousDecisions => {
                            write!(out, "{}", ctx.previous_decisions)
                        }
                    };
                }
            }
        }
        out
    }
}

impl TryFrom<String> for PromptTemplate {
    type Error = PromptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PromptTemplate> for String {
    fn from(value: PromptTemplate) -> Self {
        value.source
    }
}

impl FromStr for PromptTemplate {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

fn parse(source: &str) -> Result<Vec<Segment>, PromptError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '{' => {
                if chars.next_if(|&(_, c)| c == '{').is_some() {
                    literal.push('{');
                    continue;
                }

                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(PromptError::UnclosedBrace { offset });
                }

                let slot = PromptSlot::from_str(name.trim())
                    .map_err(|_| PromptError::UnknownSlot { name, offset })?;
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Slot(slot));
            }
            '}' => {
                if chars.next_if(|&(_, c)| c == '}').is_some() {
                    literal.push('}');
                } else {
                    return Err(PromptError::UnmatchedClosingBrace { offset });
                }
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PromptContext {
        PromptContext {
            num_players: 3,
            game_pot: 400,
            stages_left: 5,
            profile: "cautious".into(),
            previous_decisions: "Player 2: [10, 20]\nPlayer 3: []".into(),
        }
    }

    #[test]
    fn renders_every_slot() {
        let template = PromptTemplate::new(
            "n={num_players} pot={game_pot} left={stages_left} you={profile}\n{previous_decisions}",
        )
        .unwrap();

        assert_eq!(
            template.render(&context()),
            "n=3 pot=400 left=5 you=cautious\nPlayer 2: [10, 20]\nPlayer 3: []"
        );
    }

    #[test]
    fn doubled_braces_are_literal() {
        let template = PromptTemplate::new("{{\"claim\": {game_pot}}}").unwrap();
        assert_eq!(template.render(&context()), "{\"claim\": 400}");
    }

    #[test]
    fn unknown_slot_is_rejected() {
        let err = PromptTemplate::new("pot: {gamepot}").unwrap_err();
        assert_eq!(
            err,
            PromptError::UnknownSlot {
                name: "gamepot".into(),
                offset: 5
            }
        );
    }

    #[test]
    fn unbalanced_braces_are_rejected() {
        assert_eq!(
            PromptTemplate::new("oops {profile").unwrap_err(),
            PromptError::UnclosedBrace { offset: 5 }
        );
        assert_eq!(
            PromptTemplate::new("oops }").unwrap_err(),
            PromptError::UnmatchedClosingBrace { offset: 5 }
        );
    }

    #[test]
    fn slots_are_listed_in_order() {
        let template = PromptTemplate::new("{profile} {game_pot} {profile}").unwrap();
        let slots: Vec<_> = template.slots().collect();
        assert_eq!(
            slots,
            vec![PromptSlot::Profile, PromptSlot::GamePot, PromptSlot::Profile]
        );
    }
}
