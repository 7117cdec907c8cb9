//! Known pseudo-classes and pseudo-elements.
//!
//! [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
//! [CSS Pseudo-Elements Level 4](https://www.w3.org/TR/css-pseudo-4/)
//!
//! Names are matched ASCII case-insensitively. A name in these tables is
//! either supported or recognized-but-unsupported; a name in none of them is
//! unknown.

use serde::Serialize;
use strum_macros::{Display, EnumString, IntoStaticStr};

use super::Combinator;

/// Non-functional pseudo-classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum PseudoClass {
    Active,
    AnyLink,
    Blank,
    Checked,
    Current,
    Default,
    Disabled,
    Empty,
    Enabled,
    FirstChild,
    FirstOfType,
    Focus,
    FocusVisible,
    FocusWithin,
    Fullscreen,
    Future,
    Hover,
    InRange,
    Indeterminate,
    Invalid,
    LastChild,
    LastOfType,
    Link,
    LocalLink,
    OnlyChild,
    OnlyOfType,
    Optional,
    OutOfRange,
    Past,
    PlaceholderShown,
    ReadOnly,
    ReadWrite,
    Required,
    Root,
    Scope,
    Target,
    TargetWithin,
    UserInvalid,
    Valid,
    Visited,
    Warning,
}

impl PseudoClass {
    /// Whether selectors using this pseudo-class are accepted.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(
            self,
            Self::Current
                | Self::Default
                | Self::FocusVisible
                | Self::FocusWithin
                | Self::Fullscreen
                | Self::Future
                | Self::InRange
                | Self::Indeterminate
                | Self::Invalid
                | Self::LocalLink
                | Self::OutOfRange
                | Self::Past
                | Self::Scope
                | Self::Target
                | Self::TargetWithin
                | Self::UserInvalid
                | Self::Valid
                | Self::Visited
                | Self::Warning
        )
    }
}

/// Functional pseudo-classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum PseudoClassFunction {
    Current,
    Dir,
    Has,
    Is,
    Lang,
    Not,
    NthChild,
    NthCol,
    NthLastChild,
    NthLastCol,
    NthLastOfType,
    NthOfType,
    Where,
}

/// What a functional pseudo-class takes between its parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionArgument {
    /// `<complex-selector-list>`, or `<forgiving-selector-list>` when forgiving.
    ComplexList {
        /// Bad members are dropped instead of failing the list.
        forgiving: bool,
    },
    /// `<relative-selector-list>`, forgiving.
    RelativeList,
    /// `<an+b>`, optionally followed by `of <complex-selector-list>`.
    AnB {
        /// Whether `of S` is allowed.
        of: bool,
    },
    /// An argument this engine does not parse.
    Unsupported,
}

impl PseudoClassFunction {
    /// Whether selectors using this function are accepted.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self.argument(), FunctionArgument::Unsupported)
    }

    /// The grammar of the function's argument.
    #[must_use]
    pub const fn argument(self) -> FunctionArgument {
        match self {
            Self::Current | Self::Not => FunctionArgument::ComplexList { forgiving: false },
            Self::Is | Self::Where => FunctionArgument::ComplexList { forgiving: true },
            Self::Has => FunctionArgument::RelativeList,
            Self::NthChild | Self::NthLastChild => FunctionArgument::AnB { of: true },
            Self::NthOfType | Self::NthLastOfType => FunctionArgument::AnB { of: false },
            Self::Dir | Self::Lang | Self::NthCol | Self::NthLastCol => {
                FunctionArgument::Unsupported
            }
        }
    }

    /// The combinator given to the first compound of each selector in the
    /// argument list when none is written.
    ///
    /// [§ 4.5 :has()](https://www.w3.org/TR/selectors-4/#relational)
    /// "The :has() pseudo-class takes a relative selector list as an argument."
    /// A bare `:has(img)` means `:has( img)`, a descendant.
    #[must_use]
    pub const fn default_combinator(self) -> Combinator {
        match self {
            Self::Has => Combinator::Descendant,
            _ => Combinator::Close,
        }
    }
}

/// Pseudo-elements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum PseudoElement {
    After,
    Backdrop,
    Before,
    FirstLetter,
    FirstLine,
    GrammarError,
    InactiveSelection,
    Marker,
    Placeholder,
    Selection,
    SpellingError,
    TargetText,
}

impl PseudoElement {
    /// Whether selectors using this pseudo-element are accepted. The
    /// highlight pseudo-elements are recognized but rejected.
    ///
    /// [CSS Pseudo-Elements § 3 Highlight Pseudo-elements](https://www.w3.org/TR/css-pseudo-4/#highlight-pseudos)
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(
            self,
            Self::GrammarError | Self::InactiveSelection | Self::SpellingError | Self::TargetText
        )
    }
}

/// Result of looking a pseudo name up in one of the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Known and accepted.
    Supported(T),
    /// Known, but selectors using it are rejected.
    NotSupported(T),
    /// Not a known name.
    Unknown,
}

/// Find a pseudo-class by name.
#[must_use]
pub fn pseudo_class(name: &str) -> Lookup<PseudoClass> {
    name.parse::<PseudoClass>().map_or(Lookup::Unknown, |pc| {
        if pc.is_supported() {
            Lookup::Supported(pc)
        } else {
            Lookup::NotSupported(pc)
        }
    })
}

/// Find a functional pseudo-class by name (without the `(`).
#[must_use]
pub fn pseudo_class_function(name: &str) -> Lookup<PseudoClassFunction> {
    name.parse::<PseudoClassFunction>()
        .map_or(Lookup::Unknown, |f| {
            if f.is_supported() {
                Lookup::Supported(f)
            } else {
                Lookup::NotSupported(f)
            }
        })
}

/// Find a pseudo-element by name.
#[must_use]
pub fn pseudo_element(name: &str) -> Lookup<PseudoElement> {
    name.parse::<PseudoElement>().map_or(Lookup::Unknown, |pe| {
        if pe.is_supported() {
            Lookup::Supported(pe)
        } else {
            Lookup::NotSupported(pe)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(pseudo_class("HOVER"), Lookup::Supported(PseudoClass::Hover));
        assert_eq!(pseudo_class("visited"), Lookup::NotSupported(PseudoClass::Visited));
        assert_eq!(pseudo_class("hovered"), Lookup::Unknown);
        assert_eq!(
            pseudo_class_function("nth-last-child"),
            Lookup::Supported(PseudoClassFunction::NthLastChild)
        );
        assert_eq!(pseudo_class_function("lang"), Lookup::NotSupported(PseudoClassFunction::Lang));
        assert_eq!(pseudo_element("before"), Lookup::Supported(PseudoElement::Before));
        assert_eq!(
            pseudo_element("spelling-error"),
            Lookup::NotSupported(PseudoElement::SpellingError)
        );
    }

    #[test]
    fn test_names_round_trip() {
        assert_eq!(PseudoClass::PlaceholderShown.to_string(), "placeholder-shown");
        assert_eq!(PseudoClassFunction::NthLastOfType.to_string(), "nth-last-of-type");
        assert_eq!(PseudoElement::FirstLetter.to_string(), "first-letter");
    }

    #[test]
    fn test_default_combinators() {
        assert_eq!(PseudoClassFunction::Has.default_combinator(), Combinator::Descendant);
        assert_eq!(PseudoClassFunction::Is.default_combinator(), Combinator::Close);
        assert_eq!(PseudoClassFunction::NthChild.default_combinator(), Combinator::Close);
    }
}
