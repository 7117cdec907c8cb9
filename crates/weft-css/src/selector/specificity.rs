//! [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)

use std::ops::Add;

use serde::Serialize;

use super::{
    ComplexSelector, ListId, PseudoArgument, PseudoClassFunction, Selectors, SimpleSelector,
};

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(
            self.0.saturating_add(other.0),
            self.1.saturating_add(other.1),
            self.2.saturating_add(other.2),
        )
    }
}

impl Selectors {
    /// Specificity of each top-level complex selector.
    #[must_use]
    pub fn specificities(&self) -> Vec<Specificity> {
        let table = self.list_specificities();
        self.root()
            .selectors
            .iter()
            .map(|complex| complex_specificity(complex, &table))
            .collect()
    }

    /// Specificity of a complex selector belonging to this parse.
    #[must_use]
    pub fn specificity(&self, complex: &ComplexSelector) -> Specificity {
        complex_specificity(complex, &self.list_specificities())
    }

    /// The most specific member of every list, by list index.
    ///
    /// A list only refers to lists stored before it, so one forward pass
    /// sees every argument before the selector using it.
    fn list_specificities(&self) -> Vec<Specificity> {
        let mut table: Vec<Specificity> = Vec::with_capacity(self.lists().len());
        for list in self.lists() {
            let max = list
                .selectors
                .iter()
                .map(|complex| complex_specificity(complex, &table))
                .max()
                .unwrap_or_default();
            table.push(max);
        }
        table
    }
}

fn complex_specificity(complex: &ComplexSelector, table: &[Specificity]) -> Specificity {
    complex
        .components
        .iter()
        .map(|component| simple_specificity(&component.simple, table))
        .fold(Specificity::default(), Add::add)
}

fn simple_specificity(simple: &SimpleSelector, table: &[Specificity]) -> Specificity {
    let list = |id: ListId| table.get(id.index()).copied().unwrap_or_default();

    match simple {
        // "count the number of ID selectors in the selector (= A)"
        SimpleSelector::Id(_) => Specificity(1, 0, 0),

        // "count the number of class selectors, attributes selectors,
        // and pseudo-classes in the selector (= B)"
        SimpleSelector::Class(_) | SimpleSelector::Attribute(_) | SimpleSelector::PseudoClass(_) => {
            Specificity(0, 1, 0)
        }

        // "count the number of type selectors and pseudo-elements
        // in the selector (= C)"
        SimpleSelector::Type { .. } | SimpleSelector::PseudoElement(_) => Specificity(0, 0, 1),

        // "ignore the universal selector"
        SimpleSelector::Universal { .. } => Specificity::default(),

        SimpleSelector::PseudoClassFunction { function, argument } => match (function, argument) {
            // "The specificity of a :where() pseudo-class is replaced by zero."
            (PseudoClassFunction::Where, _) => Specificity::default(),

            // "The specificity of an :is(), :not(), or :has() pseudo-class is
            // replaced by the specificity of the most specific complex selector
            // in its selector list argument."
            (_, PseudoArgument::List(id)) => list(*id),

            // "The specificity of an :nth-child() or :nth-last-child() selector
            // is the specificity of the pseudo class itself (counting as one
            // pseudo-class selector) plus the specificity of the most specific
            // complex selector in its selector list argument (if any)."
            (_, PseudoArgument::AnB { of, .. }) => {
                Specificity(0, 1, 0) + of.map(list).unwrap_or_default()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectorParser;

    fn specificity(css: &str) -> Specificity {
        let mut parser = SelectorParser::new();
        parser.parse_list(css).unwrap().specificities()[0]
    }

    #[test]
    fn test_basic_counts() {
        assert_eq!(specificity("*"), Specificity(0, 0, 0));
        assert_eq!(specificity("li"), Specificity(0, 0, 1));
        assert_eq!(specificity("ul li"), Specificity(0, 0, 2));
        assert_eq!(specificity("ul ol+li"), Specificity(0, 0, 3));
        assert_eq!(specificity("h1 + *[rel=up]"), Specificity(0, 1, 1));
        assert_eq!(specificity("ul ol li.red"), Specificity(0, 1, 3));
        assert_eq!(specificity("li.red.level"), Specificity(0, 2, 1));
        assert_eq!(specificity("#x34y"), Specificity(1, 0, 0));
        assert_eq!(specificity("p::before:hover"), Specificity(0, 1, 2));
    }

    #[test]
    fn test_functional_pseudo_classes() {
        assert_eq!(specificity(":is(em, #foo)"), Specificity(1, 0, 0));
        assert_eq!(specificity(":where(em, #foo)"), Specificity(0, 0, 0));
        assert_eq!(specificity(":not(.a, #b .c)"), Specificity(1, 1, 0));
        assert_eq!(specificity("a:has(> img)"), Specificity(0, 0, 2));
        assert_eq!(specificity(":nth-child(2n+1)"), Specificity(0, 1, 0));
        assert_eq!(specificity(":nth-last-of-type(odd)"), Specificity(0, 1, 0));
    }

    #[test]
    fn test_nth_child_of_selector() {
        assert_eq!(
            specificity("#id tag :nth-child(even of #item .class)"),
            Specificity(2, 2, 1)
        );
        assert_eq!(specificity(":nth-child(2n of li, .x)"), Specificity(0, 2, 0));
    }

    #[test]
    fn test_nested_lists_are_ordered() {
        assert_eq!(specificity(":is(:not(#a), :where(#b #c))"), Specificity(1, 0, 0));
        assert!(Specificity(1, 0, 0) > Specificity(0, 9, 9));
    }
}
