//! Element matching.
//! Spec: <https://www.w3.org/TR/selectors-3/> Section 3, 11

use crate::{AttrOp, Combinator, ComplexSelector, Compound, ElementAdapter, SelectorList, SimpleSelector};

/// True if any selector in the list matches the element.
/// Spec: Section 4 — Groups of selectors
pub fn matches_list<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
) -> bool {
    list.selectors
        .iter()
        .any(|complex| matches_complex(adapter, element, complex))
}

/// Match a complex selector against an element, right to left with
/// backtracking across descendant and general-sibling combinators.
pub fn matches_complex<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    selector: &ComplexSelector,
) -> bool {
    if !matches_compound(adapter, element, selector.subject()) {
        return false;
    }
    if selector.tail.is_empty() {
        return true;
    }
    // The subject compound is tail[len-1].1; relate leftward from there.
    matches_leftward(adapter, element, selector, selector.tail.len())
}

/// Check that the compounds left of `tail[upto]`'s compound can be anchored
/// at `element`. `upto == tail.len()` starts from the subject.
fn matches_leftward<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    selector: &ComplexSelector,
    upto: usize,
) -> bool {
    let Some(position) = upto.checked_sub(1) else {
        return true;
    };
    let Some((combinator, _)) = selector.tail.get(position) else {
        return true;
    };
    let left_compound = position
        .checked_sub(1)
        .and_then(|prev| selector.tail.get(prev).map(|pair| &pair.1))
        .unwrap_or(&selector.head);

    match combinator {
        Combinator::Child => adapter.parent(element).is_some_and(|parent| {
            matches_compound(adapter, parent, left_compound)
                && matches_leftward(adapter, parent, selector, position)
        }),
        Combinator::AdjacentSibling => {
            adapter
                .previous_sibling_element(element)
                .is_some_and(|sibling| {
                    matches_compound(adapter, sibling, left_compound)
                        && matches_leftward(adapter, sibling, selector, position)
                })
        }
        Combinator::Descendant => {
            let mut ancestor = adapter.parent(element);
            while let Some(candidate) = ancestor {
                if matches_compound(adapter, candidate, left_compound)
                    && matches_leftward(adapter, candidate, selector, position)
                {
                    return true;
                }
                ancestor = adapter.parent(candidate);
            }
            false
        }
        Combinator::GeneralSibling => {
            let mut sibling = adapter.previous_sibling_element(element);
            while let Some(candidate) = sibling {
                if matches_compound(adapter, candidate, left_compound)
                    && matches_leftward(adapter, candidate, selector, position)
                {
                    return true;
                }
                sibling = adapter.previous_sibling_element(candidate);
            }
            false
        }
    }
}

/// Match every simple selector of a compound against a single element.
/// Spec: Section 5–8
pub fn matches_compound<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compound: &Compound,
) -> bool {
    compound
        .parts
        .iter()
        .all(|simple| matches_simple(adapter, element, simple))
}

fn matches_simple<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    simple: &SimpleSelector,
) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Tag(name) => adapter.tag_name(element) == name.as_str(),
        SimpleSelector::Class(token) => adapter.has_class(element, token),
        SimpleSelector::Id(ident) => adapter
            .element_id(element)
            .is_some_and(|value| value == ident.as_str()),
        SimpleSelector::Attr { name, op, value } => match adapter.attr(element, name) {
            None => false,
            Some(actual) => match op {
                AttrOp::Exists => true,
                AttrOp::Equals => actual == value.as_str(),
                AttrOp::Contains => !value.is_empty() && actual.contains(value.as_str()),
            },
        },
    }
}
