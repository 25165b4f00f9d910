//! Specificity calculation.
//! Spec: <https://www.w3.org/TR/selectors-3/#specificity>

use crate::{ComplexSelector, Compound, SimpleSelector};

/// Specificity triple: (ids, classes + attributes, types).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u16, pub u16, pub u16);

impl Specificity {
    fn add_compound(mut self, compound: &Compound) -> Self {
        for simple in &compound.parts {
            match simple {
                SimpleSelector::Id(_) => self.0 = self.0.saturating_add(1),
                SimpleSelector::Class(_) | SimpleSelector::Attr { .. } => {
                    self.1 = self.1.saturating_add(1);
                }
                SimpleSelector::Tag(_) => self.2 = self.2.saturating_add(1),
                SimpleSelector::Universal => {}
            }
        }
        self
    }
}

/// Sum the specificity of every compound in a complex selector.
pub fn specificity_of_complex(selector: &ComplexSelector) -> Specificity {
    let mut total = Specificity::default().add_compound(&selector.head);
    for (_, compound) in &selector.tail {
        total = total.add_compound(compound);
    }
    total
}
