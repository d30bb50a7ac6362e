//! Animatable style properties
//!
//! Elements carry a small set of inline overrides on top of their natural
//! (unstyled) appearance. Animations only ever write these overrides, so
//! removing them restores the element exactly.

use smallvec::SmallVec;

/// Style properties the motion layer can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    /// Opacity (0.0 to 1.0). Zero opacity also hides the element.
    Opacity,
    /// Horizontal translation in pixels
    TranslateX,
    /// Vertical translation in pixels
    TranslateY,
    /// Uniform scale factor
    Scale,
    /// Gaussian blur radius in pixels
    Blur,
    /// Vertical mask size in percent (0 = fully masked, 100 = fully shown)
    MaskSize,
}

impl Property {
    /// Value of the property when no override is present
    pub fn identity(&self) -> f32 {
        match self {
            Property::Opacity => 1.0,
            Property::TranslateX | Property::TranslateY => 0.0,
            Property::Scale => 1.0,
            Property::Blur => 0.0,
            Property::MaskSize => 100.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Property::Opacity => "opacity",
            Property::TranslateX => "x",
            Property::TranslateY => "y",
            Property::Scale => "scale",
            Property::Blur => "blur",
            Property::MaskSize => "mask-size",
        }
    }
}

/// Inline style overrides for a single element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementStyle {
    values: SmallVec<[(Property, f32); 6]>,
}

impl ElementStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an override, if one is set
    pub fn get(&self, property: Property) -> Option<f32> {
        self.values
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    /// Get the effective value (override or identity)
    pub fn resolved(&self, property: Property) -> f32 {
        self.get(property).unwrap_or_else(|| property.identity())
    }

    /// Set an override, returning true if the stored value changed
    pub fn set(&mut self, property: Property, value: f32) -> bool {
        match self.values.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) if *v == value => false,
            Some((_, v)) => {
                *v = value;
                true
            }
            None => {
                self.values.push((property, value));
                true
            }
        }
    }

    /// Remove an override, returning the previous value
    pub fn remove(&mut self, property: Property) -> Option<f32> {
        let index = self.values.iter().position(|(p, _)| *p == property)?;
        Some(self.values.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the element is shown (opacity above zero)
    pub fn is_visible(&self) -> bool {
        self.resolved(Property::Opacity) > 0.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, f32)> + '_ {
        self.values.iter().copied()
    }
}
