//! Shared numeric values that timelines can drive
//!
//! Not every animated quantity is a style property. A counter interpolates
//! a plain number and formats it into text itself; `ValueCell` is the
//! target for that kind of tween.

use std::cell::Cell;
use std::rc::Rc;

/// A single animated number shared between a timeline and its owner
#[derive(Clone, Debug, Default)]
pub struct ValueCell(Rc<Cell<f32>>);

impl ValueCell {
    pub fn new(value: f32) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn get(&self) -> f32 {
        self.0.get()
    }

    pub fn set(&self, value: f32) {
        self.0.set(value);
    }

    /// Identity of the underlying cell, stable across clones
    pub fn key(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}
