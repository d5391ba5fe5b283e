use std::cell::RefCell;
use std::rc::Rc;

use super::Value;

/// Plain key/value object. It carries no `then` member, so the resolution
/// procedure treats it as a final value and never unwraps it.
#[derive(Default)]
pub struct ObjectValue {
    properties: RefCell<Vec<(String, Value)>>,
}

impl ObjectValue {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let mut properties = self.properties.borrow_mut();
        if let Some(slot) = properties.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            properties.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.properties
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn len(&self) -> usize {
        self.properties.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.borrow().is_empty()
    }

    pub(crate) fn entries(&self) -> Vec<(String, Value)> {
        self.properties.borrow().clone()
    }
}
