use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{error::RuntimeError, interpreter::Value};


/// A scope frame. Frames link to their parent to form a tree: lookups walk
/// up the chain, but writes only ever touch the frame they are made on.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub(crate) fn root(bindings: HashMap<String, Value>) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(bindings),
            parent: None,
        })
    }

    /// A new empty frame whose parent is `self`.
    pub fn child(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(self)),
        })
    }

    pub fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        let mut frame = self;
        loop {
            if let Some(value) = frame.bindings.borrow().get(name) {
                return Ok(value.clone());
            }
            match &frame.parent {
                Some(parent) => frame = parent.as_ref(),
                None => return Err(RuntimeError::UnboundName(name.to_owned())),
            }
        }
    }

    /// Binds `name` in this frame. An enclosing binding of the same name is
    /// shadowed, never updated.
    pub(crate) fn bind(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(name.to_owned(), value);
    }
}
