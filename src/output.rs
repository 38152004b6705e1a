use std::{cell::RefCell, rc::Rc};

/// Where `print` sends its output.
#[derive(Debug, Clone, Default)]
pub enum PrintHandler {
    #[default]
    Stdout,
    /// Captures printed lines, for tests and embedders that want the text.
    Buffer(Rc<RefCell<String>>),
}

impl PrintHandler {
    pub fn buffer() -> Self {
        Self::Buffer(Rc::new(RefCell::new(String::new())))
    }

    pub fn println(&self, message: &str) {
        match self {
            Self::Stdout => println!("{}", message),
            Self::Buffer(buffer) => {
                let mut buffer = buffer.borrow_mut();
                buffer.push_str(message);
                buffer.push('\n');
            }
        }
    }

    /// Captured output so far. Always empty for stdout.
    pub fn contents(&self) -> String {
        match self {
            Self::Stdout => String::new(),
            Self::Buffer(buffer) => buffer.borrow().clone(),
        }
    }

    pub fn take(&self) -> String {
        match self {
            Self::Stdout => String::new(),
            Self::Buffer(buffer) => std::mem::take(&mut *buffer.borrow_mut()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_clones_share_contents() {
        let handler = PrintHandler::buffer();
        let writer = handler.clone();
        writer.println("1");
        writer.println("two");

        assert_eq!(handler.contents(), "1\ntwo\n");
        assert_eq!(handler.take(), "1\ntwo\n");
        assert_eq!(handler.contents(), "");
    }
}
