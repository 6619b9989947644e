//! In-memory transport and display for tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::display::{Display, Visibility};
use crate::error::{Error, Result};
use crate::transport::{Completion, Transport, TransportError};

/// Records requests and holds their completions until `respond` is called,
/// oldest first.
#[derive(Default)]
pub struct MockTransport {
    requests: RefCell<Vec<(String, String)>>,
    pending: RefCell<VecDeque<Completion>>,
}

impl MockTransport {
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.borrow().clone()
    }

    pub fn respond(&self, response: Result<String, TransportError>) {
        let on_complete = self
            .pending
            .borrow_mut()
            .pop_front()
            .expect("no request in flight");

        on_complete(response);
    }
}

impl Transport for MockTransport {
    fn post(&self, uri: &str, body: &str, on_complete: Completion) {
        self.requests.borrow_mut().push((uri.to_owned(), body.to_owned()));
        self.pending.borrow_mut().push_back(on_complete);
    }
}

#[derive(Default)]
struct Node {
    text: Option<String>,
    visibility: Option<Visibility>,
    visibility_writes: usize,
}

pub struct MockDisplay {
    nodes: RefCell<HashMap<String, Node>>,
    writes: RefCell<usize>,
}

impl MockDisplay {
    pub fn with_elements(ids: &[&str]) -> Self {
        MockDisplay {
            nodes: RefCell::new(ids.iter().map(|id| (id.to_string(), Node::default())).collect()),
            writes: RefCell::new(0),
        }
    }

    /// The three elements of the count page.
    pub fn page() -> Self {
        MockDisplay::with_elements(&["count", "other_browser", "prisoner"])
    }

    /// Set initial state without counting it as a write.
    pub fn preset(&self, id: &str, visibility: Visibility) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(id) {
            node.visibility = Some(visibility);
        }
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.nodes.borrow().get(id).and_then(|node| node.text.clone())
    }

    pub fn visibility(&self, id: &str) -> Option<Visibility> {
        self.nodes.borrow().get(id).and_then(|node| node.visibility)
    }

    pub fn visibility_writes(&self, id: &str) -> usize {
        self.nodes.borrow().get(id).map_or(0, |node| node.visibility_writes)
    }

    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }

    fn with_node(&self, id: &str, f: impl FnOnce(&mut Node)) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        let node = nodes
            .get_mut(id)
            .ok_or_else(|| Error::MissingElement(id.to_owned()))?;

        f(node);
        *self.writes.borrow_mut() += 1;

        Ok(())
    }
}

impl Display for MockDisplay {
    fn set_text(&self, id: &str, text: &str) -> Result<()> {
        self.with_node(id, |node| node.text = Some(text.to_owned()))
    }

    fn set_visibility(&self, id: &str, visibility: Visibility) -> Result<()> {
        self.with_node(id, |node| {
            node.visibility = Some(visibility);
            node.visibility_writes += 1;
        })
    }
}
