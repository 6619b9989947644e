// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writing text and visibility to elements addressed by id.

use std::rc::Rc;

use web_sys::{Document, Element};

use crate::error::{Error, Result};

/// Binary visibility state, expressed in the page as a class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub const fn class_name(self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        }
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }
}

/// The capabilities the count handler needs from a display surface.
pub trait Display {
    fn set_text(&self, id: &str, text: &str) -> Result<()>;

    fn set_visibility(&self, id: &str, visibility: Visibility) -> Result<()>;
}

impl<D: Display + ?Sized> Display for Rc<D> {
    fn set_text(&self, id: &str, text: &str) -> Result<()> {
        (**self).set_text(id, text)
    }

    fn set_visibility(&self, id: &str, visibility: Visibility) -> Result<()> {
        (**self).set_visibility(id, visibility)
    }
}

/// [`Display`](Display) over the elements of an HTML document.
#[derive(Debug, Clone)]
pub struct DomDisplay {
    document: Document,
}

impl DomDisplay {
    pub fn new(document: Document) -> Self {
        DomDisplay { document }
    }

    /// Use the document of the global `window`.
    pub fn from_window() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(Error::NoDocument)?;

        Ok(DomDisplay::new(document))
    }

    fn element(&self, id: &str) -> Result<Element> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| Error::MissingElement(id.to_owned()))
    }
}

impl Display for DomDisplay {
    fn set_text(&self, id: &str, text: &str) -> Result<()> {
        self.element(id)?.set_text_content(Some(text));

        Ok(())
    }

    // Replaces the whole class list, not just the visibility class.
    fn set_visibility(&self, id: &str, visibility: Visibility) -> Result<()> {
        self.element(id)?.set_class_name(visibility.class_name());

        Ok(())
    }
}
