// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single-line text input that submits on Enter.

use alloc::rc::Rc;
use alloc::string::String;

use proscenium_dom::dispatch::{Dispatch, Outcome};
use proscenium_dom::{Document, ElementId, Event, EventKind, Key, ListenerId};
use proscenium_handle::HandleCell;

/// Receives the input's value when Enter is pressed in it.
pub type SubmitCallback = Rc<dyn Fn(&mut Document, &str)>;

/// Properties of a text entry.
#[derive(Clone, Default)]
pub struct TextEntryProps {
    /// Hint shown while the input is empty.
    pub placeholder: String,
    /// Called with the value on Enter.
    pub on_submit: Option<SubmitCallback>,
}

impl TextEntryProps {
    /// Props with a placeholder and no submit callback.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            on_submit: None,
        }
    }

    /// Set the submit callback.
    pub fn with_on_submit(mut self, on_submit: impl Fn(&mut Document, &str) + 'static) -> Self {
        self.on_submit = Some(Rc::new(on_submit));
        self
    }
}

impl core::fmt::Debug for TextEntryProps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextEntryProps")
            .field("placeholder", &self.placeholder)
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}

/// Focus, clear, and read a mounted [`TextEntry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextEntryHandle {
    input: ElementId,
}

impl TextEntryHandle {
    /// Move focus into the input.
    pub fn focus(&self, doc: &mut Document) -> bool {
        doc.focus(self.input)
    }

    /// Empty the input.
    pub fn clear(&self, doc: &mut Document) {
        doc.set_value(self.input, "");
    }

    /// The input's current value.
    pub fn value(&self, doc: &Document) -> String {
        String::from(doc.value(self.input))
    }
}

/// A mounted text entry.
#[derive(Debug)]
pub struct TextEntry {
    wrapper: ElementId,
    input: ElementId,
    listener: Option<ListenerId>,
    handle: HandleCell<TextEntryHandle>,
}

impl TextEntry {
    /// Build the entry under `parent` and fill `handle`.
    pub fn mount(
        doc: &mut Document,
        parent: ElementId,
        props: TextEntryProps,
        handle: &HandleCell<TextEntryHandle>,
    ) -> Self {
        let wrapper = doc.create_element("div");
        doc.set_attribute(wrapper, "class", "custom-input-wrapper");
        let input = doc.create_element("input");
        doc.set_attribute(input, "type", "text");
        doc.set_attribute(input, "class", "custom-input");
        doc.set_attribute(input, "placeholder", props.placeholder);
        doc.set_tab_index(input, Some(0));
        let hint = doc.create_element("small");
        doc.set_attribute(hint, "class", "input-hint");
        doc.set_text(hint, "Press Enter to submit");
        doc.append_child(wrapper, input);
        doc.append_child(wrapper, hint);
        doc.append_child(parent, wrapper);

        let listener = props.on_submit.and_then(|on_submit| {
            doc.add_listener(
                input,
                EventKind::KeyDown,
                Rc::new(move |doc: &mut Document, _: &Dispatch<ElementId>, ev: &Event| {
                    if ev.key() == Some(Key::Enter) {
                        let value = String::from(doc.value(input));
                        on_submit(doc, &value);
                    }
                    Outcome::Continue
                }),
            )
        });

        handle.set(TextEntryHandle { input });

        Self {
            wrapper,
            input,
            listener,
            handle: handle.clone(),
        }
    }

    /// The input element.
    pub fn input(&self) -> ElementId {
        self.input
    }

    /// Remove the entry and empty its handle.
    pub fn unmount(self, doc: &mut Document) {
        if let Some(id) = self.listener {
            doc.remove_listener(id);
        }
        self.handle.clear();
        doc.remove(self.wrapper);
    }
}
