// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! A writer for control file paragraphs. */

use std::io::Write;

/// An ordered set of control file fields.
///
/// Fields are emitted in insertion order, which is what lets the `control`
/// member come out with the conventional field layout.
#[derive(Clone, Debug, Default)]
pub(crate) struct ControlParagraph {
    fields: Vec<(String, String)>,
}

impl ControlParagraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Multi-line values are folded: continuation lines get a
    /// leading space and blank interior lines become ` .`.
    pub fn add_field(&mut self, name: &str, value: &str) {
        let mut folded = String::new();
        for (i, line) in value.lines().enumerate() {
            if i > 0 {
                folded.push('\n');
                folded.push(' ');
            }
            if i > 0 && line.trim().is_empty() {
                folded.push('.');
            } else {
                folded.push_str(line);
            }
        }

        self.fields.push((name.to_string(), folded));
    }

    /// Add a field unless the value is empty.
    pub fn add_field_if_set(&mut self, name: &str, value: &str) {
        if !value.is_empty() {
            self.add_field(name, value);
        }
    }

    /// Add a field holding a comma-joined relationship list, unless empty.
    pub fn add_relationship_field(&mut self, name: &str, values: &[String]) {
        if !values.is_empty() {
            self.add_field(name, &values.join(", "));
        }
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (name, value) in &self.fields {
            writeln!(writer, "{}: {}", name, value)?;
        }

        Ok(())
    }

    pub fn to_string(&self) -> String {
        let mut buffer = vec![];
        self.write(&mut buffer)
            .expect("writing to a Vec cannot fail");
        String::from_utf8(buffer).expect("control fields are UTF-8")
    }
}
