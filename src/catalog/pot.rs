//! PO template output.

use std::io::{self, Write};

use super::{Catalog, Message};
use crate::flags::FormatFlag;

/// Reference lines are wrapped at this width, like xgettext does.
const REFERENCE_WIDTH: usize = 79;

#[derive(Debug, Clone, Default)]
pub struct PotHeader {
    /// `Project-Id-Version`; the gettext placeholder when unset.
    pub package_name: Option<String>,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str(r"\n"),
            '\t' => out.push_str(r"\t"),
            '\r' => out.push_str(r"\r"),
            c => out.push(c),
        }
    }
    out
}

/// Write `keyword "text"`, splitting after embedded newlines.
fn write_string<W: Write>(writer: &mut W, keyword: &str, text: &str) -> io::Result<()> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    if !body.contains('\n') {
        return writeln!(writer, "{keyword} \"{}\"", escape(text));
    }
    writeln!(writer, "{keyword} \"\"")?;
    for line in text.split_inclusive('\n') {
        writeln!(writer, "\"{}\"", escape(line))?;
    }
    Ok(())
}

fn write_references<W: Write>(writer: &mut W, message: &Message) -> io::Result<()> {
    let mut line = String::from("#:");
    for reference in &message.references {
        let reference = reference.to_string();
        if line.len() > 2 && line.len() + 1 + reference.len() > REFERENCE_WIDTH {
            writeln!(writer, "{line}")?;
            line.truncate(2);
        }
        line.push(' ');
        line.push_str(&reference);
    }
    if line.len() > 2 {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

fn write_message<W: Write>(writer: &mut W, message: &Message) -> io::Result<()> {
    for comment in message.comments.iter().chain(&message.extracted_comments) {
        writeln!(writer, "#. {comment}")?;
    }
    write_references(writer, message)?;
    match message.format {
        FormatFlag::Yes => writeln!(writer, "#, arma-format")?,
        FormatFlag::No => writeln!(writer, "#, no-arma-format")?,
        FormatFlag::Undecided => {}
    }
    if let Some(msgctxt) = &message.msgctxt {
        write_string(writer, "msgctxt", msgctxt)?;
    }
    write_string(writer, "msgid", &message.msgid)?;
    match &message.msgid_plural {
        Some(plural) => {
            write_string(writer, "msgid_plural", plural)?;
            writeln!(writer, "msgstr[0] \"\"")?;
            writeln!(writer, "msgstr[1] \"\"")?;
        }
        None => writeln!(writer, "msgstr \"\"")?,
    }
    Ok(())
}

impl PotHeader {
    fn write<W: Write>(&self, writer: &mut W, has_plurals: bool) -> io::Result<()> {
        let project = self.package_name.as_deref().unwrap_or("PACKAGE VERSION");
        writeln!(writer, "# SOME DESCRIPTIVE TITLE.")?;
        writeln!(writer, "# Copyright (C) YEAR THE PACKAGE'S COPYRIGHT HOLDER")?;
        writeln!(
            writer,
            "# This file is distributed under the same license as the PACKAGE package."
        )?;
        writeln!(writer, "# FIRST AUTHOR <EMAIL@ADDRESS>, YEAR.")?;
        writeln!(writer, "#")?;
        writeln!(writer, "#, fuzzy")?;
        writeln!(writer, "msgid \"\"")?;
        writeln!(writer, "msgstr \"\"")?;
        writeln!(writer, "\"Project-Id-Version: {}\\n\"", escape(project))?;
        writeln!(writer, "\"Report-Msgid-Bugs-To: \\n\"")?;
        writeln!(writer, "\"PO-Revision-Date: YEAR-MO-DA HO:MI+ZONE\\n\"")?;
        writeln!(writer, "\"Last-Translator: FULL NAME <EMAIL@ADDRESS>\\n\"")?;
        writeln!(writer, "\"Language-Team: LANGUAGE <LL@li.org>\\n\"")?;
        writeln!(writer, "\"Language: \\n\"")?;
        writeln!(writer, "\"MIME-Version: 1.0\\n\"")?;
        writeln!(writer, "\"Content-Type: text/plain; charset=UTF-8\\n\"")?;
        writeln!(writer, "\"Content-Transfer-Encoding: 8bit\\n\"")?;
        if has_plurals {
            writeln!(
                writer,
                "\"Plural-Forms: nplurals=INTEGER; plural=EXPRESSION;\\n\""
            )?;
        }
        Ok(())
    }
}

impl Catalog {
    /// Write the catalog as a PO template.
    ///
    /// A message with an empty msgid would collide with the header and is
    /// left out.
    pub fn write_pot<W: Write>(&self, writer: &mut W, header: &PotHeader) -> io::Result<()> {
        let has_plurals = self.messages.iter().any(|m| m.msgid_plural.is_some());
        header.write(writer, has_plurals)?;
        for message in self.messages.iter().filter(|m| !m.is_header()) {
            writeln!(writer)?;
            write_message(writer, message)?;
        }
        Ok(())
    }
}
