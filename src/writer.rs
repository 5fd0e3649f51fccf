/*!
 * XML rendering and formatting for files-to-xml
 */

use std::fs;
use std::io::Write;

use log::{debug, info};
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::types::{DirectoryNode, FileNode, Node, OtherNode};
use crate::{ensure, fs_error};

/// Name of the document element
pub const ROOT_TAG: &str = "SourceCodeTree";

/// XML writer for the source code tree
pub struct XmlWriter {
    /// Writer configuration
    config: Config,
}

impl XmlWriter {
    /// Create a new XML writer
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render, optionally format, and write the tree to the output file
    ///
    /// Returns the number of lines written.
    pub fn write(&self, root: &Node) -> Result<usize> {
        let raw = render(root)?;
        let xml = if self.config.format_output {
            format_xml(&raw)?
        } else {
            raw
        };

        let output = &self.config.output_file;
        fs::write(output, &xml).with_context(|| format!("Cannot write {}", output.display()))?;

        let lines = xml.split('\n').count();
        info!("Wrote {} lines to {}", lines, output.display());
        Ok(lines)
    }
}

/// Render a tree as compact XML
///
/// File contents go into CDATA sections untouched, except that every `]]>`
/// is split across two adjacent sections.
pub fn render(root: &Node) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Start(BytesStart::new(ROOT_TAG)))?;
    write_node(root, &mut writer)?;
    writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| fs_error!(Writer, "Rendered XML is not UTF-8: {}", e))
}

fn write_node<W: Write>(node: &Node, writer: &mut Writer<W>) -> Result<()> {
    match node {
        Node::Directory(dir) => write_directory(dir, writer),
        Node::File(file) => write_file(file, writer),
        Node::Other(other) => write_unknown(other, writer),
    }
}

fn write_directory<W: Write>(dir: &DirectoryNode, writer: &mut Writer<W>) -> Result<()> {
    let mut start_tag = BytesStart::new("Directory");
    start_tag.push_attribute(("path", dir.path.to_string_lossy().as_ref()));

    if dir.children.is_empty() {
        writer.write_event(Event::Empty(start_tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start_tag))?;
    for child in &dir.children {
        write_node(child, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new("Directory")))?;

    Ok(())
}

fn write_file<W: Write>(file: &FileNode, writer: &mut Writer<W>) -> Result<()> {
    let mut start_tag = BytesStart::new("File");
    start_tag.push_attribute(("path", file.path.to_string_lossy().as_ref()));
    writer.write_event(Event::Start(start_tag))?;

    for segment in cdata_segments(&file.content) {
        writer.write_event(Event::CData(BytesCData::new(segment)))?;
    }

    writer.write_event(Event::End(BytesEnd::new("File")))?;
    Ok(())
}

/// Fallback for entries that are neither files nor directories
fn write_unknown<W: Write>(other: &OtherNode, writer: &mut Writer<W>) -> Result<()> {
    let mut tag = BytesStart::new("Unknown");
    tag.push_attribute(("type", other.kind.as_str()));
    tag.push_attribute(("path", other.path.to_string_lossy().as_ref()));
    writer.write_event(Event::Empty(tag))?;
    Ok(())
}

/// Split content so no piece contains `]]>`
///
/// Each occurrence is cut between `]]` and `>`, so concatenating the pieces
/// gives back the original text.
pub fn cdata_segments(content: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for (idx, _) in content.match_indices("]]>") {
        segments.push(&content[start..idx + 2]);
        start = idx + 2;
    }
    segments.push(&content[start..]);

    segments
}

/// Strictly re-parse raw XML and re-emit it with two-space indentation
///
/// Runs of adjacent CDATA sections stay on a single line so that no
/// whitespace ends up between the pieces of a split `]]>`.
pub fn format_xml(raw: &str) -> Result<String> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let mut pending_cdata: Option<String> = None;
    let mut depth: usize = 0;

    loop {
        let event = reader.read_event()?;

        if let Event::CData(cdata) = &event {
            let text = std::str::from_utf8(cdata)
                .map_err(|e| fs_error!(Writer, "CDATA is not UTF-8: {}", e))?;
            pending_cdata.get_or_insert_with(String::new).push_str(text);
            continue;
        }

        if let Some(content) = pending_cdata.take() {
            write_cdata_run(&mut writer, &content)?;
        }

        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }

        writer.write_event(event)?;
    }

    ensure!(depth == 0, Writer, "XML ends with {} unclosed element(s)", depth);

    let formatted = String::from_utf8(writer.into_inner())
        .map_err(|e| fs_error!(Writer, "Formatted XML is not UTF-8: {}", e))?;
    debug!("Formatted {} bytes of XML into {} bytes", raw.len(), formatted.len());
    Ok(formatted)
}

fn write_cdata_run(writer: &mut Writer<Vec<u8>>, content: &str) -> Result<()> {
    writer.write_indent()?;
    let out = writer.get_mut();
    for segment in cdata_segments(content) {
        out.write_all(b"<![CDATA[")?;
        out.write_all(segment.as_bytes())?;
        out.write_all(b"]]>")?;
    }
    Ok(())
}
