//! Text extraction from supported document formats

use crate::error::{Result, ResumeMatcherError};
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        // pdf-extract is synchronous and can be slow on large files
        let display = path.display().to_string();
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ResumeMatcherError::PdfExtraction(format!("'{}': {}", display, e)))?
            .map_err(|e| {
                ResumeMatcherError::PdfExtraction(format!(
                    "Failed to extract text from PDF '{}': {}",
                    display, e
                ))
            })
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let display = path.display().to_string();
        tokio::task::spawn_blocking(move || docx_to_text(&bytes))
            .await
            .map_err(|e| ResumeMatcherError::DocxExtraction(format!("'{}': {}", display, e)))?
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown))
    }
}

/// Keep the visible text of a markdown document, one block per line.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Paragraph text of a DOCX package, one paragraph per line.
pub fn docx_to_text(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ResumeMatcherError::DocxExtraction(format!("Not a DOCX package: {}", e)))?;
    let mut document = archive.by_name("word/document.xml").map_err(|e| {
        ResumeMatcherError::DocxExtraction(format!("Missing word/document.xml: {}", e))
    })?;

    let mut xml = String::new();
    document.read_to_string(&mut xml)?;
    document_xml_to_text(&xml)
}

/// Walk WordprocessingML and keep the runs of each `w:p`.
///
/// Only `w:t` content is text; `w:tab` and `w:br` become a tab and a newline.
/// Empty paragraphs are kept so blank lines survive.
pub fn document_xml_to_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(XmlEvent::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(XmlEvent::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(XmlEvent::Empty(e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Ok(XmlEvent::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ResumeMatcherError::DocxExtraction(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(XmlEvent::Eof) => break,
            Err(e) => {
                return Err(ResumeMatcherError::DocxExtraction(format!(
                    "Malformed document.xml at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
