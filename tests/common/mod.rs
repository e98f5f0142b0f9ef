//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use zhepub::{ConversionContext, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// One member of a test archive.
pub struct Member<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
    pub method: CompressionMethod,
}

/// Stored member.
pub fn stored<'a>(name: &'a str, data: &'a [u8]) -> Member<'a> {
    Member {
        name,
        data,
        method: CompressionMethod::Stored,
    }
}

/// Deflated member.
pub fn deflated<'a>(name: &'a str, data: &'a [u8]) -> Member<'a> {
    Member {
        name,
        data,
        method: CompressionMethod::Deflated,
    }
}

/// Builds an in-memory zip archive from `members`, in order.
pub fn build_archive(members: &[Member<'_>]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for member in members {
        let options = SimpleFileOptions::default().compression_method(member.method);
        if member.name.ends_with('/') {
            writer.add_directory(member.name, options).unwrap();
        } else {
            writer.start_file(member.name, options).unwrap();
            writer.write_all(member.data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Member as read back from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMember {
    pub name: String,
    pub data: Vec<u8>,
    pub method: CompressionMethod,
}

/// Reads every member of an in-memory archive, in order.
pub fn read_archive(bytes: &[u8]) -> Vec<ReadMember> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|idx| {
            let mut file = archive.by_index(idx).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            ReadMember {
                name: file.name().to_string(),
                data,
                method: file.compression(),
            }
        })
        .collect()
}

/// Returns the member names of an in-memory archive, in order.
pub fn member_names(bytes: &[u8]) -> Vec<String> {
    read_archive(bytes).into_iter().map(|m| m.name).collect()
}

/// Context with a small deterministic character table.
///
/// Maps 书→書, 简→簡, 体→體, 这→這, 说→說; everything else is unchanged.
pub fn table_context() -> ConversionContext {
    ConversionContext::with_converter(|text: &str| -> Result<String> {
        Ok(text
            .chars()
            .map(|c| match c {
                '书' => '書',
                '简' => '簡',
                '体' => '體',
                '这' => '這',
                '说' => '說',
                other => other,
            })
            .collect())
    })
}

pub const MIMETYPE: &[u8] = b"application/epub+zip";

pub const CONTAINER_XML: &[u8] = br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

pub const CONTENT_OPF: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>简体书</dc:title>
    <dc:language>zh-CN</dc:language>
  </metadata>
</package>
"#;

pub const CHAPTER_XHTML: &str = "<html>\n<body>\n<p>这是简体书</p>\n</body>\n</html>\n";

/// A minimal but structurally complete EPUB.
pub fn sample_epub() -> Vec<u8> {
    build_archive(&[
        stored("mimetype", MIMETYPE),
        deflated("META-INF/container.xml", CONTAINER_XML),
        deflated("OEBPS/content.opf", CONTENT_OPF.as_bytes()),
        deflated("OEBPS/Text/第一章书.xhtml", CHAPTER_XHTML.as_bytes()),
        stored("OEBPS/Images/cover.jpg", &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A]),
        deflated("OEBPS/toc.ncx", "<navLabel><text>简体</text></navLabel>\n".as_bytes()),
    ])
}
