//! Archive rewrite integration tests.

mod common;

use common::*;
use zhepub::{
    ArchiveRewriter, ConversionContext, Error, ErrorKind, MarkupKind, MemberClass, MetadataRule,
    Result, ScriptVariant,
};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[test]
fn test_member_order_and_names() {
    let context = table_context();
    let (result, output) = ArchiveRewriter::new(&context)
        .rewrite_to_vec(&sample_epub())
        .unwrap();

    assert_eq!(
        member_names(&output),
        vec![
            "mimetype",
            "META-INF/container.xml",
            "OEBPS/content.opf",
            "OEBPS/Text/第一章書.xhtml",
            "OEBPS/Images/cover.jpg",
            "OEBPS/toc.ncx",
        ]
    );
    assert_eq!(result.total_members(), 6);
    assert_eq!(result.members_renamed(), 1);
}

#[test]
fn test_compression_methods_preserved() {
    let context = table_context();
    let input = build_archive(&[
        stored("mimetype", MIMETYPE),
        deflated("OEBPS/content.opf", CONTENT_OPF.as_bytes()),
        Member {
            name: "OEBPS/Text/ch1.xhtml",
            data: CHAPTER_XHTML.as_bytes(),
            method: CompressionMethod::Bzip2,
        },
        Member {
            name: "OEBPS/Images/cover.jpg",
            data: &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
            method: CompressionMethod::Zstd,
        },
    ]);
    let (_, output) = ArchiveRewriter::new(&context).rewrite_to_vec(&input).unwrap();

    let before: Vec<_> = read_archive(&input).into_iter().map(|m| m.method).collect();
    let after: Vec<_> = read_archive(&output).into_iter().map(|m| m.method).collect();
    assert_eq!(before, after);
    assert_eq!(
        after,
        vec![
            CompressionMethod::Stored,
            CompressionMethod::Deflated,
            CompressionMethod::Bzip2,
            CompressionMethod::Zstd,
        ]
    );

    // mimetype must stay first and uncompressed for readers to accept the book
    let first = &read_archive(&output)[0];
    assert_eq!(first.name, "mimetype");
    assert_eq!(first.method, CompressionMethod::Stored);
    assert_eq!(first.data, MIMETYPE);
}

#[test]
fn test_opaque_members_byte_identical() {
    let context = table_context();
    let binary: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let input = build_archive(&[
        stored("mimetype", MIMETYPE),
        deflated("fonts/简体.ttf", &binary),
        stored("styles/main.css", "p { font-family: \"简体\"; }\n".as_bytes()),
        deflated("META-INF/container.xml", CONTAINER_XML),
    ]);

    let (result, output) = ArchiveRewriter::new(&context).rewrite_to_vec(&input).unwrap();
    let members = read_archive(&output);

    assert_eq!(members[1].name, "fonts/簡體.ttf");
    assert_eq!(members[1].data, binary);
    // CSS is not markup, so its text is left alone
    assert_eq!(members[2].data, "p { font-family: \"简体\"; }\n".as_bytes());
    assert_eq!(members[3].data, CONTAINER_XML);
    assert_eq!(result.markup_converted, 0);
    assert_eq!(result.opaque_copied, 4);
}

#[test]
fn test_markup_converted() {
    let context = table_context();
    let (result, output) = ArchiveRewriter::new(&context)
        .rewrite_to_vec(&sample_epub())
        .unwrap();
    let members = read_archive(&output);

    let chapter = members
        .iter()
        .find(|m| m.name.ends_with(".xhtml"))
        .unwrap();
    assert_eq!(
        String::from_utf8(chapter.data.clone()).unwrap(),
        "<html>\n<body>\n<p>這是簡體書</p>\n</body>\n</html>\n"
    );

    let toc = members.iter().find(|m| m.name == "OEBPS/toc.ncx").unwrap();
    assert_eq!(toc.data, "<navLabel><text>簡體</text></navLabel>\n".as_bytes());

    assert_eq!(result.markup_converted, 3);
    assert_eq!(result.opaque_copied, 3);
}

#[test]
fn test_package_document_language_patched() {
    let context = table_context();
    let (result, output) = ArchiveRewriter::new(&context)
        .rewrite_to_vec(&sample_epub())
        .unwrap();

    let opf = read_archive(&output)
        .into_iter()
        .find(|m| m.name == "OEBPS/content.opf")
        .unwrap();
    let text = String::from_utf8(opf.data).unwrap();
    assert!(text.contains("<dc:language>zh-TW</dc:language>"));
    assert!(!text.contains("zh-CN"));
    assert!(text.contains("<dc:title>簡體書</dc:title>"));
    assert_eq!(result.metadata_patched, 1);

    let record = result
        .members
        .iter()
        .find(|m| m.source_name == "OEBPS/content.opf")
        .unwrap();
    assert_eq!(record.class, MemberClass::Markup(MarkupKind::Opf));
    assert!(record.metadata_patched);
}

#[test]
fn test_language_tag_outside_package_document_untouched() {
    let context = table_context();
    let html = "<dc:language>zh-CN</dc:language>\n";
    let input = build_archive(&[deflated("page.html", html.as_bytes())]);

    let (result, output) = ArchiveRewriter::new(&context).rewrite_to_vec(&input).unwrap();
    assert_eq!(read_archive(&output)[0].data, html.as_bytes());
    assert_eq!(result.metadata_patched, 0);
}

#[test]
fn test_custom_metadata_rule() {
    let context = table_context().metadata_rule(MetadataRule::new("zh-CN", "zh-HK"));
    let input = build_archive(&[deflated("content.opf", b"<dc:language>zh-CN</dc:language>")]);

    let (_, output) = ArchiveRewriter::new(&context).rewrite_to_vec(&input).unwrap();
    assert_eq!(
        read_archive(&output)[0].data,
        b"<dc:language>zh-HK</dc:language>"
    );
}

#[test]
fn test_upper_case_extensions_are_markup() {
    let context = table_context();
    let input = build_archive(&[deflated("Text/CH1.XHTML", "简\n".as_bytes())]);

    let (result, output) = ArchiveRewriter::new(&context).rewrite_to_vec(&input).unwrap();
    assert_eq!(read_archive(&output)[0].data, "簡\n".as_bytes());
    assert_eq!(result.markup_converted, 1);
}

#[test]
fn test_directories_are_kept() {
    let context = table_context();
    let input = build_archive(&[
        stored("mimetype", MIMETYPE),
        stored("OEBPS/简体/", b""),
        deflated("OEBPS/简体/a.html", "这\n".as_bytes()),
    ]);

    let (result, output) = ArchiveRewriter::new(&context).rewrite_to_vec(&input).unwrap();
    assert_eq!(
        member_names(&output),
        vec!["mimetype", "OEBPS/簡體/", "OEBPS/簡體/a.html"]
    );
    assert!(result.members[1].is_directory);
    assert_eq!(result.members[1].class, MemberClass::Opaque);
}

#[test]
fn test_second_pass_is_stable() {
    let context = table_context();
    let rewriter = ArchiveRewriter::new(&context);
    let (_, once) = rewriter.rewrite_to_vec(&sample_epub()).unwrap();
    let (result, twice) = rewriter.rewrite_to_vec(&once).unwrap();

    assert_eq!(read_archive(&once), read_archive(&twice));
    assert_eq!(result.members_renamed(), 0);
    assert_eq!(result.metadata_patched, 0);
}

#[test]
fn test_empty_archive() {
    let context = table_context();
    let (result, output) = ArchiveRewriter::new(&context)
        .rewrite_to_vec(&build_archive(&[]))
        .unwrap();
    assert_eq!(result.total_members(), 0);
    assert!(read_archive(&output).is_empty());
}

#[test]
fn test_duplicate_output_names_rejected() {
    let context = table_context();
    let input = build_archive(&[
        deflated("书.html", b"a"),
        deflated("書.html", b"b"),
    ]);

    let err = ArchiveRewriter::new(&context)
        .rewrite_to_vec(&input)
        .unwrap_err();
    match &err {
        Error::DuplicateMember {
            first,
            second,
            output,
        } => {
            assert_eq!(first, "书.html");
            assert_eq!(second, "書.html");
            assert_eq!(output, "書.html");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Archive);
}

#[test]
fn test_invalid_utf8_markup() {
    let context = table_context();
    let input = build_archive(&[deflated("bad.xhtml", &[0x3C, 0xFF, 0xFE, 0x3E])]);

    let err = ArchiveRewriter::new(&context)
        .rewrite_to_vec(&input)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidText { ref member, .. } if member == "bad.xhtml"));
    assert_eq!(err.kind(), ErrorKind::Conversion);
}

#[test]
fn test_converter_failure_propagates_unchanged() {
    let context = ConversionContext::with_converter(|text: &str| -> Result<String> {
        if text.contains("boom") {
            Err(Error::conversion(text, "engine failure"))
        } else {
            Ok(text.to_string())
        }
    });
    let input = build_archive(&[
        deflated("ok.html", b"fine\n"),
        deflated("ch2.html", b"line\nboom\n"),
    ]);

    let err = ArchiveRewriter::new(&context)
        .rewrite_to_vec(&input)
        .unwrap_err();
    match err {
        Error::Conversion { unit, reason } => {
            assert_eq!(unit, "boom");
            assert_eq!(reason, "engine failure");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_truncated_archive() {
    let context = table_context();
    let mut input = sample_epub();
    input.truncate(input.len() / 2);

    let err = ArchiveRewriter::new(&context)
        .rewrite_to_vec(&input)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Archive);
}

/// Overwrites every zip64 uncompressed size equal to `actual` with `forged`.
fn forge_zip64_sizes(bytes: &mut [u8], actual: u64, forged: u64) -> usize {
    let mut patched = 0;
    let mut idx = 0;
    while idx + 12 <= bytes.len() {
        // zip64 extended information: id 0x0001, 2-byte length, sizes follow
        if bytes[idx..idx + 2] == [0x01, 0x00]
            && bytes[idx + 3] == 0x00
            && bytes[idx + 4..idx + 12] == actual.to_le_bytes()
        {
            bytes[idx + 4..idx + 12].copy_from_slice(&forged.to_le_bytes());
            patched += 1;
            idx += 12;
        } else {
            idx += 1;
        }
    }
    patched
}

#[test]
fn test_forged_member_size_does_not_abort() {
    let payload = b"declared size in the headers is a lie";
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(true);
    writer.start_file("cover.jpg", options).unwrap();
    writer.write_all(payload).unwrap();
    let pristine = writer.finish().unwrap().into_inner();

    let context = table_context();
    for forged in [1u64 << 62, 1u64 << 40] {
        let mut input = pristine.clone();
        assert!(forge_zip64_sizes(&mut input, payload.len() as u64, forged) > 0);

        // Either the reader rejects the entry or the real bytes are copied;
        // the declared size never drives an allocation.
        match ArchiveRewriter::new(&context).rewrite_to_vec(&input) {
            Ok((_, output)) => assert_eq!(read_archive(&output)[0].data, payload),
            Err(err) => assert_eq!(err.kind(), ErrorKind::Archive),
        }
    }
}

#[test]
fn test_progress_events() {
    let context = table_context();
    let mut events = Vec::new();
    {
        let mut progress = zhepub::progress_fn(|done, total| events.push((done, total)));
        let mut sink = std::io::Cursor::new(Vec::new());
        let _ = ArchiveRewriter::new(&context)
            .rewrite_with_progress(std::io::Cursor::new(sample_epub()), &mut sink, &mut progress)
            .unwrap();
    }
    assert_eq!(events.first(), Some(&(0, 6)));
    assert_eq!(events.last(), Some(&(6, 6)));
    assert_eq!(events.len(), 7);
}

#[test]
fn test_builtin_converter_taiwan() {
    let context = ConversionContext::new(ScriptVariant::Taiwan);
    let input = build_archive(&[
        stored("mimetype", MIMETYPE),
        deflated("OEBPS/content.opf", CONTENT_OPF.as_bytes()),
        deflated("OEBPS/说明.html", "<p>简体中文</p>\n".as_bytes()),
    ]);

    let (_, output) = ArchiveRewriter::new(&context).rewrite_to_vec(&input).unwrap();
    let members = read_archive(&output);

    assert_eq!(members[2].name, "OEBPS/說明.html");
    assert_eq!(members[2].data, "<p>簡體中文</p>\n".as_bytes());
    let opf = String::from_utf8(members[1].data.clone()).unwrap();
    assert!(opf.contains("<dc:language>zh-TW</dc:language>"));
}
