//! 将排版结果写成 PDF 文档

use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::layout::{Element, Page, ReportLayout, PAGE_HEIGHT, PAGE_WIDTH};
use super::metrics::{win_ansi_code, ASCENT_FACTOR};
use super::ReportError;

const FONT_NAME: &str = "F1";

/// 使用内置 Helvetica 字体写出整份文档，内容流不压缩
pub fn write_pdf<W: Write>(layout: &ReportLayout, out: &mut W) -> Result<(), ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_NAME => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save_to(out)?;
    Ok(())
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();

    for element in &page.elements {
        match element {
            Element::Text { x, y, size, text } => {
                let baseline = PAGE_HEIGHT - (y + size * ASCENT_FACTOR);
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec![FONT_NAME.into(), (*size).into()]));
                ops.push(Operation::new("Td", vec![(*x).into(), baseline.into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(text))],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            Element::Rule { x1, x2, y } => {
                let y = PAGE_HEIGHT - y;
                ops.push(Operation::new("w", vec![1.into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), y.into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), y.into()]));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }

    ops
}

fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::catalog::model::Item;
    use crate::report::layout::layout_report;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Mesa"), b"Mesa".to_vec());
        assert_eq!(encode_win_ansi("Descrição"), b"Descri\xe7\xe3o".to_vec());
        assert_eq!(encode_win_ansi("a€b"), b"a\x80b".to_vec());
        assert_eq!(
            encode_win_ansi("\u{201C}Caneta\u{201D} \u{2013} azul"),
            b"\x93Caneta\x94 \x96 azul".to_vec()
        );
        assert_eq!(encode_win_ansi("a中b"), b"a?b".to_vec());
    }

    #[test]
    fn test_pdf_has_header_and_texts() {
        let items = vec![Item {
            id: 1,
            name: "Mesa".to_string(),
            description: "Madeira".to_string(),
        }];
        let mut out = Vec::new();
        write_pdf(&layout_report(&items), &mut out).unwrap();

        assert!(out.starts_with(b"%PDF-"));
        assert!(contains(&out, b"(Mesa)"));
        assert!(contains(&out, b"(Madeira)"));
        assert!(contains(&out, b"/Helvetica"));
    }

    #[test]
    fn test_multi_page_document_is_loadable() {
        let items: Vec<Item> = (1..=80)
            .map(|i| Item {
                id: i,
                name: format!("Item {}", i),
                description: "Descricao".to_string(),
            })
            .collect();
        let layout = layout_report(&items);
        let mut out = Vec::new();
        write_pdf(&layout, &mut out).unwrap();

        let doc = Document::load_mem(&out).unwrap();
        assert_eq!(doc.get_pages().len(), layout.pages.len());
    }
}
