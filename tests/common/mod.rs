//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::io::Cursor;

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let buffer = ImageBuffer::from_fn(width, height, |x, y| Rgb([(x * 20) as u8, (y * 20) as u8, 200]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn helvetica() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    }
}

/// A PDF with one page per entry of `page_texts`, each drawing its text in Helvetica.
pub fn text_pdf(page_texts: &[&str]) -> Vec<u8> {
    let pages: Vec<(&str, Dictionary)> = page_texts.iter().map(|text| (*text, helvetica())).collect();
    build_pdf(&pages)
}

/// Like `text_pdf`, but page `broken` (zero-based) uses an Identity-H font
/// with no ToUnicode map, so its text cannot be extracted.
pub fn pdf_with_unreadable_page(page_texts: &[&str], broken: usize) -> Vec<u8> {
    let pages: Vec<(&str, Dictionary)> = page_texts
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let font = if index == broken {
                dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type0",
                    "BaseFont" => "Helvetica",
                    "Encoding" => "Identity-H",
                }
            } else {
                helvetica()
            };
            (*text, font)
        })
        .collect();
    build_pdf(&pages)
}

/// Like `text_pdf`, but page `broken` has a font dictionary whose /Type is
/// mangled into `/3ont`.
pub fn pdf_with_mistyped_font(page_texts: &[&str], broken: usize) -> Vec<u8> {
    let pages: Vec<(&str, Dictionary)> = page_texts
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let mut font = helvetica();
            if index == broken {
                font.set("Type", "3ont");
            }
            (*text, font)
        })
        .collect();
    build_pdf(&pages)
}

fn build_pdf(pages: &[(&str, Dictionary)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for (text, font) in pages {
        let font_id = doc.add_object(font.clone());
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
