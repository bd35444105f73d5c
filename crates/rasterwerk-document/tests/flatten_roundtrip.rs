// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end rasterize/flatten round trip. These tests need the native
// PDFium library at runtime, which the build does not ship; run them with
// `cargo test -- --ignored` on a machine that has it installed.

use std::path::Path;

use lopdf::{Document, Object, dictionary};
use rasterwerk_core::settings::{OutputFormat, RasterSettings};
use rasterwerk_document::pdf::renderer::{OutputOptions, PageRenderer};
use rasterwerk_document::pipeline::Flattener;

/// Write a minimal two-page PDF (blank Letter pages).
fn write_two_page_fixture(path: &Path) {
    let mut doc = Document::with_version("1.5");

    let page_one = doc.add_object(dictionary! { "Type" => "Page" });
    let page_two = doc.add_object(dictionary! { "Type" => "Page" });

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_one), Object::Reference(page_two)],
        "Count" => 2,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    for page_id in [page_one, page_two] {
        if let Ok(page) = doc.get_object_mut(page_id) {
            if let Ok(dict) = page.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    std::fs::write(path, buffer).unwrap();
}

#[test]
#[ignore = "requires the native PDFium library"]
fn rasterize_produces_one_file_per_page() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("fixture.pdf");
    write_two_page_fixture(&input);

    let settings = RasterSettings::new(72, OutputFormat::Png).unwrap();
    let renderer = PageRenderer::new(settings).unwrap();
    let options = OutputOptions::default();

    let run = renderer.rasterize(&input, &options).unwrap();

    assert_eq!(run.rendered_count(), 2);
    assert!(run.failed_pages().is_empty());

    let files = run.output_files();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file_name().unwrap(), "fixture_page_1.png");
    assert_eq!(files[1].file_name().unwrap(), "fixture_page_2.png");
    assert!(files.iter().all(|f| f.exists()));

    // Letter is 612x792 points; at 72 DPI that is one pixel per point.
    let first = image::open(&files[0]).unwrap();
    assert_eq!(first.width(), 612);
    assert_eq!(first.height(), 792);
}

#[test]
#[ignore = "requires the native PDFium library"]
fn flatten_rebuilds_pdf_and_cleans_up() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("fixture.pdf");
    write_two_page_fixture(&input);

    let settings = RasterSettings::new(72, OutputFormat::Png).unwrap();
    let flattener = Flattener::new(settings).unwrap();
    let out_dir = tmp.path().join("flat");
    let options = OutputOptions {
        output_dir: Some(out_dir.clone()),
        prefix: None,
    };

    let outcome = flattener.flatten(&input, &options, false).unwrap();

    assert_eq!(outcome.pdf, out_dir.join("fixture_rasterized.pdf"));
    assert!(outcome.pdf.exists());
    assert_eq!(outcome.images.len(), 2);
    // keep_images was false: the intermediates are gone.
    assert!(outcome.images.iter().all(|f| !f.exists()));

    let reloaded = Document::load(&outcome.pdf).unwrap();
    assert_eq!(reloaded.get_pages().len(), 2);
}

#[test]
#[ignore = "requires the native PDFium library"]
fn flatten_keep_images_leaves_intermediates() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("fixture.pdf");
    write_two_page_fixture(&input);

    let settings = RasterSettings::new(72, OutputFormat::Jpeg).unwrap();
    let flattener = Flattener::new(settings).unwrap();
    let options = OutputOptions::default();

    let outcome = flattener.flatten(&input, &options, true).unwrap();

    assert!(outcome.pdf.exists());
    assert_eq!(outcome.images.len(), 2);
    assert!(outcome.images.iter().all(|f| f.exists()));
    assert!(
        outcome.images[0]
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("fixture_page_1.jpeg")
    );
}
