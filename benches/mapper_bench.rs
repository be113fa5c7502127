//! Benchmarks for canvas ⇄ document conversion on long documents.
//!
//! Run with: `cargo bench --bench mapper_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pagesync::geometry::markup::parse_page_markup;
use pagesync::{CanvasPoint, DocumentPoint, LayoutOptions, PageLayout, PageSpec};

/// A layout of `pages` pages alternating between Letter and A4.
fn build_layout(pages: usize) -> PageLayout {
    let specs = (0..pages).map(|i| {
        if i % 2 == 0 {
            PageSpec::new(612.0, 792.0)
        } else {
            PageSpec::new(595.28, 841.89).with_origin(-12.0, 4.5)
        }
    });
    PageLayout::from_specs(specs, LayoutOptions::default()).expect("non-empty layout")
}

fn bench_canvas_to_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_to_document");

    for pages in [10, 100, 1000] {
        let layout = build_layout(pages);
        // Middle of the last page: worst case for the forward scan.
        let last = layout.last_page();
        let point = CanvasPoint::new(400.0, last.canvas_top + last.canvas_height() / 2.0);

        group.bench_with_input(BenchmarkId::from_parameter(pages), &layout, |b, layout| {
            b.iter(|| layout.canvas_to_document(black_box(point)));
        });
    }

    group.finish();
}

fn bench_document_to_canvas(c: &mut Criterion) {
    let layout = build_layout(1000);
    let point = DocumentPoint::new(999, 300.0, 400.0);

    c.bench_function("document_to_canvas", |b| {
        b.iter(|| layout.document_to_canvas(black_box(point)));
    });
}

fn bench_parse_svg_header(c: &mut Criterion) {
    let svg = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- This file was generated by dvisvgm 3.1 -->
<svg version="1.1" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="612pt" height="792pt" viewBox="56.4 -10.5 612 792">
<defs><font id="cmr10" horiz-adv-x="0"></font></defs>
<g id="page1"><text x="72" y="100">Lorem ipsum</text></g>
</svg>"#;

    c.bench_function("parse_svg_header", |b| {
        b.iter(|| parse_page_markup(black_box(svg), "svg"));
    });
}

criterion_group!(
    benches,
    bench_canvas_to_document,
    bench_document_to_canvas,
    bench_parse_svg_header
);
criterion_main!(benches);
