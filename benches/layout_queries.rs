//! Layout query micro-benchmarks
//!
//! Measures parsing, navigation, fname lookup, XPath evaluation and export on
//! generated layouts of increasing size.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;
use ulayout::{LayoutDocument, SimpleLayout, UserLayout, XmlWriterSink, parse_expression};

/// A root folder with `tabs` tab folders of two columns holding `per_column` channels each.
fn generated_layout(tabs: usize, per_column: usize) -> String {
    let mut xml = String::from(r#"<layout><folder ID="root" type="root">"#);
    let mut channel = 0;
    for tab in 0..tabs {
        let _ = write!(xml, r#"<folder ID="t{tab}" name="Tab {tab}">"#);
        for column in 0..2 {
            let _ = write!(xml, r#"<folder ID="t{tab}c{column}">"#);
            for _ in 0..per_column {
                let _ = write!(
                    xml,
                    r#"<channel ID="n{channel}" fname="portlet-{channel}" chanID="{channel}"/>"#
                );
                channel += 1;
            }
            xml.push_str("</folder>");
        }
        xml.push_str("</folder>");
    }
    xml.push_str("</folder></layout>");
    xml
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_parse");
    for tabs in [5, 50, 500] {
        let xml = generated_layout(tabs, 5);
        group.bench_with_input(BenchmarkId::new("tabs", tabs), &xml, |b, xml| {
            b.iter(|| SimpleLayout::from_xml("bench", black_box(xml)).expect("valid layout"));
        });
    }
    group.finish();
}

fn benchmark_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_navigation");
    for tabs in [5, 50, 500] {
        let layout = SimpleLayout::from_xml("bench", &generated_layout(tabs, 5)).expect("valid layout");
        group.bench_with_input(BenchmarkId::new("walk", tabs), &layout, |b, layout| {
            b.iter(|| {
                let mut visited = 0;
                let mut stack: Vec<_> = layout.root_id().into_iter().collect();
                while let Some(id) = stack.pop() {
                    visited += 1;
                    black_box(layout.parent_id(id.as_str()).expect("known id"));
                    stack.extend(layout.child_ids(id.as_str()).expect("known id"));
                }
                visited
            });
        });
    }
    group.finish();
}

fn benchmark_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_lookup");
    let layout = SimpleLayout::from_xml("bench", &generated_layout(100, 5)).expect("valid layout");
    let last = "portlet-999";

    group.bench_function("fname_scan", |b| {
        b.iter(|| layout.node_id_for_fname(black_box(last)).expect("lookup"));
    });

    let expr = parse_expression("//channel[@fname='portlet-999']/@ID").expect("valid xpath");
    group.bench_function("xpath_find", |b| {
        b.iter(|| layout.find_node_id(black_box(&expr)).expect("evaluation"));
    });

    group.bench_function("root_id", |b| b.iter(|| layout.root_id()));
    group.finish();
}

fn benchmark_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_export");
    let layout = SimpleLayout::from_xml("bench", &generated_layout(100, 5)).expect("valid layout");

    group.bench_function("to_document", |b| {
        b.iter(|| {
            let mut target = LayoutDocument::new();
            layout.write_to(&mut target).expect("export");
            target
        });
    });

    group.bench_function("to_xml", |b| {
        b.iter(|| {
            let mut sink = XmlWriterSink::new(Vec::with_capacity(64 * 1024));
            layout.write_to(&mut sink).expect("export");
            sink.into_inner()
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_navigation,
    benchmark_lookup,
    benchmark_export
);
criterion_main!(benches);
