//! Benchmarks for selection construction and traversal.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use domq::{Selector, Window, bind};

/// A document with `sections` sections of ten list items each.
fn sample_html(sections: usize) -> String {
    let mut html = String::from("<html><body>");
    for s in 0..sections {
        html.push_str(&format!(r#"<section id="s{s}" class="block"><ul>"#));
        for i in 0..10 {
            let class = if i % 3 == 0 { "item hot" } else { "item" };
            html.push_str(&format!(r#"<li class="{class}"><a href="/{s}/{i}">{i}</a></li>"#));
        }
        html.push_str("</ul></section>");
    }
    html.push_str("</body></html>");
    html
}

// ============================================================================
// Construction
// ============================================================================

fn bench_parse_document(c: &mut Criterion) {
    let html = sample_html(200);
    c.bench_function("parse_document", |b| {
        b.iter(|| Window::from_html(&html));
    });
}

fn bench_fast_paths(c: &mut Criterion) {
    let window = Window::from_html(&sample_html(200));
    let dq = bind(&window);

    c.bench_function("select_id", |b| b.iter(|| dq.select("#s150")));
    c.bench_function("select_class", |b| b.iter(|| dq.select(".hot")));
    c.bench_function("select_tag", |b| b.iter(|| dq.select("li")));
}

fn bench_general_selector(c: &mut Criterion) {
    let window = Window::from_html(&sample_html(200));
    let dq = bind(&window);

    c.bench_function("select_general", |b| {
        b.iter(|| dq.select("section.block > ul li.hot:not(:first-child) a[href]"));
    });
    c.bench_function("selector_parse", |b| {
        b.iter(|| Selector::parse("section.block > ul li.hot a[href^='/1']"));
    });
}

// ============================================================================
// Traversal
// ============================================================================

fn bench_traversal(c: &mut Criterion) {
    let window = Window::from_html(&sample_html(200));
    let dq = bind(&window);
    let links = dq.select("a");

    c.bench_function("parents_dedup", |b| b.iter(|| links.parents(Some("section"))));
    c.bench_function("closest", |b| b.iter(|| links.closest("ul")));
    c.bench_function("siblings", |b| b.iter(|| dq.select(".hot").siblings(None)));
}

criterion_group!(
    benches,
    bench_parse_document,
    bench_fast_paths,
    bench_general_selector,
    bench_traversal,
);
criterion_main!(benches);
