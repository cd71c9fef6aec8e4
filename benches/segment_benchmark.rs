use criterion::{black_box, criterion_group, criterion_main, Criterion};
use untex::{identify_str, parse_tex, resolve_macros};

/// Build a synthetic article with the given number of sections.
fn synthetic_document(sections: usize) -> String {
    let mut doc = String::from(
        "\\documentclass{article}\n\
         \\newcommand{\\stress}[1]{\\textbf{#1}}\n\
         \\begin{document}\n",
    );
    for i in 0..sections {
        doc.push_str(&format!("\\section{{Section {}}}\n", i));
        doc.push_str("First paragraph with some \\stress{emphasized} words here.\n\n");
        doc.push_str("Second paragraph spanning\nmultiple source lines in a row.\n\n");
        doc.push_str("\\begin{equation}\nx_i = y_i + z_i\n\\end{equation}\n");
        doc.push_str("\\begin{itemize}\n\\item one thing\n\\item another thing\n\\end{itemize}\n");
    }
    doc.push_str("\\end{document}\n");
    doc
}

fn bench_parse(c: &mut Criterion) {
    let input = synthetic_document(100);
    c.bench_function("parse_100_sections", |b| {
        b.iter(|| parse_tex(black_box(&input)).unwrap())
    });
}

fn bench_resolve_macros(c: &mut Criterion) {
    let input = synthetic_document(100);
    c.bench_function("resolve_macros_100_sections", |b| {
        b.iter(|| resolve_macros(black_box(&input)).unwrap())
    });
}

fn bench_identify(c: &mut Criterion) {
    let mut group = c.benchmark_group("identify");
    for sections in [10, 100, 500] {
        let input = synthetic_document(sections);
        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| identify_str(black_box(&input)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_resolve_macros, bench_identify);
criterion_main!(benches);
