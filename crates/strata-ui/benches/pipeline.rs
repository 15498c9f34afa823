use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::rc::Rc;
use strata_foundation::text::{FontFamilyResolver, MonospaceFontResolver};
use strata_ui::layout::{LinearMeasurePolicy, Padding, TextMeasurePolicy};
use strata_ui::{Constraints, LayoutNode, MeasureAndLayoutDelegate};
use strata_ui_graphics::TextStyle;
use strata_ui_layout::{HorizontalAlignment, VerticalAlignment};

const SECTION_COUNT: usize = 4;
const ROWS_PER_SECTION_SAMPLES: &[usize] = &[16, 64];
const ROOT_WIDTH: f32 = 1080.0;
const ROOT_HEIGHT: f32 = 1920.0;

fn text(content: String, resolver: &Rc<dyn FontFamilyResolver>) -> Rc<LayoutNode> {
    LayoutNode::new(Rc::new(TextMeasurePolicy::new(
        content,
        TextStyle::default().with_font_size(14.0),
        resolver.clone(),
    )))
}

/// A column of sections, each a title followed by rows of title and detail
/// texts.
fn pipeline_tree(sections: usize, rows_per_section: usize) -> (Rc<LayoutNode>, Vec<Rc<LayoutNode>>) {
    let resolver: Rc<dyn FontFamilyResolver> = Rc::new(MonospaceFontResolver::new());
    let root = LayoutNode::new(Rc::new(LinearMeasurePolicy::column(0.0, HorizontalAlignment::Start)));
    let mut details = Vec::new();
    for section in 0..sections {
        let column = LayoutNode::new(Rc::new(LinearMeasurePolicy::column(4.0, HorizontalAlignment::Start)));
        column.set_modifiers(vec![Rc::new(Padding::symmetric(16.0, 8.0))]);
        column.add_child(text(format!("Section {section}"), &resolver));
        for row in 0..rows_per_section {
            let line = LayoutNode::new(Rc::new(LinearMeasurePolicy::row(8.0, VerticalAlignment::Top)));
            line.add_child(text(format!("Item {section}-{row} title"), &resolver));
            let detail = text(format!("Detail {section}-{row}"), &resolver);
            line.add_child(detail.clone());
            column.add_child(line);
            details.push(detail);
        }
        root.add_child(column);
    }
    (root, details)
}

fn ui_object_count(sections: usize, rows_per_section: usize) -> usize {
    1 + sections * (2 + rows_per_section * 3)
}

fn root_constraints(width: f32) -> Constraints {
    Constraints::new(0.0, width, 0.0, ROOT_HEIGHT)
}

fn bench_first_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_first_layout");
    for &rows_per_section in ROWS_PER_SECTION_SAMPLES {
        group.bench_with_input(
            BenchmarkId::new("ui_objects", ui_object_count(SECTION_COUNT, rows_per_section)),
            &rows_per_section,
            |b, &rows_per_section| {
                b.iter(|| {
                    let (root, _details) = pipeline_tree(SECTION_COUNT, rows_per_section);
                    let delegate = MeasureAndLayoutDelegate::new(root);
                    delegate.update_root_constraints(root_constraints(ROOT_WIDTH));
                    black_box(delegate.measure_and_layout());
                });
            },
        );
    }
    group.finish();
}

fn bench_single_invalidation(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_single_invalidation");
    for &rows_per_section in ROWS_PER_SECTION_SAMPLES {
        group.bench_with_input(
            BenchmarkId::new("ui_objects", ui_object_count(SECTION_COUNT, rows_per_section)),
            &rows_per_section,
            |b, &rows_per_section| {
                let (root, details) = pipeline_tree(SECTION_COUNT, rows_per_section);
                let delegate = MeasureAndLayoutDelegate::new(root);
                delegate.update_root_constraints(root_constraints(ROOT_WIDTH));
                delegate.measure_and_layout();
                let target = &details[details.len() / 2];

                b.iter(|| {
                    target.invalidate_measure();
                    black_box(delegate.measure_and_layout());
                });
            },
        );
    }
    group.finish();
}

fn bench_root_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_root_resize");
    for &rows_per_section in ROWS_PER_SECTION_SAMPLES {
        group.bench_with_input(
            BenchmarkId::new("ui_objects", ui_object_count(SECTION_COUNT, rows_per_section)),
            &rows_per_section,
            |b, &rows_per_section| {
                let (root, _details) = pipeline_tree(SECTION_COUNT, rows_per_section);
                let delegate = MeasureAndLayoutDelegate::new(root);
                delegate.update_root_constraints(root_constraints(ROOT_WIDTH));
                delegate.measure_and_layout();
                let mut narrow = false;

                b.iter(|| {
                    narrow = !narrow;
                    let width = if narrow { ROOT_WIDTH / 3.0 } else { ROOT_WIDTH };
                    delegate.update_root_constraints(root_constraints(width));
                    black_box(delegate.measure_and_layout());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_first_layout,
    bench_single_invalidation,
    bench_root_resize
);
criterion_main!(benches);
