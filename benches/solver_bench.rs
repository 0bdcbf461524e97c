//! Benchmarks for the frame solver

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frame_solver::prelude::*;

fn create_cantilever_model() -> Model {
    let mut builder = Model::builder();
    builder.add_node(Node::new(1, 0.0, 0.0, 0.0)).unwrap();
    builder.add_node(Node::new(2, 10.0, 0.0, 0.0)).unwrap();
    builder
        .add_element(Element::new(1, 1, 2, Section::rectangular(0.3, 0.5), Material::steel()))
        .unwrap();
    builder.add_reaction(Reaction::fixed(1)).unwrap();
    builder.build().unwrap()
}

fn node_id(story: usize, bay: usize, bays: usize) -> NodeId {
    (story * (bays + 1) + bay + 1) as NodeId
}

fn create_multi_story_frame(stories: usize, bays: usize, options: AnalysisOptions) -> Model {
    let column = Section::rectangular(0.4, 0.4);
    let beam = Section::rectangular(0.3, 0.6);
    let story_height = 3.5;
    let bay_width = 6.0;

    let mut builder = Model::builder();
    for story in 0..=stories {
        for bay in 0..=bays {
            let x = bay as f64 * bay_width;
            let z = story as f64 * story_height;
            builder
                .add_node(Node::new(node_id(story, bay, bays), x, 0.0, z))
                .unwrap();
        }
    }

    let mut id = 1;
    for story in 0..stories {
        for bay in 0..=bays {
            let (n1, n2) = (node_id(story, bay, bays), node_id(story + 1, bay, bays));
            builder
                .add_element(Element::new(id, n1, n2, column, Material::steel()))
                .unwrap();
            id += 1;
        }
    }
    for story in 1..=stories {
        for bay in 0..bays {
            let (n1, n2) = (node_id(story, bay, bays), node_id(story, bay + 1, bays));
            builder
                .add_element(Element::new(id, n1, n2, beam, Material::steel()))
                .unwrap();
            id += 1;
        }
    }

    for bay in 0..=bays {
        builder.add_reaction(Reaction::fixed(node_id(0, bay, bays))).unwrap();
    }
    builder.options(options);
    builder.build().unwrap()
}

fn gravity_case(stories: usize, bays: usize) -> LoadCase {
    let mut case = LoadCase::new().with_gravity(0.0, 0.0, -9.81);
    for story in 1..=stories {
        case = case
            .with_node_load(NodeLoad::force(node_id(story, 0, bays), 20_000.0, 0.0, 0.0))
            .with_node_load(NodeLoad::force(node_id(story, bays, bays), 0.0, 0.0, -50_000.0));
    }
    case
}

fn benchmark_cantilever(c: &mut Criterion) {
    let case = LoadCase::new().with_node_load(NodeLoad::force(2, 0.0, 0.0, -10_000.0));
    c.bench_function("cantilever_linear", |b| {
        b.iter(|| {
            let model = create_cantilever_model();
            black_box(model.solve_static(&case).unwrap());
        })
    });
}

fn benchmark_small_frame(c: &mut Criterion) {
    let model = create_multi_story_frame(3, 2, AnalysisOptions::linear());
    let case = gravity_case(3, 2);
    c.bench_function("frame_3story_2bay_linear", |b| {
        b.iter(|| black_box(model.solve_static(&case).unwrap()))
    });
}

fn benchmark_medium_frame(c: &mut Criterion) {
    let model = create_multi_story_frame(10, 5, AnalysisOptions::linear());
    let case = gravity_case(10, 5);
    c.bench_function("frame_10story_5bay_linear", |b| {
        b.iter(|| black_box(model.solve_static(&case).unwrap()))
    });
}

fn benchmark_load_cases(c: &mut Criterion) {
    let model = create_multi_story_frame(5, 3, AnalysisOptions::linear());
    let cases: Vec<LoadCase> = (0..8).map(|_| gravity_case(5, 3)).collect();
    c.bench_function("frame_5story_3bay_8_cases", |b| {
        b.iter(|| black_box(model.solve_static_cases(&cases)))
    });
}

fn benchmark_geometric(c: &mut Criterion) {
    let model = create_multi_story_frame(5, 3, AnalysisOptions::geometric());
    let case = gravity_case(5, 3);
    c.bench_function("frame_5story_3bay_geometric", |b| {
        b.iter(|| black_box(model.solve_static(&case).unwrap()))
    });
}

fn benchmark_modal(c: &mut Criterion) {
    let model = create_multi_story_frame(5, 3, AnalysisOptions::linear());
    let config = DynamicConfig::modes(6);
    c.bench_function("frame_5story_3bay_modal_subspace", |b| {
        b.iter(|| black_box(model.solve_modal(&config, &[], &[]).unwrap()))
    });
}

criterion_group!(
    benches,
    benchmark_cantilever,
    benchmark_small_frame,
    benchmark_medium_frame,
    benchmark_load_cases,
    benchmark_geometric,
    benchmark_modal,
);

criterion_main!(benches);
