use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vanshavali::family::{Directory, EdgeStore, Gender, Member, RelationshipEdge};
use vanshavali::hierarchy::{build_hierarchy, BuildOptions};
use vanshavali::kinship::{derive_relations, RelationRules};
use vanshavali::layout::{compute_layout, LayoutConfig};
use vanshavali::quality::SpousePolicy;
use vanshavali::relate::{describe_relationship, SearchOptions, SearchStrategy};
use vanshavali::SerNo;

/// Binary-tree genealogy: member i's children are 2i and 2i+1, spouses
/// live at count+i. Deterministic, so every run sees the same snapshot.
fn synthetic_members(count: u32) -> Vec<Member> {
    let mut members = Vec::with_capacity(count as usize * 2);
    for i in 1..=count {
        let level = 32 - i.leading_zeros();
        let gender = if i % 2 == 0 {
            Gender::Female
        } else {
            Gender::Male
        };
        let mut member = Member::new(i)
            .with_name(format!("Member{i}"), "Sharma")
            .with_gender(gender)
            .with_level(level);
        if i >= 2 {
            member = member.with_father(i / 2).with_mother(count + i / 2);
        }
        let children: Vec<u32> = [2 * i, 2 * i + 1]
            .into_iter()
            .filter(|&c| c <= count)
            .collect();
        if !children.is_empty() {
            member = member.with_spouse(count + i).with_children(children.clone());
            members.push(
                Member::new(count + i)
                    .with_name(format!("Spouse{i}"), "Sharma")
                    .with_gender(if gender.is_male() {
                        Gender::Female
                    } else {
                        Gender::Male
                    })
                    .with_level(level)
                    .with_spouse(i)
                    .with_children(children),
            );
        }
        members.push(member);
    }
    members
}

fn synthetic_edges(count: u32) -> Vec<RelationshipEdge> {
    let mut edges = Vec::with_capacity(count as usize * 2);
    for i in 2..=count {
        let father = i / 2;
        edges.push(RelationshipEdge::new(i, father, "Father"));
        let role = if i % 2 == 0 { "Daughter" } else { "Son" };
        edges.push(RelationshipEdge::new(father, i, role));
    }
    edges
}

/// Benchmark snapshot JSON ingestion
fn bench_snapshot_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_ingest");

    for size in [100, 1_000, 10_000].iter() {
        let payload = serde_json::to_vec(&synthetic_members(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let directory = Directory::from_json_slice(&payload).unwrap();
                criterion::black_box(directory.len());
            });
        });
    }
    group.finish();
}

/// Benchmark hierarchy construction from the root couple
fn bench_hierarchy_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy_build");

    for size in [100, 1_000, 10_000].iter() {
        let directory = Directory::from_members(synthetic_members(*size)).unwrap();
        let edges = EdgeStore::from_edges(synthetic_edges(*size));
        let policy = SpousePolicy::default();
        let options = BuildOptions::default();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let tree =
                    build_hierarchy(&directory, Some(&edges), SerNo::new(1), &policy, &options)
                        .unwrap();
                criterion::black_box(tree.node_count());
            });
        });
    }
    group.finish();
}

/// Benchmark relationship path search over random member pairs
fn bench_relationship_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("relationship_search");

    let count = 10_000u32;
    let edges = EdgeStore::from_edges(synthetic_edges(count));
    let mut rng = StdRng::seed_from_u64(42);
    let pairs: Vec<(SerNo, SerNo)> = (0..64)
        .map(|_| {
            (
                SerNo::new(rng.gen_range(1..=count)),
                SerNo::new(rng.gen_range(1..=count)),
            )
        })
        .collect();

    for strategy in [SearchStrategy::DepthFirst, SearchStrategy::BreadthFirst] {
        let options = SearchOptions {
            max_hops: 5,
            strategy,
        };
        let name = match strategy {
            SearchStrategy::DepthFirst => "depth_first",
            SearchStrategy::BreadthFirst => "breadth_first",
        };
        group.bench_function(name, |b| {
            b.iter(|| {
                for &(from, to) in &pairs {
                    let description = describe_relationship(&edges, from, to, &options);
                    criterion::black_box(description.is_related());
                }
            });
        });
    }
    group.finish();
}

/// Benchmark kinship derivation for random members
fn bench_kinship_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("kinship_derivation");

    let count = 10_000u32;
    let directory = Directory::from_members(synthetic_members(count)).unwrap();
    let rules = RelationRules::default();
    let mut rng = StdRng::seed_from_u64(7);
    let subjects: Vec<SerNo> = (0..64)
        .map(|_| SerNo::new(rng.gen_range(1..=count)))
        .collect();

    group.bench_function("random_members", |b| {
        b.iter(|| {
            for &subject in &subjects {
                let relations = derive_relations(&directory, subject, &rules);
                criterion::black_box(relations.len());
            }
        });
    });
    group.finish();
}

/// Benchmark coordinate assignment for a built tree
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for size in [100, 1_000, 10_000].iter() {
        let directory = Directory::from_members(synthetic_members(*size)).unwrap();
        let tree = build_hierarchy(
            &directory,
            None,
            SerNo::new(1),
            &SpousePolicy::default(),
            &BuildOptions::default(),
        )
        .unwrap();
        let config = LayoutConfig::default();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let positions = compute_layout(&tree, &config);
                criterion::black_box(positions.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_snapshot_ingest,
    bench_hierarchy_build,
    bench_relationship_search,
    bench_kinship_derivation,
    bench_layout,
);
criterion_main!(benches);
