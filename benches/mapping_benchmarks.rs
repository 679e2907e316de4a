use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rdf_bean_mapper::bean::{BeanDescriptor, Field, FieldValue, Instance, ObjectGraph, TypeRegistry, XsdType};
use rdf_bean_mapper::rdf::{QuadStore, RdfFormat, RdfParser};
use rdf_bean_mapper::RdfMapper;

fn mapper() -> RdfMapper {
    let mut registry = TypeRegistry::new();
    registry.register(
        BeanDescriptor::builder("Team")
            .namespace("ex", "http://example.com/")
            .namespace("team", "http://example.com/team/")
            .rdf_type("ex:Team")
            .subject("team", "id")
            .field(Field::scalar("name", "ex:name", XsdType::String))
            .field(Field::nested("members", "ex:member", "Member").many())
            .build()
            .unwrap(),
    );
    registry.register(
        BeanDescriptor::builder("Member")
            .namespace("ex", "http://example.com/")
            .namespace("member", "http://example.com/member/")
            .rdf_type("ex:Member")
            .subject("member", "id")
            .field(Field::scalar("name", "ex:name", XsdType::String))
            .field(Field::scalar("age", "ex:age", XsdType::Integer))
            .field(Field::nested("mentor", "ex:mentor", "Member"))
            .build()
            .unwrap(),
    );
    RdfMapper::new(registry)
}

/// A team whose members each point at the previous member as mentor
fn team_graph(size: usize) -> (ObjectGraph, rdf_bean_mapper::InstanceId) {
    let mut graph = ObjectGraph::new();
    let mut members = Vec::with_capacity(size);
    let mut previous = None;
    for i in 0..size {
        let id = graph.add(
            Instance::new("Member")
                .with("id", format!("m{}", i))
                .with("name", format!("Member{}", i))
                .with("age", (i % 100) as i64)
                .with_opt("mentor", previous),
        );
        members.push(FieldValue::Object(id));
        previous = Some(id);
    }
    let team = graph.add(
        Instance::new("Team")
            .with("id", "core")
            .with("name", "Core")
            .with("members", members),
    );
    (graph, team)
}

fn team_turtle(size: usize) -> String {
    let mut ttl = String::from(
        "@prefix ex: <http://example.com/> .\n\
         @prefix member: <http://example.com/member/> .\n\
         <http://example.com/team/core> a ex:Team ; ex:name \"Core\" .\n",
    );
    for i in 0..size {
        ttl.push_str(&format!(
            "<http://example.com/team/core> ex:member member:m{i} .\n\
             member:m{i} a ex:Member ; ex:name \"Member{i}\" ; ex:age {age} .\n",
            i = i,
            age = i % 100
        ));
        if i > 0 {
            ttl.push_str(&format!("member:m{} ex:mentor member:m{} .\n", i, i - 1));
        }
    }
    ttl
}

/// Benchmark quad store to object graph
fn bench_deserialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize");
    let mapper = mapper();

    for size in [100, 1000].iter() {
        let store: QuadStore = RdfParser::parse(&team_turtle(*size), RdfFormat::Turtle).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let result = mapper.deserialize("Team", &store).unwrap();
                criterion::black_box(result.graph.len());
            });
        });
    }
    group.finish();
}

/// Benchmark object graph to quads
fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    let mapper = mapper();

    for size in [100, 1000].iter() {
        let (graph, team) = team_graph(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let quads = mapper.serialize(&graph, team).unwrap();
                criterion::black_box(quads.len());
            });
        });
    }
    group.finish();
}

/// Benchmark serialize, then deserialize the output
fn bench_round_trip(c: &mut Criterion) {
    let mapper = mapper();
    let (graph, team) = team_graph(100);

    c.bench_function("round_trip_100", |b| {
        b.iter(|| {
            let quads = mapper.serialize(&graph, team).unwrap();
            let result = mapper.deserialize("Team", &QuadStore::from_quads(quads)).unwrap();
            criterion::black_box(result.roots.len());
        });
    });
}

criterion_group!(benches, bench_deserialize, bench_serialize, bench_round_trip);
criterion_main!(benches);
