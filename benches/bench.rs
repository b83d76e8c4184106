// Criterion benchmarks for Mentor Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mentor_match::core::{parse_ranked_ids, rank_by_score, resolve_ranked_ids, MAX_MATCHES};
use mentor_match::models::{MentorCandidate, ScoringWeights, StudentProfile};

const MAJORS: [&str; 4] = ["CS", "Math", "Biology", "Economics"];
const INDUSTRIES: [&str; 3] = ["Tech", "Finance", "Health"];
const LOCATIONS: [&str; 3] = ["NY", "SF", "Boston"];

fn create_candidate(id: usize) -> MentorCandidate {
    MentorCandidate {
        id: format!("mentor-{}", id),
        name: format!("Mentor {}", id),
        major: Some(MAJORS[id % MAJORS.len()].to_string()),
        industry: Some(INDUSTRIES[id % INDUSTRIES.len()].to_string()),
        location: if id % 5 == 0 { None } else { Some(LOCATIONS[id % LOCATIONS.len()].to_string()) },
    }
}

fn create_student() -> StudentProfile {
    StudentProfile {
        major: Some("CS".to_string()),
        graduation_year: Some(2026),
        location: Some("NY".to_string()),
        industry: Some("Tech".to_string()),
    }
}

fn bench_score_fallback(c: &mut Criterion) {
    let student = create_student();
    let weights = ScoringWeights::default();

    let mut group = c.benchmark_group("score_fallback");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<MentorCandidate> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("rank_by_score", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    rank_by_score(
                        black_box(&student),
                        black_box(&candidates),
                        black_box(&weights),
                        MAX_MATCHES,
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_response_parsing(c: &mut Criterion) {
    let candidates: Vec<MentorCandidate> = (0..200).map(create_candidate).collect();
    let ids: Vec<String> = candidates.iter().rev().take(5).map(|m| m.id.clone()).collect();
    let fenced = format!("```json\n{}\n```", serde_json::to_string(&ids).unwrap_or_default());
    let prose = format!("Here are my picks: {} Hope this helps!", serde_json::to_string(&ids).unwrap_or_default());

    c.bench_function("parse_fenced_response", |b| {
        b.iter(|| parse_ranked_ids(black_box(&fenced)))
    });

    c.bench_function("parse_prose_response", |b| {
        b.iter(|| parse_ranked_ids(black_box(&prose)))
    });

    c.bench_function("resolve_ranked_ids_200_candidates", |b| {
        b.iter(|| resolve_ranked_ids(black_box(&ids), black_box(&candidates), MAX_MATCHES))
    });
}

criterion_group!(benches, bench_score_fallback, bench_response_parsing);

criterion_main!(benches);
