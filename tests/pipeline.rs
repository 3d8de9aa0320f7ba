use std::fs;
use std::path::PathBuf;

use tennis_dataset::dataset::{
    SymmetryPolicy, apply_policy, dedup_by_url, drop_incomplete, generate_rows, load_inputs,
    mirror_rows,
};
use tennis_dataset::export::{model_headers, write_model_csv, write_trace_csv};
use tennis_dataset::win_rates::Surface;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn load_fixture_inputs() -> tennis_dataset::dataset::Inputs {
    load_inputs(
        &fixture_path("joueurs.json"),
        &fixture_path("detail_joueurs.json"),
        &fixture_path("stats_matchs.json"),
    )
    .expect("fixture collections should load")
}

#[test]
fn loads_all_three_collections() {
    let inputs = load_fixture_inputs();
    assert_eq!(inputs.roster.len(), 3);
    assert_eq!(inputs.details.len(), 2);
    assert_eq!(inputs.stats.len(), 1);
    assert_eq!(inputs.match_instances(), 5);
}

#[test]
fn generates_one_row_per_resolvable_match_instance() {
    let inputs = load_fixture_inputs();
    let rows = generate_rows(&inputs);
    // 5 instances, minus Boris's match against an unranked opponent.
    assert_eq!(rows.len(), 4);

    // Carlo Fontana has a roster entry but no detail record.
    assert!(rows.iter().all(|r| r.player1.name != "Carlo Fontana"));
}

#[test]
fn rows_come_out_sorted_and_dedup_keeps_first_per_url() {
    let inputs = load_fixture_inputs();
    let rows = generate_rows(&inputs);

    let keys: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.url.as_str(), r.player1.name.as_str()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    let canonical = dedup_by_url(rows);
    assert_eq!(canonical.len(), 2);
    // Adrien sorts before Boris, so both kept rows are his perspective.
    assert!(canonical.iter().all(|r| r.player1.name == "Adrien Michel"));
    assert!(canonical.iter().all(|r| r.player2.name == "Boris Keller"));
}

#[test]
fn final_row_carries_match_context_and_prior_history_only() {
    let inputs = load_fixture_inputs();
    let canonical = dedup_by_url(generate_rows(&inputs));

    let row = canonical
        .iter()
        .find(|r| r.url.ends_with("aus-open-final"))
        .expect("final should survive dedup");

    assert_eq!(row.target, 1);
    assert_eq!(row.surface, "dure");
    assert_eq!(row.tournament_category, 4);
    assert_eq!(row.date, "28.01.24");

    // Adrien as of the final: one prior match, a straight-sets loss on clay.
    let adrien = &row.player1;
    assert_eq!(adrien.age, 22);
    assert_eq!(adrien.ranking, 1);
    assert_eq!(adrien.points, 9000);
    assert_eq!(adrien.rates.win_rate, 0.0);
    assert_eq!(adrien.rates.win_rate_tiebreak, 0.0);
    assert_eq!(adrien.surfaces.get(Surface::Clay).total, 1);
    assert_eq!(adrien.surfaces.get(Surface::Clay).win_rate, 0.0);
    assert_eq!(adrien.surfaces.get(Surface::Hard).total, 0);

    // His only prior statistics line: 30/60 on first serve, 7 aces.
    assert!((adrien.performance.avg_first_serve_pct - 0.5).abs() < 1e-9);
    assert!((adrien.performance.avg_break_point_won_pct - 0.4).abs() < 1e-9);
    assert_eq!(adrien.performance.avg_aces, 7.0);
    assert_eq!(adrien.performance.avg_double_fautes, 3.0);

    // Boris as of the final: two prior wins, one on clay and one on hard.
    let boris = &row.player2;
    assert_eq!(boris.rates.win_rate, 1.0);
    assert_eq!(boris.surfaces.get(Surface::Hard).total, 1);
    assert_eq!(boris.surfaces.get(Surface::Hard).win_rate, 1.0);
    assert_eq!(boris.surfaces.get(Surface::Clay).total, 1);
    assert!((boris.performance.avg_first_serve_pct - 0.8).abs() < 1e-9);
    assert_eq!(boris.performance.avg_aces, 2.0);
}

#[test]
fn first_match_row_has_empty_history() {
    let inputs = load_fixture_inputs();
    let canonical = dedup_by_url(generate_rows(&inputs));

    let row = canonical
        .iter()
        .find(|r| r.url.ends_with("brisbane-sf"))
        .expect("semi should survive dedup");

    assert_eq!(row.target, 0);
    assert_eq!(row.surface, "terre battue");
    assert_eq!(row.tournament_category, 1);
    assert_eq!(row.player1.rates.win_rate, 0.0);
    assert_eq!(row.player1.performance.avg_aces, 0.0);
    assert_eq!(row.player1.surfaces.get(Surface::Clay).total, 0);
}

#[test]
fn mirror_policy_doubles_with_flipped_targets() {
    let inputs = load_fixture_inputs();
    let canonical = dedup_by_url(generate_rows(&inputs));
    let mirrored = mirror_rows(canonical.clone());

    assert_eq!(mirrored.len(), 4);
    for (original, mirror) in canonical.iter().zip(&mirrored[2..]) {
        assert_eq!(mirror.url, original.url);
        assert_eq!(mirror.target, 1 - original.target);
        assert_eq!(mirror.player1, original.player2);
        assert_eq!(mirror.player2, original.player1);
    }
}

#[test]
fn rebalance_leaves_an_even_split_alone() {
    let inputs = load_fixture_inputs();
    let canonical = dedup_by_url(generate_rows(&inputs));
    assert_eq!(canonical.len(), 2);

    let balanced = apply_policy(canonical.clone(), SymmetryPolicy::Rebalance { seed: 1 });
    assert_eq!(balanced, canonical);
}

#[test]
fn writes_model_and_trace_tables() {
    let inputs = load_fixture_inputs();
    let rows = drop_incomplete(mirror_rows(dedup_by_url(generate_rows(&inputs))));
    assert_eq!(rows.len(), 4);

    let dir = std::env::temp_dir();
    let model_path = dir.join("tennis_dataset_pipeline_model.csv");
    let trace_path = dir.join("tennis_dataset_pipeline_trace.csv");

    write_model_csv(&model_path, &rows).expect("model table should write");
    write_trace_csv(&trace_path, &rows).expect("trace table should write");

    let mut reader = csv::Reader::from_path(&model_path).expect("model table should read back");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.len(), model_headers().len());
    assert_eq!(headers.len(), 67);
    assert_eq!(&headers[0], "player1_age");
    assert_eq!(&headers[headers.len() - 1], "target");
    assert!(headers.iter().all(|h| h != "player1_name"));

    let records: Vec<csv::StringRecord> =
        reader.records().map(|r| r.expect("record")).collect();
    assert_eq!(records.len(), 4);
    // First emitted row is the final from Adrien's perspective.
    let final_row = &records[0];
    assert_eq!(&final_row[headers.len() - 1], "1");

    let trace = fs::read_to_string(&trace_path).expect("trace table should read back");
    assert!(trace.lines().next().unwrap().starts_with("player1_name,player2_name"));
    assert!(trace.contains("Adrien Michel"));
    assert!(trace.contains("https://tennis.example/match/aus-open-final"));

    fs::remove_file(&model_path).ok();
    fs::remove_file(&trace_path).ok();
}
