//! Statistics Tests.
//!
//! Derived metrics on raw counters, and the section-selectable text report.

use cachesim_core::common::Level;
use cachesim_core::config::HierarchyConfig;
use cachesim_core::stats::{CacheStats, HierarchyStats, STATS_SECTIONS};
use pretty_assertions::assert_eq;

use crate::common::{build, example_config, fetch_all};

/// Returns the value column of the report line whose key is `key`.
fn value(report: &str, key: &str) -> Option<String> {
    report.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        (fields.next() == Some(key)).then(|| fields.collect::<Vec<_>>().join(" "))
    })
}

fn report(stats: &HierarchyStats, config: &HierarchyConfig, sections: &[&str]) -> String {
    let sections: Vec<String> = sections.iter().map(ToString::to_string).collect();
    let mut out = Vec::new();
    stats
        .write_sections(&mut out, config, &sections)
        .expect("writing to a Vec cannot fail");
    String::from_utf8(out).expect("report is UTF-8")
}

fn reference_run() -> (HierarchyStats, HierarchyConfig) {
    let config = example_config();
    let mut h = build(&config);
    let _ = fetch_all(&mut h, &[0x00, 0x10, 0x20, 0x00]);
    (*h.stats(), config)
}

// ══════════════════════════════════════════════════════════
// 1. Derived metrics
// ══════════════════════════════════════════════════════════

#[test]
fn metrics_with_no_references_are_zero() {
    let s = CacheStats::default();
    assert_eq!(s.hits(), 0);
    assert!(s.miss_rate().abs() < f64::EPSILON);
    assert!(s.avg_access_time(5).abs() < f64::EPSILON);
}

#[test]
fn average_access_time() {
    let s = CacheStats {
        references: 4,
        misses: 3,
        penalties: 330,
        invalidations: 0,
    };
    assert_eq!(s.hits(), 1);
    assert!((s.miss_rate() - 0.75).abs() < f64::EPSILON);
    assert!((s.avg_access_time(1) - 83.5).abs() < f64::EPSILON);
}

#[test]
fn level_accessors_map_to_fields() {
    let mut stats = HierarchyStats::default();
    stats.level_mut(Level::Instruction).references = 1;
    stats.level_mut(Level::Data).references = 2;
    stats.level_mut(Level::L2).references = 3;
    assert_eq!(stats.icache.references, 1);
    assert_eq!(stats.dcache.references, 2);
    assert_eq!(stats.l2cache.references, 3);
    assert_eq!(stats.level(Level::L2).references, 3);
    assert_eq!(stats.l1_references(), 3);
}

// ══════════════════════════════════════════════════════════
// 2. Report
// ══════════════════════════════════════════════════════════

#[test]
fn section_names_match_levels() {
    let names: Vec<&str> = Level::ALL.into_iter().map(Level::name).collect();
    assert_eq!(names, STATS_SECTIONS);
}

#[test]
fn full_report_of_reference_run() {
    let (stats, config) = reference_run();
    let text = report(&stats, &config, &[]);

    assert_eq!(value(&text, "icache.geometry").as_deref(), Some("4 sets x 1 ways"));
    assert_eq!(value(&text, "icache.accesses").as_deref(), Some("4"));
    assert_eq!(value(&text, "icache.misses").as_deref(), Some("3"));
    assert_eq!(value(&text, "icache.penalties").as_deref(), Some("330 cycles"));
    assert_eq!(value(&text, "icache.miss_rate").as_deref(), Some("75.00%"));
    assert_eq!(value(&text, "icache.avg_access").as_deref(), Some("83.50 cycles"));
    assert_eq!(value(&text, "icache.invalidations").as_deref(), Some("0"));

    assert_eq!(value(&text, "l2cache.accesses").as_deref(), Some("3"));
    assert_eq!(value(&text, "l2cache.penalties").as_deref(), Some("300 cycles"));
    assert_eq!(value(&text, "l2cache.miss_rate").as_deref(), Some("100.00%"));
    assert_eq!(value(&text, "l2cache.avg_access").as_deref(), Some("110.00 cycles"));
    assert_eq!(value(&text, "l2cache.invalidations"), None);

    assert!(text.contains(
        "DCACHE\n  disabled\n----------------------------------------------------------\nL2CACHE\n"
    ));
    assert_eq!(
        text.lines().filter(|l| l.chars().all(|c| c == '-')).count(),
        3,
        "one rule per section"
    );
    assert_eq!(value(&text, "dcache.accesses"), None);
}

#[test]
fn sections_can_be_selected() {
    let (stats, config) = reference_run();
    let text = report(&stats, &config, &["l2cache"]);
    assert!(text.starts_with("L2CACHE\n"));
    assert!(!text.contains("ICACHE"));
    assert!(!text.contains("DCACHE"));

    let text = report(&stats, &config, &["dcache", "icache"]);
    // Output order follows the hierarchy, not the request.
    let i = text.find("ICACHE").expect("icache section");
    let d = text.find("DCACHE").expect("dcache section");
    assert!(i < d);
    assert!(!text.contains("L2CACHE"));
}

#[test]
fn unknown_sections_write_nothing() {
    let (stats, config) = reference_run();
    assert_eq!(report(&stats, &config, &["summary", "bogus"]), "");
}

#[test]
fn invalidations_only_reported_when_inclusive() {
    let (stats, config) = reference_run();
    let config = HierarchyConfig {
        inclusive: false,
        ..config
    };
    let text = report(&stats, &config, &[]);
    assert_eq!(value(&text, "icache.invalidations"), None);
    assert_eq!(value(&text, "icache.accesses").as_deref(), Some("4"));
}
