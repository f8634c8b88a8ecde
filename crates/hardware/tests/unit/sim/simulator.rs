//! Replay driver tests.

use std::io::Cursor;

use cachesim_core::common::{AccessError, AccessType, ConfigError};
use cachesim_core::config::HierarchyConfig;
use cachesim_core::sim::{RunSummary, SimError, Simulator, TraceError, TraceReader, TraceRecord};
use pretty_assertions::assert_eq;

use crate::common::{example_config, full_config};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn simulator(config: &HierarchyConfig) -> Simulator {
    Simulator::new(config).expect("valid configuration")
}

#[test]
fn reference_trace_totals() {
    init_tracing();
    let mut sim = simulator(&example_config());
    let trace = "I 0x00\nI 0x10\nI 0x20\nI 0x00\n";
    let summary = sim.run(TraceReader::new(Cursor::new(trace))).expect("replay succeeds");

    assert_eq!(
        summary,
        RunSummary {
            instruction_accesses: 4,
            data_accesses: 0,
            total_cycles: 334,
        }
    );
    assert!((summary.avg_latency() - 83.5).abs() < f64::EPSILON);
    assert_eq!(sim.hierarchy.stats().icache.misses, 3);
}

#[test]
fn step_tracks_both_access_kinds() {
    let mut sim = simulator(&full_config(true));
    let fetch = TraceRecord {
        access: AccessType::Fetch,
        addr: 0x100,
    };
    let load = TraceRecord {
        access: AccessType::Data,
        addr: 0x100,
    };
    assert_eq!(sim.step(fetch), Ok(111));
    assert_eq!(sim.step(load), Ok(12));
    assert_eq!(sim.step(load), Ok(2));
    assert_eq!(sim.summary.instruction_accesses, 1);
    assert_eq!(sim.summary.data_accesses, 2);
    assert_eq!(sim.summary.total_cycles, 125);
    assert_eq!(sim.summary.total_accesses(), 3);
}

#[test]
fn run_stops_at_first_bad_line() {
    init_tracing();
    let mut sim = simulator(&example_config());
    let trace = "I 0x00\nQ 0x10\nI 0x20\n";
    let err = sim
        .run(TraceReader::new(Cursor::new(trace)))
        .expect_err("second line is malformed");
    assert!(matches!(
        err,
        SimError::Trace(TraceError::UnknownKind { line: 2, .. })
    ));
    assert_eq!(sim.summary.total_accesses(), 1);
    assert_eq!(sim.summary.total_cycles, 111);
}

#[test]
fn run_accepts_any_record_iterator() {
    let mut sim = simulator(&example_config());
    let records = [0x00, 0x00, 0x00].map(|addr| {
        Ok::<_, TraceError>(TraceRecord {
            access: AccessType::Fetch,
            addr,
        })
    });
    let summary = sim.run(records).expect("replay succeeds");
    assert_eq!(summary.total_cycles, 113);
}

#[test]
fn released_hierarchy_rejects_steps() {
    let mut sim = simulator(&example_config());
    sim.hierarchy.release();
    let record = TraceRecord {
        access: AccessType::Fetch,
        addr: 0,
    };
    assert_eq!(sim.step(record), Err(AccessError::Uninitialized));
    assert!(matches!(
        sim.run([Ok::<_, TraceError>(record)]),
        Err(SimError::Access(AccessError::Uninitialized))
    ));
    assert_eq!(sim.summary, RunSummary::default());
}

#[test]
fn invalid_configuration_is_rejected() {
    let cfg = HierarchyConfig {
        block_size: 0,
        ..example_config()
    };
    assert_eq!(
        Simulator::new(&cfg).err().map(|e| e.to_string()),
        Some(ConfigError::BlockSizeNotPowerOfTwo(0).to_string())
    );
}

#[test]
fn total_cycles_saturate() {
    let cfg = HierarchyConfig {
        mem_speed: u64::MAX,
        ..HierarchyConfig::default()
    };
    let mut sim = simulator(&cfg);
    let record = TraceRecord {
        access: AccessType::Data,
        addr: 0x40,
    };
    assert_eq!(sim.step(record), Ok(u64::MAX));
    assert_eq!(sim.step(record), Ok(u64::MAX));
    assert_eq!(sim.summary.total_cycles, u64::MAX);
    assert_eq!(sim.summary.data_accesses, 2);
}

#[test]
fn empty_run_summary() {
    let summary = RunSummary::default();
    assert_eq!(summary.total_accesses(), 0);
    assert!(summary.avg_latency().abs() < f64::EPSILON);
}

#[test]
fn summary_report_lines() {
    let summary = RunSummary {
        instruction_accesses: 3,
        data_accesses: 1,
        total_cycles: 334,
    };
    let mut out = Vec::new();
    summary.write(&mut out).expect("writing to a Vec cannot fail");
    let text = String::from_utf8(out).expect("report is UTF-8");

    assert!(text.contains("CACHE HIERARCHY SIMULATION STATISTICS"));
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines.contains(&"sim_accesses             4"));
    assert!(lines.contains(&"sim_inst_accesses        3"));
    assert!(lines.contains(&"sim_data_accesses        1"));
    assert!(lines.contains(&"sim_cycles               334"));
    assert!(lines.contains(&"sim_avg_latency          83.5000"));
}
