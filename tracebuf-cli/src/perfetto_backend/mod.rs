pub mod file_writer;
pub mod trace_event;

use tracebuf_core::Sample;

use crate::capture::chronological::unwrapped_timeline;
use trace_event::{InstantScope, TracingArgsMap, TracingEvent};

const PID: u32 = 1;
const SAMPLES_TID: u32 = 0;
const GROUPS_TID: u32 = 1;

/// Converts samples in recording order into Perfetto events.
///
/// Every sample becomes an instant event named after its value. With a `separator` every group
/// (a separator sample up to the next one) additionally becomes a slice on its own track, the last
/// group ends at the last sample.
pub fn build_trace_events(samples: &[Sample], separator: Option<u32>) -> Vec<TracingEvent> {
    let timeline = unwrapped_timeline(samples);
    let mut events = vec![
        metadata("process_name", None, "tracebuf"),
        metadata("thread_name", Some(SAMPLES_TID), "samples"),
    ];

    for (sample, &ts) in samples.iter().zip(&timeline) {
        events.push(TracingEvent::Instant {
            name: sample.value.to_string(),
            cat: Some("sample".to_string()),
            ts,
            pid: PID,
            tid: SAMPLES_TID,
            scope: InstantScope::Thread,
            args: TracingArgsMap::from([(
                "value".to_string(),
                format!("0x{:08x}", sample.value),
            )]),
        });
    }

    if let Some(separator) = separator {
        events.push(metadata("thread_name", Some(GROUPS_TID), "groups"));
        events.extend(group_slices(samples, &timeline, separator));
    }

    events
}

fn group_slices(samples: &[Sample], timeline: &[u64], separator: u32) -> Vec<TracingEvent> {
    let starts: Vec<u64> = samples
        .iter()
        .zip(timeline)
        .filter(|(sample, _)| sample.value == separator)
        .map(|(_, &ts)| ts)
        .collect();
    let Some(&end_of_trace) = timeline.last() else {
        return Vec::new();
    };

    starts
        .iter()
        .enumerate()
        .map(|(group, &start)| {
            let end = starts.get(group + 1).copied().unwrap_or(end_of_trace);
            TracingEvent::Complete {
                name: format!("group {group}"),
                cat: Some("group".to_string()),
                pid: PID,
                tid: GROUPS_TID,
                ts: start,
                dur: end - start,
                args: TracingArgsMap::new(),
            }
        })
        .collect()
}

fn metadata(name: &str, tid: Option<u32>, value: &str) -> TracingEvent {
    TracingEvent::Metadata {
        name: name.to_string(),
        pid: PID,
        tid,
        args: TracingArgsMap::from([("name".to_string(), value.to_string())]),
    }
}
