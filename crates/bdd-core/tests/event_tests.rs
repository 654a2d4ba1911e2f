//! Eventos de ciclo de vida: anidamiento describe push/pop, pares it
//! push/pop y silencio de los casos descartados por selección.

use bdd_core::{create, sync_fn, DescribeCtx, EventKind};
use regex::Regex;
use serde_json::json;
use std::sync::{Arc, Mutex};

type Events = Arc<Mutex<Vec<(String, String)>>>;

fn subscribe(flow: bdd_core::Flow, events: &Events) -> bdd_core::Flow {
    let mut flow = flow;
    for (kind, tag) in [(EventKind::DescribePush, "dpush"),
                        (EventKind::DescribePop, "dpop"),
                        (EventKind::ItPush, "ipush"),
                        (EventKind::ItPop, "ipop")] {
        let sink = events.clone();
        flow = flow.on(kind, move |name| {
                   sink.lock().unwrap().push((tag.to_string(), name.to_string()));
               });
    }
    flow
}

fn noop_tree(d: &mut DescribeCtx<'_>) {
    d.it("i1", sync_fn(|_| Ok(())));
    d.it("i2", sync_fn(|_| Ok(())));
    d.describe("d1", |d| {
        d.it("d1i1", sync_fn(|_| Ok(())));
        d.describe("d1a", |d| {
            d.it("d1ai1", sync_fn(|_| Ok(())));
        });
    });
}

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
       .map(|(a, b)| (a.to_string(), b.to_string()))
       .collect()
}

#[tokio::test]
async fn describe_events_nest_like_the_tree() {
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let mut flow = subscribe(create(), &events).add_root_describe("r1", noop_tree)
                                               .add_root_describe("r2", noop_tree);
    flow.run().await.unwrap();

    let describe_events: Vec<(String, String)> =
        events.lock()
              .unwrap()
              .iter()
              .filter(|(tag, _)| tag.starts_with('d'))
              .cloned()
              .collect();
    assert_eq!(describe_events,
               pairs(&[("dpush", "r1"),
                       ("dpush", "d1"),
                       ("dpush", "d1a"),
                       ("dpop", "d1a"),
                       ("dpop", "d1"),
                       ("dpop", "r1"),
                       ("dpush", "r2"),
                       ("dpush", "d1"),
                       ("dpush", "d1a"),
                       ("dpop", "d1a"),
                       ("dpop", "d1"),
                       ("dpop", "r2")]));
}

#[tokio::test]
async fn it_events_come_in_adjacent_pairs() {
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let mut flow = subscribe(create(), &events).add_root_describe("r1", noop_tree);
    flow.run().await.unwrap();

    let it_events: Vec<(String, String)> = events.lock()
                                                 .unwrap()
                                                 .iter()
                                                 .filter(|(tag, _)| tag.starts_with('i'))
                                                 .cloned()
                                                 .collect();
    assert_eq!(it_events,
               pairs(&[("ipush", "i1"),
                       ("ipop", "i1"),
                       ("ipush", "i2"),
                       ("ipop", "i2"),
                       ("ipush", "d1i1"),
                       ("ipop", "d1i1"),
                       ("ipush", "d1ai1"),
                       ("ipop", "d1ai1")]));

    // Never two pushes without the pop of the former in between.
    let mut open: Option<String> = None;
    for (tag, name) in it_events {
        match tag.as_str() {
            "ipush" => {
                assert!(open.is_none(), "nested it events are illegal");
                open = Some(name);
            }
            "ipop" => {
                assert_eq!(open.take(), Some(name), "pop must match the open push");
            }
            _ => unreachable!(),
        }
    }
}

#[tokio::test]
async fn event_log_records_the_same_sequence() {
    let mut flow = create().add_root_describe("r", |d| {
        d.it("i1", sync_fn(|_| Ok(())));
    });
    flow.run().await.unwrap();

    let kinds: Vec<EventKind> = flow.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds,
               vec![EventKind::DescribePush,
                    EventKind::ItPush,
                    EventKind::ItPop,
                    EventKind::DescribePop]);
    let seqs: Vec<u64> = flow.events().iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn deselected_cases_emit_no_events_and_skip_paired_hooks() {
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let mut flow = subscribe(create(), &events)
        .grepv(Regex::new("i2").unwrap())
        .add_root_describe("r", |d| {
            d.before_each(sync_fn(|ctx| {
                 let n = ctx.get("each").and_then(|v| v.as_i64()).unwrap_or(0);
                 ctx.set("each", n + 1);
                 Ok(())
             }));
            d.it("i1", sync_fn(|_| Ok(())));
            d.it("i2", sync_fn(|_| Ok(())));
            d.it("i3", sync_fn(|_| Ok(())));
        });
    flow.run().await.unwrap();

    let it_names: Vec<String> = events.lock()
                                      .unwrap()
                                      .iter()
                                      .filter(|(tag, _)| tag == "ipush")
                                      .map(|(_, name)| name.clone())
                                      .collect();
    assert_eq!(it_names, vec!["i1", "i3"], "no-op substitution stays silent");
    assert_eq!(flow.shared_context().get("each"), Some(&json!(2)),
               "beforeEach must not run for a deselected case");
}
