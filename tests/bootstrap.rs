mod common;

use std::cell::RefCell;
use std::rc::Rc;

use log::Level;

use common::{harness, init_logging, logs_at, FakeBackend, FakePage, FakeWidget, Journal};
use linkglue::platform::LocalSpawner;
use linkglue::{start, Bootstrap, LinkConfig, LinkError, LinkFlow, MissingTrigger};

#[test]
fn missing_trigger_is_ignored_by_default() {
    init_logging();
    let h = harness(LinkConfig::default(), |b| b);
    let page = FakePage::default();

    assert_eq!(start(&page, &h.flow).unwrap(), Bootstrap::NoTrigger);

    let warnings = logs_at(Level::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("#start"));
    assert_eq!(*h.backend.token_calls.borrow(), 0);
}

#[test]
fn missing_trigger_fails_when_configured() {
    init_logging();
    let config = LinkConfig {
        missing_trigger: MissingTrigger::Fail,
        ..LinkConfig::default()
    };
    let h = harness(config, |b| b);
    let page = FakePage::default();

    assert_eq!(
        start(&page, &h.flow).unwrap_err(),
        LinkError::TriggerMissing {
            selector: "#start".into()
        }
    );
    assert!(logs_at(Level::Warn).is_empty());
}

#[test]
fn custom_selector_is_used() {
    init_logging();
    let config = LinkConfig {
        trigger_selector: "#link-account".into(),
        ..LinkConfig::default()
    };
    let h = harness(config, |b| b);

    let (wrong_page, wrong_trigger) = FakePage::with_element("#start");
    assert_eq!(start(&wrong_page, &h.flow).unwrap(), Bootstrap::NoTrigger);
    assert!(!wrong_trigger.has_handler());

    let (page, trigger) = FakePage::with_element("#link-account");
    assert_eq!(start(&page, &h.flow).unwrap(), Bootstrap::Attached);
    assert!(trigger.has_handler());
}

#[tokio::test]
async fn local_spawner_runs_click_inside_local_set() {
    init_logging();
    let journal: Journal = Rc::new(RefCell::new(Vec::new()));
    let backend = FakeBackend::new(&journal);
    let widget = FakeWidget::new(&journal);
    let flow = LinkFlow::new(LinkConfig::default(), backend, widget.clone(), LocalSpawner);
    let (page, trigger) = FakePage::with_element("#start");

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            start(&page, &flow).unwrap();
            trigger.click();
            for _ in 0..16 {
                if widget.open_count() > 0 {
                    break;
                }
                tokio::task::yield_now().await;
            }
        })
        .await;

    assert_eq!(widget.open_count(), 1);
    assert_eq!(
        *journal.borrow(),
        vec!["create_link_token".to_string(), "open:link-sandbox-1".to_string()]
    );
}
