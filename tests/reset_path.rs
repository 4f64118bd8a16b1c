//! One-way reset path: transient requests are dropped, held requests
//! reach the reset, and nothing leaves `ResetPending`.
//!
//! Lives in its own test binary because entering `ResetPending`
//! poisons the process-wide mode for good, exactly as on hardware.

#![cfg(not(target_os = "espidf"))]

use std::panic::catch_unwind;

use voltlink::config::LinkConfig;
use voltlink::drivers::reset_monitor;
use voltlink::drivers::watchdog::{self, Watchdog, WatchdogMode};

#[test]
fn held_reset_request_is_terminal() {
    let config = LinkConfig::default();
    let wd = Watchdog::enable_heartbeat(&config);
    assert_eq!(watchdog::mode(), WatchdogMode::Heartbeat);

    // Transient pulse: the edge was recorded, but the line is back
    // high when the handler rechecks it.
    reset_monitor::record_edge_from_isr();
    reset_monitor::sim_set_line_low(false);
    assert!(reset_monitor::take_pending_edge());
    reset_monitor::reset_isr_handler();
    assert_eq!(
        watchdog::mode(),
        WatchdogMode::Heartbeat,
        "a transient pulse must not arm the reset"
    );

    // Held request: still low at the recheck. On the host the reset
    // is modelled as an unwind out of the starve loop.
    reset_monitor::sim_set_line_low(true);
    let outcome = catch_unwind(|| reset_monitor::reset_isr_handler());
    assert!(outcome.is_err(), "a held request must reach the reset");
    assert_eq!(watchdog::mode(), WatchdogMode::ResetPending);

    // Terminal: the heartbeat is dead and re-enables are refused.
    let before = watchdog::heartbeat_count();
    watchdog::heartbeat_isr();
    assert_eq!(
        watchdog::heartbeat_count(),
        before,
        "heartbeat must not fire once a reset is pending"
    );
    let _wd2 = Watchdog::enable_heartbeat(&config);
    assert_eq!(watchdog::mode(), WatchdogMode::ResetPending);
    drop(wd);
}
