/*!
 * Tests for the rate governor
 */

use std::time::Instant;

use tamil_pdf_ocr::backends::BackendIdentity;
use tamil_pdf_ocr::rate_governor::{CallKind, RateGovernor};

use crate::common::zero_delay_config;

#[tokio::test]
async fn test_wait_if_needed_withZeroDelay_shouldReturnImmediately() {
    let governor = RateGovernor::new(&zero_delay_config());

    let start = Instant::now();
    governor
        .wait_if_needed(BackendIdentity::Cloud, CallKind::Request)
        .await;
    governor
        .wait_if_needed(BackendIdentity::Llm, CallKind::InterSegment)
        .await;

    assert!(start.elapsed().as_millis() < 100);
}

#[tokio::test]
async fn test_wait_if_needed_withConfiguredDelay_shouldPause() {
    let mut config = zero_delay_config();
    config.llm.rate.request_delay_ms = 50;
    let governor = RateGovernor::new(&config);

    let start = Instant::now();
    governor
        .wait_if_needed(BackendIdentity::Llm, CallKind::Request)
        .await;
    assert!(start.elapsed().as_millis() >= 50);

    // The inter-segment delay is independent and still zero
    let start = Instant::now();
    governor
        .wait_if_needed(BackendIdentity::Llm, CallKind::InterSegment)
        .await;
    assert!(start.elapsed().as_millis() < 50);
}

#[test]
fn test_log_request_withSeveralRequests_shouldCountThemInWindow() {
    let governor = RateGovernor::new(&zero_delay_config());

    assert_eq!(governor.requests_in_last_minute(BackendIdentity::Cloud), 0);

    governor.log_request(BackendIdentity::Cloud);
    governor.log_request(BackendIdentity::Cloud);
    governor.log_request(BackendIdentity::Cloud);

    assert_eq!(governor.requests_in_last_minute(BackendIdentity::Cloud), 3);
}

#[test]
fn test_log_request_withDifferentIdentities_shouldKeepIndependentWindows() {
    let governor = RateGovernor::new(&zero_delay_config());

    governor.log_request(BackendIdentity::LocalArgos);
    governor.log_request(BackendIdentity::LocalArgos);
    governor.log_request(BackendIdentity::LocalLibreTranslate);

    // The local identities share a policy but not a window
    assert_eq!(
        governor.requests_in_last_minute(BackendIdentity::LocalArgos),
        2
    );
    assert_eq!(
        governor.requests_in_last_minute(BackendIdentity::LocalLibreTranslate),
        1
    );
    assert_eq!(
        governor.requests_in_last_minute(BackendIdentity::LocalHuggingFace),
        0
    );
}
