//! Application Startup Tests

use channel_relay::startup::Application;

use crate::common::test_settings;

#[tokio::test]
async fn test_build_binds_ephemeral_port() {
    let application = Application::build(test_settings()).await.unwrap();

    let addr = application.local_addr().unwrap();

    assert!(addr.ip().is_loopback());
    assert_ne!(addr.port(), 0);
}
