//! Panic hook installation is process-wide, so it is tested in its own
//! binary with a single test.

use std::sync::Arc;

use clibase::application::{interceptor, ErrorInterceptor};
use clibase::util::testing::{BufferTerminal, RecordingTerminator};
use clibase::ApplicationError;

#[test]
fn given_installed_hook_when_installing_again_then_rejected_until_uninstalled() {
    let interceptor = ErrorInterceptor::new(
        Arc::new(BufferTerminal::new()),
        Arc::new(RecordingTerminator::new()),
    );
    assert!(!interceptor::is_installed());

    let hook = interceptor.install().expect("first install");
    assert!(interceptor::is_installed());

    let second = interceptor.install();
    assert!(matches!(second, Err(ApplicationError::InterceptorInstalled)));

    hook.uninstall();
    assert!(!interceptor::is_installed());

    let again = interceptor.install().expect("install after uninstall");
    again.uninstall();
    assert!(!interceptor::is_installed());
}
