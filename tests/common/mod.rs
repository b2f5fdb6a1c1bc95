pub mod mocks;

use vidglass::core::PlaybackSession;

use self::mocks::MockEngine;

/// A session with a mock engine already attached, plus a handle on the mock.
pub fn ready_session() -> (PlaybackSession<MockEngine>, MockEngine) {
    let engine = MockEngine::new();
    let handle = engine.clone();
    let mut session = PlaybackSession::new(50);
    session.attach_engine(engine);
    handle.clear_calls();
    (session, handle)
}

/// Ready session that has already played `references` in order.
pub fn session_with(references: &[&str]) -> (PlaybackSession<MockEngine>, MockEngine) {
    let (mut session, handle) = ready_session();
    for reference in references {
        session.request_play(reference);
    }
    (session, handle)
}
