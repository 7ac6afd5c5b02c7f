use std::future::Future;
use std::pin::Pin;
use gloo_timers::future::TimeoutFuture;
use chat_core::ports::TimerPort;

/// `setTimeout`-backed timer
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl TimerPort for GlooTimer {
    fn sleep(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()>>> {
        let ms = u32::try_from(ms).unwrap_or(u32::MAX);
        Box::pin(TimeoutFuture::new(ms))
    }
}
