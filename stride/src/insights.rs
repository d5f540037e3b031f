//! Optional tracing instrumentation, compiled out entirely unless the
//! `tracing` (or `tracy`) feature is enabled: a handful of thin wrappers so
//! call sites never need `#[cfg(feature = ...)]` of their own.

#[cfg(feature = "tracy")]
pub fn init_tracy() {
    use tracing_subscriber::layer::SubscriberExt;

    let subscriber = tracing_subscriber::registry().with(tracing_tracy::TracyLayer::default());
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(not(feature = "tracy"))]
pub fn init_tracy() {}

#[cfg(feature = "tracing")]
#[inline]
pub fn record_push(sequence: u32) {
    tracing::trace!(sequence, "stride.push");
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub fn record_push(_sequence: u32) {}

#[cfg(feature = "tracing")]
#[inline]
pub fn record_pop(sequence: u32) {
    tracing::trace!(sequence, "stride.pop");
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub fn record_pop(_sequence: u32) {}

#[cfg(feature = "tracing")]
#[inline]
pub fn record_ring_growth(stripe: u32, new_len: u32) {
    tracing::debug!(stripe, new_len, "stride.ring_growth");
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub fn record_ring_growth(_stripe: u32, _new_len: u32) {}
