// Storage events are reported through `tracing` when the feature is enabled.
// Only plain format arguments are accepted so that the disabled form can
// discard them without leaving unused bindings behind.

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        tracing::$level!($($arg)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {{}};
}
