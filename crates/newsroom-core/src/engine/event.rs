//! The event contract a workflow routes on.

/// A message routed through a workflow run.
///
/// Events are immutable once emitted: the engine moves them by value and
/// never mutates them in flight. Each event maps to exactly one routing
/// discriminant (its *kind*), and the engine matches kinds against step
/// registrations to decide which step an event invokes.
///
/// Implementations are typically a plain enum where each variant returns a
/// distinct static kind string.
pub trait RunEvent: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// The terminal kind. Routing an event of this kind ends the run and
    /// the event becomes the run's result payload.
    const STOP: &'static str;

    /// The routing discriminant for this event.
    fn kind(&self) -> &'static str;

    /// Whether this event terminates the run.
    fn is_stop(&self) -> bool {
        self.kind() == Self::STOP
    }
}
