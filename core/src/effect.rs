//! Side effect descriptions.
//!
//! Effects are values, not execution: reducers return them and the store
//! runtime executes them. An effect may resolve to a follow-up action which is
//! fed back into the reducer (the async resolution half of a command, or a
//! remote event translated by the pipeline).

use smallvec::SmallVec;
use std::future::Future;
use std::pin::Pin;

/// The collection of effects returned by a single reducer run.
///
/// Most actions produce zero or one effect, so the inline capacity avoids
/// allocation on the hot path.
pub type Effects<A> = SmallVec<[Effect<A>; 4]>;

/// Describes a side effect to be executed by the store runtime.
///
/// # Type Parameters
///
/// - `Action`: the action type that effects can produce (feedback loop)
pub enum Effect<Action> {
    /// No-op effect
    None,

    /// Run effects concurrently
    Parallel(Vec<Effect<Action>>),

    /// Arbitrary async computation.
    ///
    /// Resolves to `Option<Action>` - if `Some`, the action is fed back into
    /// the reducer as a new, independently serialized mutation.
    Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
}

// Manual Debug implementation since Future doesn't implement Debug
impl<Action> std::fmt::Debug for Effect<Action>
where
    Action: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::None => write!(f, "Effect::None"),
            Effect::Parallel(effects) => {
                f.debug_tuple("Effect::Parallel").field(effects).finish()
            },
            Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
        }
    }
}

impl<Action> Effect<Action> {
    /// Combine effects to run concurrently
    #[must_use]
    pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
        Effect::Parallel(effects)
    }
}

impl<Action> Effect<Action>
where
    Action: Send + 'static,
{
    /// Map the action type produced by this effect.
    ///
    /// Used when composing feature reducers into an app reducer: a feature
    /// returns `Effect<FeatureAction>` and the app wraps it into
    /// `Effect<AppAction>` so the feedback loop stays closed over one action
    /// type.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(Action) -> B + Clone + Send + Sync + 'static,
    {
        match self {
            Effect::None => Effect::None,
            Effect::Parallel(effects) => Effect::Parallel(
                effects.into_iter().map(|e| e.map(f.clone())).collect(),
            ),
            Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Inner {
        Done(u32),
    }

    #[derive(Debug, PartialEq)]
    enum Outer {
        Inner(Inner),
    }

    #[test]
    fn map_none_stays_none() {
        let effect: Effect<Inner> = Effect::None;
        assert!(matches!(effect.map(Outer::Inner), Effect::<Outer>::None));
    }

    #[tokio::test]
    async fn map_future_wraps_resolved_action() {
        let effect: Effect<Inner> =
            Effect::Future(Box::pin(async { Some(Inner::Done(7)) }));

        let Effect::Future(fut) = effect.map(Outer::Inner) else {
            unreachable!("map preserves the variant");
        };
        assert_eq!(fut.await, Some(Outer::Inner(Inner::Done(7))));
    }

    #[tokio::test]
    async fn map_descends_into_parallel() {
        let effect: Effect<Inner> = Effect::merge(vec![
            Effect::None,
            Effect::Future(Box::pin(async { Some(Inner::Done(1)) })),
        ]);

        let Effect::Parallel(mut mapped) = effect.map(Outer::Inner) else {
            unreachable!("map preserves the variant");
        };
        assert_eq!(mapped.len(), 2);
        assert!(matches!(mapped[0], Effect::None));
        let Effect::Future(fut) = mapped.remove(1) else {
            unreachable!("map preserves the variant");
        };
        assert_eq!(fut.await, Some(Outer::Inner(Inner::Done(1))));
    }
}
