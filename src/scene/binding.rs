use crate::scene::graph::SceneGraph;

/// A pure projection from scene state (usually a phase signal) onto drawable properties.
///
/// Bindings replace listener registration: the owning [`crate::Scene`] re-applies every
/// binding after each scheduler advance, in registration order.
pub trait Binding {
    fn apply(&mut self, graph: &mut SceneGraph);
}

impl<F> Binding for F
where
    F: FnMut(&mut SceneGraph),
{
    fn apply(&mut self, graph: &mut SceneGraph) {
        self(graph)
    }
}
