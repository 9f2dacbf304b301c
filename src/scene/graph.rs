use std::collections::HashMap;

use crate::{
    foundation::core::Affine,
    foundation::error::{AmbientError, AmbientResult},
    scene::drawable::{Drawable, PropertyKey},
    scene::signal::PhaseSignal,
};

/// Stable handle to a drawable. Ids are never reused within a graph.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct DrawableId(pub(crate) u64);

impl DrawableId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Handle into the graph's phase-signal table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SignalId(pub(crate) u32);

/// A scalar a tween can drive: one drawable property or one phase signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TweenTarget {
    Drawable(DrawableId, PropertyKey),
    Signal(SignalId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct GraphStats {
    /// Drawables ever inserted (root excluded).
    pub created: u64,
    /// Drawables removed, counting every node of removed subtrees.
    pub removed: u64,
}

impl GraphStats {
    pub fn live(self) -> u64 {
        self.created.saturating_sub(self.removed)
    }
}

/// One leaf in painter's order, with transforms and opacity resolved to world space.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderItem {
    pub id: DrawableId,
    pub transform: Affine,
    /// Own opacity multiplied by every ancestor's.
    pub opacity: f64,
    pub drawable: Drawable,
}

#[derive(Clone, Debug)]
struct Node {
    drawable: Drawable,
    parent: Option<DrawableId>,
    children: Vec<DrawableId>,
}

/// Arena-backed drawable tree plus the scene's phase signals.
///
/// Every node but the root has exactly one parent group. Removing a node removes its
/// whole subtree and clears the arena entries, so stale ids simply stop resolving.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: HashMap<DrawableId, Node>,
    root: DrawableId,
    next_id: u64,
    signals: Vec<PhaseSignal>,
    stats: GraphStats,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = DrawableId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                drawable: Drawable::group(),
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
            signals: Vec::new(),
            stats: GraphStats::default(),
        }
    }

    pub fn root(&self) -> DrawableId {
        self.root
    }

    /// Append `drawable` as the last (topmost) child of `parent`.
    pub fn insert(&mut self, parent: DrawableId, drawable: Drawable) -> AmbientResult<DrawableId> {
        let Some(p) = self.nodes.get_mut(&parent) else {
            return Err(AmbientError::lifecycle(format!(
                "insert under missing parent {parent:?}"
            )));
        };
        if !p.drawable.is_group() {
            return Err(AmbientError::lifecycle(format!(
                "insert under non-group parent {parent:?}"
            )));
        }

        let id = DrawableId(self.next_id);
        self.next_id += 1;
        p.children.push(id);
        self.nodes.insert(
            id,
            Node {
                drawable,
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        self.stats.created += 1;
        Ok(id)
    }

    /// Detach `id` from its parent and drop its subtree. Fails on a second call.
    pub fn remove(&mut self, id: DrawableId) -> AmbientResult<Drawable> {
        if id == self.root {
            return Err(AmbientError::lifecycle("the root group cannot be removed"));
        }
        let Some(node) = self.nodes.remove(&id) else {
            return Err(AmbientError::lifecycle(format!(
                "{id:?} is not in the scene graph (already removed?)"
            )));
        };

        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }

        let mut removed = 1u64;
        let mut stack = node.children;
        while let Some(child) = stack.pop() {
            if let Some(n) = self.nodes.remove(&child) {
                removed += 1;
                stack.extend(n.children);
            }
        }
        self.stats.removed += removed;
        Ok(node.drawable)
    }

    /// Drop every drawable except the root, and every signal.
    pub fn clear(&mut self) {
        let root = self.root;
        let before = self.nodes.len() as u64;
        self.nodes.retain(|id, _| *id == root);
        if let Some(r) = self.nodes.get_mut(&root) {
            r.children.clear();
        }
        self.stats.removed += before.saturating_sub(1);
        self.signals.clear();
    }

    pub fn contains(&self, id: DrawableId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.nodes.get(&id).map(|n| &n.drawable)
    }

    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.nodes.get_mut(&id).map(|n| &mut n.drawable)
    }

    /// Children in paint order; empty for leaves and unknown ids.
    pub fn children(&self, id: DrawableId) -> &[DrawableId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: DrawableId) -> Option<DrawableId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Number of drawables, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    pub fn create_signal(&mut self, initial: f64) -> SignalId {
        let id = SignalId(self.signals.len() as u32);
        self.signals.push(PhaseSignal::new(initial));
        id
    }

    pub fn signal(&self, id: SignalId) -> Option<PhaseSignal> {
        self.signals.get(id.0 as usize).copied()
    }

    pub fn read(&self, target: TweenTarget) -> Option<f64> {
        match target {
            TweenTarget::Drawable(id, key) => self.get(id)?.get(key),
            TweenTarget::Signal(id) => self.signal(id).map(PhaseSignal::value),
        }
    }

    /// Write a tweened value; `false` if the target no longer exists.
    pub fn write(&mut self, target: TweenTarget, v: f64) -> bool {
        match target {
            TweenTarget::Drawable(id, key) => self
                .get_mut(id)
                .map(|d| d.set(key, v))
                .unwrap_or(false),
            TweenTarget::Signal(id) => match self.signals.get_mut(id.0 as usize) {
                Some(s) => {
                    s.set(v);
                    true
                }
                None => false,
            },
        }
    }

    /// Painter-ordered leaves with world transforms, for the renderer.
    pub fn render_list(&self) -> Vec<RenderItem> {
        let mut out = Vec::new();
        self.collect(self.root, Affine::IDENTITY, 1.0, &mut out);
        out
    }

    fn collect(
        &self,
        id: DrawableId,
        parent_tf: Affine,
        parent_op: f64,
        out: &mut Vec<RenderItem>,
    ) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let transform = parent_tf * node.drawable.transform.to_affine();
        let opacity = parent_op * node.drawable.opacity;
        if node.drawable.is_group() {
            for &child in &node.children {
                self.collect(child, transform, opacity, out);
            }
        } else {
            out.push(RenderItem {
                id,
                transform,
                opacity,
                drawable: node.drawable.clone(),
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
