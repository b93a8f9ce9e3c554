//! Interaction guards.
//!
//! Behaviours bound to an object's interaction events are registered here.
//! Each registration returns a [`GuardSubscription`]; dropping the object
//! from the scene without detaching its subscriptions would leave stale
//! listeners behind, so the session detaches them on every reload, clear
//! and dispose.

use std::collections::HashMap;
use std::fmt;

use merchmagic_core::Point;
use uuid::Uuid;

use crate::scene::{ObjectId, SceneObject};

/// Interaction events raised while the user manipulates an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Moving,
    Scaling,
    Rotating,
    /// The gesture has settled.
    Modified,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 4] = [
        InteractionKind::Moving,
        InteractionKind::Scaling,
        InteractionKind::Rotating,
        InteractionKind::Modified,
    ];
}

/// Pose change carried by an interaction event. Unset fields are unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseUpdate {
    pub position: Option<Point>,
    pub scale: Option<f64>,
    pub angle: Option<f64>,
}

impl PoseUpdate {
    /// No pose change (e.g. a bare `Modified` event).
    pub fn none() -> Self {
        Self::default()
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            ..Self::default()
        }
    }

    pub fn scale_to(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn rotate_to(angle: f64) -> Self {
        Self {
            angle: Some(angle),
            ..Self::default()
        }
    }

    /// Writes the update into `object`. Non-finite values and non-positive
    /// scales are ignored.
    pub fn apply(&self, object: &mut SceneObject) {
        if let Some(p) = self.position.filter(|p| p.x.is_finite() && p.y.is_finite()) {
            object.position = p;
        }
        if let Some(s) = self.scale.filter(|s| s.is_finite() && *s > 0.0) {
            object.scale = s;
        }
        if let Some(a) = self.angle.filter(|a| a.is_finite()) {
            object.angle = a;
        }
    }
}

/// Behaviour triggered by an interaction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardAction {
    /// Translate the object back inside the print area.
    ClampToPrintArea,
    /// Schedule a redraw of the live surface.
    RequestRender,
    /// Publish the object's transform to observers.
    PublishTransform,
}

/// Handle for a registered guard. Not cloneable: one handle, one detach.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct GuardSubscription {
    id: Uuid,
    target: ObjectId,
}

impl GuardSubscription {
    pub fn target(&self) -> ObjectId {
        self.target
    }
}

impl fmt::Display for GuardSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.target)
    }
}

#[derive(Debug, Clone)]
struct Guard {
    target: ObjectId,
    kinds: Vec<InteractionKind>,
    action: GuardAction,
    order: u64,
}

/// Registry of active guards.
#[derive(Debug, Default)]
pub struct GuardRegistry {
    guards: HashMap<Uuid, Guard>,
    attached: u64,
}

impl GuardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `action` to `kinds` events on `target`.
    #[must_use = "a guard that is never detached outlives its object"]
    pub fn attach(
        &mut self,
        target: ObjectId,
        kinds: &[InteractionKind],
        action: GuardAction,
    ) -> GuardSubscription {
        let id = Uuid::new_v4();
        self.attached += 1;
        self.guards.insert(
            id,
            Guard {
                target,
                kinds: kinds.to_vec(),
                action,
                order: self.attached,
            },
        );
        GuardSubscription { id, target }
    }

    /// Detaches a guard. Returns false if it was already gone.
    pub fn detach(&mut self, subscription: GuardSubscription) -> bool {
        self.guards.remove(&subscription.id).is_some()
    }

    /// Actions bound to `kind` on `target`, in registration order.
    pub fn actions_for(&self, target: ObjectId, kind: InteractionKind) -> Vec<GuardAction> {
        let mut matching: Vec<&Guard> = self
            .guards
            .values()
            .filter(|g| g.target == target && g.kinds.contains(&kind))
            .collect();
        matching.sort_by_key(|g| g.order);
        matching.into_iter().map(|g| g.action).collect()
    }

    /// Number of active guards.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Number of active guards bound to `target`.
    pub fn count_for(&self, target: ObjectId) -> usize {
        self.guards.values().filter(|g| g.target == target).count()
    }

    /// Drops every guard. Outstanding handles become inert.
    pub fn clear(&mut self) {
        self.guards.clear();
    }
}
